use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::color::Color;
use crate::config::{DebugMode, RenderConfig, RenderMode};
use crate::float::*;
use crate::intersect::Ray;
use crate::intersection::Intersection;
use crate::scene::Scene;
use crate::stats::RenderStats;

/// Mirror d about the normal
pub fn reflect(d: Vector3<Float>, n: Vector3<Float>) -> Vector3<Float> {
    d - 2.0 * d.dot(n) * n
}

/// Refracted direction of the unit vector d through a surface with unit normal n.
/// Entering or exiting is decided by the side d arrives from.
/// None on total internal reflection.
pub fn refract(
    d: Vector3<Float>,
    n: Vector3<Float>,
    refractive_index: Float,
) -> Option<Vector3<Float>> {
    let mut cos_i = -d.dot(n);
    let (eta, n) = if cos_i >= 0.0 {
        (1.0 / refractive_index, n)
    } else {
        cos_i = -cos_i;
        (refractive_index, -n)
    };
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some((eta * d + (eta * cos_i - k.sqrt()) * n).normalize())
    }
}

/// Whitted style recursive shading of single rays
pub struct Tracer<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
    stats: &'a RenderStats,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, config: &'a RenderConfig, stats: &'a RenderStats) -> Self {
        Tracer {
            scene,
            config,
            stats,
        }
    }

    /// Color seen along the ray. depth counts the bounces taken so far.
    pub fn trace(&self, ray: &Ray, depth: usize) -> Color {
        let ray = ray.clone().with_epsilon(self.config.epsilon);
        let hit = match self.scene.nearest(&ray) {
            Some(hit) => hit,
            None => return self.scene.background(),
        };
        match self.config.render_mode {
            RenderMode::Debug(DebugMode::Normals) => Color::from_normal(hit.normal),
            RenderMode::Debug(DebugMode::ForwardNormals) => {
                let n = if hit.normal.dot(ray.dir) > 0.0 {
                    -hit.normal
                } else {
                    hit.normal
                };
                Color::from_normal(n)
            }
            RenderMode::Shaded => self.shade(&ray, &hit, depth),
        }
    }

    fn shade(&self, ray: &Ray, hit: &Intersection, depth: usize) -> Color {
        let mat = &hit.material;
        let dir = ray.dir.normalize();
        let mut c = mat.local_weight() * self.local_illumination(dir, hit);
        if depth >= self.config.max_depth {
            return c;
        }
        if mat.reflectivity > 0.0 {
            c += mat.reflectivity * self.reflected(dir, hit, depth);
        }
        if mat.transparency > 0.0 {
            let refracted = match refract(dir, hit.normal, mat.refractive_index) {
                Some(t_dir) => {
                    // Continue on the far side of the surface
                    let side = if t_dir.dot(hit.normal) < 0.0 {
                        -hit.normal
                    } else {
                        hit.normal
                    };
                    self.stats.add_secondary_ray();
                    let t_ray = Ray::offset(hit.point, side, t_dir, self.config.epsilon);
                    self.trace(&t_ray, depth + 1)
                }
                None => self.reflected(dir, hit, depth),
            };
            c += mat.transparency * refracted;
        }
        c
    }

    fn reflected(&self, dir: Vector3<Float>, hit: &Intersection, depth: usize) -> Color {
        let r_dir = reflect(dir, hit.normal).normalize();
        let side = if r_dir.dot(hit.normal) < 0.0 {
            -hit.normal
        } else {
            hit.normal
        };
        self.stats.add_secondary_ray();
        let r_ray = Ray::offset(hit.point, side, r_dir, self.config.epsilon);
        self.trace(&r_ray, depth + 1)
    }

    /// Ambient plus diffuse and specular from every light that faces the surface
    fn local_illumination(&self, dir: Vector3<Float>, hit: &Intersection) -> Color {
        let mat = &hit.material;
        let n = hit.normal;
        let to_eye = -dir;
        let mut c = mat.ka * mat.color;
        for &light in self.scene.lights() {
            let l = (light - hit.point).normalize();
            let n_dot_l = n.dot(l);
            if n_dot_l <= 0.0 {
                continue;
            }
            let visibility = self.visibility(hit.point, n, light);
            if visibility == 0.0 {
                continue;
            }
            let diffuse = mat.kd * n_dot_l * mat.color;
            let r = 2.0 * n_dot_l * n - l;
            let specular =
                mat.ks * r.dot(to_eye).max(0.0).powf(mat.shininess) * Color::white();
            c += visibility * (diffuse + specular);
        }
        c
    }

    /// Fraction of shadow rays that reach the light unobstructed
    fn visibility(&self, p: Point3<Float>, n: Vector3<Float>, light: Point3<Float>) -> Float {
        let n_rays = self.config.num_shadow_rays.max(1);
        let radius = self.config.light_radius;
        let mut unoccluded = 0usize;
        for _ in 0..n_rays {
            let target = if radius > 0.0 {
                let jitter = Vector3::new(
                    1.0 - 2.0 * rand::random::<Float>(),
                    1.0 - 2.0 * rand::random::<Float>(),
                    1.0 - 2.0 * rand::random::<Float>(),
                );
                light + radius * jitter
            } else {
                light
            };
            self.stats.add_shadow_ray();
            let orig = p + self.config.epsilon * n;
            let to_light = target - orig;
            let distance = to_light.magnitude();
            let shadow_ray =
                Ray::new(orig, to_light / distance).with_epsilon(self.config.epsilon);
            let blocked = self
                .scene
                .trace(&shadow_ray)
                .iter()
                .any(|h| h.t < distance);
            if !blocked {
                unoccluded += 1;
            }
        }
        unoccluded.to_float() / n_rays.to_float()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Primitive;

    fn assert_color(c1: Color, c2: Color) {
        assert!(c1.max_diff(c2) < 1e-9, "{:?} != {:?}", c1, c2);
    }

    fn red_sphere_scene() -> Scene {
        Scene::new()
            .with_primitive(Primitive::sphere().with_color(Color::new(1.0, 0.0, 0.0)))
            .with_light(Point3::new(0.0, 10.0, 0.0))
    }

    fn top_ray() -> Ray {
        Ray::new(Point3::new(0.0, 3.0, 0.0), Vector3::new(0.0, -1.0, 0.0))
    }

    #[test]
    fn test_reflect_and_refract() {
        let n = Vector3::unit_y();
        let d = Vector3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, n);
        assert!((r - Vector3::new(1.0, 1.0, 0.0).normalize()).magnitude() < 1e-12);
        // Index 1 passes straight through from either side
        assert!((refract(d, n, 1.0).unwrap() - d).magnitude() < 1e-12);
        assert!((refract(-d, n, 1.0).unwrap() + d).magnitude() < 1e-12);
        // Head on rays are not bent
        let down = -Vector3::unit_y();
        assert!((refract(down, n, 1.5).unwrap() - down).magnitude() < 1e-12);
        // Grazing exit from a dense medium reflects totally
        let grazing = Vector3::new(1.0, 0.2, 0.0).normalize();
        assert!(refract(grazing, n, 1.5).is_none());
    }

    #[test]
    fn test_snell_angle() {
        let n = Vector3::unit_y();
        let d = Vector3::new(1.0, -1.0, 0.0).normalize();
        let t = refract(d, n, 1.5).unwrap();
        let sin_i = (45.0 as Float).to_radians().sin();
        let sin_t = t.x / t.magnitude();
        assert!((sin_i - 1.5 * sin_t).abs() < 1e-12);
    }

    #[test]
    fn test_miss_gives_background() {
        let scene = red_sphere_scene();
        let config = RenderConfig::preview();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        let ray = Ray::new(Point3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(tracer.trace(&ray, 0), Color::white());
    }

    #[test]
    fn test_lit_from_above() {
        let scene = red_sphere_scene();
        let config = RenderConfig::preview();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        // ka + kd on the red channel, white highlight of ks
        assert_color(tracer.trace(&top_ray(), 0), Color::new(1.0, 0.2, 0.2));
    }

    #[test]
    fn test_occluder_leaves_ambient() {
        let scene = red_sphere_scene().with_primitive(
            Primitive::sphere()
                .scale_uniform(0.5)
                .translate(0.0, 6.0, 0.0),
        );
        let config = RenderConfig::preview();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        let ray = Ray::new(Point3::new(0.0, 3.0, 0.0), Vector3::new(0.0, -1.0, 0.0));
        assert_color(tracer.trace(&ray, 0), Color::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn test_soft_shadow_is_partial() {
        // Occluder covers the light center but not the whole jitter cube
        let scene = red_sphere_scene().with_primitive(
            Primitive::square()
                .scale_uniform(1.5)
                .rotate(Vector3::unit_x(), cgmath::Deg(90.0))
                .translate(0.0, 9.0, 0.0),
        );
        let config = RenderConfig {
            num_shadow_rays: 64,
            light_radius: 2.0,
            ..RenderConfig::preview()
        };
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        let c = tracer.trace(&top_ray(), 0);
        assert!(c.r() > 0.2 && c.r() < 1.0, "{:?}", c);
    }

    #[test]
    fn test_mirror_sees_background_and_depth_cap() {
        let scene = Scene::new()
            .with_primitive(
                Primitive::sphere()
                    .with_color(Color::black())
                    .with_reflectivity(1.0),
            )
            .with_light(Point3::new(0.0, 10.0, 0.0))
            .with_background(Color::new(0.0, 0.0, 1.0));
        let stats = RenderStats::new();
        let config = RenderConfig::preview();
        let tracer = Tracer::new(&scene, &config, &stats);
        // Local color has no weight, the reflection sees the background
        assert_color(tracer.trace(&top_ray(), 0), Color::new(0.0, 0.0, 1.0));
        // Out of bounces only the weighted local color remains
        let capped = RenderConfig {
            max_depth: 0,
            ..RenderConfig::preview()
        };
        let tracer = Tracer::new(&scene, &capped, &stats);
        assert_color(tracer.trace(&top_ray(), 0), Color::black());
    }

    #[test]
    fn test_transparent_sphere_shows_what_is_behind() {
        let scene = Scene::new()
            .with_primitive(
                Primitive::sphere()
                    .with_color(Color::black())
                    .with_transparency(1.0, 1.0),
            )
            .with_background(Color::new(0.0, 1.0, 0.0));
        let stats = RenderStats::new();
        let config = RenderConfig::preview();
        let tracer = Tracer::new(&scene, &config, &stats);
        assert_color(tracer.trace(&top_ray(), 0), Color::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_debug_normals() {
        let scene = red_sphere_scene();
        let config = RenderConfig::debug_normals();
        let stats = RenderStats::new();
        let tracer = Tracer::new(&scene, &config, &stats);
        assert_color(tracer.trace(&top_ray(), 0), Color::new(0.5, 1.0, 0.5));
    }
}

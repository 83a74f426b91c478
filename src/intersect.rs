use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use crate::consts;
use crate::float::*;

pub trait Intersect<'a, H> {
    fn intersect(&'a self, ray: &Ray) -> Option<H>;
}

#[derive(Clone, Debug)]
pub struct Ray {
    pub orig: Point3<Float>,
    pub dir: Vector3<Float>,
    /// Hits closer than this along the ray are discarded
    pub epsilon: Float,
}

impl Ray {
    /// Ray with the default tolerance. The direction is used as given.
    pub fn new(orig: Point3<Float>, dir: Vector3<Float>) -> Ray {
        Ray {
            orig,
            dir,
            epsilon: consts::EPSILON,
        }
    }

    /// Ray from origin towards another point
    pub fn from_point(orig: Point3<Float>, to: Point3<Float>) -> Ray {
        Ray::new(orig, (to - orig).normalize())
    }

    /// Secondary ray that starts slightly off the surface along the offset direction
    pub fn offset(
        p: Point3<Float>,
        offset: Vector3<Float>,
        dir: Vector3<Float>,
        epsilon: Float,
    ) -> Ray {
        Ray {
            orig: p + epsilon * offset,
            dir,
            epsilon,
        }
    }

    pub fn with_epsilon(self, epsilon: Float) -> Ray {
        Ray { epsilon, ..self }
    }

    /// Point at parameter t
    pub fn at(&self, t: Float) -> Point3<Float> {
        self.orig + t * self.dir
    }
}

/// Intersection with the plane z = 0. Returns None if the ray runs parallel to it.
pub fn intersect_plane_z(ray: &Ray) -> Option<Float> {
    if ray.dir.z.abs() < ray.epsilon {
        return None;
    }
    let t = -ray.orig.z / ray.dir.z;
    if t > ray.epsilon {
        Some(t)
    } else {
        None
    }
}

/// Ray triangle intersection with the edge half-plane tests.
/// Returns the ray parameter and the hit point.
pub fn intersect_triangle(
    ray: &Ray,
    a: Point3<Float>,
    b: Point3<Float>,
    c: Point3<Float>,
) -> Option<(Float, Point3<Float>)> {
    let n = (b - a).cross(c - a);
    let denom = n.dot(ray.dir);
    if denom.abs() < ray.epsilon * n.magnitude() * ray.dir.magnitude() {
        return None;
    }
    let t = n.dot(a - ray.orig) / denom;
    if t <= ray.epsilon {
        return None;
    }
    let p = ray.at(t);
    let inside = [(a, b), (b, c), (c, a)]
        .iter()
        .all(|&(v0, v1)| n.cross(v1 - v0).dot(p - v0) >= 0.0);
    if inside {
        Some((t, p))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_parallel_ray_misses() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        assert!(intersect_plane_z(&ray).is_none());
    }

    #[test]
    fn test_plane_hit() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 2.0), Vector3::new(0.0, 0.0, -0.5));
        let t = intersect_plane_z(&ray).unwrap();
        assert!((t - 4.0).abs() < 1e-9);
        assert!(ray.at(t).z.abs() < 1e-9);
    }

    #[test]
    fn test_triangle_inside_and_outside() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(0.0, 1.0, 0.0);
        let hit = Ray::new(Point3::new(0.25, 0.25, 1.0), Vector3::new(0.0, 0.0, -1.0));
        let (t, p) = intersect_triangle(&hit, a, b, c).unwrap();
        assert!((t - 1.0).abs() < 1e-9);
        assert!((p.x - 0.25).abs() < 1e-9);
        let miss = Ray::new(Point3::new(0.75, 0.75, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(intersect_triangle(&miss, a, b, c).is_none());
        // Winding does not matter
        assert!(intersect_triangle(&hit, a, c, b).is_some());
    }
}

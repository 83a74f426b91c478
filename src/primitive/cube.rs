use cgmath::Vector3;

use super::{RayTraceable, SurfaceHit};
use crate::consts;
use crate::intersect::Ray;

/// Axis aligned cube spanning [-1, 1] on every axis
#[derive(Clone, Copy, Debug, Default)]
pub struct Cube;

impl RayTraceable for Cube {
    /// Slab test, so a ray crossing the cube always gives one entry and one exit
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        let (mut t_near, mut t_far) = (-consts::INFINITY, consts::INFINITY);
        let (mut near_axis, mut far_axis) = (0, 0);
        for axis in 0..3 {
            let d = ray.dir[axis];
            let o = ray.orig[axis];
            // Parallel to these slabs
            if d.abs() < ray.epsilon {
                if o.abs() > 1.0 {
                    return;
                }
                continue;
            }
            let (mut t0, mut t1) = ((-1.0 - o) / d, (1.0 - o) / d);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            if t0 > t_near {
                t_near = t0;
                near_axis = axis;
            }
            if t1 < t_far {
                t_far = t1;
                far_axis = axis;
            }
        }
        if !t_near.is_finite() || !t_far.is_finite() || t_near > t_far {
            return;
        }
        let mut entry_normal = Vector3::new(0.0, 0.0, 0.0);
        entry_normal[near_axis] = -ray.dir[near_axis].signum();
        hits.push(SurfaceHit {
            t: t_near,
            point: ray.at(t_near),
            normal: entry_normal,
        });
        let mut exit_normal = Vector3::new(0.0, 0.0, 0.0);
        exit_normal[far_axis] = ray.dir[far_axis].signum();
        hits.push(SurfaceHit {
            t: t_far,
            point: ray.at(t_far),
            normal: exit_normal,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point3;

    #[test]
    fn test_axis_hits() {
        let ray = Ray::new(Point3::new(0.5, 0.5, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        hits.sort_by(|a, b| a.t.partial_cmp(&b.t).unwrap());
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 4.0).abs() < 1e-9);
        assert_eq!(hits[0].normal, Vector3::new(0.0, 0.0, 1.0));
        assert!((hits[1].t - 6.0).abs() < 1e-9);
        assert_eq!(hits[1].normal, Vector3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_diagonal_hit_uses_dominant_face() {
        let ray = Ray::new(Point3::new(-3.0, 0.2, 0.0), Vector3::new(1.0, 0.1, 0.0));
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.normal.x.abs() == 1.0));
    }

    #[test]
    fn test_miss() {
        let ray = Ray::new(Point3::new(3.0, 3.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_ray_leaving_near_an_edge_crosses_twice() {
        // Exits through x = 1 just before the z = -1 face
        let ray = Ray::new(
            Point3::new(1.000_005 - 0.006, 0.3, 5.0),
            Vector3::new(0.001, 0.0, -1.0),
        );
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 4.0).abs() < 1e-9);
        assert_eq!(hits[0].normal, Vector3::new(0.0, 0.0, 1.0));
        assert!((hits[1].t - 5.995).abs() < 1e-6);
        assert_eq!(hits[1].normal, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_along_an_edge() {
        let ray = Ray::new(Point3::new(1.0, 1.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].t - 4.0).abs() < 1e-9);
        assert!((hits[1].t - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point3::new(1.5, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut hits = Vec::new();
        Cube.surface_hits(&ray, &mut hits);
        assert!(hits.is_empty());
    }
}

use cgmath::Vector3;

use super::{RayTraceable, SurfaceHit};
use crate::intersect::Ray;
use crate::quartic::solve_quadratic;

/// Open tube x^2 + z^2 = 1 for |y| <= 1
#[derive(Clone, Copy, Debug, Default)]
pub struct Cylinder;

impl RayTraceable for Cylinder {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        let (o, d) = (ray.orig, ray.dir);
        let a = d.x * d.x + d.z * d.z;
        // Parallel to the axis
        if a < ray.epsilon * ray.epsilon {
            return;
        }
        let b = 2.0 * (o.x * d.x + o.z * d.z);
        let c = o.x * o.x + o.z * o.z - 1.0;
        let (n, roots) = solve_quadratic(a, b, c);
        for &t in &roots[..n] {
            let p = ray.at(t);
            if p.y.abs() <= 1.0 {
                hits.push(SurfaceHit {
                    t,
                    point: p,
                    normal: Vector3::new(p.x, 0.0, p.z),
                });
            }
        }
    }
}

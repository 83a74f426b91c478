use cgmath::prelude::*;

use super::{RayTraceable, SurfaceHit};
use crate::intersect::Ray;
use crate::quartic::solve_quadratic;

/// Unit sphere centered at the origin
#[derive(Clone, Copy, Debug, Default)]
pub struct Sphere;

impl RayTraceable for Sphere {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        let o = ray.orig.to_vec();
        let a = ray.dir.magnitude2();
        let b = 2.0 * o.dot(ray.dir);
        let c = o.magnitude2() - 1.0;
        let (n, mut roots) = solve_quadratic(a, b, c);
        if n == 2 && roots[1] < roots[0] {
            roots.swap(0, 1);
        }
        for &t in &roots[..n] {
            let p = ray.at(t);
            hits.push(SurfaceHit {
                t,
                point: p,
                normal: p.to_vec(),
            });
        }
    }
}

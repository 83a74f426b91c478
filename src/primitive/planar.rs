use cgmath::Vector3;

use super::{RayTraceable, SurfaceHit};
use crate::float::*;
use crate::intersect::{intersect_plane_z, Ray};

/// Slack on the square bounds
const EDGE_TOLERANCE: Float = 1e-6;

/// Infinite plane z = 0 facing +z
#[derive(Clone, Copy, Debug, Default)]
pub struct Plane;

/// Square [-1, 1] x [-1, 1] in the plane z = 0 facing +z
#[derive(Clone, Copy, Debug, Default)]
pub struct Square;

/// Unit disk in the plane z = 0 facing +z
#[derive(Clone, Copy, Debug, Default)]
pub struct Circle;

fn planar_hit(ray: &Ray, hits: &mut Vec<SurfaceHit>, inside: impl Fn(Float, Float) -> bool) {
    if let Some(t) = intersect_plane_z(ray) {
        let p = ray.at(t);
        if inside(p.x, p.y) {
            hits.push(SurfaceHit {
                t,
                point: p,
                normal: Vector3::unit_z(),
            });
        }
    }
}

impl RayTraceable for Plane {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        planar_hit(ray, hits, |_, _| true);
    }
}

impl RayTraceable for Square {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        let bound = 1.0 + EDGE_TOLERANCE;
        planar_hit(ray, hits, |x, y| x.abs() <= bound && y.abs() <= bound);
    }
}

impl RayTraceable for Circle {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        planar_hit(ray, hits, |x, y| x * x + y * y <= 1.0);
    }
}

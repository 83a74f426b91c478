use cgmath::prelude::*;
use cgmath::Vector3;

use super::{RayTraceable, SurfaceHit};
use crate::float::*;
use crate::intersect::Ray;
use crate::quartic::solve_quartic;

pub const DEFAULT_MAJOR_RADIUS: Float = 1.6;
pub const DEFAULT_MINOR_RADIUS: Float = 0.4;

/// Torus centered at the origin with the y axis through its hole
#[derive(Clone, Copy, Debug)]
pub struct Torus {
    /// Distance from the origin to the center of the tube
    major_radius: Float,
    /// Radius of the tube
    minor_radius: Float,
}

impl Default for Torus {
    fn default() -> Self {
        Self::new(DEFAULT_MAJOR_RADIUS, DEFAULT_MINOR_RADIUS)
    }
}

impl Torus {
    pub fn new(major_radius: Float, minor_radius: Float) -> Self {
        Self {
            major_radius,
            minor_radius,
        }
    }

    pub fn major_radius(&self) -> Float {
        self.major_radius
    }

    pub fn minor_radius(&self) -> Float {
        self.minor_radius
    }

    /// Coefficients of (|P|^2 + R^2 - r^2)^2 = 4 R^2 (x^2 + z^2) along o + s d, d of unit length
    fn coefficients(&self, o: Vector3<Float>, d: Vector3<Float>) -> [Float; 5] {
        let r2 = self.major_radius * self.major_radius;
        let four_r2 = 4.0 * r2;
        let od = o.dot(d);
        let e = o.dot(o) + r2 - self.minor_radius * self.minor_radius;
        [
            1.0,
            4.0 * od,
            4.0 * od * od + 2.0 * e - four_r2 * (d.x * d.x + d.z * d.z),
            4.0 * od * e - 2.0 * four_r2 * (o.x * d.x + o.z * d.z),
            e * e - four_r2 * (o.x * o.x + o.z * o.z),
        ]
    }

    /// Normal points away from the nearest point on the tube's center circle
    fn normal_at(&self, p: Vector3<Float>) -> Vector3<Float> {
        let radial = Vector3::new(p.x, 0.0, p.z);
        if radial.magnitude2() == 0.0 {
            return Vector3::unit_y();
        }
        (p - radial.normalize() * self.major_radius).normalize()
    }
}

impl RayTraceable for Torus {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        let dir_len = ray.dir.magnitude();
        if dir_len == 0.0 {
            return;
        }
        let d = ray.dir / dir_len;
        let o = ray.orig.to_vec();
        // Solve from the bounding sphere so the coefficients stay small
        let bound = self.major_radius + self.minor_radius;
        let od = o.dot(d);
        let disc = od * od - (o.magnitude2() - bound * bound);
        if disc < 0.0 {
            return;
        }
        let sqrt_disc = disc.sqrt();
        if -od + sqrt_disc < 0.0 {
            return;
        }
        let start = (-od - sqrt_disc).max(0.0);
        let (n, roots) = solve_quartic(self.coefficients(o + start * d, d));
        for &s in &roots[..n] {
            let t = (start + s) / dir_len;
            let p = ray.at(t);
            hits.push(SurfaceHit {
                t,
                point: p,
                normal: self.normal_at(p.to_vec()),
            });
        }
    }
}

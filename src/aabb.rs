use cgmath::prelude::*;
use cgmath::Point3;

use crate::consts;
use crate::float::*;
use crate::intersect::{Intersect, Ray};

#[derive(Clone, Debug)]
pub struct Aabb {
    pub min: Point3<Float>,
    pub max: Point3<Float>,
}

fn min_point(p1: &Point3<Float>, p2: &Point3<Float>) -> Point3<Float> {
    let mut p_min = Point3::origin();
    for i in 0..3 {
        p_min[i] = p1[i].min(p2[i]);
    }
    p_min
}

fn max_point(p1: &Point3<Float>, p2: &Point3<Float>) -> Point3<Float> {
    let mut p_max = Point3::origin();
    for i in 0..3 {
        p_max[i] = p1[i].max(p2[i]);
    }
    p_max
}

impl Aabb {
    /// Box that contains nothing. Adding a point makes it contain exactly that point.
    pub fn empty() -> Aabb {
        Aabb {
            min: Point3::new(consts::INFINITY, consts::INFINITY, consts::INFINITY),
            max: Point3::new(-consts::INFINITY, -consts::INFINITY, -consts::INFINITY),
        }
    }

    /// Update the bounding box with new position
    pub fn add_point(&mut self, new_pos: &Point3<Float>) {
        self.min = min_point(&self.min, new_pos);
        self.max = max_point(&self.max, new_pos);
    }

    /// Update the bounding box to enclose other aswell
    pub fn add_aabb(&mut self, other: &Aabb) {
        self.min = min_point(&self.min, &other.min);
        self.max = max_point(&self.max, &other.max);
    }

    /// Grow the box by margin in every direction
    pub fn padded(mut self, margin: Float) -> Aabb {
        for i in 0..3 {
            self.min[i] -= margin;
            self.max[i] += margin;
        }
        self
    }

    pub fn center(&self) -> Point3<Float> {
        Point3::midpoint(self.min, self.max)
    }

    pub fn area(&self) -> Float {
        let d = self.max - self.min;
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    pub fn longest_edge_i(&self) -> usize {
        let mut longest = 0.0;
        let mut index = 0;
        for i in 0..3 {
            let length = self.max[i] - self.min[i];
            if length > longest {
                longest = length;
                index = i;
            }
        }
        index
    }
}

impl Intersect<'_, Float> for Aabb {
    /// Slab test. Returns the entry distance, which is 0 when the ray starts inside.
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        let mut t_start = 0.0;
        let mut t_end = consts::INFINITY;
        for i in 0..3 {
            let recip = 1.0 / ray.dir[i];
            let mut t1 = (self.min[i] - ray.orig[i]) * recip;
            let mut t2 = (self.max[i] - ray.orig[i]) * recip;
            if recip < 0.0 {
                std::mem::swap(&mut t1, &mut t2);
            }
            // NaN from 0 * inf leaves the bounds untouched
            if t1 > t_start {
                t_start = t1;
            }
            if t2 < t_end {
                t_end = t2;
            }
            if t_start > t_end {
                return None;
            }
        }
        Some(t_start)
    }
}

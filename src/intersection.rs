use std::cmp::Ordering;
use std::collections::VecDeque;

use cgmath::{Point3, Vector3};

use crate::float::*;
use crate::material::Material;
use crate::primitive::Primitive;

/// A single surface crossing along a ray
#[derive(Clone, Debug)]
pub struct Intersection<'a> {
    pub t: Float,
    pub point: Point3<Float>,
    pub normal: Vector3<Float>,
    pub material: Material,
    /// Leaf primitive that produced the hit
    pub primitive: Option<&'a Primitive>,
}

/// Unordered hits from one trace call. Only hits beyond epsilon are admitted.
#[derive(Clone, Debug)]
pub struct Intersections<'a> {
    hits: Vec<Intersection<'a>>,
    epsilon: Float,
}

impl<'a> Intersections<'a> {
    pub fn new(epsilon: Float) -> Self {
        Self {
            hits: Vec::new(),
            epsilon,
        }
    }

    /// Returns false if the hit was rejected for being too close
    pub fn add(&mut self, hit: Intersection<'a>) -> bool {
        if hit.t > self.epsilon {
            self.hits.push(hit);
            true
        } else {
            false
        }
    }

    pub fn extend(&mut self, other: Intersections<'a>) {
        for hit in other.hits {
            self.add(hit);
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Intersection<'a>> {
        self.hits.iter()
    }

    pub fn nearest(&self) -> Option<&Intersection<'a>> {
        self.hits
            .iter()
            .min_by(|h1, h2| h1.t.partial_cmp(&h2.t).unwrap_or(Ordering::Equal))
    }

    pub fn into_nearest(self) -> Option<Intersection<'a>> {
        self.hits
            .into_iter()
            .min_by(|h1, h2| h1.t.partial_cmp(&h2.t).unwrap_or(Ordering::Equal))
    }

    pub fn sorted(self) -> IntersectionList<'a> {
        IntersectionList::new(self.hits)
    }
}

impl<'a> IntoIterator for Intersections<'a> {
    type Item = Intersection<'a>;
    type IntoIter = std::vec::IntoIter<Intersection<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.into_iter()
    }
}

/// Hits in ascending t. Equal t keep their insertion order.
#[derive(Clone, Debug)]
pub struct IntersectionList<'a> {
    hits: VecDeque<Intersection<'a>>,
}

impl<'a> IntersectionList<'a> {
    fn new(mut hits: Vec<Intersection<'a>>) -> Self {
        // Vec::sort_by is stable
        hits.sort_by(|h1, h2| h1.t.partial_cmp(&h2.t).unwrap_or(Ordering::Equal));
        Self { hits: hits.into() }
    }

    pub fn peek(&self) -> Option<&Intersection<'a>> {
        self.hits.front()
    }

    pub fn pop(&mut self) -> Option<Intersection<'a>> {
        self.hits.pop_front()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, Intersection<'a>> {
        self.hits.iter()
    }
}

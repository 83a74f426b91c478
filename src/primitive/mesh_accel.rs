use cgmath::Point3;

use crate::aabb::Aabb;
use crate::consts;
use crate::float::*;
use crate::intersect::{Intersect, Ray};

const MAX_LEAF_SIZE: usize = 4;

#[derive(Clone, Copy, Debug)]
pub enum SplitMode {
    Object,
    Spatial,
    Sah,
}

#[derive(Clone, Debug)]
enum Indices {
    Inner(u32, u32),
    Leaf(u32, u32),
}

#[derive(Clone, Debug)]
struct AccelNode {
    aabb: Aabb,
    indices: Indices,
}

impl AccelNode {
    fn new(faces: &Faces) -> AccelNode {
        let start_i = faces.start_i as u32;
        let end_i = start_i + faces.len() as u32;
        AccelNode {
            aabb: faces.aabb.clone(),
            indices: Indices::Leaf(start_i, end_i),
        }
    }

    fn convert_to_inner(&mut self, left_child: usize, right_child: usize) {
        self.indices = Indices::Inner(left_child as u32, right_child as u32);
    }
}

struct Faces<'a> {
    bounds: &'a [Aabb],
    centers: &'a [Point3<Float>],
    indices: &'a mut [usize],
    aabb: Aabb,
    /// Node contains indices [start_i, start_i + len) from the main indices array
    start_i: usize,
    /// Axis along which the indices have been sorted
    sorted_axis: Option<usize>,
}

impl<'a> Faces<'a> {
    fn new(
        bounds: &'a [Aabb],
        centers: &'a [Point3<Float>],
        indices: &'a mut [usize],
        start_i: usize,
    ) -> Faces<'a> {
        let mut aabb = Aabb::empty();
        for &i in indices.iter() {
            aabb.add_aabb(&bounds[i]);
        }
        Faces {
            bounds,
            centers,
            indices,
            aabb,
            start_i,
            sorted_axis: None,
        }
    }

    fn sort(&mut self, axis_i: usize) {
        // The indices are already sorted along the requested axis
        if self.sorted_axis == Some(axis_i) {
            return;
        }
        let centers = self.centers;
        self.indices.sort_unstable_by(|&i1, &i2| {
            let c1 = centers[i1][axis_i];
            let c2 = centers[i2][axis_i];
            c1.partial_cmp(&c2).unwrap_or(std::cmp::Ordering::Equal)
        });
        self.sorted_axis = Some(axis_i);
    }

    fn split(self, i: usize) -> (Faces<'a>, Faces<'a>) {
        let (i1, i2) = self.indices.split_at_mut(i);
        let mut node1 = Faces::new(self.bounds, self.centers, i1, self.start_i);
        let mut node2 = Faces::new(self.bounds, self.centers, i2, self.start_i + i);
        node1.sorted_axis = self.sorted_axis;
        node2.sorted_axis = self.sorted_axis;
        (node1, node2)
    }

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn bounds_at(&self, i: usize) -> &Aabb {
        &self.bounds[self.indices[i]]
    }
}

/// Bounding volume hierarchy over the faces of a mesh.
/// Only narrows down which faces need the exact test.
#[derive(Clone, Debug)]
pub struct MeshAccel {
    nodes: Vec<AccelNode>,
    /// Face indices ordered so that every leaf covers a contiguous range
    permutation: Vec<usize>,
}

impl MeshAccel {
    /// Face bounds are padded so that flat faces still have volume
    pub fn build(face_bounds: &[Aabb], split_mode: SplitMode) -> MeshAccel {
        let bounds: Vec<Aabb> = face_bounds
            .iter()
            .map(|b| b.clone().padded(consts::EPSILON))
            .collect();
        let centers: Vec<Point3<Float>> = bounds.iter().map(Aabb::center).collect();
        let mut permutation: Vec<usize> = (0..bounds.len()).collect();
        let faces = Faces::new(&bounds, &centers, &mut permutation, 0);
        let mut nodes = vec![AccelNode::new(&faces)];
        let mut split_stack = Vec::new();
        if faces.len() > MAX_LEAF_SIZE {
            split_stack.push((0usize, faces));
        }

        while let Some((node_i, mut faces)) = split_stack.pop() {
            let mid_offset = match split_mode {
                SplitMode::Object => object_split(&mut faces),
                SplitMode::Spatial => spatial_split(&mut faces),
                SplitMode::Sah => sah_split(&mut faces),
            };
            let (f1, f2) = if let Some(offset) = mid_offset {
                faces.split(offset)
            } else {
                continue;
            };

            let left_child = AccelNode::new(&f1);
            let left_child_i = nodes.len();
            if f1.len() > MAX_LEAF_SIZE {
                split_stack.push((nodes.len(), f1));
            }
            nodes.push(left_child);

            let right_child = AccelNode::new(&f2);
            let right_child_i = nodes.len();
            if f2.len() > MAX_LEAF_SIZE {
                split_stack.push((nodes.len(), f2));
            }
            nodes.push(right_child);
            nodes[node_i].convert_to_inner(left_child_i, right_child_i);
        }
        nodes.shrink_to_fit();
        MeshAccel { nodes, permutation }
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Cheap rejection against the bounds of the whole mesh
    pub fn is_hit_by_ray(&self, ray: &Ray) -> bool {
        self.nodes[0].aabb.intersect(ray).is_some()
    }

    /// Faces whose bounds the ray passes through, in ascending face order
    pub fn faces_along_ray(&self, ray: &Ray) -> Vec<usize> {
        let mut faces = Vec::new();
        let mut node_stack = vec![0usize];
        while let Some(node_i) = node_stack.pop() {
            let node = &self.nodes[node_i];
            if node.aabb.intersect(ray).is_none() {
                continue;
            }
            match node.indices {
                Indices::Leaf(start_i, end_i) => {
                    faces.extend_from_slice(&self.permutation[start_i as usize..end_i as usize])
                }
                Indices::Inner(left_i, right_i) => {
                    node_stack.push(left_i as usize);
                    node_stack.push(right_i as usize);
                }
            }
        }
        faces.sort_unstable();
        faces
    }
}

fn object_split(faces: &mut Faces) -> Option<usize> {
    let axis_i = faces.aabb.longest_edge_i();
    faces.sort(axis_i);
    Some(faces.len() / 2)
}

fn spatial_split(faces: &mut Faces) -> Option<usize> {
    let axis_i = faces.aabb.longest_edge_i();
    let mid_val = faces.aabb.center()[axis_i];
    faces.sort(axis_i);
    let centers = faces.centers;
    let i = faces
        .indices
        .binary_search_by(|&i| {
            let c = centers[i][axis_i];
            c.partial_cmp(&mid_val).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(|e| e);
    // Use object median if all centers are on one side of the median
    if i == 0 || i == faces.len() {
        object_split(faces)
    } else {
        Some(i)
    }
}

fn sah_split(faces: &mut Faces) -> Option<usize> {
    let mut min_score = consts::INFINITY;
    let mut min_axis = 0;
    let mut min_i = 0;
    let sorted_axis = faces.sorted_axis.unwrap_or(0);
    for offset in 0..3 {
        // Check the sorted axis first
        let axis = (sorted_axis + offset) % 3;
        faces.sort(axis);
        // Precompute all right side bbs
        let n = faces.len();
        let mut right_bbs = Vec::with_capacity(n);
        right_bbs.push(faces.bounds_at(n - 1).clone());
        for i in 1..n {
            let mut new_bb = right_bbs[i - 1].clone();
            new_bb.add_aabb(faces.bounds_at(n - 1 - i));
            right_bbs.push(new_bb);
        }
        let mut left_bb = Aabb::empty();
        // Go through the possible splits
        for i in 1..n {
            left_bb.add_aabb(faces.bounds_at(i - 1));
            let right_bb = &right_bbs[n - 1 - i];
            let n_left = i.to_float();
            let n_right = (n - i).to_float();
            let score = n_left * left_bb.area() + n_right * right_bb.area();
            if score < min_score {
                min_score = score;
                min_axis = axis;
                min_i = i;
            }
        }
    }
    if min_i == 0 {
        None
    } else {
        faces.sort(min_axis);
        Some(min_i)
    }
}

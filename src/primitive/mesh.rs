use std::cmp::Ordering;
use std::collections::BTreeMap;

use cgmath::prelude::*;
use cgmath::{Point3, Vector3};

use super::mesh_accel::{MeshAccel, SplitMode};
use super::{RayTraceable, SurfaceHit};
use crate::aabb::Aabb;
use crate::error::{Result, TracerError};
use crate::float::*;
use crate::intersect::{intersect_triangle, Ray};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NormalStyle {
    /// Flat shading with the face normal
    Face,
    /// Vertex normals interpolated across the face
    Vertex,
}

/// Polygon mesh. Faces are fanned into triangles from their first vertex.
#[derive(Clone, Debug)]
pub struct Mesh {
    positions: Vec<Point3<Float>>,
    faces: Vec<Vec<usize>>,
    face_normals: Vec<Vector3<Float>>,
    vertex_normals: Vec<Vector3<Float>>,
    normal_style: NormalStyle,
    /// Undirected edge to the faces that contain it
    edges: BTreeMap<(usize, usize), Vec<usize>>,
    accel: Option<MeshAccel>,
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Newell's method, robust for slightly non-planar polygons
fn polygon_normal(positions: &[Point3<Float>], face: &[usize]) -> Vector3<Float> {
    let mut n = Vector3::zero();
    for (i, &vi) in face.iter().enumerate() {
        let cur = positions[vi];
        let next = positions[face[(i + 1) % face.len()]];
        n.x += (cur.y - next.y) * (cur.z + next.z);
        n.y += (cur.z - next.z) * (cur.x + next.x);
        n.z += (cur.x - next.x) * (cur.y + next.y);
    }
    n
}

impl Mesh {
    /// Build a mesh and check its topology
    pub fn new(
        positions: Vec<Point3<Float>>,
        faces: Vec<Vec<usize>>,
        normal_style: NormalStyle,
    ) -> Result<Mesh> {
        if faces.is_empty() {
            return Err(TracerError::DegenerateMesh("mesh has no faces".to_string()));
        }
        let mut face_normals = Vec::with_capacity(faces.len());
        let mut vertex_normals = vec![Vector3::zero(); positions.len()];
        let mut used = vec![false; positions.len()];
        let mut edges: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        for (face_i, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(TracerError::DegenerateMesh(format!(
                    "face {} has only {} vertices",
                    face_i,
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&vi| vi >= positions.len()) {
                return Err(TracerError::DegenerateMesh(format!(
                    "face {} refers to missing vertex {}",
                    face_i, bad
                )));
            }
            let n = polygon_normal(&positions, face);
            let area = 0.5 * n.magnitude();
            if area < Float::EPSILON {
                return Err(TracerError::DegenerateMesh(format!(
                    "face {} has zero area",
                    face_i
                )));
            }
            let n = n.normalize();
            face_normals.push(n);
            for (i, &vi) in face.iter().enumerate() {
                vertex_normals[vi] += area * n;
                used[vi] = true;
                let next = face[(i + 1) % face.len()];
                edges.entry(edge_key(vi, next)).or_default().push(face_i);
            }
        }
        if normal_style == NormalStyle::Vertex {
            if let Some(orphan) = used.iter().position(|&u| !u) {
                return Err(TracerError::DegenerateMesh(format!(
                    "vertex {} belongs to no face",
                    orphan
                )));
            }
        }
        for n in vertex_normals.iter_mut() {
            if n.magnitude2() > 0.0 {
                *n = n.normalize();
            }
        }
        Ok(Mesh {
            positions,
            faces,
            face_normals,
            vertex_normals,
            normal_style,
            edges,
            accel: None,
        })
    }

    /// Attach a bounding volume hierarchy over the faces
    pub fn with_accelerator(mut self, split_mode: SplitMode) -> Mesh {
        let face_bounds: Vec<Aabb> = (0..self.faces.len()).map(|f| self.face_bounds(f)).collect();
        self.accel = Some(MeshAccel::build(&face_bounds, split_mode));
        self
    }

    pub fn has_accelerator(&self) -> bool {
        self.accel.is_some()
    }

    pub fn positions(&self) -> &[Point3<Float>] {
        &self.positions
    }

    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    pub fn face_normal(&self, face_i: usize) -> Vector3<Float> {
        self.face_normals[face_i]
    }

    pub fn vertex_normal(&self, vertex_i: usize) -> Vector3<Float> {
        self.vertex_normals[vertex_i]
    }

    pub fn normal_style(&self) -> NormalStyle {
        self.normal_style
    }

    /// Faces that share the edge between two vertices
    pub fn edge_faces(&self, a: usize, b: usize) -> Result<&[usize]> {
        match self.edges.get(&edge_key(a, b)) {
            Some(faces) if !faces.is_empty() => Ok(faces),
            _ => Err(TracerError::EdgeWithoutFaces(a, b)),
        }
    }

    /// Edges used by a single face
    pub fn boundary_edges(&self) -> Vec<(usize, usize)> {
        self.edges
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
            .collect()
    }

    pub fn is_closed(&self) -> bool {
        self.edges.values().all(|faces| faces.len() == 2)
    }

    pub fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for p in &self.positions {
            aabb.add_point(p);
        }
        aabb
    }

    fn face_bounds(&self, face_i: usize) -> Aabb {
        let mut aabb = Aabb::empty();
        for &vi in &self.faces[face_i] {
            aabb.add_point(&self.positions[vi]);
        }
        aabb
    }

    /// Test one face. Returns the first fan triangle that is hit.
    fn intersect_face(&self, face_i: usize, ray: &Ray) -> Option<SurfaceHit> {
        let face = &self.faces[face_i];
        let a = face[0];
        for pair in face[1..].windows(2) {
            let (b, c) = (pair[0], pair[1]);
            let (pa, pb, pc) = (self.positions[a], self.positions[b], self.positions[c]);
            if let Some((t, p)) = intersect_triangle(ray, pa, pb, pc) {
                let normal = match self.normal_style {
                    NormalStyle::Face => self.face_normals[face_i],
                    NormalStyle::Vertex => {
                        // Each vertex is weighted by the area of the opposite sub-triangle
                        let wa = (pb - p).cross(pc - p).magnitude();
                        let wb = (pc - p).cross(pa - p).magnitude();
                        let wc = (pa - p).cross(pb - p).magnitude();
                        let n = wa * self.vertex_normals[a]
                            + wb * self.vertex_normals[b]
                            + wc * self.vertex_normals[c];
                        if n.magnitude2() > 0.0 {
                            n.normalize()
                        } else {
                            self.face_normals[face_i]
                        }
                    }
                };
                return Some(SurfaceHit { t, point: p, normal });
            }
        }
        None
    }

    /// Exhaustive test against every face
    pub fn intersect_all_faces(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        self.push_face_hits(0..self.faces.len(), ray, hits);
    }

    /// Hits on the given faces in ascending `t`. A ray through a shared edge or
    /// vertex meets every face around it, so hits closer than the ray epsilon
    /// that cross the surface in the same direction count once.
    fn push_face_hits<I>(&self, faces: I, ray: &Ray, hits: &mut Vec<SurfaceHit>)
    where
        I: IntoIterator<Item = usize>,
    {
        let mut found: Vec<(bool, SurfaceHit)> = faces
            .into_iter()
            .filter_map(|f| {
                let entering = self.face_normals[f].dot(ray.dir) < 0.0;
                self.intersect_face(f, ray).map(|hit| (entering, hit))
            })
            .collect();
        found.sort_by(|a, b| a.1.t.partial_cmp(&b.1.t).unwrap_or(Ordering::Equal));
        let mut last: Option<(bool, Float)> = None;
        for (entering, hit) in found {
            if let Some((last_entering, last_t)) = last {
                if last_entering == entering && hit.t - last_t < ray.epsilon {
                    continue;
                }
            }
            last = Some((entering, hit.t));
            hits.push(hit);
        }
    }
}

impl RayTraceable for Mesh {
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>) {
        match &self.accel {
            Some(accel) => {
                if !accel.is_hit_by_ray(ray) {
                    return;
                }
                self.push_face_hits(accel.faces_along_ray(ray), ray, hits);
            }
            None => self.intersect_all_faces(ray, hits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed cube with quad faces, outward winding
    fn cube_mesh(style: NormalStyle) -> Mesh {
        let positions = vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ];
        let faces = vec![
            vec![0, 3, 2, 1],
            vec![4, 5, 6, 7],
            vec![0, 1, 5, 4],
            vec![2, 3, 7, 6],
            vec![1, 2, 6, 5],
            vec![0, 4, 7, 3],
        ];
        Mesh::new(positions, faces, style).unwrap()
    }

    /// The cube with every quad split along one diagonal
    fn triangulated_cube_mesh() -> Mesh {
        let quads = cube_mesh(NormalStyle::Face);
        let faces = quads
            .faces()
            .iter()
            .flat_map(|q| vec![vec![q[0], q[1], q[2]], vec![q[0], q[2], q[3]]])
            .collect();
        Mesh::new(quads.positions().to_vec(), faces, NormalStyle::Face).unwrap()
    }

    fn hit_ts(mesh: &Mesh, ray: &Ray) -> Vec<(Float, [i64; 3])> {
        let mut hits = Vec::new();
        mesh.surface_hits(ray, &mut hits);
        let mut out: Vec<_> = hits
            .iter()
            .map(|h| {
                let n = [h.normal.x, h.normal.y, h.normal.z];
                (h.t, [n[0].round() as i64, n[1].round() as i64, n[2].round() as i64])
            })
            .collect();
        out.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        out
    }

    #[test]
    fn test_cube_topology() {
        let mesh = cube_mesh(NormalStyle::Face);
        assert!(mesh.is_closed());
        assert!(mesh.boundary_edges().is_empty());
        assert_eq!(mesh.edge_faces(0, 1).unwrap().len(), 2);
        assert_eq!(mesh.edge_faces(1, 0).unwrap().len(), 2);
        match mesh.edge_faces(0, 6) {
            Err(TracerError::EdgeWithoutFaces(0, 6)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_face_normals_point_out() {
        let mesh = cube_mesh(NormalStyle::Face);
        let ray = Ray::new(Point3::new(0.2, 0.3, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = hit_ts(&mesh, &ray);
        assert_eq!(hits.len(), 2);
        assert!((hits[0].0 - 4.0).abs() < 1e-9);
        assert_eq!(hits[0].1, [0, 0, 1]);
        assert!((hits[1].0 - 6.0).abs() < 1e-9);
        assert_eq!(hits[1].1, [0, 0, -1]);
    }

    #[test]
    fn test_vertex_normals_blend_at_corner() {
        let mesh = cube_mesh(NormalStyle::Vertex);
        let n = mesh.vertex_normal(6);
        let expected = Vector3::new(1.0, 1.0, 1.0).normalize();
        assert!((n - expected).magnitude() < 1e-9);
        // At the face center the corner normals cancel sideways
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let mut hits = Vec::new();
        mesh.surface_hits(&ray, &mut hits);
        let front = hits
            .iter()
            .min_by(|a, b| a.t.partial_cmp(&b.t).unwrap())
            .unwrap();
        assert!((front.normal - Vector3::unit_z()).magnitude() < 1e-6);
    }

    #[test]
    fn test_degenerate_meshes_are_rejected() {
        let tri = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        assert!(Mesh::new(tri.clone(), vec![vec![0, 1]], NormalStyle::Face).is_err());
        assert!(Mesh::new(tri.clone(), vec![vec![0, 1, 3]], NormalStyle::Face).is_err());
        assert!(Mesh::new(tri.clone(), vec![vec![0, 1, 1]], NormalStyle::Face).is_err());
        assert!(Mesh::new(tri.clone(), vec![], NormalStyle::Face).is_err());
        let mut with_orphan = tri.clone();
        with_orphan.push(Point3::new(5.0, 5.0, 5.0));
        assert!(Mesh::new(with_orphan.clone(), vec![vec![0, 1, 2]], NormalStyle::Face).is_ok());
        assert!(Mesh::new(with_orphan, vec![vec![0, 1, 2]], NormalStyle::Vertex).is_err());
        let open = Mesh::new(tri, vec![vec![0, 1, 2]], NormalStyle::Face).unwrap();
        assert_eq!(open.boundary_edges().len(), 3);
        assert!(!open.is_closed());
    }

    #[test]
    fn test_accelerated_hits_match_exhaustive() {
        let plain = cube_mesh(NormalStyle::Face);
        let accelerated = cube_mesh(NormalStyle::Face).with_accelerator(SplitMode::Sah);
        assert!(accelerated.has_accelerator());
        let rays = [
            Ray::new(Point3::new(0.2, 0.3, 5.0), Vector3::new(0.0, 0.0, -1.0)),
            Ray::new(Point3::new(-4.0, 0.5, 0.1), Vector3::new(1.0, 0.0, 0.0)),
            Ray::new(Point3::new(3.0, 3.0, 3.0), Vector3::new(-1.0, -0.9, -1.1)),
            Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.3, 1.0, 0.2)),
            Ray::new(Point3::new(5.0, 5.0, 5.0), Vector3::new(1.0, 0.0, 0.0)),
        ];
        for ray in &rays {
            assert_eq!(hit_ts(&plain, ray), hit_ts(&accelerated, ray));
        }
    }

    #[test]
    fn test_ray_through_shared_diagonal_hits_once_per_side() {
        let plain = triangulated_cube_mesh();
        let accelerated = triangulated_cube_mesh().with_accelerator(SplitMode::Sah);
        // Crosses the front and back quads on their shared diagonals
        let ray = Ray::new(Point3::new(0.25, 0.25, 5.0), Vector3::new(0.0, 0.0, -1.0));
        for mesh in &[plain, accelerated] {
            let hits = hit_ts(mesh, &ray);
            assert_eq!(hits.len(), 2, "{:?}", hits);
            assert!((hits[0].0 - 4.0).abs() < 1e-9);
            assert_eq!(hits[0].1, [0, 0, 1]);
            assert!((hits[1].0 - 6.0).abs() < 1e-9);
            assert_eq!(hits[1].1, [0, 0, -1]);
        }
    }

    #[test]
    fn test_ray_through_cube_vertex_counts_once() {
        let mesh = cube_mesh(NormalStyle::Face);
        // Enters through the corner shared by three faces
        let ray = Ray::new(Point3::new(2.0, 2.0, 2.0), Vector3::new(-1.0, -1.0, -1.0));
        let hits = hit_ts(&mesh, &ray);
        assert_eq!(hits.len(), 2, "{:?}", hits);
        assert!((hits[0].0 - 1.0).abs() < 1e-9);
        assert!((hits[1].0 - 3.0).abs() < 1e-9);
    }
}

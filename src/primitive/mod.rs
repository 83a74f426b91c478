//! Ray traceable solids and surfaces.
//!
//! Every primitive lives in its own local frame given by its transform.
//! Leaf shapes only know how to intersect rays in that frame, the traversal
//! in this module moves rays and hits between frames.

mod cube;
mod cylinder;
mod mesh;
mod mesh_accel;
mod planar;
mod sphere;
mod torus;

use cgmath::prelude::*;
use cgmath::{Deg, Point3, Vector3};

use crate::color::Color;
use crate::csg::{Csg, CsgOp};
use crate::error::{Result, TracerError};
use crate::float::*;
use crate::intersect::Ray;
use crate::intersection::{Intersection, Intersections};
use crate::material::Material;
use crate::transform::{Transform, TransformStack};

pub use self::cube::Cube;
pub use self::cylinder::Cylinder;
pub use self::mesh::{Mesh, NormalStyle};
pub use self::mesh_accel::{MeshAccel, SplitMode};
pub use self::planar::{Circle, Plane, Square};
pub use self::sphere::Sphere;
pub use self::torus::Torus;

/// Surface crossing in the local frame of a leaf shape
#[derive(Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub t: Float,
    pub point: Point3<Float>,
    pub normal: Vector3<Float>,
}

impl SurfaceHit {
    pub fn new(ray: &Ray, t: Float, normal: Vector3<Float>) -> Self {
        Self {
            t,
            point: ray.at(t),
            normal,
        }
    }
}

/// Leaf shapes that can be intersected in their own frame
pub trait RayTraceable {
    /// Push every crossing of the ray with the surface. Hits at or before
    /// ray.epsilon may be pushed, they are filtered by the caller.
    fn surface_hits(&self, ray: &Ray, hits: &mut Vec<SurfaceHit>);
}

#[derive(Clone, Debug)]
pub enum Shape {
    Sphere(Sphere),
    Cube(Cube),
    Torus(Torus),
    Plane(Plane),
    Square(Square),
    Circle(Circle),
    Cylinder(Cylinder),
    Mesh(Box<Mesh>),
    Csg(Csg),
    /// Children share the transform of the group
    Group(Vec<Primitive>),
}

impl Shape {
    fn as_leaf(&self) -> Option<&dyn RayTraceable> {
        match self {
            Shape::Sphere(s) => Some(s),
            Shape::Cube(s) => Some(s),
            Shape::Torus(s) => Some(s),
            Shape::Plane(s) => Some(s),
            Shape::Square(s) => Some(s),
            Shape::Circle(s) => Some(s),
            Shape::Cylinder(s) => Some(s),
            Shape::Mesh(s) => Some(s.as_ref()),
            Shape::Csg(_) | Shape::Group(_) => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Primitive {
    shape: Shape,
    transform: Transform,
    material: Material,
}

impl Primitive {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            transform: Transform::identity(),
            material: Material::default(),
        }
    }

    /// Unit sphere at the origin
    pub fn sphere() -> Self {
        Self::new(Shape::Sphere(Sphere))
    }

    /// Cube spanning [-1, 1] on every axis
    pub fn cube() -> Self {
        Self::new(Shape::Cube(Cube))
    }

    /// Torus around the y axis
    pub fn torus(major_radius: Float, minor_radius: Float) -> Self {
        Self::new(Shape::Torus(Torus::new(major_radius, minor_radius)))
    }

    pub fn plane() -> Self {
        Self::new(Shape::Plane(Plane))
    }

    pub fn square() -> Self {
        Self::new(Shape::Square(Square))
    }

    pub fn circle() -> Self {
        Self::new(Shape::Circle(Circle))
    }

    pub fn cylinder() -> Self {
        Self::new(Shape::Cylinder(Cylinder))
    }

    pub fn mesh(mesh: Mesh) -> Self {
        Self::new(Shape::Mesh(Box::new(mesh)))
    }

    pub fn csg(op: CsgOp, a: Primitive, b: Primitive) -> Self {
        Self::new(Shape::Csg(Csg::new(op, a, b)))
    }

    pub fn union(a: Primitive, b: Primitive) -> Self {
        Self::csg(CsgOp::Union, a, b)
    }

    pub fn intersection(a: Primitive, b: Primitive) -> Self {
        Self::csg(CsgOp::Intersection, a, b)
    }

    pub fn difference(a: Primitive, b: Primitive) -> Self {
        Self::csg(CsgOp::Difference, a, b)
    }

    pub fn group(children: Vec<Primitive>) -> Self {
        Self::new(Shape::Group(children))
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn local_to_parent(&self) -> &Transform {
        &self.transform
    }

    pub fn parent_to_local(&self) -> Transform {
        self.transform.inverted()
    }

    /// Apply t after the current transform
    pub fn transformed(self, t: &Transform) -> Self {
        Self {
            transform: self.transform.then(t),
            ..self
        }
    }

    pub fn translate(self, x: Float, y: Float, z: Float) -> Self {
        self.transformed(&Transform::translation(Vector3::new(x, y, z)))
    }

    pub fn rotate(self, axis: Vector3<Float>, angle: Deg<Float>) -> Self {
        self.transformed(&Transform::rotation(axis, angle))
    }

    pub fn scale(self, x: Float, y: Float, z: Float) -> Self {
        self.transformed(&Transform::scale(x, y, z))
    }

    pub fn scale_uniform(self, s: Float) -> Self {
        self.scale(s, s, s)
    }

    pub fn with_material(self, material: Material) -> Self {
        Self { material, ..self }
    }

    pub fn with_color(self, color: Color) -> Self {
        let material = self.material.with_color(color);
        self.with_material(material)
    }

    pub fn with_reflectivity(self, reflectivity: Float) -> Self {
        let material = self.material.with_reflectivity(reflectivity);
        self.with_material(material)
    }

    pub fn with_transparency(self, transparency: Float, refractive_index: Float) -> Self {
        let material = self.material.with_transparency(transparency, refractive_index);
        self.with_material(material)
    }

    /// Intersect a ray given in this primitive's local frame.
    /// Hits are reported in the same frame.
    pub fn trace_local(&self, ray: &Ray) -> Intersections<'_> {
        let mut stack = TransformStack::new();
        self.trace_contents(ray, &mut stack)
    }

    /// Check transforms and materials of this primitive and everything below it
    pub fn validate(&self) -> Result<()> {
        if !self.transform.is_invertible() {
            return Err(TracerError::SingularTransform(format!(
                "{:?}",
                self.transform.forward()
            )));
        }
        self.material.validate()?;
        match &self.shape {
            Shape::Csg(csg) => {
                csg.a().validate()?;
                csg.b().validate()
            }
            Shape::Group(children) => children.iter().try_for_each(Primitive::validate),
            _ => Ok(()),
        }
    }

    /// Trace the contents with the stack top mapping this primitive's frame to the ray's frame
    fn trace_contents<'a>(&'a self, ray: &Ray, stack: &mut TransformStack) -> Intersections<'a> {
        match &self.shape {
            Shape::Csg(csg) => csg.trace(ray, stack),
            Shape::Group(children) => {
                let mut hits = Intersections::new(ray.epsilon);
                for child in children {
                    hits.extend(trace_with_stack(child, ray, stack));
                }
                hits
            }
            shape => {
                let mut hits = Intersections::new(ray.epsilon);
                if let Some(leaf) = shape.as_leaf() {
                    let to_root = stack.top();
                    let local_ray = to_root.ray_to_local(ray);
                    let mut local_hits = Vec::new();
                    leaf.surface_hits(&local_ray, &mut local_hits);
                    let dir_len = ray.dir.magnitude();
                    for hit in local_hits.into_iter().filter(|h| h.t > local_ray.epsilon) {
                        let point = to_root.point(hit.point);
                        hits.add(Intersection {
                            t: (point - ray.orig).magnitude() / dir_len,
                            point,
                            normal: to_root.normal(hit.normal),
                            material: self.material,
                            primitive: Some(self),
                        });
                    }
                }
                hits
            }
        }
    }
}

/// Trace a primitive whose parent frame is the top of the stack
pub fn trace_with_stack<'a>(
    primitive: &'a Primitive,
    ray: &Ray,
    stack: &mut TransformStack,
) -> Intersections<'a> {
    stack.push(&primitive.transform);
    let hits = primitive.trace_contents(ray, stack);
    stack.pop();
    hits
}

/// Intersect a primitive placed in the ray's frame with its own transform
pub fn trace_scene<'a>(primitive: &'a Primitive, ray: &Ray) -> Intersections<'a> {
    trace_with_stack(primitive, ray, &mut TransformStack::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(hits: &Intersections) -> Vec<Float> {
        let mut list = hits.clone().sorted();
        std::iter::from_fn(|| list.pop()).map(|h| h.t).collect()
    }

    fn assert_ts(found: &[Float], expected: &[Float]) {
        assert_eq!(found.len(), expected.len(), "{:?}", found);
        for (f, e) in found.iter().zip(expected) {
            assert!((f - e).abs() < 1e-9, "{:?} != {:?}", found, expected);
        }
    }

    #[test]
    fn test_sphere_hits() {
        let sphere = Primitive::sphere();
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let hits = trace_scene(&sphere, &ray);
        assert_ts(&ts(&hits), &[4.0, 6.0]);
        let nearest = hits.nearest().unwrap();
        assert!((nearest.normal - Vector3::unit_z()).magnitude() < 1e-9);
        assert!(std::ptr::eq(nearest.primitive.unwrap(), &sphere));
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Primitive::sphere();
        let ray = Ray::new(Point3::new(5.0, 5.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(trace_scene(&sphere, &ray).is_empty());
    }

    #[test]
    fn test_rigid_transform_keeps_t() {
        let sphere = Primitive::sphere()
            .rotate(Vector3::new(1.0, 1.0, 0.0), Deg(40.0))
            .translate(3.0, -2.0, 1.0);
        let ray = Ray::new(Point3::new(3.0, -2.0, 6.0), Vector3::new(0.0, 0.0, -1.0));
        assert_ts(&ts(&trace_scene(&sphere, &ray)), &[4.0, 6.0]);
    }

    #[test]
    fn test_scaled_transform_reports_world_t() {
        let sphere = Primitive::sphere().scale(1.0, 1.0, 2.0);
        // Unnormalized direction, t is measured in its length
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -2.0));
        let hits = trace_scene(&sphere, &ray);
        assert_ts(&ts(&hits), &[1.5, 3.5]);
        let nearest = hits.nearest().unwrap();
        assert!((nearest.point.z - 2.0).abs() < 1e-9);
        assert!((nearest.normal.magnitude() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_group_collects_children() {
        let group = Primitive::group(vec![
            Primitive::sphere().translate(0.0, 0.0, -3.0),
            Primitive::sphere().translate(0.0, 0.0, 3.0),
        ])
        .translate(1.0, 0.0, 0.0);
        let ray = Ray::new(Point3::new(1.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_ts(&ts(&trace_scene(&group, &ray)), &[6.0, 8.0, 12.0, 14.0]);
    }

    #[test]
    fn test_trace_local_ignores_own_transform() {
        let sphere = Primitive::sphere().translate(10.0, 0.0, 0.0);
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert_ts(&ts(&sphere.trace_local(&ray)), &[4.0, 6.0]);
        assert!(trace_scene(&sphere, &ray).is_empty());
    }

    #[test]
    fn test_validate_reaches_csg_operands() {
        let bad = Primitive::sphere().with_reflectivity(2.0);
        let csg = Primitive::union(Primitive::cube(), bad);
        assert!(csg.validate().is_err());
        assert!(Primitive::sphere().validate().is_ok());
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let flat = Primitive::sphere().scale(1.0, 0.0, 1.0);
        match flat.validate() {
            Err(TracerError::SingularTransform(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
        let nested = Primitive::difference(
            Primitive::cube(),
            Primitive::group(vec![Primitive::sphere().scale_uniform(0.0)]),
        );
        match nested.validate() {
            Err(TracerError::SingularTransform(_)) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}

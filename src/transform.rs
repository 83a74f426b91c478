use cgmath::{
    Deg, EuclideanSpace, InnerSpace, Matrix, Matrix3, Matrix4, Point3, SquareMatrix,
    Transform as _, Vector3,
};

use crate::float::*;
use crate::intersect::Ray;

/// Affine local to parent transform with its cached inverse
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    forward: Matrix4<Float>,
    inverse: Matrix4<Float>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            forward: Matrix4::identity(),
            inverse: Matrix4::identity(),
        }
    }

    /// None if the matrix is singular
    pub fn from_matrix(forward: Matrix4<Float>) -> Option<Self> {
        forward.invert().map(|inverse| Self { forward, inverse })
    }

    pub fn translation(v: Vector3<Float>) -> Self {
        Self {
            forward: Matrix4::from_translation(v),
            inverse: Matrix4::from_translation(-v),
        }
    }

    pub fn rotation(axis: Vector3<Float>, angle: Deg<Float>) -> Self {
        let axis = axis.normalize();
        Self {
            forward: Matrix4::from_axis_angle(axis, angle),
            inverse: Matrix4::from_axis_angle(axis, -angle),
        }
    }

    /// A zero component gives a transform that fails `is_invertible`
    pub fn scale(x: Float, y: Float, z: Float) -> Self {
        Self {
            forward: Matrix4::from_nonuniform_scale(x, y, z),
            inverse: Matrix4::from_nonuniform_scale(1.0 / x, 1.0 / y, 1.0 / z),
        }
    }

    /// False when the forward matrix collapses space or its inverse is not finite
    pub fn is_invertible(&self) -> bool {
        let finite = |m: &Matrix4<Float>| {
            let cols: &[[Float; 4]; 4] = m.as_ref();
            cols.iter().flatten().all(|c| c.is_finite())
        };
        self.forward.determinant() != 0.0 && finite(&self.forward) && finite(&self.inverse)
    }

    pub fn forward(&self) -> &Matrix4<Float> {
        &self.forward
    }

    pub fn inverse(&self) -> &Matrix4<Float> {
        &self.inverse
    }

    pub fn inverted(&self) -> Transform {
        Transform {
            forward: self.inverse,
            inverse: self.forward,
        }
    }

    /// Child frame nested inside self, i.e. self * child
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            forward: self.forward * child.forward,
            inverse: child.inverse * self.inverse,
        }
    }

    /// Apply t after self, i.e. t * self
    pub fn then(&self, t: &Transform) -> Transform {
        t.compose(self)
    }

    pub fn point(&self, p: Point3<Float>) -> Point3<Float> {
        self.forward.transform_point(p)
    }

    pub fn vector(&self, v: Vector3<Float>) -> Vector3<Float> {
        self.forward.transform_vector(v)
    }

    /// Normals map through the inverse transpose of the linear part
    pub fn normal(&self, n: Vector3<Float>) -> Vector3<Float> {
        (linear_part(&self.inverse).transpose() * n).normalize()
    }

    pub fn inverse_point(&self, p: Point3<Float>) -> Point3<Float> {
        self.inverse.transform_point(p)
    }

    pub fn inverse_vector(&self, v: Vector3<Float>) -> Vector3<Float> {
        self.inverse.transform_vector(v)
    }

    /// Parent space ray expressed in local space with a unit direction
    pub fn ray_to_local(&self, ray: &Ray) -> Ray {
        Ray {
            orig: self.inverse_point(ray.orig),
            dir: self.inverse_vector(ray.dir).normalize(),
            epsilon: ray.epsilon,
        }
    }

    pub fn origin(&self) -> Point3<Float> {
        self.point(Point3::origin())
    }
}

fn linear_part(m: &Matrix4<Float>) -> Matrix3<Float> {
    Matrix3::from_cols(m.x.truncate(), m.y.truncate(), m.z.truncate())
}

/// Stack of accumulated transforms. The top maps the current local frame to the root frame.
#[derive(Clone, Debug)]
pub struct TransformStack {
    stack: Vec<Transform>,
}

impl Default for TransformStack {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformStack {
    pub fn new() -> Self {
        Self {
            stack: vec![Transform::identity()],
        }
    }

    pub fn top(&self) -> &Transform {
        // The base entry is never popped
        &self.stack[self.stack.len() - 1]
    }

    pub fn push(&mut self, t: &Transform) {
        let accumulated = self.top().compose(t);
        self.stack.push(accumulated);
    }

    /// Restores the previous frame. The root frame stays in place.
    pub fn pop(&mut self) -> Option<Transform> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    pub fn replace_top(&mut self, t: Transform) {
        let i = self.stack.len() - 1;
        self.stack[i] = if i == 0 {
            t
        } else {
            self.stack[i - 1].compose(&t)
        };
    }

    pub fn depth(&self) -> usize {
        self.stack.len() - 1
    }
}

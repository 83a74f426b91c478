//! Pinhole camera that generates the primary rays.

use cgmath::prelude::*;
use cgmath::{Deg, Matrix4, Point3, Rad, Vector3};

use crate::error::{Result, TracerError};
use crate::float::*;
use crate::intersect::Ray;
use crate::transform::{Transform, TransformStack};

const DEFAULT_FOV: Float = 46.0;
const DEFAULT_VIEW_PLANE_DISTANCE: Float = 0.414;

/// Representation of a camera. The camera looks down its local -z axis with +y up.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera to world transformations
    transforms: TransformStack,
    /// Vertical field-of-view of the camera
    fov: Deg<Float>,
    /// Distance from the eye to the view plane
    distance: Float,
}

impl Default for Camera {
    fn default() -> Camera {
        Camera {
            transforms: TransformStack::new(),
            fov: Deg(DEFAULT_FOV),
            distance: DEFAULT_VIEW_PLANE_DISTANCE,
        }
    }
}

impl Camera {
    pub fn new() -> Camera {
        Camera::default()
    }

    /// Camera at from looking along dir
    pub fn looking_at(
        from: Point3<Float>,
        dir: Vector3<Float>,
        up: Vector3<Float>,
    ) -> Result<Camera> {
        let mut camera = Camera::default();
        camera.look_at(from, dir, up)?;
        Ok(camera)
    }

    /// Replace the current transform so that the camera sits at from and looks along dir
    pub fn look_at(
        &mut self,
        from: Point3<Float>,
        dir: Vector3<Float>,
        up: Vector3<Float>,
    ) -> Result<()> {
        if dir.magnitude2() == 0.0 {
            return Err(TracerError::DegenerateCamera(
                "view direction is zero".to_string(),
            ));
        }
        let z = -dir.normalize();
        let x = up.cross(z);
        if x.magnitude2() < 1e-12 {
            return Err(TracerError::DegenerateCamera(format!(
                "up {:?} is parallel to the view direction {:?}",
                up, dir
            )));
        }
        let x = x.normalize();
        let y = z.cross(x);
        let forward = Matrix4::from_cols(
            x.extend(0.0),
            y.extend(0.0),
            z.extend(0.0),
            from.to_homogeneous(),
        );
        let transform = Transform::from_matrix(forward).ok_or_else(|| {
            TracerError::DegenerateCamera("camera basis is singular".to_string())
        })?;
        self.transforms.replace_top(transform);
        Ok(())
    }

    /// Compose a transform onto the camera
    pub fn push(&mut self, t: &Transform) {
        self.transforms.push(t);
    }

    /// Undo the latest push
    pub fn pop(&mut self) -> Option<Transform> {
        self.transforms.pop()
    }

    pub fn with_fov(self, fov: Deg<Float>) -> Camera {
        Camera { fov, ..self }
    }

    pub fn fov(&self) -> Deg<Float> {
        self.fov
    }

    pub fn distance_to_view_plane(&self) -> Float {
        self.distance
    }

    pub fn position(&self) -> Point3<Float> {
        self.transforms.top().origin()
    }

    pub fn direction(&self) -> Vector3<Float> {
        self.transforms.top().vector(-Vector3::unit_z()).normalize()
    }

    pub fn up(&self) -> Vector3<Float> {
        self.transforms.top().vector(Vector3::unit_y()).normalize()
    }

    pub fn right(&self) -> Vector3<Float> {
        self.transforms.top().vector(Vector3::unit_x()).normalize()
    }

    /// Half width and half height of the view plane
    pub fn view_half_extents(&self, aspect: Float) -> (Float, Float) {
        let half_fov: Rad<Float> = (self.fov / 2.0).into();
        let half_height = self.distance * half_fov.0.tan();
        (aspect * half_height, half_height)
    }

    /// Ray through the image point (x, y) given in pixels.
    /// The origin of the image is the top left corner.
    pub fn primary_ray(&self, x: Float, y: Float, width: u32, height: u32) -> Ray {
        let (w, h) = (width.to_float(), height.to_float());
        let (half_width, half_height) = self.view_half_extents(w / h);
        let u = (2.0 * x / w - 1.0) * half_width;
        let v = (1.0 - 2.0 * y / h) * half_height;
        let top = self.transforms.top();
        let dir = top.vector(Vector3::new(u, v, -self.distance)).normalize();
        Ray::new(top.origin(), dir)
    }
}

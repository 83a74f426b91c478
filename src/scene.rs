use cgmath::Point3;

use log::{debug, warn};

use crate::color::Color;
use crate::error::Result;
use crate::float::*;
use crate::intersect::Ray;
use crate::intersection::{Intersection, Intersections};
use crate::primitive::{trace_scene, Primitive};

/// Scene containing everything the tracer needs. Shared read-only while rendering.
#[derive(Clone, Debug)]
pub struct Scene {
    primitives: Vec<Primitive>,
    lights: Vec<Point3<Float>>,
    background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Scene {
            primitives: Vec::new(),
            lights: Vec::new(),
            background: Color::white(),
        }
    }
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    /// Point light at the given world position
    pub fn add_light(&mut self, position: Point3<Float>) {
        self.lights.push(position);
    }

    pub fn with_primitive(mut self, primitive: Primitive) -> Scene {
        self.add_primitive(primitive);
        self
    }

    pub fn with_light(mut self, position: Point3<Float>) -> Scene {
        self.add_light(position);
        self
    }

    pub fn with_background(self, background: Color) -> Scene {
        Scene { background, ..self }
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Point3<Float>] {
        &self.lights
    }

    pub fn background(&self) -> Color {
        self.background
    }

    /// Every hit of the ray with the scene
    pub fn trace(&self, ray: &Ray) -> Intersections<'_> {
        let mut hits = Intersections::new(ray.epsilon);
        for primitive in &self.primitives {
            hits.extend(trace_scene(primitive, ray));
        }
        hits
    }

    pub fn nearest(&self, ray: &Ray) -> Option<Intersection<'_>> {
        self.trace(ray).into_nearest()
    }

    /// Checked before rendering so that bad input fails before any work is done
    pub fn validate(&self) -> Result<()> {
        if self.primitives.is_empty() {
            warn!("Scene is empty, the image will only contain the background");
        }
        for (i, primitive) in self.primitives.iter().enumerate() {
            primitive.validate().map_err(|e| {
                debug!("Primitive {} failed validation", i);
                e
            })?;
        }
        if self.lights.is_empty() {
            debug!("Scene has no lights, only ambient light will be visible");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TracerError;
    use cgmath::Vector3;

    #[test]
    fn test_nearest_over_primitives() {
        let scene = Scene::new()
            .with_primitive(Primitive::sphere().translate(0.0, 0.0, -4.0))
            .with_primitive(Primitive::sphere())
            .with_light(Point3::new(0.0, 10.0, 0.0));
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(scene.trace(&ray).len(), 4);
        let nearest = scene.nearest(&ray).unwrap();
        assert!((nearest.t - 4.0).abs() < 1e-9);
        assert!(std::ptr::eq(nearest.primitive.unwrap(), &scene.primitives()[1]));
        assert!(scene.validate().is_ok());
    }

    #[test]
    fn test_validation_fails_fast() {
        assert!(Scene::new().validate().is_ok());
        let scene = Scene::new().with_primitive(Primitive::sphere().with_reflectivity(-0.5));
        assert!(matches!(
            scene.validate(),
            Err(TracerError::InvalidMaterial(_))
        ));
    }
}

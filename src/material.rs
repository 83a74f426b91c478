use crate::color::Color;
use crate::error::{Result, TracerError};
use crate::float::*;

/// Surface response of a primitive. Hits carry a copy of the material
/// of the leaf primitive that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Ambient coefficient
    pub ka: Float,
    /// Diffuse coefficient
    pub kd: Float,
    /// Specular coefficient
    pub ks: Float,
    /// Phong exponent of the specular highlight
    pub shininess: Float,
    pub refractive_index: Float,
    /// Fraction of the color coming from the mirror direction
    pub reflectivity: Float,
    /// Fraction of the color coming from the refracted direction
    pub transparency: Float,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::white(),
            ka: 0.2,
            kd: 0.6,
            ks: 0.2,
            shininess: 1.0,
            refractive_index: 1.0,
            reflectivity: 0.0,
            transparency: 0.0,
        }
    }
}

impl Material {
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn with_coefficients(self, ka: Float, kd: Float, ks: Float) -> Self {
        Self { ka, kd, ks, ..self }
    }

    pub fn with_shininess(self, shininess: Float) -> Self {
        Self { shininess, ..self }
    }

    pub fn with_reflectivity(self, reflectivity: Float) -> Self {
        Self {
            reflectivity,
            ..self
        }
    }

    pub fn with_transparency(self, transparency: Float, refractive_index: Float) -> Self {
        Self {
            transparency,
            refractive_index,
            ..self
        }
    }

    /// Weight of the local illumination after the recursive terms take their share
    pub fn local_weight(&self) -> Float {
        (1.0 - self.reflectivity - self.transparency).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        let unit_range = |name: &str, v: Float| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(TracerError::InvalidMaterial(format!(
                    "{} {} is outside [0, 1]",
                    name, v
                )))
            }
        };
        unit_range("reflectivity", self.reflectivity)?;
        unit_range("transparency", self.transparency)?;
        if self.refractive_index < 1.0 {
            return Err(TracerError::InvalidMaterial(format!(
                "refractive index {} is below 1",
                self.refractive_index
            )));
        }
        if self.ka < 0.0 || self.kd < 0.0 || self.ks < 0.0 || self.shininess < 0.0 {
            return Err(TracerError::InvalidMaterial(
                "negative shading coefficient".to_string(),
            ));
        }
        Ok(())
    }
}

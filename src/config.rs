use log::info;

use crate::consts;
use crate::error::{Result, TracerError};
use crate::float::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Recursive shading with shadows, reflection and refraction
    Shaded,
    /// Debug
    Debug(DebugMode),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugMode {
    /// Normals
    Normals,
    /// Normals flipped to face the camera
    ForwardNormals,
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    /// Width of the render target in pixels
    pub width: u32,
    /// Height of the render target in pixels
    pub height: u32,
    /// Maximum number of threads to use for rendering
    pub max_threads: usize,
    /// Samples per pixel per direction. Squared to get the total samples per pixel.
    /// A single sample goes through the pixel center.
    pub supersampling: usize,
    /// Number of reflection or refraction bounces
    pub max_depth: usize,
    /// Shadow rays per light and hit
    pub num_shadow_rays: usize,
    /// Shadow rays are jittered inside a cube of this half size around the light
    pub light_radius: Float,
    /// Minimum accepted travel along any ray
    pub epsilon: Float,
    /// Source of the image color
    pub render_mode: RenderMode,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::preview()
    }
}

impl RenderConfig {
    pub fn preview() -> Self {
        Self {
            width: 400,
            height: 300,
            max_threads: num_cpus::get_physical().max(1),
            supersampling: 1,
            max_depth: 3,
            num_shadow_rays: 1,
            light_radius: 0.0,
            epsilon: consts::EPSILON,
            render_mode: RenderMode::Shaded,
        }
    }

    pub fn high_quality() -> Self {
        Self {
            width: 800,
            height: 600,
            supersampling: 3,
            max_depth: 5,
            num_shadow_rays: 8,
            light_radius: 0.25,
            ..Self::preview()
        }
    }

    pub fn debug_normals() -> Self {
        Self {
            render_mode: RenderMode::Debug(DebugMode::Normals),
            max_depth: 0,
            supersampling: 1,
            ..Self::preview()
        }
    }

    pub fn forward_normals() -> Self {
        Self {
            render_mode: RenderMode::Debug(DebugMode::ForwardNormals),
            ..Self::debug_normals()
        }
    }

    pub fn single_threaded(self) -> Self {
        info!("Running single threaded!");
        Self {
            max_threads: 1,
            ..self
        }
    }

    pub fn with_dimensions(self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(TracerError::InvalidConfig(msg.to_string()));
        if self.width == 0 || self.height == 0 {
            return fail("render target has zero size");
        }
        if self.max_threads == 0 {
            return fail("at least one thread is needed");
        }
        if self.supersampling == 0 {
            return fail("supersampling must be at least 1");
        }
        if self.num_shadow_rays == 0 {
            return fail("at least one shadow ray is needed");
        }
        if !(self.epsilon > 0.0) {
            return fail("epsilon must be positive");
        }
        if self.light_radius < 0.0 {
            return fail("light radius can't be negative");
        }
        Ok(())
    }
}

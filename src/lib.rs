//! Whitted style ray tracer with constructive solid geometry.

pub mod aabb;
pub mod camera;
pub mod color;
pub mod config;
pub mod consts;
pub mod csg;
pub mod error;
pub mod float;
pub mod intersect;
pub mod intersection;
pub mod material;
pub mod prefab;
pub mod primitive;
pub mod quartic;
pub mod scene;
pub mod stats;
pub mod tracer;
pub mod transform;

pub use crate::camera::Camera;
pub use crate::color::Color;
pub use crate::config::{DebugMode, RenderConfig, RenderMode};
pub use crate::csg::{Csg, CsgOp, CsgState};
pub use crate::error::{Result, TracerError};
pub use crate::intersect::Ray;
pub use crate::intersection::{Intersection, IntersectionList, Intersections};
pub use crate::material::Material;
pub use crate::primitive::{Primitive, Shape};
pub use crate::scene::Scene;
pub use crate::stats::RenderSummary;
pub use crate::tracer::{Canvas, RenderJob, RenderOutput, Renderer};
pub use crate::transform::{Transform, TransformStack};

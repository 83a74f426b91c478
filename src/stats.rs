use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use prettytable::{cell, row, Table};

use crate::float::*;

// Helper trait to print out Float type used
trait FloatName {
    fn float_name() -> String;
}

impl FloatName for f32 {
    fn float_name() -> String {
        "f32".to_string()
    }
}

impl FloatName for f64 {
    fn float_name() -> String {
        "f64".to_string()
    }
}

/// Counters shared by the render workers
#[derive(Debug, Default)]
pub struct RenderStats {
    camera_rays: AtomicU64,
    secondary_rays: AtomicU64,
    shadow_rays: AtomicU64,
}

impl RenderStats {
    pub fn new() -> RenderStats {
        RenderStats::default()
    }

    pub fn add_camera_ray(&self) {
        self.camera_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_secondary_ray(&self) {
        self.secondary_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_shadow_ray(&self) {
        self.shadow_rays.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(
        &self,
        width: u32,
        height: u32,
        threads: usize,
        duration: Duration,
    ) -> RenderSummary {
        RenderSummary {
            width,
            height,
            threads,
            duration,
            camera_rays: self.camera_rays.load(Ordering::Relaxed),
            secondary_rays: self.secondary_rays.load(Ordering::Relaxed),
            shadow_rays: self.shadow_rays.load(Ordering::Relaxed),
        }
    }
}

/// Statistics of a finished render
#[derive(Clone, Debug)]
pub struct RenderSummary {
    pub width: u32,
    pub height: u32,
    pub threads: usize,
    pub duration: Duration,
    pub camera_rays: u64,
    pub secondary_rays: u64,
    pub shadow_rays: u64,
}

impl RenderSummary {
    pub fn total_rays(&self) -> u64 {
        self.camera_rays + self.secondary_rays + self.shadow_rays
    }

    /// Million rays per second
    pub fn mrps(&self) -> Float {
        let secs = self.duration.as_secs_f64().to_float();
        if secs == 0.0 {
            return 0.0;
        }
        self.total_rays() as Float / secs / 1.0e6
    }

    pub fn table(&self) -> Table {
        let mut table = Table::new();
        table.add_row(row!["Precision", Float::float_name()]);
        table.add_row(row!["Resolution", format!("{}x{}", self.width, self.height)]);
        table.add_row(row!["Threads", self.threads]);
        table.add_row(row!["Render time", format!("{:.3?}", self.duration)]);
        table.add_row(row!["Camera rays", self.camera_rays]);
        table.add_row(row!["Secondary rays", self.secondary_rays]);
        table.add_row(row!["Shadow rays", self.shadow_rays]);
        table.add_row(row!["Mrays/s", format!("{:.2}", self.mrps())]);
        table
    }
}

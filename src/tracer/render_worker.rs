use std::sync::{mpsc::Sender, Arc};

use log::debug;

use crate::camera::Camera;
use crate::color::Color;
use crate::config::RenderConfig;
use crate::float::*;
use crate::scene::Scene;
use crate::stats::RenderStats;

use super::shade::Tracer;
use super::RenderCoordinator;

/// Finished row of pixels
pub type RowResult = (u32, Vec<Color>);

pub struct RenderWorker {
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    coordinator: Arc<RenderCoordinator>,
    stats: Arc<RenderStats>,
    result_tx: Sender<RowResult>,
}

impl RenderWorker {
    pub(super) fn new(
        scene: Arc<Scene>,
        camera: Camera,
        config: RenderConfig,
        coordinator: Arc<RenderCoordinator>,
        stats: Arc<RenderStats>,
        result_tx: Sender<RowResult>,
    ) -> RenderWorker {
        RenderWorker {
            scene,
            camera,
            config,
            coordinator,
            stats,
            result_tx,
        }
    }

    pub fn run(&self) {
        let tracer = Tracer::new(&self.scene, &self.config, &self.stats);
        while let Some(y) = self.coordinator.next_row() {
            let row: Vec<Color> = (0..self.coordinator.width)
                .map(|x| self.pixel(&tracer, x, y))
                .collect();
            if self.result_tx.send((y, row)).is_err() {
                debug!("Result receiver closed, stopping worker");
                return;
            }
            self.coordinator.row_finished();
        }
    }

    /// Average of the stratified samples inside the pixel
    fn pixel(&self, tracer: &Tracer, x: u32, y: u32) -> Color {
        let (width, height) = (self.coordinator.width, self.coordinator.height);
        let n = self.config.supersampling.max(1);
        if n == 1 {
            let ray = self
                .camera
                .primary_ray(x.to_float() + 0.5, y.to_float() + 0.5, width, height);
            self.stats.add_camera_ray();
            return tracer.trace(&ray, 0);
        }
        let mut c = Color::black();
        for j in 0..n {
            for i in 0..n {
                let dx = (i.to_float() + rand::random::<Float>()) / n.to_float();
                let dy = (j.to_float() + rand::random::<Float>()) / n.to_float();
                let ray =
                    self.camera
                        .primary_ray(x.to_float() + dx, y.to_float() + dy, width, height);
                self.stats.add_camera_ray();
                c += tracer.trace(&ray, 0);
            }
        }
        c / (n * n).to_float()
    }
}

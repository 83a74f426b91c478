//! Multithreaded rendering of a scene into a canvas.

mod canvas;
mod coordinator;
mod render_worker;
mod shade;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc, Arc,
};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use log::{debug, info, warn};

use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::error::{Result, TracerError};
use crate::float::*;
use crate::scene::Scene;
use crate::stats::{RenderStats, RenderSummary};

pub use self::canvas::Canvas;
pub use self::coordinator::RenderCoordinator;
use self::render_worker::RenderWorker;
pub use self::shade::{reflect, refract, Tracer};

/// Image of a completed render together with its statistics
#[derive(Debug)]
pub struct RenderOutput {
    pub canvas: Canvas,
    pub summary: RenderSummary,
}

/// Render running in the background
pub struct RenderJob {
    coordinator: Arc<RenderCoordinator>,
    complete: Arc<AtomicBool>,
    handle: JoinHandle<Result<RenderOutput>>,
}

impl RenderJob {
    /// Percentage of rows completed
    pub fn progress(&self) -> Float {
        self.coordinator.progress()
    }

    /// True once the canvas has been fully assembled
    pub fn is_complete(&self) -> bool {
        self.complete.load(Ordering::SeqCst)
    }

    /// True once the render thread has stopped, with or without an image
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stop handing out rows. The partial image is discarded.
    pub fn cancel(&self) {
        self.coordinator.cancel();
    }

    /// Block until the render finishes
    pub fn wait(self) -> Result<RenderOutput> {
        self.handle
            .join()
            .map_err(|_| TracerError::Worker("render thread panicked".to_string()))?
    }
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Result<Renderer> {
        config.validate()?;
        Ok(Renderer { config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render and block until the image is done
    pub fn render(&self, scene: &Arc<Scene>, camera: &Camera) -> Result<RenderOutput> {
        self.spawn(scene, camera)?.wait()
    }

    /// Start rendering in the background. The scene is validated before any work starts.
    pub fn spawn(&self, scene: &Arc<Scene>, camera: &Camera) -> Result<RenderJob> {
        scene.validate()?;
        let coordinator = Arc::new(RenderCoordinator::new(
            self.config.width,
            self.config.height,
        ));
        let complete = Arc::new(AtomicBool::new(false));
        let handle = {
            let scene = scene.clone();
            let camera = camera.clone();
            let config = self.config.clone();
            let coordinator = coordinator.clone();
            let complete = complete.clone();
            thread::spawn(move || run_render(scene, camera, config, coordinator, complete))
        };
        Ok(RenderJob {
            coordinator,
            complete,
            handle,
        })
    }
}

fn run_render(
    scene: Arc<Scene>,
    camera: Camera,
    config: RenderConfig,
    coordinator: Arc<RenderCoordinator>,
    complete: Arc<AtomicBool>,
) -> Result<RenderOutput> {
    let start = Instant::now();
    let (width, height) = (config.width, config.height);
    let n_threads = config.max_threads.min(height as usize).max(1);
    info!(
        "Rendering {}x{} with {} threads, {}x{} samples per pixel",
        width, height, n_threads, config.supersampling, config.supersampling
    );
    let stats = Arc::new(RenderStats::new());
    let (result_tx, result_rx) = mpsc::channel();
    let mut thread_handles = Vec::with_capacity(n_threads);
    for worker_i in 0..n_threads {
        let result_tx = result_tx.clone();
        let scene = scene.clone();
        let camera = camera.clone();
        let config = config.clone();
        let coordinator = coordinator.clone();
        let stats = stats.clone();
        let handle = thread::spawn(move || {
            let worker = RenderWorker::new(scene, camera, config, coordinator, stats, result_tx);
            worker.run();
            debug!("Worker {} finished", worker_i);
        });
        thread_handles.push(handle);
    }
    // Workers hold the remaining senders so the receiver ends with them
    drop(result_tx);

    let mut canvas = Canvas::new(width, height, scene.background());
    let mut received_rows = 0;
    for (y, row) in result_rx {
        canvas.update_row(y, &row);
        received_rows += 1;
    }
    for handle in thread_handles {
        handle
            .join()
            .map_err(|_| TracerError::Worker("render worker panicked".to_string()))?;
    }
    if coordinator.is_cancelled() {
        warn!(
            "Render cancelled after {} of {} rows",
            received_rows, height
        );
        return Err(TracerError::Cancelled);
    }
    if received_rows != height {
        return Err(TracerError::Worker(format!(
            "only {} of {} rows were rendered",
            received_rows, height
        )));
    }
    let summary = stats.summary(width, height, n_threads, start.elapsed());
    info!(
        "Rendered {} rays in {:.3?}",
        summary.total_rays(),
        summary.duration
    );
    complete.store(true, Ordering::SeqCst);
    Ok(RenderOutput { canvas, summary })
}

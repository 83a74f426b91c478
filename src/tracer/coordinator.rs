use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::float::*;

/// Hands out image rows to the render workers and tracks progress
pub struct RenderCoordinator {
    pub width: u32,
    pub height: u32,
    next_row: AtomicUsize,
    finished_rows: AtomicUsize,
    cancelled: AtomicBool,
}

impl RenderCoordinator {
    pub fn new(width: u32, height: u32) -> RenderCoordinator {
        RenderCoordinator {
            width,
            height,
            next_row: AtomicUsize::new(0),
            finished_rows: AtomicUsize::new(0),
            cancelled: AtomicBool::new(false),
        }
    }

    /// None once every row has been handed out or the render was cancelled
    pub fn next_row(&self) -> Option<u32> {
        if self.is_cancelled() {
            return None;
        }
        let row_i = self.next_row.fetch_add(1, Ordering::Relaxed);
        if row_i < self.height as usize {
            Some(row_i as u32)
        } else {
            None
        }
    }

    pub fn row_finished(&self) {
        self.finished_rows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn finished_rows(&self) -> usize {
        self.finished_rows.load(Ordering::Relaxed)
    }

    /// Percentage of rows completed
    pub fn progress(&self) -> Float {
        if self.height == 0 {
            return 100.0;
        }
        100.0 * self.finished_rows().to_float() / self.height.to_float()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

//! Progress reporting and cooperative cancellation.
//!
//! Both stages call their observer once before every batch (extraction) or
//! chunk (aggregation). These boundaries are the only points where work can
//! be interrupted; returning [`ControlFlow::Break`] aborts the stage with
//! [`KwError::Cancelled`](crate::KwError::Cancelled) and no partial result.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Which stage is reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Extraction,
    Aggregation,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction => f.write_str("extraction"),
            Self::Aggregation => f.write_str("aggregation"),
        }
    }
}

/// Position reported at a batch or chunk boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub stage: Stage,
    /// Zero-based index of the batch or chunk about to run.
    pub boundary: usize,
    /// Total number of batches or chunks in this run.
    pub total: usize,
}

/// Receives boundary notifications and may stop the run.
pub trait ProgressObserver {
    fn on_boundary(&self, progress: Progress) -> ControlFlow<()>;
}

/// Never interrupts, reports nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    #[inline]
    fn on_boundary(&self, _progress: Progress) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

/// Logs every boundary at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_boundary(&self, progress: Progress) -> ControlFlow<()> {
        log::trace!(
            "{} {}/{}",
            progress.stage,
            progress.boundary + 1,
            progress.total
        );
        ControlFlow::Continue(())
    }
}

/// A shareable flag; once set, the next boundary check stops the run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl ProgressObserver for CancelFlag {
    fn on_boundary(&self, _progress: Progress) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Number of slices of `size` needed to cover `len` items.
pub(crate) fn slice_count(len: usize, size: usize) -> usize {
    len.div_ceil(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_flag_shared_between_clones() {
        let flag = CancelFlag::new();
        let handle = flag.clone();
        let progress = Progress {
            stage: Stage::Extraction,
            boundary: 0,
            total: 1,
        };
        assert_eq!(flag.on_boundary(progress), ControlFlow::Continue(()));
        handle.cancel();
        assert_eq!(flag.on_boundary(progress), ControlFlow::Break(()));
    }

    #[test]
    fn test_slice_count() {
        assert_eq!(slice_count(0, 3), 0);
        assert_eq!(slice_count(3, 3), 1);
        assert_eq!(slice_count(4, 3), 2);
    }
}

// ==========================================
// CRM Sales Reconciliation - Importer Trait & Run Controls
// ==========================================
// Responsibility: the caller-facing import interface plus the two run
// controls (progress observation, cooperative cancellation); no
// implementation lives here
// ==========================================

use crate::domain::{ImportContext, ImportProgress, ImportSummary};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ==========================================
// SalesImporter Trait
// ==========================================
// Implementor: SalesImporterImpl
#[async_trait]
pub trait SalesImporter: Send + Sync {
    /// Run one import over the raw text of a sales export.
    ///
    /// Terminal validation failures (wrong format, missing transaction
    /// column, no usable rows) come back as Err; per-row reconciliation
    /// failures are accumulated inside the Ok summary instead.
    async fn run_import(&self, file_text: &str, context: &ImportContext)
        -> ImportResult<ImportSummary>;

    /// Handle the caller keeps to request cancellation of a running import.
    fn cancel_handle(&self) -> CancelHandle;
}

// ==========================================
// ProgressObserver Trait
// ==========================================
// Implementor: anything the caller owns - a channel sender, a UI bridge, a
// closure. The importer only ever pushes snapshots through this seam; it
// holds no caller state.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &ImportProgress);
}

/// Observer that discards every snapshot. Default when the caller does not
/// care about progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgressObserver;

impl ProgressObserver for NullProgressObserver {
    fn on_progress(&self, _progress: &ImportProgress) {}
}

impl<F> ProgressObserver for F
where
    F: Fn(&ImportProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &ImportProgress) {
        self(progress)
    }
}

// ==========================================
// CancelHandle - cooperative cancellation flag
// ==========================================
// Cloned handles share one flag. The importer polls it at batch boundaries
// only; rows inside the current batch always finish, so no batch is ever
// half-applied from the caller's point of view.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; there is no way to un-cancel.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

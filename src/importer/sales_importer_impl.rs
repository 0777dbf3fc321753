// ==========================================
// CRM Sales Reconciliation - Sales Importer Implementation
// ==========================================
// Responsibility: orchestrate the full run, file text to summary
// Flow: tokenize -> detect -> map columns -> normalize -> resolve
// existence -> batched reconciliation -> summary
// ==========================================

use crate::config::ImportConfig;
use crate::domain::{ImportContext, ImportProgress, ImportSummary};
use crate::i18n::t;
use crate::importer::column_mapper::{CanonicalField, ColumnMap};
use crate::importer::dispatcher::ReconciliationDispatcher;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::existence_resolver::resolve_existence;
use crate::importer::format_detector::is_supported_export;
use crate::importer::row_normalizer::normalize_rows;
use crate::importer::sales_importer_trait::{
    CancelHandle, NullProgressObserver, ProgressObserver, SalesImporter,
};
use crate::importer::tokenizer::tokenize;
use crate::repository::{AuditLedgerRepository, ContactRepository, OrderArchiveRepository};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// SalesImporterImpl - pipeline orchestrator
// ==========================================
pub struct SalesImporterImpl<A, C, L>
where
    A: OrderArchiveRepository,
    C: ContactRepository,
    L: AuditLedgerRepository,
{
    // ===== Target stores =====
    archive: A,
    contacts: C,
    ledger: L,

    // ===== Run configuration =====
    config: ImportConfig,

    // ===== Run controls =====
    observer: Box<dyn ProgressObserver>,
    cancel: CancelHandle,
}

impl<A, C, L> SalesImporterImpl<A, C, L>
where
    A: OrderArchiveRepository,
    C: ContactRepository,
    L: AuditLedgerRepository,
{
    pub fn new(archive: A, contacts: C, ledger: L, config: ImportConfig) -> Self {
        Self {
            archive,
            contacts,
            ledger,
            config,
            observer: Box::new(NullProgressObserver),
            cancel: CancelHandle::new(),
        }
    }

    /// Replace the progress observer (builder style).
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    fn emit_progress(&self, completed_batches: usize, total_batches: usize, stage_key: &str) {
        let percent = if total_batches == 0 {
            100
        } else {
            ((completed_batches * 100) / total_batches) as u8
        };
        self.observer.on_progress(&ImportProgress {
            percent,
            stage: t(stage_key),
            completed_batches,
            total_batches,
        });
    }
}

#[async_trait::async_trait]
impl<A, C, L> SalesImporter for SalesImporterImpl<A, C, L>
where
    A: OrderArchiveRepository,
    C: ContactRepository,
    L: AuditLedgerRepository,
{
    #[instrument(skip(self, file_text, context), fields(run_id, project_id = %context.project_id))]
    async fn run_import(
        &self,
        file_text: &str,
        context: &ImportContext,
    ) -> ImportResult<ImportSummary> {
        let run_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("run_id", run_id.as_str());
        info!(run_id = %run_id, imported_by = %context.imported_by, "import run started");

        // === Step 1: tokenize ===
        debug!("Step 1: tokenize file text");
        let rows = tokenize(file_text);
        let Some((header, data_rows)) = rows.split_first() else {
            warn!("file has no rows at all");
            return Err(ImportError::UnsupportedFormat);
        };
        info!(header_columns = header.len(), data_rows = data_rows.len(), "tokenize done");

        // === Step 2: format detection ===
        debug!("Step 2: format detection");
        if !is_supported_export(header) {
            warn!("header does not look like a sales export");
            return Err(ImportError::UnsupportedFormat);
        }

        // === Step 3: column mapping ===
        debug!("Step 3: column mapping");
        let map = ColumnMap::resolve(header);
        if !map.has(CanonicalField::TransactionId) {
            warn!("no transaction column among the mapped headers");
            return Err(ImportError::MissingTransactionColumn);
        }
        info!(mapped_columns = map.mapped_columns(), "column mapping done");

        // === Step 4: row normalization ===
        debug!("Step 4: row normalization");
        let (sales, dropped) = normalize_rows(data_rows, &map, &self.config);
        if sales.is_empty() {
            warn!(dropped = dropped, "no usable rows after normalization");
            return Err(ImportError::NoValidRows);
        }
        info!(valid_rows = sales.len(), dropped = dropped, "row normalization done");

        // === Step 5: existence snapshot ===
        debug!("Step 5: existence snapshot");
        let existence = resolve_existence(
            &self.archive,
            &self.contacts,
            &self.ledger,
            &context.project_id,
            &self.config.provider,
            &sales,
        )
        .await?;

        // === Step 6: batched reconciliation ===
        debug!("Step 6: batched reconciliation");
        let batch_size = self.config.effective_batch_size();
        let total_batches = sales.len().div_ceil(batch_size);
        let dispatcher =
            ReconciliationDispatcher::new(&self.archive, &self.contacts, &self.ledger, context, &self.config);

        let mut summary = ImportSummary::new(sales.len());
        let mut completed_batches = 0usize;

        for batch in sales.chunks(batch_size) {
            // cancellation is honored only between batches; the batch in
            // flight always completes
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                warn!(
                    run_id = %run_id,
                    completed_batches = completed_batches,
                    total_batches = total_batches,
                    "import cancelled by caller"
                );
                self.emit_progress(completed_batches, total_batches, "import.stage.cancelled");
                break;
            }

            for sale in batch {
                dispatcher.dispatch_row(sale, &existence, &mut summary).await;
            }

            completed_batches += 1;
            self.emit_progress(completed_batches, total_batches, "import.stage.reconciling");
        }

        if !summary.cancelled {
            self.emit_progress(total_batches, total_batches, "import.stage.done");
        }

        info!(
            run_id = %run_id,
            total_rows = summary.total_rows,
            orders_added = summary.historical_orders_added,
            orders_already_exist = summary.orders_already_exist,
            contacts_created = summary.contacts_created,
            contacts_enriched = summary.contacts_enriched,
            ledger_added = summary.ledger_records_added,
            row_errors = summary.errors.len(),
            cancelled = summary.cancelled,
            "import run finished"
        );

        Ok(summary)
    }

    fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }
}

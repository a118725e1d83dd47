use actix::prelude::*;
use std::sync::Arc;
use tokio::time::sleep;

use crate::import::ProductImport;

// ============================================================================
// File Import Actor - polls the source directory on a fixed delay
// ============================================================================
//
// The next poll starts `poll_interval` after the previous one finished.
// The polling loop is owned by the actor context and ends when the actor
// stops.
//
// ============================================================================

pub struct FileImportActor {
    pipeline: Arc<ProductImport>,
}

impl FileImportActor {
    pub fn new(pipeline: Arc<ProductImport>) -> Self {
        Self { pipeline }
    }
}

async fn run_import_loop(pipeline: Arc<ProductImport>) {
    if let Err(e) = pipeline.ensure_directories().await {
        tracing::error!(error = %e, "Failed to create import directories");
    }

    let interval = pipeline.config().poll_interval();

    loop {
        match pipeline.poll_once().await {
            Ok(summary) if summary.files_imported + summary.files_failed > 0 => {
                tracing::info!(
                    files_imported = summary.files_imported,
                    files_failed = summary.files_failed,
                    records_persisted = summary.records_persisted,
                    "📥 Import poll finished"
                );
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "Failed to scan import directory");
            }
        }

        sleep(interval).await;
    }
}

impl Actor for FileImportActor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let config = self.pipeline.config();
        tracing::info!(
            source_dir = %config.source_dir.display(),
            dest_dir = %config.dest_dir.display(),
            extension = %config.extension,
            poll_interval_ms = config.poll_interval_ms,
            "FileImportActor started"
        );

        ctx.spawn(run_import_loop(self.pipeline.clone()).into_actor(self));
    }

    fn stopped(&mut self, _: &mut Self::Context) {
        tracing::info!("FileImportActor stopped");
    }
}

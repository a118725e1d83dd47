// ============================================================================
// File Import Pipeline
// ============================================================================
//
// One poll:
// 1. Scan the source directory for files with the configured extension that
//    have not already failed in this process
// 2. Read each file as text and split it into lines
// 3. Map every line to a record (LineMapper) and persist it (RecordSink),
//    one transaction per record
// 4. Move the fully imported file to the destination directory
//
// A failing line or move stops the rest of its file. Records committed
// before the failure stay committed, the file stays in the source directory
// and is not picked up again until restart. Other files in the same poll are
// still processed. Once a file has been moved, a new file with the same name
// is imported again.
//
// ============================================================================

mod product;

pub use product::{ProductImport, ProductLineMapper};

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::ImportConfig;
use crate::db::{RecordSink, StoreError};
use crate::metrics::Metrics;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed line {line:?}: {reason}")]
    Malformed { line: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Application-defined conversion of one imported line into a record
pub trait LineMapper: Send + Sync {
    type Record: Send;

    fn map_line(&self, line: &str) -> Result<Self::Record, ImportError>;
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PollSummary {
    pub files_imported: usize,
    pub files_failed: usize,
    pub records_persisted: usize,
}

pub struct ImportPipeline<M, S> {
    config: ImportConfig,
    mapper: M,
    sink: Arc<S>,
    seen: Mutex<HashSet<PathBuf>>,
    metrics: Arc<Metrics>,
}

impl<M, S> ImportPipeline<M, S>
where
    M: LineMapper,
    S: RecordSink<M::Record>,
{
    pub fn new(config: ImportConfig, mapper: M, sink: Arc<S>, metrics: Arc<Metrics>) -> Self {
        Self {
            config,
            mapper,
            sink,
            seen: Mutex::new(HashSet::new()),
            metrics,
        }
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Create the source and destination directories if missing
    pub async fn ensure_directories(&self) -> Result<(), ImportError> {
        tokio::fs::create_dir_all(&self.config.source_dir).await?;
        tokio::fs::create_dir_all(&self.config.dest_dir).await?;
        Ok(())
    }

    pub async fn poll_once(&self) -> Result<PollSummary, ImportError> {
        let mut summary = PollSummary::default();

        for path in self.scan().await? {
            match self.import_and_move(&path).await {
                Ok((records, moved_to)) => {
                    self.seen.lock().await.remove(&path);
                    summary.files_imported += 1;
                    summary.records_persisted += records;
                    self.metrics.record_import_file(true);

                    tracing::info!(
                        file = %path.display(),
                        moved_to = %moved_to.display(),
                        records = records,
                        "✅ Imported file"
                    );
                }
                Err(e) => {
                    summary.files_failed += 1;
                    self.metrics.record_import_file(false);

                    tracing::error!(
                        error = %e,
                        file = %path.display(),
                        "Failed to import file"
                    );
                }
            }
        }

        Ok(summary)
    }

    /// Candidate files, sorted by name. A path that failed is not returned
    /// again by this pipeline instance.
    async fn scan(&self) -> Result<Vec<PathBuf>, ImportError> {
        let mut entries = tokio::fs::read_dir(&self.config.source_dir).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !entry.file_type().await?.is_file() || !self.has_extension(&path) {
                continue;
            }
            candidates.push(path);
        }
        candidates.sort();

        let mut seen = self.seen.lock().await;
        candidates.retain(|path| seen.insert(path.clone()));

        if !candidates.is_empty() {
            tracing::debug!(file_count = candidates.len(), "Found new files to import");
        }

        Ok(candidates)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext == self.config.extension)
            .unwrap_or(false)
    }

    async fn import_and_move(&self, path: &Path) -> Result<(usize, PathBuf), ImportError> {
        let records = self.import_file(path).await?;
        let moved_to = self.move_to_destination(path).await?;
        Ok((records, moved_to))
    }

    async fn import_file(&self, path: &Path) -> Result<usize, ImportError> {
        let contents = tokio::fs::read_to_string(path).await?;
        let mut persisted = 0;

        for line in split_lines(&contents) {
            let record = self.mapper.map_line(line)?;
            self.sink.persist(record).await?;
            persisted += 1;
            self.metrics.import_records_persisted.inc();
        }

        Ok(persisted)
    }

    /// Copy into the destination directory, then delete the source
    async fn move_to_destination(&self, path: &Path) -> Result<PathBuf, ImportError> {
        let file_name = path.file_name().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
        })?;
        let target = self.config.dest_dir.join(file_name);

        tokio::fs::copy(path, &target).await?;
        tokio::fs::remove_file(path).await?;

        Ok(target)
    }
}

/// Split on '\n', dropping a trailing '\r' and skipping blank lines
pub fn split_lines(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::{
    CommitGate, CompatibilityRecord, RecordSink, StorageError, StoreTarget, connect,
    redact_connection_string,
};

/// Runs on the blocking pool.
pub type Connector = Arc<dyn Fn() -> Result<Arc<dyn RecordSink>, StorageError> + Send + Sync>;

/// Connection opened on first use and shared for the life of the process. A
/// failed attempt leaves the cell empty; a handle, once set, is never replaced.
pub struct LazyRecordSink {
    label: String,
    timeout: Duration,
    connector: Connector,
    cell: OnceCell<Arc<dyn RecordSink>>,
}

impl LazyRecordSink {
    pub fn from_url(url: &str, timeout: Duration) -> Self {
        let owned = url.to_string();
        let connector: Connector = Arc::new(move || {
            let target = StoreTarget::parse(&owned)?;
            connect(&target, timeout)
        });
        Self::with_connector(redact_connection_string(url), timeout, connector)
    }

    pub fn with_connector(
        label: impl Into<String>,
        timeout: Duration,
        connector: Connector,
    ) -> Self {
        Self {
            label: label.into(),
            timeout,
            connector,
            cell: OnceCell::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_connected(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn handle(&self) -> Result<Arc<dyn RecordSink>, StorageError> {
        let sink = self
            .cell
            .get_or_try_init(|| async {
                let connector = Arc::clone(&self.connector);
                match self.bounded(move || connector()).await {
                    Ok(sink) => {
                        info!(store = %self.label, stats = %sink.stats(), "record store connected");
                        Ok(sink)
                    }
                    Err(err) => {
                        warn!(store = %self.label, error = %err, "record store connection failed");
                        Err(err)
                    }
                }
            })
            .await?;
        Ok(Arc::clone(sink))
    }

    /// On timeout the write is abandoned unless the backend already committed to
    /// it, in which case its result is awaited.
    pub async fn store(&self, record: CompatibilityRecord) -> Result<(), StorageError> {
        let sink = self.handle().await?;
        let gate = CommitGate::new();
        let writer = gate.clone();
        let mut task = tokio::task::spawn_blocking(move || sink.append_gated(&record, &writer));
        let outcome = tokio::time::timeout(self.timeout, &mut task).await;
        match outcome {
            Ok(joined) => flatten(joined),
            Err(_) if gate.try_cancel() => {
                warn!(store = %self.label, timeout = ?self.timeout, "record insert abandoned");
                Err(StorageError::Timeout(self.timeout))
            }
            Err(_) => flatten(task.await),
        }
    }

    pub async fn count(&self) -> Result<usize, StorageError> {
        let sink = self.handle().await?;
        self.bounded(move || sink.count()).await
    }

    pub async fn recent(&self, limit: usize) -> Result<Vec<CompatibilityRecord>, StorageError> {
        let sink = self.handle().await?;
        self.bounded(move || sink.recent(limit)).await
    }

    async fn bounded<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        F: FnOnce() -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        match tokio::time::timeout(self.timeout, tokio::task::spawn_blocking(op)).await {
            Ok(joined) => flatten(joined),
            Err(_) => Err(StorageError::Timeout(self.timeout)),
        }
    }
}

fn flatten<T>(joined: Result<Result<T, StorageError>, JoinError>) -> Result<T, StorageError> {
    joined.unwrap_or_else(|join| Err(StorageError::Join(join.to_string())))
}

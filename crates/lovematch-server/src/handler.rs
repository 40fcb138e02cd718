use std::sync::Arc;

use lovematch_core::score;
use lovematch_storage::{CompatibilityRecord, LazyRecordSink, StorageError};
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("both names are required")]
    MissingInput,
    #[error("failed to record compatibility check: {0}")]
    Storage(#[from] StorageError),
}

/// Scores a pair and records it. A pair only counts as handled once the record
/// is stored.
#[derive(Clone)]
pub struct CompatibilityService {
    records: Arc<LazyRecordSink>,
}

impl CompatibilityService {
    pub fn new(records: Arc<LazyRecordSink>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &LazyRecordSink {
        &self.records
    }

    pub async fn handle(
        &self,
        name1: Option<&str>,
        name2: Option<&str>,
    ) -> Result<u16, HandlerError> {
        let (Some(name1), Some(name2)) = (present(name1), present(name2)) else {
            warn!("rejected compatibility check with a missing name");
            return Err(HandlerError::MissingInput);
        };

        let compatibility = score(name1, name2);
        debug!(name1, name2, compatibility, "scored pair");

        let record = CompatibilityRecord::new(name1, name2, compatibility);
        if let Err(err) = self.records.store(record).await {
            error!(store = %self.records.label(), error = %err, "compatibility record insert failed");
            return Err(err.into());
        }
        Ok(compatibility)
    }
}

fn present(name: Option<&str>) -> Option<&str> {
    name.filter(|n| !n.trim().is_empty())
}

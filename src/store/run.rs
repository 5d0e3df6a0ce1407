//! Run context: one execution of the cleaning step, as seen by the store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Metadata handle for one run of the pipeline step.
///
/// The store assigns the run id when the run is registered. The
/// correlation id is generated client-side and only appears in log
/// lines; it never reaches the store.
#[derive(Debug, Clone)]
pub struct RunContext {
    id: String,
    correlation_id: Uuid,
    started_at: DateTime<Utc>,
}

impl RunContext {
    pub(crate) fn new(id: String) -> Self {
        Self {
            id,
            correlation_id: Uuid::new_v4(),
            started_at: Utc::now(),
        }
    }

    /// The store-assigned run identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The client-side correlation id for this execution.
    pub fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    /// When this run was registered.
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

//! All-or-nothing application of a batch.
//!
//! Work happens on a staged copy of the snapshot. `commit` publishes the copy
//! and returns the journal of parameter writes; dropping the transaction
//! without committing discards everything.

use crate::ModelSnapshot;
use chrono::{DateTime, Utc};
use conduit_wiring_core::{ElementId, ParameterValue};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One successful counter write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub element: ElementId,
    pub parameter: String,
    pub before: Option<ParameterValue>,
    pub after: i64,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeJournal {
    pub transaction_id: Uuid,
    pub name: String,
    pub committed_at: DateTime<Utc>,
    pub changes: Vec<ParameterChange>,
}

impl ChangeJournal {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct Transaction<'a> {
    id: Uuid,
    name: String,
    target: &'a mut ModelSnapshot,
    staged: ModelSnapshot,
}

impl<'a> Transaction<'a> {
    pub fn begin(target: &'a mut ModelSnapshot, name: impl Into<String>) -> Self {
        let mut staged = target.clone();
        // Writes made before the transaction are not part of its journal.
        staged.take_changes();
        let tx = Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            staged,
        };
        tracing::debug!(transaction = %tx.id, name = %tx.name, "transaction started");
        tx
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> &ModelSnapshot {
        &self.staged
    }

    pub fn snapshot_mut(&mut self) -> &mut ModelSnapshot {
        &mut self.staged
    }

    pub fn commit(self) -> ChangeJournal {
        let Transaction {
            id,
            name,
            target,
            mut staged,
        } = self;
        let changes = staged.take_changes();
        *target = staged;

        tracing::info!(transaction = %id, name = %name, changes = changes.len(), "transaction committed");
        ChangeJournal {
            transaction_id: id,
            name,
            committed_at: Utc::now(),
            changes,
        }
    }

    pub fn rollback(self) {
        tracing::info!(transaction = %self.id, name = %self.name, "transaction rolled back");
    }
}

//! Model snapshots
//!
//! A model snapshot is a JSON export of host elements and their parameters.
//! It stands in for the live CAD model: elements implement
//! [`ElementParameters`], the snapshot hands out elements of the configured
//! categories through [`SnapshotCollector`], and a [`Transaction`] makes a
//! batch land all at once or not at all.
//!
//! ```json
//! {
//!   "name": "Level 1",
//!   "elements": [
//!     {
//!       "id": 1001,
//!       "category": "Conduits",
//!       "parameters": {
//!         "1.3. Wiring": { "text": "FFNT" },
//!         "1.4. Gauge": { "text": "1.5" },
//!         "1,5mm²_Phase A": { "integer": 0 },
//!         "1,5mm²_Neutral": null
//!       }
//!     }
//!   ]
//! }
//! ```

pub mod persistence;
pub mod transaction;

#[cfg(test)]
mod tests;

pub use persistence::{load_snapshot, save_snapshot};
pub use transaction::{ChangeJournal, ParameterChange, Transaction};

use chrono::Utc;
use conduit_wiring_core::{
    ElementCollector, ElementId, ElementParameters, Parameter, ParameterValue, WriteError,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Integer parameters in the host model are 32-bit.
pub const HOST_INTEGER_RANGE: std::ops::RangeInclusive<i64> = (i32::MIN as i64)..=(i32::MAX as i64);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub elements: Vec<SnapshotElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotElement {
    pub id: ElementId,
    pub category: String,
    /// `null` means the parameter exists but has no value.
    #[serde(default)]
    pub parameters: BTreeMap<String, Option<ParameterValue>>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub read_only: BTreeSet<String>,
    #[serde(skip)]
    changes: Vec<ParameterChange>,
}

impl SnapshotElement {
    pub fn new(id: u64, category: impl Into<String>) -> Self {
        Self {
            id: ElementId(id),
            category: category.into(),
            parameters: BTreeMap::new(),
            read_only: BTreeSet::new(),
            changes: Vec::new(),
        }
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.parameters
            .insert(name.to_string(), Some(ParameterValue::Text(value.to_string())));
        self
    }

    pub fn with_integer(mut self, name: &str, value: i64) -> Self {
        self.parameters
            .insert(name.to_string(), Some(ParameterValue::Integer(value)));
        self
    }

    pub fn with_empty(mut self, name: &str) -> Self {
        self.parameters.insert(name.to_string(), None);
        self
    }

    pub fn with_read_only(mut self, name: &str) -> Self {
        self.read_only.insert(name.to_string());
        self
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.parameter(name)?.as_integer()
    }

    /// Writes made since the last call, oldest first.
    pub fn take_changes(&mut self) -> Vec<ParameterChange> {
        std::mem::take(&mut self.changes)
    }
}

impl ElementParameters for SnapshotElement {
    fn id(&self) -> ElementId {
        self.id
    }

    fn parameter(&self, name: &str) -> Option<Parameter> {
        self.parameters
            .get(name)
            .map(|value| Parameter::new(name, value.clone()))
    }

    fn set_integer(&mut self, name: &str, value: i64) -> Result<(), WriteError> {
        if self.read_only.contains(name) {
            return Err(WriteError::ReadOnly);
        }
        if !HOST_INTEGER_RANGE.contains(&value) {
            return Err(WriteError::OutOfRange(value));
        }
        let slot = self
            .parameters
            .get_mut(name)
            .ok_or_else(|| WriteError::Host(format!("element has no parameter {name:?}")))?;

        let after = match slot {
            None | Some(ParameterValue::Integer(_)) => ParameterValue::Integer(value),
            // Text counters keep their storage type.
            Some(ParameterValue::Text(_)) => ParameterValue::Text(value.to_string()),
            // The assigner rejects double counters before writing; direct callers land here.
            Some(ParameterValue::Double(_)) => return Err(WriteError::StorageMismatch),
        };
        let before = slot.replace(after);

        self.changes.push(ParameterChange {
            element: self.id,
            parameter: name.to_string(),
            before,
            after: value,
            at: Utc::now(),
        });
        Ok(())
    }
}

/// Element categories a batch operates on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Empty means every category.
    pub categories: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            categories: [
                "Conduits",
                "Conduit Fittings",
                "Cable Trays",
                "Cable Tray Fittings",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl CollectorConfig {
    pub fn all() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    pub fn accepts(&self, category: &str) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| c.trim() == category.trim())
    }
}

impl ModelSnapshot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn element(&self, id: u64) -> Option<&SnapshotElement> {
        self.elements.iter().find(|e| e.id == ElementId(id))
    }

    pub fn collector<'a>(&'a mut self, config: &'a CollectorConfig) -> SnapshotCollector<'a> {
        SnapshotCollector {
            snapshot: self,
            config,
        }
    }

    /// Writes made on any element since the last call.
    pub fn take_changes(&mut self) -> Vec<ParameterChange> {
        self.elements
            .iter_mut()
            .flat_map(SnapshotElement::take_changes)
            .collect()
    }
}

pub struct SnapshotCollector<'a> {
    snapshot: &'a mut ModelSnapshot,
    config: &'a CollectorConfig,
}

impl ElementCollector for SnapshotCollector<'_> {
    type Element = SnapshotElement;

    fn collect_elements(&mut self) -> anyhow::Result<Vec<&mut SnapshotElement>> {
        let config = self.config;
        let elements: Vec<&mut SnapshotElement> = self
            .snapshot
            .elements
            .iter_mut()
            .filter(|e| config.accepts(&e.category))
            .collect();
        tracing::debug!(
            model = %self.snapshot.name,
            collected = elements.len(),
            "collected elements"
        );
        Ok(elements)
    }
}

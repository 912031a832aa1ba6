//! Batch summary.

use crate::assign::{ElementOutcome, SlotOutcome};
use crate::store::ElementId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A target counter an active slot referenced but the element lacked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingTarget {
    pub element: ElementId,
    pub slot: usize,
    pub parameter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub elements_processed: usize,
    /// Slots with both wiring and gauge values.
    pub slots_processed: usize,
    pub slots_inactive: usize,
    pub slots_missing_gauge: usize,
    pub parameters_incremented: usize,
    pub write_failures: usize,
    pub phase_overflows: usize,
    pub diagnostics_reported: usize,
    pub missing_targets: Vec<MissingTarget>,
}

impl AssignmentReport {
    pub fn start() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            elements_processed: 0,
            slots_processed: 0,
            slots_inactive: 0,
            slots_missing_gauge: 0,
            parameters_incremented: 0,
            write_failures: 0,
            phase_overflows: 0,
            diagnostics_reported: 0,
            missing_targets: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: &ElementOutcome) {
        self.elements_processed += 1;
        for (i, slot) in outcome.slots.iter().enumerate() {
            match slot {
                SlotOutcome::Inactive => self.slots_inactive += 1,
                SlotOutcome::MissingGauge => self.slots_missing_gauge += 1,
                SlotOutcome::Processed(result) => {
                    self.slots_processed += 1;
                    self.parameters_incremented += result.incremented.len();
                    self.write_failures += result.write_failures;
                    if result.phase_overflow {
                        self.phase_overflows += 1;
                    }
                    self.missing_targets
                        .extend(result.missing_targets.iter().map(|parameter| MissingTarget {
                            element: outcome.element,
                            slot: i + 1,
                            parameter: parameter.clone(),
                        }));
                }
            }
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn is_clean(&self) -> bool {
        self.write_failures == 0 && self.phase_overflows == 0 && self.missing_targets.is_empty()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! Gauge assignment
//!
//! For every active slot of an element:
//!
//! 1. no wiring value → the circuit is unused, skip
//! 2. no gauge value → incomplete circuit, skip silently
//! 3. normalize the gauge, parse the wiring code
//! 4. phase conductors: `+1` on one lettered counter each (`Phase A`, `Phase B`, …)
//! 5. other roles with a template: `+count` on the shared counter
//!
//! Each counter write stands alone. A rejected write becomes a diagnostic and
//! the remaining targets, slots and elements are still processed.

use crate::config::{ConfigError, MissingTargetPolicy, SlotConfig, WiringConfig};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::gauge::Gauge;
use crate::store::{ElementId, ElementParameters, WriteError};
use crate::target::{TargetName, TargetTable};
use crate::wiring::{parse_wiring_code, RoleCounts};
use serde::Serialize;

/// One counter write computed for a slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedIncrement {
    pub target: TargetName,
    pub amount: i64,
}

/// Writes a slot would perform, before touching any element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotPlan {
    pub gauge: Gauge,
    pub counts: RoleCounts,
    pub increments: Vec<PlannedIncrement>,
    /// Phase conductors found, when there are more than phase letters.
    pub phase_overflow: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotResult {
    pub gauge: Option<Gauge>,
    /// Parameters incremented, in write order.
    pub incremented: Vec<String>,
    pub write_failures: usize,
    pub missing_targets: Vec<String>,
    pub phase_overflow: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    Inactive,
    MissingGauge,
    Processed(SlotResult),
}

impl SlotOutcome {
    pub fn result(&self) -> Option<&SlotResult> {
        match self {
            SlotOutcome::Processed(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementOutcome {
    pub element: ElementId,
    /// One entry per configured slot, in slot order.
    pub slots: Vec<SlotOutcome>,
}

impl ElementOutcome {
    pub fn incremented(&self) -> usize {
        self.slots
            .iter()
            .filter_map(SlotOutcome::result)
            .map(|r| r.incremented.len())
            .sum()
    }
}

#[derive(Debug, Clone)]
pub struct GaugeAssigner {
    config: WiringConfig,
    targets: TargetTable,
}

impl GaugeAssigner {
    pub fn new(config: WiringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let targets = TargetTable::from_config(&config);
        Ok(Self { config, targets })
    }

    pub fn config(&self) -> &WiringConfig {
        &self.config
    }

    pub fn targets(&self) -> &TargetTable {
        &self.targets
    }

    /// Compute the writes for one wiring code and raw gauge.
    pub fn plan(&self, wiring: &str, raw_gauge: &str) -> SlotPlan {
        let gauge = Gauge::normalize(raw_gauge);
        let counts = parse_wiring_code(wiring);
        let phase_tag = self.targets.phase_tag();

        let phases = counts.get(phase_tag);
        let mut increments: Vec<PlannedIncrement> = (0..phases)
            .map_while(|i| self.targets.phase(&gauge, i))
            .map(|target| PlannedIncrement { target, amount: 1 })
            .collect();
        let phase_overflow =
            (phases > self.targets.phase_letters().len()).then_some(phases);

        for (tag, count) in counts.iter().filter(|(tag, _)| *tag != phase_tag) {
            if let Some(target) = self.targets.role(&gauge, tag) {
                increments.push(PlannedIncrement {
                    target,
                    amount: count as i64,
                });
            }
        }

        SlotPlan {
            gauge,
            counts,
            increments,
            phase_overflow,
        }
    }

    /// Process one slot (`slot_number` is 1-based) of an element.
    pub fn assign_slot<E>(
        &self,
        element: &mut E,
        slot_number: usize,
        slot: &SlotConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> SlotOutcome
    where
        E: ElementParameters + ?Sized,
    {
        let Some(wiring) = read_text(element, &slot.wiring_parameter) else {
            return SlotOutcome::Inactive;
        };
        let Some(raw_gauge) = read_text(element, &slot.gauge_parameter) else {
            tracing::debug!(element = %element.id(), slot = slot_number, "gauge missing, slot skipped");
            return SlotOutcome::MissingGauge;
        };

        let plan = self.plan(&wiring, &raw_gauge);
        tracing::debug!(
            element = %element.id(),
            slot = slot_number,
            wiring = %wiring,
            gauge = %plan.gauge,
            targets = plan.increments.len(),
            "assigning slot"
        );

        let mut result = SlotResult {
            gauge: Some(plan.gauge.clone()),
            ..SlotResult::default()
        };

        if let Some(count) = plan.phase_overflow {
            result.phase_overflow = true;
            sink.report(Diagnostic::TooManyPhaseConductors {
                element: element.id(),
                slot: slot_number,
                count,
                max: self.targets.phase_letters().len(),
            });
        }

        for increment in &plan.increments {
            self.apply(element, slot_number, increment, &mut result, sink);
        }

        SlotOutcome::Processed(result)
    }

    /// Process every configured slot of an element, in order.
    pub fn assign_element<E>(&self, element: &mut E, sink: &mut dyn DiagnosticSink) -> ElementOutcome
    where
        E: ElementParameters + ?Sized,
    {
        let slots = self
            .config
            .slots
            .iter()
            .enumerate()
            .map(|(i, slot)| self.assign_slot(element, i + 1, slot, sink))
            .collect();
        ElementOutcome {
            element: element.id(),
            slots,
        }
    }

    fn apply<E>(
        &self,
        element: &mut E,
        slot_number: usize,
        increment: &PlannedIncrement,
        result: &mut SlotResult,
        sink: &mut dyn DiagnosticSink,
    ) where
        E: ElementParameters + ?Sized,
    {
        let name = increment.target.parameter.as_str();
        let Some(param) = element.parameter(name) else {
            match self.config.missing_target {
                MissingTargetPolicy::Ignore => {}
                MissingTargetPolicy::Record => result.missing_targets.push(name.to_string()),
                MissingTargetPolicy::Warn => {
                    result.missing_targets.push(name.to_string());
                    sink.report(Diagnostic::MissingTarget {
                        element: element.id(),
                        slot: slot_number,
                        parameter: name.to_string(),
                    });
                }
            }
            return;
        };

        let next = counter_value(&param)
            .and_then(|current| {
                current
                    .checked_add(increment.amount)
                    .ok_or(WriteError::Overflow {
                        current,
                        amount: increment.amount,
                    })
            })
            .and_then(|next| element.set_integer(name, next));

        match next {
            Ok(()) => result.incremented.push(name.to_string()),
            Err(error) => {
                result.write_failures += 1;
                sink.report(Diagnostic::WriteFailed {
                    element: element.id(),
                    slot: slot_number,
                    parameter: name.to_string(),
                    error,
                });
            }
        }
    }
}

fn read_text<E>(element: &E, name: &str) -> Option<String>
where
    E: ElementParameters + ?Sized,
{
    element
        .parameter(name)
        .filter(|param| param.has_value())
        .and_then(|param| param.as_string())
}

/// Current counter value; an empty counter starts at zero.
fn counter_value(param: &crate::store::Parameter) -> Result<i64, WriteError> {
    if !param.has_value() {
        return Ok(0);
    }
    param
        .as_integer()
        .ok_or_else(|| WriteError::NotAnInteger(param.as_string().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assigner() -> GaugeAssigner {
        GaugeAssigner::new(WiringConfig::default()).unwrap()
    }

    fn names(plan: &SlotPlan) -> Vec<(&str, i64)> {
        plan.increments
            .iter()
            .map(|i| (i.target.parameter.as_str(), i.amount))
            .collect()
    }

    #[test]
    fn three_phases_get_one_letter_each() {
        let plan = assigner().plan("FFF", "2,5");
        assert_eq!(
            names(&plan),
            vec![
                ("2,5mm²_Phase A", 1),
                ("2,5mm²_Phase B", 1),
                ("2,5mm²_Phase C", 1),
            ]
        );
        assert_eq!(plan.phase_overflow, None);
    }

    #[test]
    fn neutral_is_one_bulk_write() {
        let plan = assigner().plan("NN", "4,0");
        assert_eq!(names(&plan), vec![("4,0mm²_Neutral", 2)]);
    }

    #[test]
    fn mixed_code_with_dotted_gauge() {
        let plan = assigner().plan("FFNT", "1.5");
        assert_eq!(
            names(&plan),
            vec![
                ("1,5mm²_Phase A", 1),
                ("1,5mm²_Phase B", 1),
                ("1,5mm²_Neutral", 1),
                ("1,5mm²_Ground", 1),
            ]
        );
    }

    #[test]
    fn unknown_tags_plan_nothing() {
        let plan = assigner().plan("XYZ", "4");
        assert!(plan.increments.is_empty());
        assert_eq!(plan.counts.total(), 3);
    }

    #[test]
    fn fourth_phase_overflows() {
        let plan = assigner().plan("FFFFR", "6");
        assert_eq!(plan.phase_overflow, Some(4));
        assert_eq!(
            names(&plan),
            vec![
                ("6,0mm²_Phase A", 1),
                ("6,0mm²_Phase B", 1),
                ("6,0mm²_Phase C", 1),
                ("6,0mm²_Return", 1),
            ]
        );
    }

    #[test]
    fn custom_alphabet_and_templates() {
        let mut config = WiringConfig {
            phase_letters: vec!['R', 'S', 'T'],
            phase_template: "#{gauge} L{letter}".into(),
            ..WiringConfig::default()
        };
        config.role_templates.insert('P', "#{gauge} PE".into());
        let plan = GaugeAssigner::new(config).unwrap().plan("FP", "10");
        assert_eq!(names(&plan), vec![("#10,0 LR", 1), ("#10,0 PE", 1)]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = WiringConfig {
            slots: Vec::new(),
            ..WiringConfig::default()
        };
        assert!(GaugeAssigner::new(config).is_err());
    }
}

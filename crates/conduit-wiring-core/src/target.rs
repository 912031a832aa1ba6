//! Target counter names.

use crate::config::{WiringConfig, GAUGE_PLACEHOLDER, LETTER_PLACEHOLDER};
use crate::gauge::Gauge;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    /// One lettered counter per phase conductor.
    Phase { letter: char },
    /// Shared counter for every conductor of the role.
    Role { tag: char },
}

/// A counter parameter to increment on the element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetName {
    pub parameter: String,
    pub kind: TargetKind,
}

impl fmt::Display for TargetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parameter)
    }
}

/// `(gauge, role, letter?) -> parameter name`, built once from configuration.
#[derive(Debug, Clone)]
pub struct TargetTable {
    phase_tag: char,
    phase_letters: Vec<char>,
    phase_template: String,
    role_templates: BTreeMap<char, String>,
}

impl TargetTable {
    pub fn from_config(config: &WiringConfig) -> Self {
        Self {
            phase_tag: config.phase_tag,
            phase_letters: config.phase_letters.clone(),
            phase_template: config.phase_template.clone(),
            role_templates: config.role_templates.clone(),
        }
    }

    pub fn phase_tag(&self) -> char {
        self.phase_tag
    }

    pub fn phase_letters(&self) -> &[char] {
        &self.phase_letters
    }

    /// Counter for the `index`-th phase conductor (0-based), or `None` when
    /// the alphabet has no letter left.
    pub fn phase(&self, gauge: &Gauge, index: usize) -> Option<TargetName> {
        let letter = *self.phase_letters.get(index)?;
        let parameter = self
            .phase_template
            .replace(LETTER_PLACEHOLDER, &letter.to_string())
            .replace(GAUGE_PLACEHOLDER, gauge.as_str());
        Some(TargetName {
            parameter,
            kind: TargetKind::Phase { letter },
        })
    }

    /// Shared counter for a bulk role, or `None` for tags without a template.
    pub fn role(&self, gauge: &Gauge, tag: char) -> Option<TargetName> {
        let template = self.role_templates.get(&tag)?;
        Some(TargetName {
            parameter: template.replace(GAUGE_PLACEHOLDER, gauge.as_str()),
            kind: TargetKind::Role { tag },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TargetTable {
        TargetTable::from_config(&WiringConfig::default())
    }

    #[test]
    fn phase_names_follow_the_alphabet() {
        let gauge = Gauge::normalize("2.5");
        let names: Vec<String> = (0..3)
            .map(|i| table().phase(&gauge, i).unwrap().parameter)
            .collect();
        assert_eq!(
            names,
            vec!["2,5mm²_Phase A", "2,5mm²_Phase B", "2,5mm²_Phase C"]
        );
    }

    #[test]
    fn no_fourth_phase_letter() {
        assert!(table().phase(&Gauge::normalize("4"), 3).is_none());
    }

    #[test]
    fn gauge_text_is_not_expanded_as_a_placeholder() {
        let gauge = Gauge::normalize("{letter}");
        assert_eq!(
            table().phase(&gauge, 0).unwrap().parameter,
            "{letter},0mm²_Phase A"
        );
    }

    #[test]
    fn bulk_role_names() {
        let gauge = Gauge::normalize("4");
        let t = table();
        assert_eq!(t.role(&gauge, 'N').unwrap().parameter, "4,0mm²_Neutral");
        assert_eq!(t.role(&gauge, 'T').unwrap().parameter, "4,0mm²_Ground");
        assert_eq!(t.role(&gauge, 'R').unwrap().parameter, "4,0mm²_Return");
        assert!(t.role(&gauge, 'X').is_none());
        assert!(t.role(&gauge, 'F').is_none());
    }
}

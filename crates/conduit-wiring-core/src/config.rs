//! Assigner configuration.
//!
//! Slot parameter names, the phase alphabet and the target-name templates are
//! data owned by the host project, so they live here instead of in the
//! assignment logic. Every field has a default; a JSON file only needs to
//! list what differs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Placeholder replaced by the normalized gauge in target templates.
pub const GAUGE_PLACEHOLDER: &str = "{gauge}";
/// Placeholder replaced by the phase letter in the phase template.
pub const LETTER_PLACEHOLDER: &str = "{letter}";

pub const DEFAULT_SLOT_COUNT: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// One circuit slot: where its wiring code and gauge are stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub wiring_parameter: String,
    pub gauge_parameter: String,
}

impl SlotConfig {
    pub fn numbered(n: usize) -> Self {
        Self {
            wiring_parameter: format!("{n}.3. Wiring"),
            gauge_parameter: format!("{n}.4. Gauge"),
        }
    }
}

/// What to do when an active slot names a target counter the element lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingTargetPolicy {
    /// Skip without a trace.
    Ignore,
    /// Skip and list it in the assignment report.
    #[default]
    Record,
    /// Skip, list it, and send a diagnostic.
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WiringConfig {
    /// Circuit slots, processed in order; slot numbers are 1-based positions.
    pub slots: Vec<SlotConfig>,
    /// Tag counted per conductor against lettered counters.
    pub phase_tag: char,
    /// Letters assigned to phase conductors in encounter order.
    pub phase_letters: Vec<char>,
    pub phase_template: String,
    /// Bulk-counted roles: tag -> target template.
    pub role_templates: BTreeMap<char, String>,
    pub missing_target: MissingTargetPolicy,
}

impl Default for WiringConfig {
    fn default() -> Self {
        let role_templates = [
            ('N', "{gauge}mm²_Neutral"),
            ('T', "{gauge}mm²_Ground"),
            ('R', "{gauge}mm²_Return"),
        ]
        .into_iter()
        .map(|(tag, template)| (tag, template.to_string()))
        .collect();

        Self {
            slots: (1..=DEFAULT_SLOT_COUNT).map(SlotConfig::numbered).collect(),
            phase_tag: 'F',
            phase_letters: vec!['A', 'B', 'C'],
            phase_template: "{gauge}mm²_Phase {letter}".to_string(),
            role_templates,
            missing_target: MissingTargetPolicy::default(),
        }
    }
}

impl WiringConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.slots.is_empty() {
            return Err(ConfigError::Invalid("at least one slot is required".into()));
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if slot.wiring_parameter.trim().is_empty() || slot.gauge_parameter.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "slot {} has an empty parameter name",
                    i + 1
                )));
            }
        }

        if self.phase_letters.is_empty() {
            return Err(ConfigError::Invalid("phase_letters must not be empty".into()));
        }
        let unique: BTreeSet<char> = self.phase_letters.iter().copied().collect();
        if unique.len() != self.phase_letters.len() {
            return Err(ConfigError::Invalid("phase_letters contains duplicates".into()));
        }

        if !self.phase_template.contains(GAUGE_PLACEHOLDER)
            || !self.phase_template.contains(LETTER_PLACEHOLDER)
        {
            return Err(ConfigError::Invalid(format!(
                "phase_template must contain {GAUGE_PLACEHOLDER} and {LETTER_PLACEHOLDER}"
            )));
        }

        if self.role_templates.contains_key(&self.phase_tag) {
            return Err(ConfigError::Invalid(format!(
                "phase tag '{}' must not also have a role template",
                self.phase_tag
            )));
        }
        for (tag, template) in &self.role_templates {
            if !template.contains(GAUGE_PLACEHOLDER) {
                return Err(ConfigError::Invalid(format!(
                    "template for role '{tag}' must contain {GAUGE_PLACEHOLDER}"
                )));
            }
        }

        Ok(())
    }
}

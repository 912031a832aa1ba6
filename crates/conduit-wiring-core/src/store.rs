//! Host capabilities.
//!
//! The assigner never sees a concrete host element. It reads and writes named
//! parameters through [`ElementParameters`] and receives elements from an
//! [`ElementCollector`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Host identifier of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stored value of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterValue {
    Integer(i64),
    Double(f64),
    Text(String),
}

/// Read view of one parameter: it exists, and may or may not hold a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: Option<ParameterValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: Option<ParameterValue>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Empty or whitespace-only text counts as no value.
    pub fn has_value(&self) -> bool {
        match &self.value {
            None => false,
            Some(ParameterValue::Text(text)) => !text.trim().is_empty(),
            Some(_) => true,
        }
    }

    pub fn as_string(&self) -> Option<String> {
        match self.value.as_ref()? {
            ParameterValue::Integer(v) => Some(v.to_string()),
            ParameterValue::Double(v) => Some(v.to_string()),
            ParameterValue::Text(text) => Some(text.clone()),
        }
    }

    /// Integer reading of the value; numeric text is accepted.
    pub fn as_integer(&self) -> Option<i64> {
        match self.value.as_ref()? {
            ParameterValue::Integer(v) => Some(*v),
            ParameterValue::Text(text) => text.trim().parse().ok(),
            ParameterValue::Double(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("parameter is read-only")]
    ReadOnly,

    #[error("parameter does not store integers")]
    StorageMismatch,

    #[error("value {0} is out of range for the parameter")]
    OutOfRange(i64),

    #[error("incrementing {current} by {amount} overflows")]
    Overflow { current: i64, amount: i64 },

    #[error("current value {0:?} is not an integer")]
    NotAnInteger(String),

    #[error("host rejected the write: {0}")]
    Host(String),
}

/// Parameter access on a single host element.
pub trait ElementParameters {
    fn id(&self) -> ElementId;

    fn has_parameter(&self, name: &str) -> bool {
        self.parameter(name).is_some()
    }

    /// The named parameter, if the element defines it.
    fn parameter(&self, name: &str) -> Option<Parameter>;

    fn set_integer(&mut self, name: &str, value: i64) -> Result<(), WriteError>;
}

/// Source of the elements a batch operates on.
///
/// Which categories count as "of interest" is the collector's business.
pub trait ElementCollector {
    type Element: ElementParameters;

    fn collect_elements(&mut self) -> anyhow::Result<Vec<&mut Self::Element>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_value() {
        let param = Parameter::new("1.3. Wiring", Some(ParameterValue::Text(String::new())));
        assert!(!param.has_value());
        assert!(!Parameter::new("x", None).has_value());
        let blank = Parameter::new("1.4. Gauge", Some(ParameterValue::Text(" \t ".into())));
        assert!(!blank.has_value());
    }

    #[test]
    fn integer_reading() {
        assert_eq!(
            Parameter::new("x", Some(ParameterValue::Integer(4))).as_integer(),
            Some(4)
        );
        assert_eq!(
            Parameter::new("x", Some(ParameterValue::Text(" 7 ".into()))).as_integer(),
            Some(7)
        );
        assert_eq!(
            Parameter::new("x", Some(ParameterValue::Double(2.5))).as_integer(),
            None
        );
    }

    #[test]
    fn string_reading() {
        assert_eq!(
            Parameter::new("x", Some(ParameterValue::Integer(4))).as_string(),
            Some("4".to_string())
        );
        assert_eq!(Parameter::new("x", None).as_string(), None);
    }
}

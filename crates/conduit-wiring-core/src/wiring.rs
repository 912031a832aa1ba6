//! Wiring codes
//!
//! A wiring code is a compact string of single-character role tags, one per
//! conductor running through the segment (`"FFFNT"` = three phases, one
//! neutral, one ground). Order carries no meaning.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Conductor roles known to the default configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Phase,
    Neutral,
    Ground,
    Return,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Phase, Role::Neutral, Role::Ground, Role::Return];

    pub fn tag(self) -> char {
        match self {
            Role::Phase => 'F',
            Role::Neutral => 'N',
            Role::Ground => 'T',
            Role::Return => 'R',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Phase => "Phase",
            Role::Neutral => "Neutral",
            Role::Ground => "Ground",
            Role::Return => "Return",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Occurrence count per role tag.
///
/// Every character of the parsed code gets a bucket, including characters
/// that are not role tags; consumers look up the tags they understand and
/// ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    counts: BTreeMap<char, usize>,
}

impl RoleCounts {
    pub fn get(&self, tag: char) -> usize {
        self.counts.get(&tag).copied().unwrap_or(0)
    }

    pub fn role(&self, role: Role) -> usize {
        self.get(role.tag())
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of distinct tags seen.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Sum over all buckets; equals the character count of the parsed code.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, usize)> + '_ {
        self.counts.iter().map(|(tag, count)| (*tag, *count))
    }

    fn bump(&mut self, tag: char) {
        *self.counts.entry(tag).or_insert(0) += 1;
    }
}

impl fmt::Display for RoleCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (tag, count)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{tag}: {count}")?;
        }
        f.write_str("}")
    }
}

/// Count role tags in a wiring code. Case-sensitive, never fails.
pub fn parse_wiring_code(code: &str) -> RoleCounts {
    code.chars().fold(RoleCounts::default(), |mut counts, tag| {
        counts.bump(tag);
        counts
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_code_has_no_buckets() {
        let counts = parse_wiring_code("");
        assert!(counts.is_empty());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn three_phase_code() {
        let counts = parse_wiring_code("FFF");
        assert_eq!(counts.get('F'), 3);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn mixed_code_counts_each_role() {
        let counts = parse_wiring_code("FFFNT");
        assert_eq!(counts.role(Role::Phase), 3);
        assert_eq!(counts.role(Role::Neutral), 1);
        assert_eq!(counts.role(Role::Ground), 1);
        assert_eq!(counts.role(Role::Return), 0);
        assert_eq!(counts.total(), 5);
    }

    #[test]
    fn order_does_not_matter() {
        assert_eq!(parse_wiring_code("NFTF"), parse_wiring_code("FFNT"));
    }

    #[test]
    fn lowercase_is_not_folded() {
        let counts = parse_wiring_code("ff");
        assert_eq!(counts.get('F'), 0);
        assert_eq!(counts.get('f'), 2);
    }

    #[test]
    fn unknown_characters_get_their_own_bucket() {
        let counts = parse_wiring_code("F-X ");
        assert_eq!(counts.get('F'), 1);
        assert_eq!(counts.get('X'), 1);
        assert_eq!(counts.get(' '), 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn display_lists_buckets_in_tag_order() {
        assert_eq!(parse_wiring_code("TFNF").to_string(), "{F: 2, N: 1, T: 1}");
    }

    #[test]
    fn role_tags_roundtrip() {
        for role in Role::ALL {
            assert_eq!(Role::from_tag(role.tag()), Some(role));
        }
        assert_eq!(Role::from_tag('X'), None);
    }
}

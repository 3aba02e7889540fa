//! Role label aliases.
//!
//! The registration form renders the same radio value under different labels
//! depending on the selected organization: value `Student` shows as "Sail'r"
//! for Sails Software and "Student" elsewhere. The table maps every label
//! variant back to its value. Which variant is on screen right now is a page
//! question, answered by the engine on every lookup.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleAliasTable {
    /// value -> label variants, organization-specific variants first.
    aliases: BTreeMap<String, Vec<String>>,
}

impl Default for RoleAliasTable {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            "Student".to_string(),
            vec!["Sail'r".to_string(), "Student".to_string()],
        );
        aliases.insert(
            "Coach".to_string(),
            vec!["Trainer".to_string(), "Coach".to_string()],
        );
        Self { aliases }
    }
}

/// How a requested role maps onto the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleLookup {
    /// Known value; `labels` are the variants to probe, in order.
    Listed { value: String, labels: Vec<String> },
    /// Not in the table: the role name doubles as label and value.
    /// This is a guess and may click the wrong control on unlisted organizations.
    Unlisted { value: String },
}

impl RoleLookup {
    pub fn value(&self) -> &str {
        match self {
            Self::Listed { value, .. } | Self::Unlisted { value } => value,
        }
    }

    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Listed { labels, .. } => labels.clone(),
            Self::Unlisted { value } => vec![value.clone()],
        }
    }
}

impl RoleAliasTable {
    pub fn empty() -> Self {
        Self {
            aliases: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, value: impl Into<String>, labels: Vec<String>) {
        self.aliases.insert(value.into(), labels);
    }

    /// Merge another table over this one; entries in `other` win.
    pub fn merge(&mut self, other: &RoleAliasTable) {
        for (value, labels) in &other.aliases {
            self.aliases.insert(value.clone(), labels.clone());
        }
    }

    /// Map a requested role (value or any label variant) to its entry.
    pub fn lookup(&self, role: &str) -> RoleLookup {
        let role = role.trim();
        for (value, labels) in &self.aliases {
            if value == role || labels.iter().any(|l| l == role) {
                let mut labels = labels.clone();
                if !labels.iter().any(|l| l == value) {
                    labels.push(value.clone());
                }
                return RoleLookup::Listed {
                    value: value.clone(),
                    labels,
                };
            }
        }
        RoleLookup::Unlisted {
            value: role.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

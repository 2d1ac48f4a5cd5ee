//! Mutation requests prepared by the engine and confirmed after the backend
//! acknowledges them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the view a request was prepared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestToken {
    pub generation: u64,
}

/// Per-record flags the backend can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagName {
    Quarantine,
}

impl FlagName {
    pub fn as_str(self) -> &'static str {
        match self {
            FlagName::Quarantine => "quarantine",
        }
    }
}

impl fmt::Display for FlagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagMode {
    #[serde(rename = "raise_flag")]
    Raise,
    #[serde(rename = "drop_flag")]
    Drop,
}

impl FlagMode {
    /// Wire value for `flag_update_mode`.
    pub fn as_str(self) -> &'static str {
        match self {
            FlagMode::Raise => "raise_flag",
            FlagMode::Drop => "drop_flag",
        }
    }

    /// Flag value once the update is applied.
    pub fn target(self) -> bool {
        matches!(self, FlagMode::Raise)
    }
}

impl fmt::Display for FlagMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raise or drop a flag on a resolved set of record ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagUpdate {
    pub token: RequestToken,
    pub flag: FlagName,
    pub mode: FlagMode,
    /// Record ids whose flag actually changes.
    pub record_ids: Vec<String>,
}

impl FlagUpdate {
    pub fn is_empty(&self) -> bool {
        self.record_ids.is_empty()
    }

    pub fn ids_csv(&self) -> String {
        self.record_ids.join(", ")
    }
}

/// Replace the access roles of a resolved set of record ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub token: RequestToken,
    pub record_ids: Vec<String>,
    pub roles: Vec<String>,
}

impl RoleUpdate {
    pub fn ids_csv(&self) -> String {
        self.record_ids.join(", ")
    }

    pub fn roles_csv(&self) -> String {
        self.roles.join(", ")
    }
}

/// Editable grid fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    AccessRoles,
}

/// New cell content for an [`EditableField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Roles(Vec<String>),
}

/// Result of a bulk edit on the working set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkEdit {
    pub updated: Vec<String>,
    pub value: FieldValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wire_names_match_backend_vocabulary() {
        assert_eq!(FlagMode::Raise.as_str(), "raise_flag");
        assert_eq!(
            serde_json::to_value(FlagMode::Drop).unwrap(),
            serde_json::json!("drop_flag")
        );
        assert_eq!(FlagName::Quarantine.to_string(), "quarantine");
        assert!(FlagMode::Raise.target());
        assert!(!FlagMode::Drop.target());
    }

    #[test]
    fn csv_joins_with_comma_space() {
        let update = RoleUpdate {
            token: RequestToken { generation: 0 },
            record_ids: vec!["1".to_string(), "2".to_string()],
            roles: vec!["Admin".to_string(), "User".to_string()],
        };
        assert_eq!(update.ids_csv(), "1, 2");
        assert_eq!(update.roles_csv(), "Admin, User");
    }
}

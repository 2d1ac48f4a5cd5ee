use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The profile a user is currently acting as.
///
/// Parsing is exact and case-sensitive. Anything outside the built-in set is
/// kept verbatim in [`Role::Other`] and treated as an ordinary role with no
/// special privileges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[default]
    Admin,
    User,
    Guest,
    Moderator,
    DocumentOwner,
    Auditor,
    Other(String),
}

impl Role {
    /// Roles offered by default in the profile picker.
    pub const DEFAULT_OPTIONS: [&'static str; 4] = ["Admin", "User", "Guest", "Moderator"];

    pub fn parse(value: &str) -> Self {
        match value {
            "Admin" => Role::Admin,
            "User" => Role::User,
            "Guest" => Role::Guest,
            "Moderator" => Role::Moderator,
            "Document Owner" => Role::DocumentOwner,
            "Auditor" => Role::Auditor,
            other => Role::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
            Role::Guest => "Guest",
            Role::Moderator => "Moderator",
            Role::DocumentOwner => "Document Owner",
            Role::Auditor => "Auditor",
            Role::Other(value) => value,
        }
    }

    /// Whether this role is one of the three privileged branches of the
    /// visibility policy. Everything else (including unknown strings) is
    /// ordinary.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin | Role::DocumentOwner | Role::Auditor)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Role::parse(value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Role {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::parse(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the profile picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileOption {
    /// Lowercased label with spaces replaced by underscores
    pub value: String,
    /// Label as shown to the user
    pub label: String,
}

impl ProfileOption {
    pub fn from_label(label: &str) -> Self {
        Self {
            value: label.to_lowercase().replace(' ', "_"),
            label: label.to_string(),
        }
    }
}

/// Turn a list of role labels into picker options.
pub fn profile_options<I, S>(labels: I) -> Vec<ProfileOption>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    labels
        .into_iter()
        .map(|label| ProfileOption::from_label(label.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_is_exact_and_case_sensitive() {
        assert_eq!(Role::parse("Document Owner"), Role::DocumentOwner);
        assert_eq!(
            Role::parse("document owner"),
            Role::Other("document owner".to_string())
        );
        assert_eq!(Role::parse("Auditor"), Role::Auditor);
    }

    #[test]
    fn unknown_roles_are_not_privileged() {
        assert!(Role::Admin.is_privileged());
        assert!(Role::Auditor.is_privileged());
        assert!(!Role::Moderator.is_privileged());
        assert!(!Role::parse("Admn").is_privileged());
    }

    #[test]
    fn serde_uses_display_strings() {
        let json = serde_json::to_string(&Role::DocumentOwner).unwrap();
        assert_eq!(json, "\"Document Owner\"");
        let parsed: Role = serde_json::from_str("\"Reviewer\"").unwrap();
        assert_eq!(parsed, Role::Other("Reviewer".to_string()));
    }

    #[test]
    fn profile_options_snake_case_values() {
        let options = profile_options(["Admin", "Document Owner"]);
        assert_eq!(
            options,
            vec![
                ProfileOption {
                    value: "admin".to_string(),
                    label: "Admin".to_string(),
                },
                ProfileOption {
                    value: "document_owner".to_string(),
                    label: "Document Owner".to_string(),
                },
            ]
        );
    }
}

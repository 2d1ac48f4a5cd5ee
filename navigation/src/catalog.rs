use crate::error::{NavigationError, Result};
use crate::icon::IconId;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Title of the landing section. It is never role-filtered and is rendered
/// apart from the rest of the list.
pub const HOME_TITLE: &str = "Home";

/// Title of the administrative section.
pub const ADMIN_TITLE: &str = "Admin";

/// Title of the document-owner section.
pub const DOCUMENT_OWNER_TITLE: &str = "Document Owner";

/// A task entry nested under a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSubsection {
    pub title: String,

    #[serde(default)]
    pub route: String,

    /// Task-context tag forwarded to backend calls
    #[serde(default)]
    pub persona: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub icon: IconId,

    /// Whether the entry is currently shown and selectable
    #[serde(default = "default_true")]
    pub active: bool,
}

/// A top-level catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavSection {
    pub title: String,

    #[serde(default)]
    pub route: String,

    #[serde(default)]
    pub icon: IconId,

    #[serde(default)]
    pub description: String,

    #[serde(default, alias = "textcolor")]
    pub text_color: Option<String>,

    #[serde(default, alias = "subcards", alias = "subCards")]
    pub subsections: Vec<NavSubsection>,
}

fn default_true() -> bool {
    true
}

impl NavSubsection {
    pub fn new(title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            route: route.into(),
            persona: String::new(),
            description: String::new(),
            icon: IconId::default(),
            active: true,
        }
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl NavSection {
    pub fn new(title: impl Into<String>, route: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            route: route.into(),
            icon: IconId::default(),
            description: String::new(),
            text_color: None,
            subsections: Vec::new(),
        }
    }

    pub fn with_subsection(mut self, subsection: NavSubsection) -> Self {
        self.subsections.push(subsection);
        self
    }

    pub fn is_home(&self) -> bool {
        self.title == HOME_TITLE
    }

    /// Subsections that should be offered to the user, with their original
    /// indices.
    pub fn active_subsections(&self) -> impl Iterator<Item = (usize, &NavSubsection)> {
        self.subsections
            .iter()
            .enumerate()
            .filter(|(_, subsection)| subsection.active)
    }
}

/// The static list of navigable sections, read-only once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NavCatalog {
    #[serde(default)]
    sections: Vec<NavSection>,
}

impl NavCatalog {
    /// Build a catalog, rejecting duplicate section titles.
    pub fn new(sections: Vec<NavSection>) -> Result<Self> {
        let mut seen = HashSet::new();
        for section in &sections {
            if !seen.insert(section.title.as_str()) {
                return Err(NavigationError::DuplicateSection(section.title.clone()));
            }
        }
        if let Some(first) = sections.first()
            && !first.is_home()
        {
            warn!(
                "first catalog entry is `{}`; expected the `{HOME_TITLE}` page",
                first.title
            );
        }
        Ok(Self { sections })
    }

    pub fn from_toml_str(input: &str) -> Result<Self> {
        let raw: NavCatalog = toml::from_str(input)?;
        Self::new(raw.sections)
    }

    pub fn from_json_str(input: &str) -> Result<Self> {
        let raw: NavCatalog = serde_json::from_str(input)?;
        Self::new(raw.sections)
    }

    pub fn sections(&self) -> &[NavSection] {
        &self.sections
    }

    pub fn home(&self) -> Option<&NavSection> {
        self.sections.iter().find(|section| section.is_home())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

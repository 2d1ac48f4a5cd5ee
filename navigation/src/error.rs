use std::fmt;

use thiserror::Error;

/// Which list an out-of-range index was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Section,
    Subsection,
    Card,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndexKind::Section => "section",
            IndexKind::Subsection => "subsection",
            IndexKind::Card => "card",
        };
        f.write_str(label)
    }
}

/// Errors raised by the navigation model.
///
/// Index errors mean the caller rendered against a stale filtered list; they
/// are contract violations and should not be swallowed.
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("{kind} index {index} out of bounds (len {len})")]
    IndexOutOfBounds {
        kind: IndexKind,
        index: usize,
        len: usize,
    },

    #[error("subsection `{title}` is not active")]
    InactiveSubsection { title: String },

    #[error("no card is open")]
    NoActiveCard,

    #[error("duplicate section title `{0}` in catalog")]
    DuplicateSection(String),

    #[error("catalog TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NavigationError {
    pub(crate) fn out_of_bounds(kind: IndexKind, index: usize, len: usize) -> Self {
        NavigationError::IndexOutOfBounds { kind, index, len }
    }
}

pub type Result<T> = std::result::Result<T, NavigationError>;

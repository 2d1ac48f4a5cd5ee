use serde::{Deserialize, Serialize};

use crate::columns::{Column, ViewMode};
use crate::error::{AnalyticsError, Result};

/// Configuration for the analytics page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// View the grid opens in
    #[serde(default)]
    pub default_view: ViewMode,

    /// Column used to colour plot markers
    #[serde(default = "default_hue_column")]
    pub hue_column: Column,

    #[serde(default = "default_x_column")]
    pub x_column: Column,

    #[serde(default = "default_y_column")]
    pub y_column: Column,

    #[serde(default = "default_z_column")]
    pub z_column: Column,

    /// Persona tag sent with flag updates
    #[serde(default = "default_persona")]
    pub persona: String,

    /// User id sent with access-role updates
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_hue_column() -> Column {
    Column::RelevanceScore
}

fn default_x_column() -> Column {
    Column::Coord1
}

fn default_y_column() -> Column {
    Column::Coord2
}

fn default_z_column() -> Column {
    Column::Coord3
}

fn default_persona() -> String {
    "Strategist".to_string()
}

fn default_user_id() -> String {
    "Admin".to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_view: ViewMode::default(),
            hue_column: default_hue_column(),
            x_column: default_x_column(),
            y_column: default_y_column(),
            z_column: default_z_column(),
            persona: default_persona(),
            user_id: default_user_id(),
        }
    }
}

impl AnalyticsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, column) in [
            ("hue_column", self.hue_column),
            ("x_column", self.x_column),
            ("y_column", self.y_column),
            ("z_column", self.z_column),
        ] {
            if !column.is_numeric() {
                return Err(AnalyticsError::InvalidConfig(format!(
                    "{name} must be a numeric column, got `{column}`"
                )));
            }
        }

        if self.persona.trim().is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "persona must not be empty".to_string(),
            ));
        }

        if self.user_id.trim().is_empty() {
            return Err(AnalyticsError::InvalidConfig(
                "user_id must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

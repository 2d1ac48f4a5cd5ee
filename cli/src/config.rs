use anyhow::{Context, Result};
use ragdesk_analytics::AnalyticsConfig;
use ragdesk_backend_client::BackendConfig;
use ragdesk_navigation::NavCatalog;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ragdesk.toml";

const BUILTIN_CATALOG: &str = include_str!("../assets/catalog.toml");

/// Contents of `ragdesk.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Navigation catalog (TOML or JSON). Relative paths are resolved
    /// against the directory holding the config file.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
}

impl CliConfig {
    /// Load `path`, or `./ragdesk.toml` when it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: CliConfig = toml::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        if let Some(catalog) = config.catalog.as_mut()
            && catalog.is_relative()
            && let Some(dir) = path.parent()
        {
            *catalog = dir.join(&*catalog);
        }
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.backend
            .validate()
            .context("Invalid [backend] section")?;
        self.analytics
            .validate()
            .context("Invalid [analytics] section")?;
        Ok(())
    }
}

/// Read a catalog file, choosing the format by extension. Without a path the
/// built-in catalog is used.
pub fn load_catalog(path: Option<&Path>) -> Result<NavCatalog> {
    let Some(path) = path else {
        return NavCatalog::from_toml_str(BUILTIN_CATALOG).context("Built-in catalog is invalid");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let catalog = if is_json {
        NavCatalog::from_json_str(&text)
    } else {
        NavCatalog::from_toml_str(&text)
    };
    catalog.with_context(|| format!("Failed to load catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ragdesk_analytics::ViewMode;

    #[test]
    fn builtin_catalog_starts_with_home() {
        let catalog = load_catalog(None).unwrap();
        assert_eq!(catalog.sections()[0].title, "Home");
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn catalog_path_is_relative_to_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragdesk.toml");
        std::fs::write(
            &path,
            r#"
catalog = "nav.json"

[backend]
base_url = "http://backend.local:8080/api"

[analytics]
default_view = "page_segment"
persona = "Auditor"
"#,
        )
        .unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.catalog, Some(dir.path().join("nav.json")));
        assert_eq!(config.backend.base_url, "http://backend.local:8080/api");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.analytics.default_view, ViewMode::PageSegment);
        assert_eq!(config.analytics.persona, "Auditor");
        assert_eq!(config.analytics.user_id, "Admin");
    }

    #[test]
    fn invalid_backend_url_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragdesk.toml");
        std::fs::write(&path, "[backend]\nbase_url = \"nope\"\n").unwrap();
        assert!(CliConfig::load(Some(&path)).is_err());
    }
}

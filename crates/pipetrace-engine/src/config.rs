use crate::Result;
use pipetrace_core::{DEFAULT_ARTIFACT_CAP, resolve_config_path};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

fn default_artifact_cap() -> usize {
    DEFAULT_ARTIFACT_CAP
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Default search root when none is given on the command line
    #[serde(default)]
    pub search_root: Option<PathBuf>,

    #[serde(default = "default_artifact_cap")]
    pub artifact_cap: usize,

    /// Cap on aggregated report entries; unlimited when unset
    #[serde(default)]
    pub report_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_root: None,
            artifact_cap: DEFAULT_ARTIFACT_CAP,
            report_limit: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, `PIPETRACE_CONFIG`, or the default location.
    pub fn load(explicit_path: Option<&str>) -> Result<Self> {
        let config_path = resolve_config_path(explicit_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Artifact cap with zero clamped to one.
    pub fn artifact_cap(&self) -> usize {
        self.artifact_cap.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.artifact_cap, 6);
        assert!(config.search_root.is_none());
        assert!(config.report_limit.is_none());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nested/config.toml");

        let config = Config {
            search_root: Some(PathBuf::from("/home/user/code")),
            artifact_cap: 3,
            report_limit: Some(50),
        };
        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);

        Ok(())
    }

    #[test]
    fn test_partial_config_uses_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "report_limit = 10\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.artifact_cap, 6);
        assert_eq!(loaded.report_limit, Some(10));

        Ok(())
    }

    #[test]
    fn test_invalid_config_is_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "artifact_cap = \"many\"\n")?;

        assert!(matches!(
            Config::load_from(&config_path),
            Err(crate::Error::Config(_))
        ));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }

    #[test]
    fn test_zero_cap_is_clamped() {
        let config = Config {
            artifact_cap: 0,
            ..Default::default()
        };
        assert_eq!(config.artifact_cap(), 1);
    }
}

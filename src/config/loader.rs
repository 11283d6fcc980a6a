//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Project config (.docsmith/config.toml)
//! 3. Environment variables (DOCSMITH_* prefix, `__` for nesting)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;

use tracing::debug;

use super::types::Config;
use crate::types::{DocsmithError, Result};

/// Default project-level config location
pub const PROJECT_CONFIG_PATH: &str = ".docsmith/config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → project file → env vars
    pub fn load() -> Result<Config> {
        Self::load_with_file(Path::new(PROJECT_CONFIG_PATH))
    }

    /// Load configuration using a specific config file in the chain
    pub fn load_with_file(path: &Path) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if path.exists() {
            debug!("Loading config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("DOCSMITH_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| DocsmithError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuoteStyle;
    use crate::schema::BuilderStyle;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigLoader::load_with_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.quote_style, QuoteStyle::TripleDouble);
        assert!(config.skip_init_methods);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
include = ["src/**/*.py"]
builder_style = "numpy"
quote_style = "triple-single"
temperature = 0.5
max_workers = 3
"#,
        )
        .unwrap();

        let config = ConfigLoader::load_with_file(&path).unwrap();
        assert_eq!(config.include, vec!["src/**/*.py".to_string()]);
        assert_eq!(config.builder_style, BuilderStyle::Numpy);
        assert_eq!(config.quote_style, QuoteStyle::TripleSingle);
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.max_workers, 3);
    }

    #[test]
    fn test_invalid_values_rejected_after_merge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "temperature = 9.0\n").unwrap();

        assert!(ConfigLoader::load_with_file(&path).is_err());
    }
}

//! Configuration module for the spant CLI.
//!
//! This module handles loading configuration for the spant application:
//! where the headers go, the size-class scheme, the huge-page table and how
//! the header is spelled. Every section is optional; missing fields take the
//! defaults of the allocator the tool was written for.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use spangen_core::{HugePageConfig, SizeClassConfig, Variant};
use spangen_emit::RenderOptions;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpantError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "spant.toml";

/// Application configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    /// Output locations.
    #[serde(default)]
    pub output: OutputConfig,

    /// Fine + coarse scheme parameters.
    #[serde(default)]
    pub classes: SizeClassConfig,

    /// Huge-page table parameters.
    #[serde(default)]
    pub huge: HugePageConfig,

    /// Header spelling.
    #[serde(default)]
    pub render: RenderOptions,
}

/// Where each table variant is written.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    /// Path of the default table, relative to the working directory.
    #[serde(default = "default_default_path")]
    pub default_path: PathBuf,

    /// Path of the huge-page table, relative to the working directory.
    #[serde(default = "default_huge_path")]
    pub huge_path: PathBuf,
}

fn default_default_path() -> PathBuf {
    PathBuf::from("src/size_classes_raw.h")
}

fn default_huge_path() -> PathBuf {
    PathBuf::from("src/size_classes_raw_hugepage.h")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_path: default_default_path(),
            huge_path: default_huge_path(),
        }
    }
}

impl OutputConfig {
    /// Configured destination of `variant`.
    pub fn path_for(&self, variant: Variant) -> &Path {
        match variant {
            Variant::Default => &self.default_path,
            Variant::Huge => &self.huge_path,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SpantError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            SpantError::Config(format!(
                "Failed to parse configuration {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("spant").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("spant").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    fn find_config_file() -> Option<PathBuf> {
        Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spangen_emit::RenderStyle;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.output.path_for(Variant::Default),
            Path::new("src/size_classes_raw.h")
        );
        assert_eq!(
            config.output.path_for(Variant::Huge),
            Path::new("src/size_classes_raw_hugepage.h")
        );
        assert_eq!(config.classes, SizeClassConfig::default());
        assert_eq!(config.huge, HugePageConfig::default());
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn test_load_partial_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &config_path,
            r#"
[output]
huge_path = "include/huge.h"

[classes]
fine_small_span = 16384
fine_large_span = 32768

[huge]
huge_page_size = 65536

[render]
style = "literal"
guard_prefix = "SCALLOC_"
"#,
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.output.huge_path, PathBuf::from("include/huge.h"));
        assert_eq!(config.output.default_path, default_default_path());
        assert_eq!(config.classes.fine_small_span, 16384);
        assert_eq!(config.classes.header_size, 192);
        assert_eq!(config.huge.huge_page_size, 65536);
        assert_eq!(config.huge.object_sizes.len(), 22);
        assert_eq!(config.render.style, RenderStyle::Literal);
        assert_eq!(config.render.guard_prefix, "SCALLOC_");
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/spant.toml"));
        assert!(matches!(result, Err(SpantError::Config(_))));
    }

    #[test]
    fn test_load_malformed_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&config_path, "[classes]\npage_size = \"big\"\n").unwrap();

        let result = Config::load_from_path(&config_path);
        assert!(matches!(result, Err(SpantError::Config(_))));
    }
}

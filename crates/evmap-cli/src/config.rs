//! Configuration file handling for evmap

use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use evmap_detectors::DetectorsConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// Configuration for the CLI tool
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
    /// `[http]`, `[newmotion]` and `[[chargecloud]]` tables
    #[serde(flatten)]
    pub detectors: DetectorsConfig,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("evmap");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(
        &self,
        output: Option<OutputFormat>,
        no_color: bool,
    ) -> Result<MergedConfig> {
        let output = match (output, &self.output) {
            (Some(format), _) => format,
            (None, Some(name)) => OutputFormat::from_str(name, true)
                .map_err(|e| anyhow!("Invalid output format in config file: {}", e))?,
            (None, None) => OutputFormat::default(),
        };

        Ok(MergedConfig {
            output,
            no_color: no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Fully resolved output settings after merging CLI args
#[derive(Debug, Clone, PartialEq)]
pub struct MergedConfig {
    pub output: OutputFormat,
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
output = "json"
no_color = true

[http]
timeout_secs = 5

[newmotion]
enabled = false

[[chargecloud]]
name = "Maingau"
operator_id = "606a0da0dfdd338ee4134605653d4fd8"

[[chargecloud]]
name = "SW Kiel"
operator_id = "6336fe713f2eb7fa04b97ff6651b76f8"
"#
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();

        assert_eq!(config.output.as_deref(), Some("json"));
        assert_eq!(config.no_color, Some(true));
        assert_eq!(config.detectors.http.timeout_secs, 5);
        assert!(!config.detectors.newmotion.enabled);
        let names: Vec<&str> = config
            .detectors
            .chargecloud
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Maingau", "SW Kiel"]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.output.is_none());
        assert!(config.detectors.newmotion.enabled);
        assert!(config.detectors.chargecloud.is_empty());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_merge_prefers_cli() {
        let config = Config {
            output: Some("csv".to_string()),
            no_color: Some(false),
            ..Default::default()
        };

        let merged = config.merge_with_args(Some(OutputFormat::Json), true).unwrap();
        assert_eq!(
            merged,
            MergedConfig {
                output: OutputFormat::Json,
                no_color: true
            }
        );

        let merged = config.merge_with_args(None, false).unwrap();
        assert_eq!(merged.output, OutputFormat::Csv);
        assert!(!merged.no_color);
    }

    #[test]
    fn test_merge_rejects_unknown_format() {
        let config = Config {
            output: Some("yaml".to_string()),
            ..Default::default()
        };
        assert!(config.merge_with_args(None, false).is_err());
    }
}

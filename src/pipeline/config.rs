//! Ingestion configuration.

use crate::error::{IngestError, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serialization format of the merged dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// Get the format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Settings for one ingestion run.
///
/// Significance thresholds and plot limits are fixed constants and are not
/// configurable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Project name.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Worker threads for per-file parsing; the global rayon pool when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Case-insensitive filename patterns to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Output format for the dataset.
    #[serde(default)]
    pub output: OutputFormat,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            name: "unnamed".to_string(),
            description: None,
            threads: None,
            exclude: Vec::new(),
            output: OutputFormat::Json,
        }
    }
}

impl IngestConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// An annotated starting point for a project config.
    pub fn example() -> Self {
        Self {
            name: "rnaseq-project".to_string(),
            description: Some("RNA-seq deliverables for report assembly".to_string()),
            threads: Some(4),
            exclude: vec![r"^\.".to_string(), r"~\$".to_string(), r"_backup".to_string()],
            output: OutputFormat::Json,
        }
    }

    /// Check settings that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            return Err(IngestError::InvalidParameter(
                "threads must be at least 1".to_string(),
            ));
        }
        self.exclude_patterns().map(|_| ())
    }

    /// Compile the exclude patterns.
    pub fn exclude_patterns(&self) -> Result<Vec<Regex>> {
        self.exclude
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        IngestError::InvalidParameter(format!(
                            "Invalid exclude pattern '{}': {}",
                            p, e
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_yaml_round_trip() {
        let config = IngestConfig::example();
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("rnaseq-project"));
        let parsed = IngestConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_minimal_yaml_defaults() {
        let config = IngestConfig::from_yaml("name: demo\n").unwrap();
        assert_eq!(config.name, "demo");
        assert!(config.exclude.is_empty());
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.threads, None);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(IngestConfig::from_yaml("name: x\nthreads: 0\n").is_err());
        assert!(IngestConfig::from_yaml("name: x\nexclude: ['(']\n").is_err());
        assert!(IngestConfig::from_yaml("name: x\noutput: xml\n").is_err());
    }

    #[test]
    fn test_exclude_case_insensitive() {
        let config = IngestConfig {
            exclude: vec!["backup".to_string()],
            ..Default::default()
        };
        let patterns = config.exclude_patterns().unwrap();
        assert!(patterns[0].is_match("C1_DGE_BACKUP.xlsx"));
    }
}

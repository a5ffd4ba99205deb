//! CLI configuration, optionally read from a TOML file

use anyhow::Context;
use estimate_store::ServiceConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON documents
    Json,
}

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct CliConfig {
    /// `tracing` filter used when `RUST_LOG` is unset
    pub(crate) log_filter: String,
    /// Default output format
    pub(crate) output: OutputFormat,
    /// Settings for the demo round service
    pub(crate) service: ServiceConfig,
}

impl CliConfig {
    /// Load from a TOML file; missing keys take their defaults
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            output: OutputFormat::Text,
            service: ServiceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output = \"json\"\n[service]\nmax_code_attempts = 3").unwrap();

        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.output, OutputFormat::Json);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.service.max_code_attempts, 3);
    }

    #[test]
    fn bad_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "output = 7").unwrap();
        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config"));
    }
}

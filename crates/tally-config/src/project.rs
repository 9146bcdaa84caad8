//! Project Configuration (tally.toml)
//!
//! ```toml
//! [run]
//! verbose = true
//! strict = true
//! throw = false
//! color = false
//! severity = ["warning", "deprecated"]
//!
//! [coverage]
//! output = "build/coverage.txt"
//! sources = ["src"]
//! ```

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity names accepted in `run.severity`
pub const SEVERITY_NAMES: &[&str] = &["notice", "warning", "deprecated", "user", "all"];

/// Project configuration from tally.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Run behaviour
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run: Option<RunSection>,

    /// Code coverage output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageSection>,
}

/// `[run]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct RunSection {
    /// Print passing assertions too
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Promote notices to failures and capture panics quietly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,

    /// Abort the run on the first unexpected error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub throw: Option<bool>,

    /// Colorize console output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Notice severities promoted in strict mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Vec<String>>,
}

/// `[coverage]` table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct CoverageSection {
    /// Report destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Source directories to instrument
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<PathBuf>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(names) = self.run.as_ref().and_then(|run| run.severity.as_ref()) {
            for name in names {
                validate_severity_name(name)?;
            }
        }

        Ok(())
    }

    pub(crate) fn run_mut(&mut self) -> &mut RunSection {
        self.run.get_or_insert_with(RunSection::default)
    }
}

fn validate_severity_name(name: &str) -> ConfigResult<()> {
    if !SEVERITY_NAMES.contains(&name) {
        return Err(ConfigError::InvalidValue {
            field: "run.severity".to_string(),
            reason: format!(
                "must be one of {}, got '{}'",
                SEVERITY_NAMES.join(", "),
                name
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config: ProjectConfig = toml::from_str("").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[run]
verbose = true
strict = false
throw = true
color = false
severity = ["warning", "user"]

[coverage]
output = "build/coverage.txt"
sources = ["src", "lib"]
"#;

        let config: ProjectConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());

        let run = config.run.unwrap();
        assert_eq!(run.verbose, Some(true));
        assert_eq!(run.strict, Some(false));
        assert_eq!(run.severity, Some(vec!["warning".to_string(), "user".to_string()]));

        let coverage = config.coverage.unwrap();
        assert_eq!(coverage.output, Some(PathBuf::from("build/coverage.txt")));
        assert_eq!(coverage.sources.len(), 2);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ProjectConfig, _> = toml::from_str("[run]\nloud = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_severity_name() {
        let config = ProjectConfig {
            run: Some(RunSection {
                severity: Some(vec!["fatal".to_string()]),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence:
//! 1. Defaults - lowest priority
//! 2. Project config (./tally.toml) - overrides defaults
//! 3. Environment variables (TALLY_*, NO_COLOR) - overrides project
//! 4. Command-line flags - highest priority (see [`Config::apply_flags`])

use crate::flags::enabled;
use crate::project::ProjectConfig;
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// File name searched for when walking up from the start directory
pub const CONFIG_FILE_NAME: &str = "tally.toml";

/// Configuration loader
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Skip environment overrides (used by tests and embedders)
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Project configuration, with overrides applied
    pub project: ProjectConfig,

    /// Directory where tally.toml was found
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not read TALLY_* environment variables
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find tally.toml. A missing file is not
    /// an error: defaults apply.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_config(start_dir)?;
        let project = self.apply_env_overrides(project)?;

        Ok(Config {
            project,
            project_root,
        })
    }

    /// Load configuration from a specific tally.toml
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = ProjectConfig::load_from_file(config_path)?;
        let project = self.apply_env_overrides(project)?;

        Ok(Config {
            project,
            project_root: config_path.parent().map(|p| p.to_path_buf()),
        })
    }

    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.is_file() {
                let project = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    /// Apply environment variable overrides to the project config
    ///
    /// TALLY_VERBOSE, TALLY_STRICT, TALLY_THROW and TALLY_COLOR take a boolean
    /// (`true|1|yes` / `false|0|no`). A non-empty NO_COLOR disables color.
    fn apply_env_overrides(&self, mut config: ProjectConfig) -> ConfigResult<ProjectConfig> {
        if self.ignore_env {
            return Ok(config);
        }

        if let Some(verbose) = env_bool("TALLY_VERBOSE")? {
            config.run_mut().verbose = Some(verbose);
        }

        if let Some(strict) = env_bool("TALLY_STRICT")? {
            config.run_mut().strict = Some(strict);
        }

        if let Some(throw) = env_bool("TALLY_THROW")? {
            config.run_mut().throw = Some(throw);
        }

        if let Some(color) = env_bool("TALLY_COLOR")? {
            config.run_mut().color = Some(color);
        }

        if env::var("NO_COLOR").map(|v| !v.is_empty()).unwrap_or(false) {
            config.run_mut().color = Some(false);
        }

        Ok(config)
    }
}

fn env_bool(name: &str) -> ConfigResult<Option<bool>> {
    match env::var(name) {
        Ok(value) => parse_bool(&value)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: name.to_string(),
                reason: format!("expected a boolean, got '{}'", value),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Apply command-line flags (highest precedence)
    ///
    /// Recognized: `--verbose`/`-v`, `--quiet`/`-q`, `--throw`, `--no-strict`, `--no-color`.
    pub fn apply_flags<S: AsRef<str>>(&mut self, args: &[S]) {
        let run = self.project.run_mut();

        if enabled(args, "verbose", Some('v')) {
            run.verbose = Some(true);
        }
        if enabled(args, "quiet", Some('q')) {
            run.verbose = Some(false);
        }
        if enabled(args, "throw", None) {
            run.throw = Some(true);
        }
        if enabled(args, "no-strict", None) {
            run.strict = Some(false);
        }
        if enabled(args, "no-color", None) {
            run.color = Some(false);
        }
    }

    /// Print passing assertions (default: false)
    pub fn verbose(&self) -> bool {
        self.run_flag(|run| run.verbose).unwrap_or(false)
    }

    /// Strict error handling (default: true)
    pub fn strict(&self) -> bool {
        self.run_flag(|run| run.strict).unwrap_or(true)
    }

    /// Re-raise unexpected errors and abort the run (default: false)
    pub fn throw(&self) -> bool {
        self.run_flag(|run| run.throw).unwrap_or(false)
    }

    /// Colored console output (default: true)
    pub fn color(&self) -> bool {
        self.run_flag(|run| run.color).unwrap_or(true)
    }

    /// Severity names promoted by strict mode (default: all)
    pub fn severity(&self) -> Vec<String> {
        self.project
            .run
            .as_ref()
            .and_then(|run| run.severity.clone())
            .unwrap_or_else(|| vec!["all".to_string()])
    }

    /// Coverage report destination, if any
    pub fn coverage_output(&self) -> Option<&Path> {
        self.project
            .coverage
            .as_ref()
            .and_then(|coverage| coverage.output.as_deref())
    }

    /// Coverage source directories
    pub fn coverage_sources(&self) -> &[PathBuf] {
        self.project
            .coverage
            .as_ref()
            .map(|coverage| coverage.sources.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a `[coverage]` table was configured
    pub fn coverage_enabled(&self) -> bool {
        self.project.coverage.is_some()
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    fn run_flag(&self, pick: impl Fn(&crate::RunSection) -> Option<bool>) -> Option<bool> {
        self.project.run.as_ref().and_then(pick)
    }
}

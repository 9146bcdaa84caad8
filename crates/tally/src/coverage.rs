//! Code coverage hooks
//!
//! Coverage instrumentation is an injected capability: anything that can
//! start, stop, summarize and write a report implements [`CoverageDriver`].
//! Without a driver the run continues and a notice is printed instead.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tally_config::Config;
use tracing::{debug, warn};

/// Notice printed when coverage was requested but no driver is available
pub const NO_COVERAGE_NOTICE: &str = "# Notice: no code coverage run-time available";

/// Narrow contract of a coverage instrumentation backend
pub trait CoverageDriver {
    fn start(&mut self);

    fn stop(&mut self);

    /// Human-readable summary printed after the run
    fn summary(&self) -> String;

    /// Write a machine-readable report (clover, lcov, ...) to `destination`
    fn write_report(&self, destination: &Path) -> io::Result<()>;
}

/// Coverage collection around a whole run
pub struct Coverage {
    driver: Option<Box<dyn CoverageDriver>>,
    output_path: Option<PathBuf>,
    out: Box<dyn Write>,
}

impl Coverage {
    /// Enable coverage with the given driver, if one is available, writing
    /// a report to `output_path` when set
    pub fn enable(driver: Option<Box<dyn CoverageDriver>>, output_path: Option<PathBuf>) -> Self {
        Coverage {
            driver,
            output_path,
            out: Box::new(io::stdout()),
        }
    }

    /// Enable coverage with the report destination from `[coverage]`,
    /// resolved against the project root
    pub fn from_config(driver: Option<Box<dyn CoverageDriver>>, config: &Config) -> Self {
        let output_path = config.coverage_output().map(|path| match config.project_root() {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        });

        Self::enable(driver, output_path)
    }

    /// Print notices and summaries to `out` instead of stdout
    pub fn with_output(mut self, out: impl Write + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn is_available(&self) -> bool {
        self.driver.is_some()
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn on_run_start(&mut self) {
        match self.driver.as_mut() {
            Some(driver) => {
                debug!("starting code coverage");
                driver.start();
            }
            None => {
                warn!("code coverage requested, but no driver is available");
                self.print(&format!("{}\n", NO_COVERAGE_NOTICE));
            }
        }
    }

    /// Stop collecting, print the summary and write the report, if any
    pub fn on_run_stop(&mut self) {
        let summary = match self.driver.as_mut() {
            Some(driver) => {
                driver.stop();
                driver.summary()
            }
            None => return,
        };

        self.print(&summary);

        if let Some(destination) = self.output_path.clone() {
            self.emit_report(&destination);
        }
    }

    /// Write the report to `destination`; returns whether it was written
    pub fn emit_report(&mut self, destination: &Path) -> bool {
        let written = match self.driver.as_ref() {
            Some(driver) => driver.write_report(destination),
            None => return false,
        };

        match written {
            Ok(()) => {
                self.print(&format!(
                    "\n* code coverage report created: {}\n",
                    destination.display()
                ));
                true
            }
            Err(e) => {
                warn!(destination = %destination.display(), error = %e, "failed to write code coverage report");
                self.print(&format!(
                    "# Notice: unable to write code coverage report to {}: {}\n",
                    destination.display(),
                    e
                ));
                false
            }
        }
    }

    fn print(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to print code coverage output");
        }
    }
}

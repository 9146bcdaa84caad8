//! Console reporter

use super::{TestCase, TestListener};
use crate::assertion::AssertionResult;
use crate::diff::render_diff;
use crate::error::ListenerError;
use crate::fault::Fault;
use crate::format::{format, format_fault, indent, is_multiline};
use crate::value::Value;
use colored::*;
use std::io::{self, Stdout, Write};
use std::path::Path;
use tally_config::Config;
use tracing::debug;

/// Human-readable progress and failure report.
///
/// Output for a test case is preceded by a `=== name ===` header the first
/// time that case produces a line. Passing assertions are shown only in
/// verbose mode; failures, errors, skips and disabled tests always are.
///
/// Write failures never interrupt the event stream: the first one is kept
/// and returned by the next `end_test_case` or `end_test_suite`.
pub struct TestReporter<W: Write = Stdout> {
    out: W,
    /// Show passing assertions
    verbose: bool,
    /// Colored output
    color: bool,
    /// Name of the most recently begun test case
    case_name: Option<String>,
    /// Whether that case already printed its header
    titled: bool,
    assertions: usize,
    failures: usize,
    tests: usize,
    io_error: Option<io::Error>,
}

impl Default for TestReporter<Stdout> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl TestReporter<Stdout> {
    /// Create a colored reporter writing to stdout
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(io::stdout(), verbose).with_color(true)
    }

    /// Create a stdout reporter from resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(false).with_config(config)
    }
}

impl<W: Write> TestReporter<W> {
    /// Create a reporter writing to `out`; color is off until enabled
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: false,
            case_name: None,
            titled: false,
            assertions: 0,
            failures: 0,
            tests: 0,
            io_error: None,
        }
    }

    /// Enable or disable colored output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Take verbosity and color from resolved configuration
    pub fn with_config(mut self, config: &Config) -> Self {
        self.verbose = config.verbose();
        self.color = config.color();
        self
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Failed assertions plus errors in the current suite
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub fn assertions(&self) -> usize {
        self.assertions
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn emit(&mut self, text: &str) {
        if self.io_error.is_some() {
            return;
        }
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            self.io_error = Some(e);
        }
    }

    /// Print a line of case output, preceded by the case header if needed
    fn print(&mut self, line: &str) {
        if !self.titled {
            self.titled = true;
            let title = format!("\n=== {} ===\n\n", self.case_name.as_deref().unwrap_or(""));
            self.emit(&title);
        }

        self.emit(line);
        self.emit("\n");
    }

    fn take_io_error(&mut self) -> Result<(), ListenerError> {
        match self.io_error.take() {
            Some(e) => Err(ListenerError::Io(e)),
            None => Ok(()),
        }
    }

    fn result_line(&self, result: &AssertionResult) -> String {
        let status = if result.passed() {
            self.paint("PASS", Color::Green)
        } else {
            self.paint("FAIL", Color::Red)
        };

        let location = match (result.file(), result.line()) {
            (Some(file), Some(line)) => {
                let name = Path::new(file)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.to_string());
                format!(" {}({}):", name, line)
            }
            _ => String::new(),
        };

        let message = result.message().unwrap_or(result.kind());

        format!("{}{} {}{}", status, location, message, self.values(result))
    }

    /// The actual/expected suffix of a result line
    fn values(&self, result: &AssertionResult) -> String {
        let detailed = !result.passed();

        let actual = match result.actual() {
            Some(actual) => actual,
            None => return String::new(),
        };
        let shown_actual = format(actual, detailed);

        match result.expected() {
            Some(expected) if expected != actual => {
                let shown_expected = format(expected, detailed);

                if is_multiline(&shown_actual) || is_multiline(&shown_expected) {
                    format!("\n{}", render_diff(&shown_actual, &shown_expected, self.color))
                } else {
                    format!(" ({} !== {})", shown_actual, shown_expected)
                }
            }
            _ if is_multiline(&shown_actual) => format!("\n{}", indent(&shown_actual)),
            _ => format!(" ({})", shown_actual),
        }
    }
}

impl<W: Write> TestListener for TestReporter<W> {
    fn begin_test_suite(
        &mut self,
        name: &str,
        _properties: &[(String, Value)],
    ) -> Result<(), ListenerError> {
        debug!(suite = name, "reporting test suite");

        self.assertions = 0;
        self.failures = 0;
        self.tests = 0;

        Ok(())
    }

    fn end_test_suite(&mut self) -> Result<(), ListenerError> {
        let summary = format!(
            "\n* {} tests completed: {} assertions, {} failures\n",
            self.tests, self.assertions, self.failures
        );
        let summary = if self.failures > 0 {
            self.paint(&summary, Color::Red)
        } else {
            summary
        };

        self.emit(&summary);
        if self.io_error.is_none() {
            if let Err(e) = self.out.flush() {
                self.io_error = Some(e);
            }
        }

        self.take_io_error()
    }

    fn begin_test_case<'a>(
        &'a mut self,
        name: &str,
        _class_name: Option<&str>,
    ) -> Result<Box<dyn TestCase + 'a>, ListenerError> {
        self.case_name = Some(name.to_string());
        self.titled = false;
        self.tests += 1;

        Ok(Box::new(self))
    }

    fn end_test_case(&mut self) -> Result<(), ListenerError> {
        self.take_io_error()
    }
}

impl<W: Write> TestCase for TestReporter<W> {
    fn add_result(&mut self, result: &AssertionResult) {
        self.assertions += 1;

        if !result.passed() {
            self.failures += 1;
        } else if !self.verbose {
            return;
        }

        let line = self.result_line(result);
        self.print(&line);
    }

    fn add_error(&mut self, error: &Fault) {
        self.failures += 1;

        let line = format!(
            "{}\n{}",
            self.paint("ERROR", Color::Red),
            indent(&format_fault(error, true))
        );
        self.print(&line);
    }

    fn set_skipped(&mut self, reason: &str) {
        let line = format!("{}: {}", self.paint("SKIPPED", Color::Yellow), reason);
        self.print(&line);
    }

    fn set_disabled(&mut self, reason: &str) {
        let line = format!("{}: {}", self.paint("DISABLED", Color::Yellow), reason);
        self.print(&line);
    }
}

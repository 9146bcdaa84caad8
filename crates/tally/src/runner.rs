//! Test runner
//!
//! Runs every test of a suite in order, notifying the listeners:
//!
//! 1. coverage start (when enabled)
//! 2. `begin_test_suite`
//! 3. per test: `begin_test_case`, setup, body, teardown, `end_test_case`
//! 4. `end_test_suite`
//! 5. coverage stop, summary and report
//!
//! A test that raises (returns `Err` or panics) is recorded as an error on
//! its own case; the following tests still run.

use crate::coverage::Coverage;
use crate::error::{FaultSummary, RunError};
use crate::fault::Fault;
use crate::listener::{CompositeTestListener, TestCase, TestListener};
use crate::result::TestResult;
use crate::strict::{self, PanicGuard, Severity};
use crate::suite::{Test, TestSuite};
use crate::tester::Tester;
use tally_config::Config;
use tracing::{debug, warn};

/// Test runner with configuration
pub struct TestRunner {
    /// Capture panics quietly and promote notices to faults
    strict: bool,
    /// Abort the run on the first unexpected error
    throw: bool,
    /// Notices promoted when strict
    severity: Severity,
    coverage: Option<Coverage>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Create a strict runner that does not throw
    pub fn new() -> Self {
        Self {
            strict: true,
            throw: false,
            severity: Severity::all(),
            coverage: None,
        }
    }

    /// Create a runner from resolved configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .with_strict(config.strict())
            .with_throw(config.throw())
            .with_severity(Severity::from_names(&config.severity()))
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Re-raise the first unexpected error, ending the run
    pub fn with_throw(mut self, throw: bool) -> Self {
        self.throw = throw;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_coverage(mut self, coverage: Coverage) -> Self {
        self.coverage = Some(coverage);
        self
    }

    /// Run a suite, reporting to every listener.
    ///
    /// Returns `Ok(true)` when no assertion failed and no test raised.
    pub fn run<'l>(
        &mut self,
        suite: &TestSuite,
        listeners: impl IntoIterator<Item = &'l mut dyn TestListener>,
    ) -> Result<bool, RunError> {
        let mut listener = CompositeTestListener::new(listeners.into_iter().collect());

        if let Some(coverage) = self.coverage.as_mut() {
            coverage.on_run_start();
        }

        let outcome = self.run_suite(suite, &mut listener);

        // coverage stops even when a listener failed or the run was aborted
        if let Some(coverage) = self.coverage.as_mut() {
            coverage.on_run_stop();
        }

        outcome
    }

    fn run_suite(
        &self,
        suite: &TestSuite,
        listener: &mut CompositeTestListener<'_>,
    ) -> Result<bool, RunError> {
        let _guard = self.strict.then(PanicGuard::install);

        debug!(suite = suite.name(), tests = suite.len(), strict = self.strict, "running test suite");
        listener.begin_test_suite(suite.name(), suite.properties())?;

        let mut passed = true;

        for test in suite.tests() {
            let outcome = self.run_test(suite, test, listener)?;

            match outcome {
                CaseOutcome::Passed => {}
                CaseOutcome::Failed => passed = false,
                CaseOutcome::Raised(fault) => {
                    passed = false;

                    if self.throw {
                        return Err(RunError::Unexpected {
                            test: test.name().to_string(),
                            fault: FaultSummary::from(&fault),
                        });
                    }
                }
            }
        }

        listener.end_test_suite()?;

        debug!(suite = suite.name(), passed, "finished test suite");

        Ok(passed)
    }

    fn run_test(
        &self,
        suite: &TestSuite,
        test: &Test,
        listener: &mut CompositeTestListener<'_>,
    ) -> Result<CaseOutcome, RunError> {
        debug!(test = test.name(), location = %test.location(), "running test");
        let mut case = listener.begin_test_case(test.name(), None)?;

        if let Some(reason) = test.disabled_reason() {
            debug!(test = test.name(), reason, "test disabled");
            case.set_disabled(reason);
            drop(case);
            listener.end_test_case()?;
            return Ok(CaseOutcome::Passed);
        }

        let mut result = TestResult::new(case.as_mut());
        let errors = self.execute(suite, test, &mut result);

        for error in &errors {
            warn!(test = test.name(), error = %error, "test raised an error");
            result.add_error(error);
        }

        let failed = result.has_errors();
        drop(case);
        listener.end_test_case()?;

        Ok(match errors.into_iter().next() {
            Some(fault) => CaseOutcome::Raised(fault),
            None if failed => CaseOutcome::Failed,
            None => CaseOutcome::Passed,
        })
    }

    /// Setup, body and teardown; returns the errors raised, in order.
    ///
    /// A failed setup skips the body. Teardown runs whenever setup succeeded.
    fn execute(&self, suite: &TestSuite, test: &Test, result: &mut TestResult<'_>) -> Vec<Fault> {
        let mut errors = Vec::new();

        if let Some(setup) = suite.setup_hook() {
            if let Err(fault) = strict::catch(|| setup()).and_then(|outcome| outcome) {
                errors.push(fault);
                return errors;
            }
        }

        let mask = self.strict.then_some(self.severity);
        let mut tester = Tester::new(test.name(), result).with_strict(mask);

        if let Err(fault) = strict::catch(|| test.call(&mut tester)).and_then(|outcome| outcome) {
            errors.push(fault);
        }

        if let Some(teardown) = suite.teardown_hook() {
            if let Err(fault) = strict::catch(|| teardown()).and_then(|outcome| outcome) {
                errors.push(fault);
            }
        }

        errors
    }
}

enum CaseOutcome {
    Passed,
    /// At least one failed assertion
    Failed,
    /// The first error the test raised
    Raised(Fault),
}

/// Process exit status for a run result: 0 on success, 1 on failure
pub fn exit_code(passed: bool) -> i32 {
    if passed {
        0
    } else {
        1
    }
}

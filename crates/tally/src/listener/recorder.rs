//! In-memory recording of test runs

use super::{TestCase, TestListener};
use crate::assertion::AssertionResult;
use crate::error::ListenerError;
use crate::fault::Fault;
use crate::value::Value;
use tracing::debug;

/// Listener that keeps a complete record of every suite it observes.
///
/// At most one suite and one case are open at a time; the begin/end calls
/// must alternate properly.
#[derive(Debug, Default)]
pub struct TestRecorder {
    suite: Option<RecordedTestSuite>,
    case: Option<RecordedTestCase>,
    suites: Vec<RecordedTestSuite>,
}

impl TestRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed suites, in the order they ended
    pub fn suites(&self) -> &[RecordedTestSuite] {
        &self.suites
    }

    pub fn into_suites(self) -> Vec<RecordedTestSuite> {
        self.suites
    }
}

impl TestListener for TestRecorder {
    fn begin_test_suite(
        &mut self,
        name: &str,
        properties: &[(String, Value)],
    ) -> Result<(), ListenerError> {
        if let Some(active) = &self.suite {
            return Err(ListenerError::SuiteAlreadyActive(active.name.clone()));
        }

        self.suite = Some(RecordedTestSuite {
            name: name.to_string(),
            properties: properties.to_vec(),
            cases: Vec::new(),
        });

        Ok(())
    }

    fn end_test_suite(&mut self) -> Result<(), ListenerError> {
        let suite = self.suite.take().ok_or(ListenerError::NoActiveSuite)?;

        debug!(suite = %suite.name, cases = suite.cases.len(), "recorded test suite");
        self.suites.push(suite);

        Ok(())
    }

    fn begin_test_case<'a>(
        &'a mut self,
        name: &str,
        class_name: Option<&str>,
    ) -> Result<Box<dyn TestCase + 'a>, ListenerError> {
        if self.suite.is_none() {
            return Err(ListenerError::NoActiveSuite);
        }
        if let Some(active) = &self.case {
            return Err(ListenerError::CaseAlreadyActive(active.name.clone()));
        }

        let case = self.case.insert(RecordedTestCase::new(name, class_name));
        Ok(Box::new(case))
    }

    fn end_test_case(&mut self) -> Result<(), ListenerError> {
        let case = self.case.take().ok_or(ListenerError::NoActiveCase)?;
        let suite = self.suite.as_mut().ok_or(ListenerError::NoActiveSuite)?;
        suite.cases.push(case);

        Ok(())
    }
}

/// A recorded suite
#[derive(Debug, Clone)]
pub struct RecordedTestSuite {
    name: String,
    properties: Vec<(String, Value)>,
    cases: Vec<RecordedTestCase>,
}

impl RecordedTestSuite {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[(String, Value)] {
        &self.properties
    }

    pub fn cases(&self) -> &[RecordedTestCase] {
        &self.cases
    }

    /// Look up a case by name
    pub fn case(&self, name: &str) -> Option<&RecordedTestCase> {
        self.cases.iter().find(|case| case.name == name)
    }

    pub fn assertion_count(&self) -> usize {
        self.cases.iter().map(|case| case.results.len()).sum()
    }

    /// Failed assertions plus errors, over all cases
    pub fn failure_count(&self) -> usize {
        self.cases.iter().map(RecordedTestCase::failure_count).sum()
    }
}

/// A recorded test case
#[derive(Debug, Clone)]
pub struct RecordedTestCase {
    name: String,
    class_name: Option<String>,
    results: Vec<AssertionResult>,
    errors: Vec<Fault>,
    skip_reason: Option<String>,
    disable_reason: Option<String>,
}

impl RecordedTestCase {
    fn new(name: &str, class_name: Option<&str>) -> Self {
        RecordedTestCase {
            name: name.to_string(),
            class_name: class_name.map(str::to_string),
            results: Vec::new(),
            errors: Vec::new(),
            skip_reason: None,
            disable_reason: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn results(&self) -> &[AssertionResult] {
        &self.results
    }

    pub fn errors(&self) -> &[Fault] {
        &self.errors
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    pub fn disable_reason(&self) -> Option<&str> {
        self.disable_reason.as_deref()
    }

    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|result| !result.passed()).count() + self.errors.len()
    }

    /// No failed assertion and no error
    pub fn passed(&self) -> bool {
        self.failure_count() == 0
    }
}

impl TestCase for RecordedTestCase {
    fn add_result(&mut self, result: &AssertionResult) {
        self.results.push(result.clone());
    }

    fn add_error(&mut self, error: &Fault) {
        self.errors.push(error.clone());
    }

    fn set_skipped(&mut self, reason: &str) {
        self.skip_reason = Some(reason.to_string());
    }

    fn set_disabled(&mut self, reason: &str) {
        self.disable_reason = Some(reason.to_string());
    }
}

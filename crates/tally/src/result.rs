//! Per-case result tracking

use crate::assertion::AssertionResult;
use crate::fault::Fault;
use crate::listener::TestCase;

/// Forwards a case's events to the listener's case handle and remembers
/// whether anything failed
pub struct TestResult<'c> {
    case: &'c mut dyn TestCase,
    has_errors: bool,
}

impl<'c> TestResult<'c> {
    pub fn new(case: &'c mut dyn TestCase) -> Self {
        TestResult {
            case,
            has_errors: false,
        }
    }

    /// True once a failed assertion or an error has been recorded
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }
}

impl TestCase for TestResult<'_> {
    fn add_result(&mut self, result: &AssertionResult) {
        if !result.passed() {
            self.has_errors = true;
        }

        self.case.add_result(result);
    }

    fn add_error(&mut self, error: &Fault) {
        self.has_errors = true;
        self.case.add_error(error);
    }

    fn set_skipped(&mut self, reason: &str) {
        self.case.set_skipped(reason);
    }

    fn set_disabled(&mut self, reason: &str) {
        self.case.set_disabled(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{TestListener, TestRecorder};

    #[test]
    fn test_tracks_failures_and_forwards() {
        let mut recorder = TestRecorder::new();
        recorder.begin_test_suite("unit", &[]).unwrap();
        {
            let mut case = recorder.begin_test_case("case", None).unwrap();
            let mut result = TestResult::new(case.as_mut());

            result.add_result(&AssertionResult::new(true, "ok"));
            assert!(!result.has_errors());

            result.add_result(&AssertionResult::new(false, "ok"));
            assert!(result.has_errors());
        }
        recorder.end_test_case().unwrap();
        recorder.end_test_suite().unwrap();

        assert_eq!(recorder.suites()[0].cases()[0].results().len(), 2);
    }

    #[test]
    fn test_skip_is_not_a_failure() {
        let mut recorder = TestRecorder::new();
        recorder.begin_test_suite("unit", &[]).unwrap();

        let mut case = recorder.begin_test_case("case", None).unwrap();
        let mut result = TestResult::new(case.as_mut());
        result.set_skipped("later");

        assert!(!result.has_errors());
    }
}

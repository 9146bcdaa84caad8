//! Fan-out listener

use super::{TestCase, TestListener};
use crate::assertion::AssertionResult;
use crate::error::ListenerError;
use crate::fault::Fault;
use crate::value::Value;

/// Forwards every event to each child listener, in registration order.
///
/// A child that fails stops the notification and the error propagates.
#[derive(Default)]
pub struct CompositeTestListener<'l> {
    listeners: Vec<&'l mut dyn TestListener>,
}

impl<'l> CompositeTestListener<'l> {
    pub fn new(listeners: Vec<&'l mut dyn TestListener>) -> Self {
        Self { listeners }
    }

    /// Register another listener
    pub fn with(mut self, listener: &'l mut dyn TestListener) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl TestListener for CompositeTestListener<'_> {
    fn begin_test_suite(
        &mut self,
        name: &str,
        properties: &[(String, Value)],
    ) -> Result<(), ListenerError> {
        for listener in self.listeners.iter_mut() {
            listener.begin_test_suite(name, properties)?;
        }
        Ok(())
    }

    fn end_test_suite(&mut self) -> Result<(), ListenerError> {
        for listener in self.listeners.iter_mut() {
            listener.end_test_suite()?;
        }
        Ok(())
    }

    fn begin_test_case<'a>(
        &'a mut self,
        name: &str,
        class_name: Option<&str>,
    ) -> Result<Box<dyn TestCase + 'a>, ListenerError> {
        let mut cases = Vec::with_capacity(self.listeners.len());
        for listener in self.listeners.iter_mut() {
            cases.push(listener.begin_test_case(name, class_name)?);
        }
        Ok(Box::new(CompositeTestCase { cases }))
    }

    fn end_test_case(&mut self) -> Result<(), ListenerError> {
        for listener in self.listeners.iter_mut() {
            listener.end_test_case()?;
        }
        Ok(())
    }
}

struct CompositeTestCase<'a> {
    cases: Vec<Box<dyn TestCase + 'a>>,
}

impl TestCase for CompositeTestCase<'_> {
    fn add_result(&mut self, result: &AssertionResult) {
        for case in self.cases.iter_mut() {
            case.add_result(result);
        }
    }

    fn add_error(&mut self, error: &Fault) {
        for case in self.cases.iter_mut() {
            case.add_error(error);
        }
    }

    fn set_skipped(&mut self, reason: &str) {
        for case in self.cases.iter_mut() {
            case.set_skipped(reason);
        }
    }

    fn set_disabled(&mut self, reason: &str) {
        for case in self.cases.iter_mut() {
            case.set_disabled(reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::TestRecorder;

    #[test]
    fn test_fans_out_to_every_listener() {
        let mut first = TestRecorder::new();
        let mut second = TestRecorder::new();

        {
            let mut composite = CompositeTestListener::default()
                .with(&mut first)
                .with(&mut second);

            composite.begin_test_suite("suite", &[]).unwrap();
            {
                let mut case = composite.begin_test_case("case", None).unwrap();
                case.add_result(&AssertionResult::new(true, "ok"));
                case.set_skipped("later");
            }
            composite.end_test_case().unwrap();
            composite.end_test_suite().unwrap();
        }

        for recorder in [&first, &second] {
            let case = &recorder.suites()[0].cases()[0];
            assert_eq!(case.results().len(), 1);
            assert_eq!(case.skip_reason(), Some("later"));
        }
    }

    #[test]
    fn test_child_failure_propagates() {
        let mut recorder = TestRecorder::new();
        let mut composite = CompositeTestListener::new(vec![&mut recorder as &mut dyn TestListener]);

        composite.begin_test_suite("suite", &[]).unwrap();
        let err = composite.begin_test_suite("again", &[]).unwrap_err();

        assert!(matches!(err, ListenerError::SuiteAlreadyActive(name) if name == "suite"));
    }
}

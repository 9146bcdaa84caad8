//! Test listeners: observers of suite, case and assertion events
//!
//! A run notifies its listener in this order:
//!
//! ```text
//! begin_test_suite
//!   begin_test_case -> case handle
//!     add_result / add_error / set_skipped / set_disabled (on the handle)
//!   end_test_case
//!   ...
//! end_test_suite
//! ```
//!
//! The case handle borrows the listener, so it must be dropped before
//! `end_test_case` is called.

pub mod composite;
pub mod recorder;
pub mod reporter;

pub use composite::CompositeTestListener;
pub use recorder::{RecordedTestCase, RecordedTestSuite, TestRecorder};
pub use reporter::TestReporter;

use crate::assertion::AssertionResult;
use crate::error::ListenerError;
use crate::fault::Fault;
use crate::value::Value;

/// Receiver of the events of one running test case
pub trait TestCase {
    fn add_result(&mut self, result: &AssertionResult);

    fn add_error(&mut self, error: &Fault);

    fn set_skipped(&mut self, reason: &str);

    fn set_disabled(&mut self, reason: &str);
}

impl<T: TestCase + ?Sized> TestCase for &mut T {
    fn add_result(&mut self, result: &AssertionResult) {
        (**self).add_result(result)
    }

    fn add_error(&mut self, error: &Fault) {
        (**self).add_error(error)
    }

    fn set_skipped(&mut self, reason: &str) {
        (**self).set_skipped(reason)
    }

    fn set_disabled(&mut self, reason: &str) {
        (**self).set_disabled(reason)
    }
}

impl<T: TestCase + ?Sized> TestCase for Box<T> {
    fn add_result(&mut self, result: &AssertionResult) {
        (**self).add_result(result)
    }

    fn add_error(&mut self, error: &Fault) {
        (**self).add_error(error)
    }

    fn set_skipped(&mut self, reason: &str) {
        (**self).set_skipped(reason)
    }

    fn set_disabled(&mut self, reason: &str) {
        (**self).set_disabled(reason)
    }
}

/// Observer of a test run
pub trait TestListener {
    fn begin_test_suite(
        &mut self,
        name: &str,
        properties: &[(String, Value)],
    ) -> Result<(), ListenerError>;

    fn end_test_suite(&mut self) -> Result<(), ListenerError>;

    /// Open a test case and return the handle its events are sent to
    fn begin_test_case<'a>(
        &'a mut self,
        name: &str,
        class_name: Option<&str>,
    ) -> Result<Box<dyn TestCase + 'a>, ListenerError>;

    fn end_test_case(&mut self) -> Result<(), ListenerError>;
}

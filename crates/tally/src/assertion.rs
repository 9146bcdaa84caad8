//! Assertion results

use crate::value::Value;
use std::panic::Location;

/// Outcome of one assertion.
///
/// `actual` and `expected` are optional in the "was it supplied" sense:
/// `None` means the caller did not pass a value, while `Some(Value::Null)`
/// is an explicit null that is shown as `null`.
#[derive(Debug, Clone)]
pub struct AssertionResult {
    passed: bool,
    kind: String,
    context: Vec<(String, Value)>,
    message: Option<String>,
    actual: Option<Value>,
    expected: Option<Value>,
    file: Option<String>,
    line: Option<u32>,
}

impl AssertionResult {
    /// `kind` is the assertion name (`ok`, `eq`, `expect`, ...)
    pub fn new(passed: bool, kind: impl Into<String>) -> Self {
        AssertionResult {
            passed,
            kind: kind.into(),
            context: Vec::new(),
            message: None,
            actual: None,
            expected: None,
            file: None,
            line: None,
        }
    }

    pub fn with_message(mut self, message: Option<String>) -> Self {
        self.message = message;
        self
    }

    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    pub fn with_context(mut self, context: Vec<(String, Value)>) -> Self {
        self.context.extend(context);
        self
    }

    pub fn located(mut self, location: &Location<'_>) -> Self {
        self.file = Some(location.file().to_string());
        self.line = Some(location.line());
        self
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Free-form key/value context supplied by custom assertions
    pub fn context(&self) -> &[(String, Value)] {
        &self.context
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn actual(&self) -> Option<&Value> {
        self.actual.as_ref()
    }

    pub fn has_actual(&self) -> bool {
        self.actual.is_some()
    }

    pub fn expected(&self) -> Option<&Value> {
        self.expected.as_ref()
    }

    pub fn has_expected(&self) -> bool {
        self.expected.is_some()
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

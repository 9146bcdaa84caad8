//! Assertions
//!
//! A [`Tester`] is handed to every test body. Each assertion builds an
//! [`AssertionResult`] located at the assertion's call site and forwards it
//! to the running case. Assertions never unwind: a failed assertion is
//! recorded and the test keeps going.

use crate::assertion::AssertionResult;
use crate::fault::{Fault, ERROR_EXCEPTION_KIND};
use crate::listener::TestCase;
use crate::strict::{self, Severity};
use crate::value::Value;
use regex::{Regex, RegexBuilder};
use std::panic::Location;
use tracing::warn;

/// Outcome of probing a body for an expected fault
#[derive(Debug)]
pub enum ExpectOutcome {
    /// Right kind, and every pattern matched the message
    Matched(Fault),
    /// A fault of another kind was raised
    WrongKind(Fault),
    /// Right kind, but the message did not match `pattern`
    MessageMismatch { fault: Fault, pattern: String },
    /// `pattern` is not a valid regular expression
    InvalidPattern {
        fault: Fault,
        pattern: String,
        reason: String,
    },
    /// The body completed normally
    NotThrown,
}

impl ExpectOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ExpectOutcome::Matched(_))
    }

    /// The fault that was raised, if any
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            ExpectOutcome::Matched(fault)
            | ExpectOutcome::WrongKind(fault)
            | ExpectOutcome::MessageMismatch { fault, .. }
            | ExpectOutcome::InvalidPattern { fault, .. } => Some(fault),
            ExpectOutcome::NotThrown => None,
        }
    }
}

/// Run `body` and classify what it raised against `kind` and `patterns`.
///
/// Returned errors and panics are both treated as raised faults.
pub fn probe<T, B>(kind: &str, body: B, patterns: &[&str]) -> ExpectOutcome
where
    B: FnOnce() -> Result<T, Fault>,
{
    let fault = match strict::catch(body) {
        Ok(Ok(_)) => return ExpectOutcome::NotThrown,
        Ok(Err(fault)) | Err(fault) => fault,
    };

    if !fault.is(kind) {
        return ExpectOutcome::WrongKind(fault);
    }

    for pattern in patterns {
        match compile_pattern(pattern) {
            Ok(regex) if regex.is_match(fault.message()) => {}
            Ok(_) => {
                return ExpectOutcome::MessageMismatch {
                    fault,
                    pattern: pattern.to_string(),
                }
            }
            Err(e) => {
                return ExpectOutcome::InvalidPattern {
                    fault,
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    ExpectOutcome::Matched(fault)
}

/// Compile a message pattern.
///
/// Accepts `/regex/flags` (flags among `imsxU`; `u` is accepted and
/// ignored) or a bare regular expression. Patterns match anywhere in the
/// message unless anchored.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    if let Some((body, flags)) = split_delimited(pattern) {
        return RegexBuilder::new(body)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .swap_greed(flags.contains('U'))
            .build();
    }

    Regex::new(pattern)
}

fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let flags = &rest[end + 1..];

    flags
        .chars()
        .all(|flag| "imsxuU".contains(flag))
        .then(|| (&rest[..end], flags))
}

/// Assertion API passed to test bodies.
///
/// Every assertion records the location it was called from. Helpers that wrap
/// assertions must be `#[track_caller]` themselves, otherwise results point at
/// the helper's body instead of the test:
///
/// ```
/// use tally::Tester;
///
/// #[track_caller]
/// fn assert_even(t: &mut Tester<'_>, n: i64) {
///     t.ok(n % 2 == 0, "is even");
/// }
/// ```
pub struct Tester<'t> {
    name: String,
    case: &'t mut dyn TestCase,
    /// Severities promoted to faults, when strict
    strict: Option<Severity>,
}

impl<'t> Tester<'t> {
    pub fn new(name: impl Into<String>, case: &'t mut dyn TestCase) -> Self {
        Tester {
            name: name.into(),
            case,
            strict: None,
        }
    }

    /// Promote notices within `mask` to faults
    pub fn with_strict(mut self, mask: Option<Severity>) -> Self {
        self.strict = mask;
        self
    }

    /// Name of the running test
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check the result of a boolean expression
    #[track_caller]
    pub fn ok<'m>(&mut self, result: bool, message: impl Into<Option<&'m str>>) {
        self.add_result(result, "ok", Vec::new(), message.into().map(str::to_string), None, None);
    }

    /// Like [`ok`](Self::ok), also recording the value that was checked
    #[track_caller]
    pub fn ok_with<'m>(
        &mut self,
        result: bool,
        message: impl Into<Option<&'m str>>,
        value: impl Into<Value>,
    ) {
        self.add_result(
            result,
            "ok",
            Vec::new(),
            message.into().map(str::to_string),
            Some(value.into()),
            None,
        );
    }

    /// Check two values for strict equality
    #[track_caller]
    pub fn eq<'m>(
        &mut self,
        actual: impl Into<Value>,
        expected: impl Into<Value>,
        message: impl Into<Option<&'m str>>,
    ) {
        let actual = actual.into();
        let expected = expected.into();

        self.add_result(
            actual == expected,
            "eq",
            Vec::new(),
            message.into().map(str::to_string),
            Some(actual),
            Some(expected),
        );
    }

    /// Check that `body` raises a fault of the given kind
    #[track_caller]
    pub fn expect<T, B>(&mut self, kind: &str, message: &str, body: B)
    where
        B: FnOnce() -> Result<T, Fault>,
    {
        self.expect_matching(kind, message, body, &[]);
    }

    /// Check that `body` raises a fault of the given kind whose message
    /// matches every pattern
    #[track_caller]
    pub fn expect_matching<T, B>(&mut self, kind: &str, message: &str, body: B, patterns: &[&str])
    where
        B: FnOnce() -> Result<T, Fault>,
    {
        let (passed, message, fault) = match probe(kind, body, patterns) {
            ExpectOutcome::Matched(fault) => (true, message.to_string(), Some(fault)),
            ExpectOutcome::WrongKind(fault) => (
                false,
                format!("{} (expected {}, but {} was thrown)", message, kind, fault.kind()),
                Some(fault),
            ),
            ExpectOutcome::MessageMismatch { fault, pattern } => (
                false,
                format!("{} (message does not match pattern: {})", message, pattern),
                Some(fault),
            ),
            ExpectOutcome::InvalidPattern { fault, pattern, reason } => (
                false,
                format!("{} (invalid message pattern {}: {})", message, pattern, reason),
                Some(fault),
            ),
            ExpectOutcome::NotThrown => (
                false,
                format!("{} (expected {} exception was NOT thrown)", message, kind),
                None,
            ),
        };

        self.add_result(
            passed,
            "expect",
            Vec::new(),
            Some(message),
            fault.map(Value::from),
            None,
        );
    }

    /// Record an arbitrary assertion result; building block for custom
    /// assertions
    #[track_caller]
    pub fn add_result(
        &mut self,
        passed: bool,
        kind: &str,
        context: Vec<(String, Value)>,
        message: Option<String>,
        actual: Option<Value>,
        expected: Option<Value>,
    ) {
        let mut result = AssertionResult::new(passed, kind)
            .with_context(context)
            .with_message(message)
            .located(Location::caller());

        if let Some(actual) = actual {
            result = result.with_actual(actual);
        }
        if let Some(expected) = expected {
            result = result.with_expected(expected);
        }

        self.case.add_result(&result);
    }

    /// Mark the running test as skipped
    pub fn skip(&mut self, reason: &str) {
        self.case.set_skipped(reason);
    }

    /// Raise a non-fatal diagnostic.
    ///
    /// Under strict mode a severity inside the mask becomes an
    /// `ErrorException` fault, meant to be propagated with `?`. Otherwise the
    /// notice is only logged.
    #[track_caller]
    pub fn notice(&mut self, severity: Severity, message: impl Into<String>) -> Result<(), Fault> {
        let message = message.into();

        match self.strict {
            Some(mask) if mask.intersects(severity) => {
                Err(Fault::new(ERROR_EXCEPTION_KIND, message))
            }
            _ => {
                warn!(test = %self.name, ?severity, "{}", message);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::{RecordedTestCase, TestListener, TestRecorder};
    use crate::fault::PANIC_KIND;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Run assertions against a recorder and return the recorded case
    fn record(strict: Option<Severity>, body: impl FnOnce(&mut Tester<'_>)) -> RecordedTestCase {
        let mut recorder = TestRecorder::new();
        recorder.begin_test_suite("unit", &[]).unwrap();
        {
            let mut case = recorder.begin_test_case("case", None).unwrap();
            let mut tester = Tester::new("case", case.as_mut()).with_strict(strict);
            body(&mut tester);
        }
        recorder.end_test_case().unwrap();
        recorder.end_test_suite().unwrap();

        recorder.into_suites().remove(0).cases()[0].clone()
    }

    fn fails(kind: &str, message: &str) -> Result<(), Fault> {
        Err(Fault::new(kind, message))
    }

    #[test]
    fn test_ok_records_location() {
        let case = record(None, |t| t.ok(false, "nope"));
        let result = &case.results()[0];

        assert!(!result.passed());
        assert_eq!(result.kind(), "ok");
        assert_eq!(result.message(), Some("nope"));
        assert!(result.file().is_some_and(|file| file.ends_with("tester.rs")));
        assert!(!result.has_actual());
    }

    #[track_caller]
    fn assert_positive(t: &mut Tester<'_>, n: i64) {
        t.eq(n > 0, true, "positive");
    }

    #[test]
    fn test_tracked_helper_reports_caller_line() {
        let mut line = 0;
        let case = record(None, |t| {
            line = line!() + 1;
            assert_positive(t, -1);
        });
        let result = &case.results()[0];

        assert!(!result.passed());
        assert_eq!(result.line(), Some(line));
        assert!(result.file().is_some_and(|file| file.ends_with("tester.rs")));
    }

    #[test]
    fn test_ok_without_message() {
        let case = record(None, |t| t.ok(true, None));

        assert_eq!(case.results()[0].message(), None);
    }

    #[test]
    fn test_ok_with_value() {
        let case = record(None, |t| t.ok_with(true, "checked", Value::Null));

        assert_eq!(case.results()[0].actual(), Some(&Value::Null));
    }

    #[test]
    fn test_eq_is_strict() {
        let case = record(None, |t| {
            t.eq(123, 123, "same");
            t.eq(123, "123", "int vs string");
            t.eq(Value::array([1, 2]), Value::array([1, 2]), None);
        });

        let passed: Vec<bool> = case.results().iter().map(AssertionResult::passed).collect();
        assert_eq!(passed, vec![true, false, true]);
        assert_eq!(case.results()[1].expected(), Some(&Value::from("123")));
    }

    #[test]
    fn test_assertions_continue_after_failure() {
        let case = record(None, |t| {
            t.ok(false, "first");
            t.ok(true, "second");
        });

        assert_eq!(case.results().len(), 2);
    }

    #[test]
    fn test_expect_matched() {
        let case = record(None, |t| {
            t.expect("RuntimeException", "throws", || fails("RuntimeException", "boom"))
        });
        let result = &case.results()[0];

        assert!(result.passed());
        assert_eq!(result.message(), Some("throws"));
        assert!(result.actual().and_then(Value::as_fault).is_some_and(|f| f.message() == "boom"));
    }

    #[test]
    fn test_expect_wrong_kind() {
        let case = record(None, |t| {
            t.expect("LogicException", "throws", || fails("RuntimeException", "boom"))
        });
        let result = &case.results()[0];

        assert!(!result.passed());
        assert_eq!(
            result.message(),
            Some("throws (expected LogicException, but RuntimeException was thrown)")
        );
    }

    #[test]
    fn test_expect_not_thrown() {
        let case = record(None, |t| t.expect("RuntimeException", "throws", || Ok(())));
        let result = &case.results()[0];

        assert!(!result.passed());
        assert!(result.message().unwrap().contains("was NOT thrown"));
        assert!(!result.has_actual());
    }

    #[test]
    fn test_expect_catches_panics() {
        let case = record(None, |t| t.expect(PANIC_KIND, "panics", || -> Result<(), Fault> { panic!("overflow") }));

        assert!(case.results()[0].passed());
    }

    #[test]
    fn test_expect_std_error_kind() {
        let case = record(None, |t| {
            t.expect(crate::kind_of::<std::num::ParseIntError>(), "parse", || {
                Ok("x".parse::<i32>()?)
            })
        });

        assert!(case.results()[0].passed());
    }

    #[rstest]
    #[case("/^boo/", true)]
    #[case("/BOOM/i", true)]
    #[case("oo", true)]
    #[case("/^oo/", false)]
    #[case("/BOOM/", false)]
    fn test_message_patterns(#[case] pattern: &str, #[case] matches: bool) {
        let outcome = probe("E", || fails("E", "boom"), &[pattern]);

        assert_eq!(outcome.is_match(), matches);
    }

    #[test]
    fn test_all_patterns_must_match() {
        let outcome = probe("E", || fails("E", "boom"), &["boo", "zzz"]);

        match outcome {
            ExpectOutcome::MessageMismatch { pattern, .. } => assert_eq!(pattern, "zzz"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_pattern_fails() {
        let case = record(None, |t| t.expect_matching("E", "bad", || fails("E", "x"), &["/(/"]));

        assert!(!case.results()[0].passed());
        assert!(case.results()[0].message().unwrap().contains("invalid message pattern"));
    }

    #[test]
    fn test_plain_slash_pattern_is_literal() {
        assert!(compile_pattern("/usr/bin").unwrap().is_match("at /usr/bin/env"));
    }

    #[test]
    fn test_notice_promoted_when_strict() {
        let mut raised = None;
        record(Some(Severity::all()), |t| raised = t.notice(Severity::WARNING, "careful").err());

        let fault = raised.unwrap();
        assert_eq!(fault.kind(), ERROR_EXCEPTION_KIND);
        assert_eq!(fault.message(), "careful");
    }

    #[rstest]
    #[case::lenient(None)]
    #[case::outside_mask(Some(Severity::DEPRECATED))]
    fn test_notice_ignored(#[case] strict: Option<Severity>) {
        let mut raised = None;
        record(strict, |t| raised = Some(t.notice(Severity::WARNING, "careful")));

        assert!(raised.unwrap().is_ok());
    }

    #[test]
    fn test_custom_assertion_context() {
        let case = record(None, |t| {
            t.add_result(
                false,
                "between",
                vec![("low".to_string(), Value::from(1))],
                None,
                Some(Value::from(5)),
                None,
            )
        });
        let result = &case.results()[0];

        assert_eq!(result.kind(), "between");
        assert_eq!(result.context()[0].0, "low");
    }

    #[test]
    fn test_skip_marks_case() {
        let case = record(None, |t| t.skip("not today"));

        assert_eq!(case.skip_reason(), Some("not today"));
    }
}

//! Faults: the errors a test body (or an `expect` probe) can raise
//!
//! A [`Fault`] is the framework's exception value. It has a *kind* (the
//! unqualified type name of the Rust error it came from, `panic` for panics,
//! or any name chosen by [`Fault::new`]), a message, a trace of source frames
//! and an optional cause.
//!
//! Any `std::error::Error` converts into a `Fault`, so test bodies can use `?`.

use crate::value::{short_type_name, Value};
use std::any::Any;
use std::fmt;
use std::panic::Location;

/// Kind given to faults converted from panics
pub const PANIC_KIND: &str = "panic";

/// Kind given to notices promoted by strict mode
pub const ERROR_EXCEPTION_KIND: &str = "ErrorException";

/// The kind a Rust error type converts to
///
/// ```
/// assert_eq!(tally::kind_of::<std::num::ParseIntError>(), "ParseIntError");
/// ```
pub fn kind_of<E: ?Sized>() -> &'static str {
    short_type_name(std::any::type_name::<E>())
}

/// One entry of a fault's trace
#[derive(Debug, Clone)]
pub struct Frame {
    pub file: String,
    pub line: u32,
    /// Function (or closure description) active at this frame, if known
    pub call: Option<String>,
    pub args: Vec<Value>,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Frame {
            file: file.into(),
            line,
            call: None,
            args: Vec::new(),
        }
    }

    pub fn at(location: &Location<'_>) -> Self {
        Self::new(location.file(), location.line())
    }

    /// Attach the call active at this frame
    pub fn call(mut self, name: impl Into<String>, args: Vec<Value>) -> Self {
        self.call = Some(name.into());
        self.args = args;
        self
    }
}

/// An error raised during a test
#[derive(Debug, Clone)]
pub struct Fault {
    kind: String,
    message: String,
    trace: Vec<Frame>,
    cause: Option<Box<Fault>>,
}

impl Fault {
    /// Create a fault, recording the caller as the innermost frame
    #[track_caller]
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self::without_trace(kind, message).with_frame(Frame::at(Location::caller()))
    }

    /// Create a fault with an empty trace
    pub fn without_trace(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Fault {
            kind: kind.into(),
            message: message.into(),
            trace: Vec::new(),
            cause: None,
        }
    }

    /// Append an outer frame
    pub fn with_frame(mut self, frame: Frame) -> Self {
        self.trace.push(frame);
        self
    }

    /// Attach the fault that caused this one
    pub fn with_cause(mut self, cause: Fault) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Frames, innermost first
    pub fn trace(&self) -> &[Frame] {
        &self.trace
    }

    pub fn cause(&self) -> Option<&Fault> {
        self.cause.as_deref()
    }

    /// Check the fault kind
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Convert a panic payload, optionally located by the strict-mode hook
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>, location: Option<Frame>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };

        let fault = Fault::without_trace(PANIC_KIND, message);
        match location {
            Some(frame) => fault.with_frame(frame),
            None => fault,
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl<E: std::error::Error + 'static> From<E> for Fault {
    #[track_caller]
    fn from(error: E) -> Self {
        let mut fault = Fault::new(kind_of::<E>(), error.to_string());

        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(inner) = source {
            causes.push(inner.to_string());
            source = inner.source();
        }

        // innermost cause is the deepest link of the chain
        for message in causes.into_iter().rev() {
            let link = Fault::without_trace("Error", message);
            fault.cause = Some(Box::new(match fault.cause.take() {
                Some(deeper) => link.with_cause(*deeper),
                None => link,
            }));
        }

        fault
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_caller() {
        let fault = Fault::new("RuntimeException", "boom");

        assert_eq!(fault.kind(), "RuntimeException");
        assert_eq!(fault.message(), "boom");
        assert_eq!(fault.trace().len(), 1);
        assert!(fault.trace()[0].file.ends_with("fault.rs"));
        assert_eq!(fault.to_string(), "RuntimeException: boom");
    }

    #[test]
    fn test_from_std_error() {
        fn parse(input: &str) -> Result<i32, Fault> {
            Ok(input.parse::<i32>()?)
        }

        let fault = parse("x").unwrap_err();
        assert_eq!(fault.kind(), "ParseIntError");
        assert!(fault.is(kind_of::<std::num::ParseIntError>()));
        assert!(fault.message().contains("invalid digit"));
    }

    #[test]
    fn test_error_source_chain_becomes_causes() {
        #[derive(Debug)]
        struct Outer(std::io::Error);

        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "could not load fixture")
            }
        }

        impl std::error::Error for Outer {
            fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
                Some(&self.0)
            }
        }

        let fault = Fault::from(Outer(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire")));

        assert_eq!(fault.kind(), "Outer");
        assert_eq!(fault.cause().map(Fault::message), Some("disk on fire"));
    }

    #[test]
    fn test_from_panic_payloads() {
        let fault = Fault::from_panic(Box::new("static message"), None);
        assert_eq!(fault.kind(), PANIC_KIND);
        assert_eq!(fault.message(), "static message");

        let fault = Fault::from_panic(Box::new(String::from("owned")), Some(Frame::new("a.rs", 3)));
        assert_eq!(fault.message(), "owned");
        assert_eq!(fault.trace()[0].line, 3);

        let fault = Fault::from_panic(Box::new(42_u8), None);
        assert_eq!(fault.message(), "Box<dyn Any>");
    }
}

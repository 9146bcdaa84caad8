//! Tally - a minimal unit-testing micro-framework
//!
//! Register named test closures in a [`TestSuite`], run them with a
//! [`TestRunner`] and observe the run through [`TestListener`]s:
//!
//! ```
//! use tally::{TestListener, TestRecorder, TestRunner, TestSuite};
//!
//! let mut suite = TestSuite::new("unit").unwrap();
//! suite
//!     .add("addition", |t| {
//!         t.eq(1 + 1, 2, "adds");
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! let mut recorder = TestRecorder::new();
//! let passed = TestRunner::new()
//!     .run(&suite, [&mut recorder as &mut dyn TestListener])
//!     .unwrap();
//!
//! assert!(passed);
//! ```
//!
//! Failed assertions are recorded, never thrown. A test body that returns an
//! error or panics ends that test only and is reported as an error.

/// Tally version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod assertion;
pub mod coverage;
pub mod diff;
pub mod error;
pub mod fault;
pub mod format;
pub mod listener;
pub mod result;
pub mod runner;
pub mod strict;
pub mod suite;
pub mod tester;
pub mod value;

pub use assertion::AssertionResult;
pub use coverage::{Coverage, CoverageDriver};
pub use diff::{diff, render_diff, DiffNode};
pub use error::{FaultSummary, ListenerError, RunError, SuiteError};
pub use fault::{kind_of, Fault, Frame, ERROR_EXCEPTION_KIND, PANIC_KIND};
pub use format::{format, format_fault, indent};
pub use listener::{
    CompositeTestListener, RecordedTestCase, RecordedTestSuite, TestCase, TestListener,
    TestRecorder, TestReporter,
};
pub use result::TestResult;
pub use runner::{exit_code, TestRunner};
pub use strict::Severity;
pub use suite::{Test, TestSuite};
pub use tally_config::{enabled, Config, ConfigLoader};
pub use tester::{compile_pattern, probe, ExpectOutcome, Tester};
pub use value::{Inspect, ObjectRef, Value};

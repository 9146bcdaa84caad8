//! Test suites: named, ordered collections of test functions

use crate::error::SuiteError;
use crate::fault::Fault;
use crate::tester::Tester;
use crate::value::Value;
use std::panic::Location;

/// Body of a test case
pub type TestFn = Box<dyn Fn(&mut Tester<'_>) -> Result<(), Fault>>;

/// Setup/teardown hook
pub type HookFn = Box<dyn Fn() -> Result<(), Fault>>;

/// A named test function
pub struct Test {
    name: String,
    function: TestFn,
    location: &'static Location<'static>,
    disabled: Option<String>,
}

impl Test {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the test was registered
    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    /// Reason the test is disabled, if it is
    pub fn disabled_reason(&self) -> Option<&str> {
        self.disabled.as_deref()
    }

    pub(crate) fn call(&self, tester: &mut Tester<'_>) -> Result<(), Fault> {
        (self.function)(tester)
    }
}

/// A self-contained suite of test cases, often described as "unit",
/// "integration" or "functional"
pub struct TestSuite {
    name: String,
    properties: Vec<(String, Value)>,
    tests: Vec<Test>,
    setup: Option<HookFn>,
    teardown: Option<HookFn>,
}

impl TestSuite {
    /// Create an empty suite; the name must not be empty
    pub fn new(name: impl Into<String>) -> Result<Self, SuiteError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(SuiteError::EmptyName);
        }

        Ok(TestSuite {
            name,
            properties: Vec::new(),
            tests: Vec::new(),
            setup: None,
            teardown: None,
        })
    }

    /// Attach a suite property (environment, settings, ...)
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Add a test case; names must be unique within the suite
    #[track_caller]
    pub fn add<F>(&mut self, name: impl Into<String>, function: F) -> Result<&mut Self, SuiteError>
    where
        F: Fn(&mut Tester<'_>) -> Result<(), Fault> + 'static,
    {
        self.push(name.into(), Box::new(function), None, Location::caller())
    }

    /// Add a test case that is reported as disabled and never run
    #[track_caller]
    pub fn add_disabled<F>(
        &mut self,
        name: impl Into<String>,
        reason: impl Into<String>,
        function: F,
    ) -> Result<&mut Self, SuiteError>
    where
        F: Fn(&mut Tester<'_>) -> Result<(), Fault> + 'static,
    {
        self.push(
            name.into(),
            Box::new(function),
            Some(reason.into()),
            Location::caller(),
        )
    }

    /// Run `function` before every test case
    pub fn setup<F>(&mut self, function: F) -> &mut Self
    where
        F: Fn() -> Result<(), Fault> + 'static,
    {
        self.setup = Some(Box::new(function));
        self
    }

    /// Run `function` after every test case, even a failed one
    pub fn teardown<F>(&mut self, function: F) -> &mut Self
    where
        F: Fn() -> Result<(), Fault> + 'static,
    {
        self.teardown = Some(Box::new(function));
        self
    }

    fn push(
        &mut self,
        name: String,
        function: TestFn,
        disabled: Option<String>,
        location: &'static Location<'static>,
    ) -> Result<&mut Self, SuiteError> {
        if self.tests.iter().any(|test| test.name == name) {
            return Err(SuiteError::DuplicateTest {
                suite: self.name.clone(),
                test: name,
            });
        }

        self.tests.push(Test {
            name,
            function,
            location,
            disabled,
        });

        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[(String, Value)] {
        &self.properties
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    pub(crate) fn setup_hook(&self) -> Option<&HookFn> {
        self.setup.as_ref()
    }

    pub(crate) fn teardown_hook(&self) -> Option<&HookFn> {
        self.teardown.as_ref()
    }
}

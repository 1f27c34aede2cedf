// src/checks/mod.rs

use async_trait::async_trait;

use crate::client::SubmittyClient;
use crate::config::SuiteConfig;
use crate::errors::{CheckError, Result};
use crate::models::{ApiEnvelope, ApiStatus};

pub mod failures;
pub mod grade;
pub mod values;

pub use failures::{
    EndpointNotFoundCheck, GradeableNotFoundCheck, InvalidApiKeyCheck, MethodNotAllowedCheck,
    UnknownUserCheck,
};
pub use grade::SubmitGradeCheck;
pub use values::ValuesCheck;

/// Everything a check needs to talk to the server once the suite has logged in.
pub struct CheckContext {
    pub client: SubmittyClient,
    pub semester: String,
    pub course: String,
    pub token: String,
    pub suite: SuiteConfig,
}

/// A single assertion pass against the grading platform's API.
///
/// `run` returns `Ok(())` when the server behaved as expected and
/// `CheckError::Assertion` when it did not. Transport errors propagate as-is.
#[async_trait]
pub trait ApiCheck: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &CheckContext) -> Result<()>;
}

/// Fails unless the envelope has the given status.
pub(crate) fn expect_status(envelope: &ApiEnvelope, expected: ApiStatus) -> Result<()> {
    if envelope.status == expected {
        Ok(())
    } else {
        Err(CheckError::Assertion(format!(
            "expected status '{}', got '{}' ({})",
            expected,
            envelope.status,
            envelope.message_or_default()
        )))
    }
}

/// Fails unless the envelope is a `fail` response carrying exactly `message`.
pub(crate) fn expect_failure_message(envelope: &ApiEnvelope, message: &str) -> Result<()> {
    expect_status(envelope, ApiStatus::Fail)?;
    match envelope.message.as_deref() {
        Some(actual) if actual == message => Ok(()),
        actual => Err(CheckError::Assertion(format!(
            "expected message '{}', got {:?}",
            message, actual
        ))),
    }
}

/// Checks that only read from the server and may run concurrently.
pub fn read_only_checks(suite: &SuiteConfig) -> Vec<Box<dyn ApiCheck>> {
    let mut checks: Vec<Box<dyn ApiCheck>> = vec![Box::new(ValuesCheck)];
    if suite.failure_checks {
        checks.push(Box::new(MethodNotAllowedCheck));
        checks.push(Box::new(InvalidApiKeyCheck));
        checks.push(Box::new(EndpointNotFoundCheck));
        checks.push(Box::new(GradeableNotFoundCheck));
        checks.push(Box::new(UnknownUserCheck));
    }
    checks
}

/// Checks that change server state; run one at a time after the read-only ones.
pub fn mutating_checks(suite: &SuiteConfig) -> Vec<Box<dyn ApiCheck>> {
    let mut checks: Vec<Box<dyn ApiCheck>> = Vec::new();
    if suite.submit_grade {
        checks.push(Box::new(SubmitGradeCheck));
    }
    checks
}

// src/checks/failures.rs
//
// Negative checks: the server must answer misuse with a `fail` envelope.

use async_trait::async_trait;

use crate::checks::{ApiCheck, CheckContext, expect_failure_message, expect_status};
use crate::client::{VALUES_PATH, gradeable_path};
use crate::errors::Result;
use crate::models::ApiStatus;

pub const METHOD_NOT_ALLOWED: &str = "Method not allowed.";
pub const UNAUTHENTICATED: &str = "Unauthenticated access. Please log in.";
pub const ENDPOINT_NOT_FOUND: &str = "Endpoint not found.";
pub const GRADEABLE_NOT_FOUND: &str = "Gradeable does not exist";

pub struct MethodNotAllowedCheck;

#[async_trait]
impl ApiCheck for MethodNotAllowedCheck {
    fn name(&self) -> &'static str {
        "method_not_allowed"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let path = gradeable_path(VALUES_PATH, &ctx.semester, &ctx.course, &ctx.suite.gradeable);
        let envelope = ctx
            .client
            .post_form(&path, &[("user_id", ctx.suite.user_id.as_str())], Some(&ctx.token))
            .await?;
        expect_failure_message(&envelope, METHOD_NOT_ALLOWED)
    }
}

pub struct InvalidApiKeyCheck;

#[async_trait]
impl ApiCheck for InvalidApiKeyCheck {
    fn name(&self) -> &'static str {
        "invalid_api_key"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let envelope = ctx
            .client
            .values(&ctx.semester, &ctx.course, &ctx.suite.gradeable, &ctx.suite.user_id, "key")
            .await?;
        expect_failure_message(&envelope, UNAUTHENTICATED)
    }
}

pub struct EndpointNotFoundCheck;

#[async_trait]
impl ApiCheck for EndpointNotFoundCheck {
    fn name(&self) -> &'static str {
        "endpoint_not_found"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let envelope = ctx.client.get("/api/not/found/url", &[], Some(&ctx.token)).await?;
        expect_failure_message(&envelope, ENDPOINT_NOT_FOUND)
    }
}

pub struct GradeableNotFoundCheck;

#[async_trait]
impl ApiCheck for GradeableNotFoundCheck {
    fn name(&self) -> &'static str {
        "gradeable_not_found"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let envelope = ctx
            .client
            .values(
                &ctx.semester,
                &ctx.course,
                &ctx.suite.not_found_gradeable,
                &ctx.suite.user_id,
                &ctx.token,
            )
            .await?;
        expect_failure_message(&envelope, GRADEABLE_NOT_FOUND)
    }
}

/// Values for a user that does not exist must fail. Platform versions word
/// the message differently, so only the status is asserted.
pub struct UnknownUserCheck;

#[async_trait]
impl ApiCheck for UnknownUserCheck {
    fn name(&self) -> &'static str {
        "unknown_user"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let envelope = ctx
            .client
            .values(
                &ctx.semester,
                &ctx.course,
                &ctx.suite.gradeable,
                &ctx.suite.unknown_user_id,
                &ctx.token,
            )
            .await?;
        log::info!("unknown user '{}': {}", ctx.suite.unknown_user_id, envelope.message_or_default());
        expect_status(&envelope, ApiStatus::Fail)
    }
}

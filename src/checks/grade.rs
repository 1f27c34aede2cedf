// src/checks/grade.rs

use async_trait::async_trait;

use crate::checks::{ApiCheck, CheckContext, expect_status};
use crate::errors::{CheckError, Result};
use crate::models::ApiStatus;

/// Queues a VCS checkout and grading run for the suite's student.
pub struct SubmitGradeCheck;

#[async_trait]
impl ApiCheck for SubmitGradeCheck {
    fn name(&self) -> &'static str {
        "submit_grade"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let envelope = ctx
            .client
            .submit_grade(&ctx.semester, &ctx.course, &ctx.suite.gradeable, &ctx.suite.user_id, &ctx.token)
            .await?;
        expect_status(&envelope, ApiStatus::Success)?;

        let data = envelope.data.as_ref().and_then(|d| d.as_str()).unwrap_or_default();
        let title = format!("for {}", ctx.suite.gradeable_title);
        for needle in ["Successfully uploaded version", title.as_str()] {
            if !data.contains(needle) {
                return Err(CheckError::Assertion(format!(
                    "grade response does not mention '{}': {:?}",
                    needle, data
                )));
            }
        }
        Ok(())
    }
}

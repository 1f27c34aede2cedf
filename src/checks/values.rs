// src/checks/values.rs

use async_trait::async_trait;
use serde_json::Value;

use crate::checks::{ApiCheck, CheckContext, expect_status};
use crate::errors::{CheckError, Result};
use crate::models::{ApiStatus, TestCase};

/// Fetches a student's values for the suite's gradeable and checks the
/// payload shape and the autograding test case results.
pub struct ValuesCheck;

#[async_trait]
impl ApiCheck for ValuesCheck {
    fn name(&self) -> &'static str {
        "values"
    }

    async fn run(&self, ctx: &CheckContext) -> Result<()> {
        let suite = &ctx.suite;
        let envelope = ctx
            .client
            .values(&ctx.semester, &ctx.course, &suite.gradeable, &suite.user_id, &ctx.token)
            .await?;
        expect_status(&envelope, ApiStatus::Success)?;

        let data = envelope
            .data
            .as_ref()
            .ok_or_else(|| CheckError::Assertion("values response has no data".to_string()))?;

        check_required_fields(data, &suite.required_fields)?;
        check_test_cases(data, &suite.expected_test_cases)
    }
}

/// Presence only; null counts as present.
pub fn check_required_fields(data: &Value, required: &[String]) -> Result<()> {
    let object = data
        .as_object()
        .ok_or_else(|| CheckError::Assertion(format!("values data is not an object: {}", data)))?;

    let missing: Vec<&str> = required
        .iter()
        .filter(|field| !object.contains_key(field.as_str()))
        .map(|field| field.as_str())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CheckError::Assertion(format!("values data is missing {}", missing.join(", "))))
    }
}

/// Compares `data.test_cases` against the expected records by index.
/// Extra test cases beyond the expected ones are ignored.
pub fn check_test_cases(data: &Value, expected: &[TestCase]) -> Result<()> {
    if expected.is_empty() {
        return Ok(());
    }

    let actual = data
        .get("test_cases")
        .and_then(Value::as_array)
        .ok_or_else(|| CheckError::Assertion("values data has no test_cases array".to_string()))?;

    for (index, want) in expected.iter().enumerate() {
        let raw = actual.get(index).ok_or_else(|| {
            CheckError::Assertion(format!(
                "expected test case {} ('{}') but only {} were returned",
                index,
                want.name,
                actual.len()
            ))
        })?;

        let got: TestCase = serde_json::from_value(raw.clone()).map_err(|e| {
            CheckError::Assertion(format!("test case {} is malformed ({}): {}", index, e, raw))
        })?;

        if &got != want {
            return Err(CheckError::Assertion(format!(
                "test case {} differs: expected {:?}, got {:?}",
                index, want, got
            )));
        }
    }

    Ok(())
}

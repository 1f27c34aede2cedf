// src/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Status field of every grading platform API response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Fail,
    Error,
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiStatus::Success => write!(f, "success"),
            ApiStatus::Fail => write!(f, "fail"),
            ApiStatus::Error => write!(f, "error"),
        }
    }
}

/// The `{status, data, message}` wrapper the platform puts around every response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub status: ApiStatus,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.status == ApiStatus::Success
    }

    pub fn message_or_default(&self) -> &str {
        self.message.as_deref().unwrap_or("<no message>")
    }
}

/// Body of `POST /api/token`. Servers may omit `status` and send only `data.token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub status: Option<ApiStatus>,
    #[serde(default)]
    pub data: Option<TokenData>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    pub token: String,
}

/// Grading status of one student's submission for a gradeable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeableValues {
    #[serde(default)]
    pub is_queued: Option<bool>,
    #[serde(default)]
    pub queue_position: Option<Value>,
    #[serde(default)]
    pub is_grading: Option<bool>,
    #[serde(default)]
    pub has_submission: Option<bool>,
    #[serde(default)]
    pub autograding_complete: Option<bool>,
    #[serde(default)]
    pub has_active_version: Option<bool>,
    #[serde(default)]
    pub highest_version: Option<i64>,
    #[serde(default)]
    pub total_points: Option<f64>,
    #[serde(default)]
    pub total_percent: Option<f64>,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

/// One autograding test case result.
///
/// Keys outside the known set land in `extra`, so two test cases are only
/// equal when they carry exactly the same keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub details: String,
    pub has_extra_results: bool,
    pub is_extra_credit: bool,
    pub points_available: f64,
    pub points_received: f64,
    pub testcase_message: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TestCase {
    pub fn new(
        name: &str,
        details: &str,
        points_available: f64,
        points_received: f64,
    ) -> Self {
        Self {
            name: name.to_string(),
            details: details.to_string(),
            has_extra_results: true,
            is_extra_credit: false,
            points_available,
            points_received,
            testcase_message: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "Pass"),
            Verdict::Fail => write!(f, "Fail"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CheckOutcome {
    pub name: String,
    pub verdict: Verdict,
    pub message: Option<String>,
    pub latency_ms: u64,
}

/// Result of one run of the check suite against a server.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SuiteReport {
    pub run_id: String,
    pub base_url: String,
    pub semester: String,
    pub course: String,
    pub started_at: String,
    pub outcomes: Vec<CheckOutcome>,
    pub passed: usize,
    pub failed: usize,
    pub total_latency_ms: u64,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

// src/config.rs
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::LazyLock;

use crate::errors::{CheckError, Result};
use crate::models::TestCase;
use crate::semester::Semester;

pub const DEFAULT_BASE_URL: &str = "http://localhost:1511";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Login used to obtain an API token.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub user_id: String,
    pub password: String,
}

/// Where the grading platform lives and who we log in as.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub semester: String,
    pub course: String,
    pub credentials: Credentials,
    pub timeout_secs: u64,
    /// If set, the JSON run report is written here.
    pub report_path: Option<String>,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to the
    /// platform's development defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let base_url = match lookup("SUBMITTY_BASE_URL") {
            Some(url) if url.trim().is_empty() => {
                return Err(CheckError::Config("SUBMITTY_BASE_URL is set but empty".to_string()));
            }
            Some(url) => url.trim().trim_end_matches('/').to_string(),
            None => DEFAULT_BASE_URL.to_string(),
        };

        let timeout_secs = match get("SUBMITTY_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                CheckError::Config(format!("SUBMITTY_TIMEOUT_SECS must be a positive integer, got '{}'", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(AppConfig {
            base_url,
            semester: get("SUBMITTY_SEMESTER").unwrap_or_else(|| Semester::current().short()),
            course: get("SUBMITTY_COURSE").unwrap_or_else(|| "sample".to_string()),
            credentials: Credentials {
                user_id: get("SUBMITTY_USER_ID").unwrap_or_else(|| "instructor".to_string()),
                password: get("SUBMITTY_PASSWORD").unwrap_or_else(|| "instructor".to_string()),
            },
            timeout_secs,
            report_path: get("SUBMITTY_REPORT_PATH"),
        })
    }
}

/// Describes which gradeable to inspect and what the server is expected to return.
#[derive(Deserialize, Debug, Clone)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Gradeable whose values are fetched
    pub gradeable: String,

    /// Student whose values are fetched
    pub user_id: String,

    /// Keys that must be present in the values payload. Their values are not
    /// compared since they depend on how far autograding has progressed.
    pub required_fields: Vec<String>,

    /// Expected test cases, compared by position
    pub expected_test_cases: Vec<TestCase>,

    /// Run the negative checks (bad key, unknown endpoint, ...)
    pub failure_checks: bool,

    /// Submit a VCS grading request. This changes server state.
    pub submit_grade: bool,

    /// Display title the grade response is expected to mention
    pub gradeable_title: String,

    pub not_found_gradeable: String,
    pub unknown_user_id: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            gradeable: "subdirectory_vcs_homework".to_string(),
            user_id: "student".to_string(),
            required_fields: [
                "is_queued",
                "queue_position",
                "is_grading",
                "has_submission",
                "autograding_complete",
                "has_active_version",
                "highest_version",
                "total_points",
                "total_percent",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            expected_test_cases: vec![
                TestCase::new("Python test", "python3 *.py", 5.0, 5.0),
                TestCase::new("Submitted a .pdf file", "", 1.0, 1.0),
                TestCase::new("Required 500-1000 Words", "", 1.0, 0.0),
            ],
            failure_checks: false,
            submit_grade: false,
            gradeable_title: "Subdirectory VCS Homework".to_string(),
            not_found_gradeable: "not_found_gradeable".to_string(),
            unknown_user_id: "not_a_student".to_string(),
        }
    }
}

impl SuiteConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let suite: SuiteConfig = toml::from_str(raw)?;
        if suite.gradeable.trim().is_empty() {
            return Err(CheckError::Config("suite gradeable must not be empty".to_string()));
        }
        if suite.user_id.trim().is_empty() {
            return Err(CheckError::Config("suite user_id must not be empty".to_string()));
        }
        Ok(suite)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Substitutes `{{key}}` placeholders from a JSON object.
/// Placeholders without a matching string value are left as they are.
pub fn render_template(template: &str, data: &serde_json::Value) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            data.get(key)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

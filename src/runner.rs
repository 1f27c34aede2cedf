// src/runner.rs
use crate::checks::{self, ApiCheck, CheckContext};
use crate::client::SubmittyClient;
use crate::config::{AppConfig, SuiteConfig};
use crate::errors::Result;
use crate::models::{CheckOutcome, SuiteReport, Verdict};
use futures::future;
use std::time::Instant;

/// Run one check, timing it and turning its result into an outcome
async fn run_check(check: &dyn ApiCheck, ctx: &CheckContext) -> CheckOutcome {
    let start = Instant::now();
    let result = check.run(ctx).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(()) => {
            println!("✅ {} ({}ms)", check.name(), latency_ms);
            log::info!("check {} passed in {}ms", check.name(), latency_ms);
            CheckOutcome {
                name: check.name().to_string(),
                verdict: Verdict::Pass,
                message: None,
                latency_ms,
            }
        }
        Err(e) => {
            println!("❌ {} ({}ms): {}", check.name(), latency_ms, e);
            log::warn!("check {} failed: {}", check.name(), e);
            CheckOutcome {
                name: check.name().to_string(),
                verdict: Verdict::Fail,
                message: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

/// Log in, then run every check the suite enables.
///
/// A failed login aborts the run. Read-only checks run concurrently; checks
/// that change server state run afterwards, one at a time.
pub async fn run_suite(
    config: &AppConfig,
    suite: &SuiteConfig,
    client: &SubmittyClient,
) -> Result<SuiteReport> {
    let suite_start = Instant::now();
    let started_at = chrono::Utc::now().to_rfc3339();
    let separator = "=".repeat(60);

    println!("\n{}", separator);
    println!("🎯 Checking {} ({} / {})", client.base_url(), config.semester, config.course);
    println!("{}\n", separator);

    println!("🔑 Logging in as {}", config.credentials.user_id);
    let token = client.fetch_token(&config.credentials).await?;
    log::debug!("obtained API token for {}", config.credentials.user_id);

    let ctx = CheckContext {
        client: client.clone(),
        semester: config.semester.clone(),
        course: config.course.clone(),
        token,
        suite: suite.clone(),
    };

    let read_only = checks::read_only_checks(suite);
    let futures: Vec<_> = read_only
        .iter()
        .map(|check| run_check(check.as_ref(), &ctx))
        .collect();
    let mut outcomes = future::join_all(futures).await;

    for check in checks::mutating_checks(suite) {
        outcomes.push(run_check(check.as_ref(), &ctx).await);
    }

    let passed = outcomes.iter().filter(|o| o.verdict == Verdict::Pass).count();
    let failed = outcomes.len() - passed;
    let total_latency_ms = suite_start.elapsed().as_millis() as u64;

    println!("\n📊 {} passed, {} failed in {}ms", passed, failed, total_latency_ms);
    println!("{}\n", separator);

    Ok(SuiteReport {
        run_id: uuid::Uuid::new_v4().to_string(),
        base_url: client.base_url().to_string(),
        semester: config.semester.clone(),
        course: config.course.clone(),
        started_at,
        outcomes,
        passed,
        failed,
        total_latency_ms,
    })
}

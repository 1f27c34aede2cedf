use std::process::ExitCode;

use submitty_api_check::banner;
use submitty_api_check::client::SubmittyClient;
use submitty_api_check::config::{AppConfig, SuiteConfig};
use submitty_api_check::errors::Result;
use submitty_api_check::models::{SuiteReport, Verdict};
use submitty_api_check::runner;

#[tokio::main]
async fn main() -> ExitCode {
    banner::print_banner();

    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  Could not load .env file: {}", e);
        eprintln!("   Falling back to the process environment and defaults");
    }

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    match run().await {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            eprintln!("❌ {}", e);
            log::error!("run aborted: {:?}", e);
            ExitCode::from(2)
        }
    }
}

async fn run() -> Result<SuiteReport> {
    let config = AppConfig::from_env()?;
    let suite = match std::env::args().nth(1) {
        Some(path) => {
            println!("📄 Loading suite from {}", path);
            SuiteConfig::from_file(&path)?
        }
        None => SuiteConfig::default(),
    };

    let client = SubmittyClient::new(&config)?;
    let report = runner::run_suite(&config, &suite, &client).await?;

    for outcome in report.outcomes.iter().filter(|o| o.verdict == Verdict::Fail) {
        eprintln!(
            "   {}: {}",
            outcome.name,
            outcome.message.as_deref().unwrap_or("no details")
        );
    }

    if let Some(path) = &config.report_path {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        println!("💾 Report written to {}", path);
    }

    Ok(report)
}

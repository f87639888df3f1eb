//! Claims Triage - report binary
//!
//! Loads a claims snapshot, classifies every company with matching line
//! items and prints the ranked report as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! TRIAGE_SNAPSHOT_PATH=snapshot.json cargo run --bin claims-triage
//!
//! # Only two districts, debt and missing parts, Moscow business days
//! TRIAGE_SNAPSHOT_PATH=snapshot.json \
//! TRIAGE_DISTRICTS=DST-...,DST-... \
//! TRIAGE_STATUSES=DEBT,MISSING \
//! TRIAGE_TIMEZONE=Europe/Moscow \
//! cargo run --bin claims-triage
//! ```
//!
//! See [`interface_triage::config`] for every variable, including the
//! `ESCALATION_*` threshold overrides. Logs go to stderr.

use anyhow::Context;
use chrono::Utc;
use domain_claims::EscalationClassifier;
use interface_triage::config::{thresholds_from_env, TriageConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = TriageConfig::from_env().context("loading TRIAGE_* configuration")?;
    init_tracing(&config.log_level, config.log_json);

    let thresholds = thresholds_from_env().context("loading ESCALATION_* thresholds")?;
    let classifier = EscalationClassifier::new(thresholds)?;

    tracing::info!(
        snapshot = %config.snapshot_path,
        timezone = %config.timezone,
        "Starting claims triage"
    );

    let report = interface_triage::run(&config, classifier, Utc::now())
        .with_context(|| format!("triaging {}", config.snapshot_path))?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Initializes the tracing subscriber, writing to stderr
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

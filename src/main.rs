//! Glucora: Offline diabetes risk assessment.
//!
//! Binary shell: wires the adapters together and runs one assessment from a
//! JSON answer file, printing the interpreted result to stdout.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glucora::adapters::gbdt::GbdtEngine;
use glucora::adapters::sanitize::SanitizingMakeWriter;
use glucora::adapters::sqlite::SqliteStore;
use glucora::application::{AssessmentService, DeviceGate, ModelRunner, ReadinessGate};
use glucora::domain::AnswerSheet;

fn main() -> Result<()> {
    // Initialize logging.
    //
    // Logs go to stderr so stdout stays a clean JSON result, or to a file
    // when GLUCORA_LOG_FILE is set.
    let log_file = std::env::var("GLUCORA_LOG_FILE").ok();

    let (writer, _guard) = match log_file {
        Some(path) => {
            if let Some(parent) = std::path::Path::new(&path).parent() {
                // Best-effort: don't fail startup just because the directory is missing.
                let _ = std::fs::create_dir_all(parent);
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    tracing::info!("Starting glucora...");

    let answers_path = std::env::args()
        .nth(1)
        .context("Usage: glucora <answers.json>")?;

    let answers: AnswerSheet = serde_json::from_str(
        &std::fs::read_to_string(&answers_path)
            .with_context(|| format!("Failed to read {answers_path}"))?,
    )
    .with_context(|| format!("Failed to parse {answers_path}"))?;

    let db_path = std::env::var("GLUCORA_DB").unwrap_or_else(|_| "glucora.db".to_string());
    let store = Arc::new(SqliteStore::new(&db_path)?);

    let runner = Arc::new(ModelRunner::new(GbdtEngine::from_env_or_default()));
    let gate = DeviceGate::new(Arc::clone(&runner));

    gate.check();
    if !gate.can_submit() {
        anyhow::bail!("Model is not ready; cannot run an assessment");
    }

    let service = AssessmentService::new(runner, store);
    let result = service.assess(&answers)?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    let stats = service.ledger().stats()?;
    tracing::info!("Ledger now holds {} prediction(s)", stats.count);

    tracing::info!("Glucora shutdown complete.");
    Ok(())
}

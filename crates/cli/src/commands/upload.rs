//! `upload` command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{AssignmentId, WorkerLoad};
use distribution::{DistributionError, Upload, UploadOutcome};
use observability::UploadStatsAggregator;
use serde::Serialize;
use tracing::info;

use super::{build_pipeline, load_config};
use crate::cli::UploadArgs;

/// Upload result for JSON output
#[derive(Serialize)]
struct UploadReport<'a> {
    id: AssignmentId,
    file_name: &'a str,
    format: &'static str,
    total_rows: usize,
    processed: usize,
    dropped: usize,
    message: String,
    per_worker: &'a [WorkerLoad],
}

impl<'a> From<&'a UploadOutcome> for UploadReport<'a> {
    fn from(outcome: &'a UploadOutcome) -> Self {
        Self {
            id: outcome.assignment.id,
            file_name: &outcome.assignment.assignment.file_name,
            format: outcome.format.as_str(),
            total_rows: outcome.total_rows(),
            processed: outcome.processed(),
            dropped: outcome.dropped(),
            message: outcome.message(),
            per_worker: &outcome.per_worker,
        }
    }
}

/// Execute the `upload` command
pub async fn run_upload(config_path: &Path, args: &UploadArgs) -> Result<()> {
    let mut config = load_config(config_path)?;

    if let Some(limit) = args.max_upload_bytes {
        info!(limit, "Overriding max upload size from CLI");
        config.ingestion.max_upload_bytes = limit;
    }
    if let Some(port) = args.metrics_port.or(config.observability.metrics_port) {
        observability::init_metrics_only(port)?;
    }

    let file_name = args
        .file
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", args.file.display()))?
        .to_string();
    let payload = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let pipeline = build_pipeline(&config)?;

    let mut upload = Upload::new(file_name, payload);
    if let Some(format) = args.format {
        upload = upload.with_format(format.into());
    }

    let mut stats = UploadStatsAggregator::new();
    let started = Instant::now();
    let result = pipeline.upload(upload).await;
    record_result(&mut stats, &result, started.elapsed().as_secs_f64() * 1000.0);

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            if !args.json {
                eprintln!("{}", stats.summary());
            }
            return Err(e).context("Upload failed");
        }
    };

    if args.json {
        let json = serde_json::to_string_pretty(&UploadReport::from(&outcome))
            .context("Failed to serialize upload result")?;
        println!("{}", json);
    } else {
        print_outcome(&outcome);
        println!("\n{}", stats.summary());
    }

    Ok(())
}

fn record_result(
    stats: &mut UploadStatsAggregator,
    result: &Result<UploadOutcome, DistributionError>,
    latency_ms: f64,
) {
    match result {
        Ok(outcome) => stats.record_success(
            outcome.total_rows(),
            outcome.processed(),
            &outcome.per_worker,
            latency_ms,
        ),
        Err(e) => stats.record_failure(e.kind().as_str()),
    }
}

fn print_outcome(outcome: &UploadOutcome) {
    println!("✓ {}", outcome.message());
    println!("\n  Assignment: {}", outcome.assignment.id);
    println!("  File: {}", outcome.assignment.assignment.file_name);
    println!(
        "  Rows: {} read, {} assigned, {} skipped",
        outcome.total_rows(),
        outcome.processed(),
        outcome.dropped()
    );

    println!("\n  Per worker:");
    for load in &outcome.per_worker {
        println!(
            "  - {} ({}): {}",
            load.name.as_deref().unwrap_or("Unknown"),
            load.worker_id,
            load.items
        );
    }
}

//! `lists` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{ResolvedAssignment, WorkerLoad};
use distribution::assignment_loads;
use serde::Serialize;

use super::{build_pipeline, load_config};
use crate::cli::ListsArgs;

#[derive(Serialize)]
struct ListEntry<'a> {
    #[serde(flatten)]
    assignment: &'a ResolvedAssignment,
    per_worker: Vec<WorkerLoad>,
}

/// Execute the `lists` command
pub async fn run_lists(config_path: &Path, args: &ListsArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config)?;

    let assignments = pipeline
        .list_assignments()
        .await
        .context("Failed to list assignments")?;

    if args.json {
        let entries: Vec<_> = assignments
            .iter()
            .map(|assignment| ListEntry {
                assignment,
                per_worker: assignment_loads(assignment),
            })
            .collect();
        let json =
            serde_json::to_string_pretty(&entries).context("Failed to serialize assignments")?;
        println!("{}", json);
        return Ok(());
    }

    if assignments.is_empty() {
        println!("No assignments stored");
        return Ok(());
    }

    for assignment in &assignments {
        print_assignment(assignment, args.items);
    }
    Ok(())
}

fn print_assignment(assignment: &ResolvedAssignment, with_items: bool) {
    println!(
        "\n{}  {}  {}",
        assignment.id,
        assignment.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        assignment.file_name
    );
    println!(
        "  {} of {} rows assigned",
        assignment.items.len(),
        assignment.total_rows
    );

    for load in assignment_loads(assignment) {
        println!(
            "  - {} ({}): {}",
            load.name.as_deref().unwrap_or("Unknown"),
            load.worker_id,
            load.items
        );
    }

    if with_items {
        for item in &assignment.items {
            let worker = item
                .worker
                .as_ref()
                .map(|w| w.name.as_str())
                .unwrap_or("Unknown");
            println!(
                "    {} | {} | {} -> {}",
                item.record.first_name, item.record.phone, item.record.notes, worker
            );
        }
    }
}

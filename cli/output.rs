use anyhow::{Context, Result};
use colored::*;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL};
use repomerge_core::output_formats::serialize_report_to_json;
use repomerge_core::{FilterDecision, PlannedPath};
use serde::Serialize;
use std::io::{self, Write};

use crate::cli_args::FormatOutputOpts;

// Prints `plain_text` for the text format, JSON otherwise.
pub fn print_data_or_text<T: Serialize>(
    data: &T,
    plain_text: Option<String>,
    format_opts: &FormatOutputOpts,
    default_format: &str,
) -> Result<()> {
    let format = format_opts
        .format
        .as_deref()
        .unwrap_or(default_format)
        .to_lowercase();

    match (format.as_str(), plain_text) {
        ("text", Some(text)) => write_to_stdout(&text),
        _ => {
            let content = serialize_report_to_json(data, !format_opts.minify_json)?;
            write_to_stdout(&content)
        }
    }
}

pub fn write_to_stdout(content: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(content.as_bytes())
        .context("Failed to write to stdout")?;
    if !content.ends_with('\n') {
        handle
            .write_all(b"\n")
            .context("Failed to write newline to stdout")?;
    }
    handle.flush().context("Failed to flush stdout")?;
    Ok(())
}

pub fn print_plan_table(plan: &[PlannedPath]) -> Result<()> {
    let included = plan.iter().filter(|p| p.decision.is_included()).count();

    println!();
    println!("{}", " Combine Plan ".green().bold().underline());
    println!(
        "{:<20} {}",
        "Paths visited:".green(),
        plan.len().to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Files included:".green(),
        included.to_string().cyan()
    );
    println!(
        "{:<20} {}",
        "Skipped:".green(),
        (plan.len() - included).to_string().cyan()
    );

    if plan.is_empty() {
        println!("\n{}", "(Nothing to combine)".yellow());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Path").fg(Color::Green),
        Cell::new("Type").fg(Color::Green),
        Cell::new("Decision").fg(Color::Green),
    ]);
    for entry in plan {
        let decision_color = match entry.decision {
            FilterDecision::Included => Color::Green,
            FilterDecision::OutputFile => Color::Blue,
            FilterDecision::ExcludedDirectory(_) => Color::DarkGrey,
            FilterDecision::ExcludedExtension(_) => Color::Red,
            FilterDecision::NotAllowed(_) => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(&entry.relative_path).fg(Color::Cyan),
            Cell::new(if entry.is_dir { "dir" } else { "file" })
                .set_alignment(CellAlignment::Center),
            Cell::new(entry.decision.to_string()).fg(decision_color),
        ]);
    }
    println!("{table}");
    println!();
    Ok(())
}

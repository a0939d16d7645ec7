// Inspect command - show statistics for a single description file

use anyhow::Result;
use std::collections::BTreeMap;

use crate::cli::args::InspectArgs;
use crate::parser::{self, Document, ParseDiagnostics};
use crate::report::{InspectReport, TypeInfo};

/// Build the inspect report from a parsed document and its parse statistics
pub fn build_report(document: &Document, stats: &ParseDiagnostics) -> InspectReport {
    let types = document
        .types
        .iter()
        .map(|t| TypeInfo {
            category: t.category().as_str().to_string(),
            manufacturers: t.manufacturers().len(),
            devices: t.manufacturers().iter().map(|m| m.devices.len()).sum(),
        })
        .collect();

    let mut statuses = BTreeMap::new();
    for device in document.devices() {
        *statuses.entry(device.status.as_str().to_string()).or_insert(0) += 1;
    }

    let mut interfaces = BTreeMap::new();
    for iface in document.interfaces() {
        *interfaces.entry(iface.to_string()).or_insert(0) += 1;
    }

    InspectReport {
        file: stats.file_path.clone(),
        backend: document.backend.clone(),
        version: document.version.clone(),
        bytes: stats.bytes,
        total_lines: stats.total_lines,
        tokens: stats.tokens,
        parse_time_ms: stats.timings.parse_ms,
        types,
        statuses,
        interfaces,
    }
}

pub async fn handle_inspect(args: &InspectArgs) -> Result<()> {
    let file_path = &args.file;
    if !file_path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", file_path.display()));
    }

    let (document, stats) = parser::parse_desc_with_diagnostics(file_path)?;
    let report = build_report(&document, &stats);

    if args.format.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!();
    println!("DESCRIPTION INSPECTION");
    println!("======================");
    println!("File: {}", report.file);
    println!(
        "Backend: {}{}",
        report.backend,
        report
            .version
            .as_deref()
            .map(|v| format!(" ({})", v))
            .unwrap_or_default()
    );
    println!(
        "Size: {} bytes, {} lines, {} tokens",
        report.bytes, report.total_lines, report.tokens
    );
    println!("Parse time: {:.2}ms", report.parse_time_ms);

    println!();
    println!("Types:");
    if report.types.is_empty() {
        println!("  (none)");
    }
    for t in &report.types {
        println!(
            "  {:<10} {} manufacturer(s), {} device(s)",
            t.category, t.manufacturers, t.devices
        );
    }

    if !report.statuses.is_empty() {
        println!();
        println!("Support status:");
        for (status, count) in &report.statuses {
            println!("  {:<10} {}", status, count);
        }
    }

    if !report.interfaces.is_empty() {
        println!();
        println!("Interfaces:");
        for (iface, count) in &report.interfaces {
            println!("  {:<24} {}", iface, count);
        }
    }

    Ok(())
}

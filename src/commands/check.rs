// Check command - validate .desc files

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::args::CheckArgs;
use crate::commands::Settings;
use crate::parser::{self, ParseError, ParseErrorKind, catalog};
use crate::report::{CheckReport, CheckSummary, Diagnostic, DiagnosticSeverity};
use crate::utils::FileUtils;

/// Diagnostic for a file that failed to load
pub fn diagnostic_for(file: &str, err: &anyhow::Error) -> Diagnostic {
    let Some(parse_err) = err.downcast_ref::<ParseError>() else {
        return Diagnostic::error(file, "READ_ERROR", &format!("{:#}", err), 1);
    };

    let diagnostic = Diagnostic::error(
        file,
        parse_err.kind.code(),
        &parse_err.kind.to_string(),
        parse_err.line,
    );
    match &parse_err.kind {
        ParseErrorKind::UnknownKeyword(_) => diagnostic.with_hint(&format!(
            "Known keywords: {}",
            catalog::keywords().collect::<Vec<_>>().join(", ")
        )),
        ParseErrorKind::UnexpectedKeyword(_) => {
            diagnostic.with_hint("Keyword is not allowed at this nesting level")
        }
        _ => diagnostic,
    }
}

/// Parse one file, adding a warning when `:backend` differs from the file stem
fn check_file(path: &Path) -> Result<Vec<Diagnostic>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let base_name = parser::file_base_name(path);
    let document = parser::parse_desc_from_str(&content, &base_name)?;

    let stem = FileUtils::backend_name(path);
    if document.backend == stem {
        return Ok(Vec::new());
    }

    let line = parser::read_tokens(&content, &base_name)?
        .iter()
        .find(|t| t.token.keyword == "backend")
        .map(|t| t.line)
        .unwrap_or(1);
    Ok(vec![
        Diagnostic::warning(
            &path.to_string_lossy(),
            "BACKEND_NAME_MISMATCH",
            &format!(
                "backend '{}' does not match file name '{}'",
                document.backend, stem
            ),
            line,
        )
        .with_hint("Backend lists such as usb-backends are keyed by file name"),
    ])
}

/// Validate every file: one error per failing file, plus warnings
pub fn check_files(paths: &[PathBuf], settings: &Settings) -> CheckReport {
    let mut files = Vec::new();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();

    for path in paths {
        if path.exists() {
            files.extend(settings.discover(std::slice::from_ref(path)));
        } else {
            diagnostics.push(Diagnostic::error(
                &path.to_string_lossy(),
                "FILE_NOT_FOUND",
                "Path not found",
                1,
            ));
        }
    }

    info!("Checking {} file(s)...", files.len());

    let mut files_with_errors = diagnostics.len();
    for file in &files {
        match check_file(file) {
            Ok(warnings) => diagnostics.extend(warnings),
            Err(e) => {
                diagnostics.push(diagnostic_for(&file.to_string_lossy(), &e));
                files_with_errors += 1;
            }
        }
    }

    let total_errors = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Error))
        .count();
    let total_warnings = diagnostics
        .iter()
        .filter(|d| matches!(d.severity, DiagnosticSeverity::Warning))
        .count();

    CheckReport {
        diagnostics,
        summary: CheckSummary {
            total_files: files.len(),
            files_with_errors,
            total_errors,
            total_warnings,
        },
    }
}

pub async fn handle_check(args: &CheckArgs, settings: &Settings) -> Result<()> {
    let report = check_files(&args.files, settings);

    if args.format.is_json() {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.diagnostics {
            println!("{}:{}: [{}] {}", d.file, d.range.start.line, d.code, d.message);
        }
        println!(
            "{} file(s) checked, {} with errors",
            report.summary.total_files, report.summary.files_with_errors
        );
    }

    if report.summary.files_with_errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

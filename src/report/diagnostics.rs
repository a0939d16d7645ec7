use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub file: String,
    pub range: DiagnosticRange,
    pub severity: DiagnosticSeverity,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticRange {
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: CheckSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSummary {
    pub total_files: usize,
    pub files_with_errors: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectReport {
    pub file: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub bytes: u64,
    pub total_lines: usize,
    pub tokens: usize,
    pub parse_time_ms: f64,
    pub types: Vec<TypeInfo>,
    /// Device count per support status
    pub statuses: BTreeMap<String, usize>,
    /// Device count per interface value
    pub interfaces: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(rename = "type")]
    pub category: String,
    pub manufacturers: usize,
    pub devices: usize,
}

impl Diagnostic {
    fn at_line(severity: DiagnosticSeverity, file: &str, code: &str, message: &str, line: usize) -> Self {
        Self {
            file: file.to_string(),
            range: DiagnosticRange {
                start: Position { line, column: 1 },
                end: Position { line, column: 1000 },
            },
            severity,
            code: code.to_string(),
            message: message.to_string(),
            hint: None,
        }
    }

    pub fn error(file: &str, code: &str, message: &str, line: usize) -> Self {
        Self::at_line(DiagnosticSeverity::Error, file, code, message, line)
    }

    pub fn warning(file: &str, code: &str, message: &str, line: usize) -> Self {
        Self::at_line(DiagnosticSeverity::Warning, file, code, message, line)
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

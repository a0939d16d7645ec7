// .desc file parser - drives the lexer and document builder line by line
// Handles comment/blank line skipping, line numbering and error context

use super::ast::Document;
use super::builder::DocumentBuilder;
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{self, Token};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Token together with the line it was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceToken {
    pub line: usize,
    #[serde(flatten)]
    pub token: Token,
}

/// State for parsing a single file
struct ParseSession {
    file: String,
    builder: DocumentBuilder,
    last_line: usize,
    tokens: usize,
}

impl ParseSession {
    fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            builder: DocumentBuilder::new(),
            last_line: 0,
            tokens: 0,
        }
    }

    fn error(&self, kind: ParseErrorKind, line: usize) -> ParseError {
        ParseError::new(kind, self.file.clone(), line)
    }

    fn feed_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        self.last_line = line_no;
        let Some(token) = lex_line(line).map_err(|kind| self.error(kind, line_no))? else {
            return Ok(());
        };
        self.tokens += 1;
        self.builder
            .push(token)
            .map_err(|kind| self.error(kind, line_no))
    }

    fn finish(self) -> Result<Document, ParseError> {
        let line = self.last_line;
        let file = self.file;
        self.builder
            .finish()
            .map_err(|kind| ParseError::new(kind, file, line))
    }
}

/// Lex one raw line; `None` for blank and comment lines
fn lex_line(line: &str) -> Result<Option<Token>, ParseErrorKind> {
    let trimmed = line.trim();
    if lexer::is_ignored_line(trimmed) {
        return Ok(None);
    }
    lexer::tokenize_line(trimmed).map(Some)
}

/// Base name used in error messages
pub fn file_base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Parse a .desc file into a document.
///
/// Parse failures are returned as [`ParseError`] inside the `anyhow::Error`
/// and can be recovered with `downcast_ref`.
pub fn parse_desc(file_path: &Path) -> Result<Document> {
    let (document, _, _) = parse_file(file_path)?;
    Ok(document)
}

fn parse_file(file_path: &Path) -> Result<(Document, usize, usize)> {
    let file = File::open(file_path)
        .with_context(|| format!("Failed to open file: {}", file_path.display()))?;
    let mut session = ParseSession::new(&file_base_name(file_path));

    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line =
            line.with_context(|| format!("Failed to read {}:{}", file_path.display(), idx + 1))?;
        session.feed_line(idx + 1, &line)?;
    }

    let lines = session.last_line;
    let tokens = session.tokens;
    let document = session.finish()?;
    debug!(file = %file_path.display(), lines, tokens, "parsed description");
    Ok((document, lines, tokens))
}

/// Parse .desc content from a string
pub fn parse_desc_from_str(content: &str, file_name: &str) -> Result<Document, ParseError> {
    let mut session = ParseSession::new(file_name);
    for (idx, line) in content.lines().enumerate() {
        session.feed_line(idx + 1, line)?;
    }
    session.finish()
}

/// Lex content into its flat token stream, without building a tree
pub fn read_tokens(content: &str, file_name: &str) -> Result<Vec<SourceToken>, ParseError> {
    let mut tokens = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let token = lex_line(line).map_err(|kind| ParseError::new(kind, file_name, line_no))?;
        if let Some(token) = token {
            tokens.push(SourceToken {
                line: line_no,
                token,
            });
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ParseTimings {
    pub parse_ms: f64,
    pub total_ms: f64,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct ParseDiagnostics {
    pub file_path: String,
    pub bytes: u64,
    pub total_lines: usize,
    pub tokens: usize,
    pub types: usize,
    pub manufacturers: usize,
    pub devices: usize,
    pub timings: ParseTimings,
}

/// Parse a .desc file and return the document plus statistics for inspect
pub fn parse_desc_with_diagnostics(file_path: &Path) -> Result<(Document, ParseDiagnostics)> {
    let total_start = Instant::now();
    let bytes = std::fs::metadata(file_path)
        .with_context(|| format!("Failed to get metadata for: {}", file_path.display()))?
        .len();

    let parse_start = Instant::now();
    let (document, total_lines, tokens) = parse_file(file_path)?;
    let parse_ms = parse_start.elapsed().as_secs_f64() * 1000.0;

    let diagnostics = ParseDiagnostics {
        file_path: file_path.display().to_string(),
        bytes,
        total_lines,
        tokens,
        types: document.types.len(),
        manufacturers: document.manufacturers().count(),
        devices: document.devices().count(),
        timings: ParseTimings {
            parse_ms,
            total_ms: total_start.elapsed().as_secs_f64() * 1000.0,
        },
    };

    Ok((document, diagnostics))
}

// Parse errors for .desc files
// Every failure is fatal to the file being parsed and carries file/line context

use serde::Serialize;
use thiserror::Error;

/// What went wrong while lexing or assembling a description file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// Line does not start with `:` followed by lowercase letters
    #[error("invalid keyword")]
    MalformedKeyword,

    /// Unquoted value starting with the sigil or with whitespace
    #[error("invalid string")]
    MalformedString,

    #[error("unterminated string")]
    UnterminatedString,

    /// Two tokens glued together without whitespace between them
    #[error("expected space")]
    ExpectedSeparator,

    #[error("unexpected extra data")]
    UnexpectedTrailingData,

    #[error("missing value for keyword ':{0}'")]
    MissingValue(String),

    #[error("unknown keyword ':{0}'")]
    UnknownKeyword(String),

    #[error("invalid value ':{value}' for keyword ':{keyword}'")]
    InvalidEnumValue { keyword: String, value: String },

    /// Keyword is not legal at any open nesting level
    #[error("unexpected keyword ':{0}'")]
    UnexpectedKeyword(String),

    #[error("duplicate keyword ':{0}'")]
    DuplicateKeyword(String),

    #[error("missing required keyword ':{field}' in {level}")]
    MissingRequiredField { level: String, field: String },

    /// A closed scope cannot be attached to the enclosing one
    #[error("{child} cannot be nested in {parent}")]
    ShapeMismatch { parent: String, child: String },
}

impl ParseErrorKind {
    /// Stable machine-readable code, used by diagnostics output
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedKeyword => "MALFORMED_KEYWORD",
            Self::MalformedString => "MALFORMED_STRING",
            Self::UnterminatedString => "UNTERMINATED_STRING",
            Self::ExpectedSeparator => "EXPECTED_SEPARATOR",
            Self::UnexpectedTrailingData => "UNEXPECTED_TRAILING_DATA",
            Self::MissingValue(_) => "MISSING_VALUE",
            Self::UnknownKeyword(_) => "UNKNOWN_KEYWORD",
            Self::InvalidEnumValue { .. } => "INVALID_ENUM_VALUE",
            Self::UnexpectedKeyword(_) => "UNEXPECTED_KEYWORD",
            Self::DuplicateKeyword(_) => "DUPLICATE_KEYWORD",
            Self::MissingRequiredField { .. } => "MISSING_REQUIRED_FIELD",
            Self::ShapeMismatch { .. } => "SHAPE_MISMATCH",
        }
    }
}

/// A parse failure located in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}, in file {file}:{line}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Base name of the source file
    pub file: String,
    /// 1-based line number where the failure was detected
    pub line: usize,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, file: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            file: file.into(),
            line,
        }
    }
}

/// Serializable view of a parse error (for JSON reports)
#[derive(Debug, Clone, Serialize)]
pub struct ParseErrorReport {
    pub code: &'static str,
    pub message: String,
    pub file: String,
    pub line: usize,
}

impl From<&ParseError> for ParseErrorReport {
    fn from(err: &ParseError) -> Self {
        Self {
            code: err.kind.code(),
            message: err.kind.to_string(),
            file: err.file.clone(),
            line: err.line,
        }
    }
}

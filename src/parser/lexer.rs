// Line lexer for .desc files
// Splits one trimmed, non-comment line into a keyword and its typed value

use super::catalog::{self, ValueKind};
use super::error::ParseErrorKind;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Prefix of every keyword token
pub const SIGIL: char = ':';

/// Starts a comment, either a whole line or the tail of one
pub const COMMENT: char = ';';

const QUOTE: char = '"';

static KEYWORD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(KEYWORD_PATTERN).expect("invalid keyword regex"));

const KEYWORD_PATTERN: &str = r"^:([a-z]+)";

/// Typed value of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Keyword-enum value, stored without its sigil
    Keyword(String),
    Text(String),
    TextList(Vec<String>),
}

impl Value {
    /// Flatten into one string; lists are joined with single spaces
    pub fn into_text(self) -> String {
        match self {
            Value::Keyword(s) | Value::Text(s) => s,
            Value::TextList(items) => items.join(" "),
        }
    }

    pub fn into_list(self) -> Vec<String> {
        match self {
            Value::Keyword(s) | Value::Text(s) => vec![s],
            Value::TextList(items) => items,
        }
    }

    /// Value used to key a newly opened scope
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Value::Keyword(s) | Value::Text(s) => Some(s),
            Value::TextList(items) => items.first().map(String::as_str),
        }
    }
}

/// One lexed `keyword value...` line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Keyword without the leading sigil
    pub keyword: String,
    pub value: Value,
}

/// Cursor over a single line
pub struct LineLexer<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> LineLexer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    fn finish_line(&mut self) {
        self.pos = self.line.len();
    }

    /// Read `:keyword`, returning it without the sigil
    pub fn read_keyword(&mut self) -> Result<&'a str, ParseErrorKind> {
        let rest = self.rest();
        let captures = KEYWORD_REGEX
            .captures(rest)
            .ok_or(ParseErrorKind::MalformedKeyword)?;
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            return Err(ParseErrorKind::MalformedKeyword);
        };
        self.pos += whole.end();
        Ok(&rest[name.start()..name.end()])
    }

    /// Read a quoted string (unescaping `\"`) or a bareword
    pub fn read_string(&mut self) -> Result<String, ParseErrorKind> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(QUOTE) => {
                let bytes = rest.as_bytes();
                let mut end = 1;
                while end < bytes.len() && (bytes[end] != b'"' || bytes[end - 1] == b'\\') {
                    end += 1;
                }
                if end == bytes.len() {
                    return Err(ParseErrorKind::UnterminatedString);
                }
                self.pos += end + 1;
                Ok(rest[1..end].replace("\\\"", "\""))
            }
            Some(c) if c == SIGIL || c.is_whitespace() => Err(ParseErrorKind::MalformedString),
            Some(_) => {
                let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                self.pos += end;
                Ok(rest[..end].to_string())
            }
            None => Err(ParseErrorKind::MalformedString),
        }
    }

    /// Skip whitespace before the next token.
    ///
    /// Returns `Ok(false)` when nothing but a comment (or nothing at all) is left.
    /// Two upstream data quirks are tolerated here: a lone trailing `"` ends the
    /// line, and a value opening with `""` followed by a non-space character has
    /// its first quote dropped.
    pub fn consume_spaces(&mut self) -> Result<bool, ParseErrorKind> {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        let mut skipped = rest.len() - trimmed.len();

        if trimmed.is_empty() || trimmed.starts_with(COMMENT) {
            self.finish_line();
            return Ok(false);
        }

        if trimmed.len() == 1 && trimmed.starts_with(QUOTE) {
            self.finish_line();
            return Ok(false);
        }

        if trimmed.len() > 2
            && trimmed.starts_with("\"\"")
            && trimmed[2..].chars().next().is_some_and(|c| !c.is_whitespace())
        {
            skipped += 1;
        }

        if skipped == 0 {
            return Err(ParseErrorKind::ExpectedSeparator);
        }

        self.pos += skipped;
        Ok(true)
    }

    /// Anything but a comment after a scalar value is an error
    pub fn expect_empty(&mut self) -> Result<(), ParseErrorKind> {
        if self.consume_spaces()? {
            return Err(ParseErrorKind::UnexpectedTrailingData);
        }
        Ok(())
    }

    /// Read the value for `keyword` according to its catalog kind
    pub fn read_value(&mut self, keyword: &str, kind: ValueKind) -> Result<Value, ParseErrorKind> {
        let value = match kind {
            ValueKind::Keyword(allowed) => {
                let value = self.read_keyword()?;
                if !allowed.contains(&value) {
                    return Err(ParseErrorKind::InvalidEnumValue {
                        keyword: keyword.to_string(),
                        value: value.to_string(),
                    });
                }
                self.expect_empty()?;
                Value::Keyword(value.to_string())
            }
            ValueKind::Text => {
                let value = self.read_string()?;
                self.expect_empty()?;
                Value::Text(value)
            }
            ValueKind::TextList => {
                let mut items = vec![self.read_string()?];
                while self.consume_spaces()? {
                    items.push(self.read_string()?);
                }
                Value::TextList(items)
            }
        };

        // Free-text comments are sometimes split over several strings
        if keyword == "comment" && matches!(value, Value::TextList(_)) {
            return Ok(Value::Text(value.into_text()));
        }

        Ok(value)
    }
}

/// Lex one line (already trimmed, not blank, not a comment) into a token
pub fn tokenize_line(line: &str) -> Result<Token, ParseErrorKind> {
    let mut lexer = LineLexer::new(line);
    let keyword = lexer.read_keyword()?;
    let kind =
        catalog::lookup(keyword).ok_or_else(|| ParseErrorKind::UnknownKeyword(keyword.to_string()))?;

    if !lexer.consume_spaces()? {
        return Err(ParseErrorKind::MissingValue(keyword.to_string()));
    }

    let value = lexer.read_value(keyword, kind)?;
    Ok(Token {
        keyword: keyword.to_string(),
        value,
    })
}

/// True for lines the lexer never sees: blank or full-line comments
pub fn is_ignored_line(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.starts_with(COMMENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_read_keyword() {
        let mut lexer = LineLexer::new(":backend \"epson\"");
        assert_eq!(lexer.read_keyword().unwrap(), "backend");
        assert_eq!(lexer.rest(), " \"epson\"");
    }

    #[test]
    fn test_read_keyword_malformed() {
        for line in ["backend \"x\"", ":Backend x", ": x", ":", "\"x\""] {
            let mut lexer = LineLexer::new(line);
            assert_eq!(
                lexer.read_keyword(),
                Err(ParseErrorKind::MalformedKeyword),
                "line: {line}"
            );
        }
    }

    #[test]
    fn test_read_quoted_string_unescapes_quotes() {
        let mut lexer = LineLexer::new(r#""a \"quoted\" word" rest"#);
        assert_eq!(lexer.read_string().unwrap(), r#"a "quoted" word"#);
        assert_eq!(lexer.rest(), " rest");
    }

    #[test]
    fn test_read_string_bareword() {
        let mut lexer = LineLexer::new("foo bar");
        assert_eq!(lexer.read_string().unwrap(), "foo");
        assert_eq!(lexer.rest(), " bar");
    }

    #[test]
    fn test_read_string_unterminated() {
        let mut lexer = LineLexer::new("\"never closed");
        assert_eq!(lexer.read_string(), Err(ParseErrorKind::UnterminatedString));

        let mut lexer = LineLexer::new(r#""escaped at end\""#);
        assert_eq!(lexer.read_string(), Err(ParseErrorKind::UnterminatedString));
    }

    #[test]
    fn test_read_string_malformed() {
        let mut lexer = LineLexer::new(":good");
        assert_eq!(lexer.read_string(), Err(ParseErrorKind::MalformedString));
        let mut lexer = LineLexer::new(" x");
        assert_eq!(lexer.read_string(), Err(ParseErrorKind::MalformedString));
    }

    #[test]
    fn test_consume_spaces_end_and_comment() {
        let mut lexer = LineLexer::new("   ");
        assert_eq!(lexer.consume_spaces(), Ok(false));
        let mut lexer = LineLexer::new("  ; trailing remark");
        assert_eq!(lexer.consume_spaces(), Ok(false));
        let mut lexer = LineLexer::new("");
        assert_eq!(lexer.consume_spaces(), Ok(false));
    }

    #[test]
    fn test_consume_spaces_requires_separator() {
        let mut lexer = LineLexer::new("\"x\"");
        assert_eq!(lexer.consume_spaces(), Err(ParseErrorKind::ExpectedSeparator));
    }

    #[test]
    fn test_stray_trailing_quote_ends_line() {
        let mut lexer = LineLexer::new("\"");
        assert_eq!(lexer.consume_spaces(), Ok(false));

        let token = tokenize_line(r#":mfg "Canon"""#).unwrap();
        assert_eq!(token.value, text("Canon"));
    }

    #[test]
    fn test_doubled_opening_quote_is_dropped() {
        let token = tokenize_line(r#":model ""LiDE 20""#).unwrap();
        assert_eq!(token.value, text("LiDE 20"));
    }

    #[test]
    fn test_empty_string_is_not_normalized() {
        let token = tokenize_line(r#":usbid "" "0x1234""#).unwrap();
        assert_eq!(
            token.value,
            Value::TextList(vec![String::new(), "0x1234".to_string()])
        );
    }

    #[test]
    fn test_tokenize_enum_value() {
        let token = tokenize_line(":devicetype :scanner").unwrap();
        assert_eq!(token.keyword, "devicetype");
        assert_eq!(token.value, Value::Keyword("scanner".to_string()));
    }

    #[test]
    fn test_tokenize_invalid_enum_value() {
        assert_eq!(
            tokenize_line(":status :perfect"),
            Err(ParseErrorKind::InvalidEnumValue {
                keyword: "status".to_string(),
                value: "perfect".to_string(),
            })
        );
    }

    #[test]
    fn test_tokenize_unknown_keyword() {
        assert_eq!(
            tokenize_line(":vendor \"x\""),
            Err(ParseErrorKind::UnknownKeyword("vendor".to_string()))
        );
    }

    #[test]
    fn test_tokenize_trailing_data() {
        assert_eq!(
            tokenize_line(r#":backend "a" "b""#),
            Err(ParseErrorKind::UnexpectedTrailingData)
        );
        assert_eq!(
            tokenize_line(":new :yes :no"),
            Err(ParseErrorKind::UnexpectedTrailingData)
        );
    }

    #[test]
    fn test_tokenize_inline_comment() {
        let token = tokenize_line(r#":version "1.0.3" ; bumped"#).unwrap();
        assert_eq!(token.value, text("1.0.3"));
    }

    #[test]
    fn test_tokenize_missing_value() {
        assert_eq!(
            tokenize_line(":backend"),
            Err(ParseErrorKind::MissingValue("backend".to_string()))
        );
        assert_eq!(
            tokenize_line(":backend   ; nothing"),
            Err(ParseErrorKind::MissingValue("backend".to_string()))
        );
    }

    #[test]
    fn test_tokenize_glued_value() {
        assert_eq!(
            tokenize_line(r#":backend"epson""#),
            Err(ParseErrorKind::ExpectedSeparator)
        );
    }

    #[test]
    fn test_tokenize_string_list() {
        let token = tokenize_line(r#":scsi "EPSON" "GT-9000"   processor"#).unwrap();
        assert_eq!(
            token.value,
            Value::TextList(vec![
                "EPSON".to_string(),
                "GT-9000".to_string(),
                "processor".to_string()
            ])
        );
    }

    #[test]
    fn test_comment_list_is_joined() {
        let token = tokenize_line(r#":comment "works" "with" firmware 1.2"#).unwrap();
        assert_eq!(token.value, text("works with firmware 1.2"));
    }

    #[test]
    fn test_is_ignored_line() {
        assert!(is_ignored_line(""));
        assert!(is_ignored_line("; a comment"));
        assert!(!is_ignored_line(":backend x"));
    }
}

// .desc file parser
// Lexer + field catalog produce typed tokens; the document builder assembles
// them into a typed tree under the fixed hierarchy schema

pub mod ast;
pub mod builder;
pub mod catalog;
pub mod core;
pub mod error;
pub mod lexer;
pub mod schema;

pub use ast::{
    AbstractType, Device, DeviceCategory, DeviceType, Document, HardwareType, Manufacturer,
    SupportStatus,
};
pub use builder::DocumentBuilder;
pub use core::{
    ParseDiagnostics, SourceToken, file_base_name, parse_desc, parse_desc_from_str,
    parse_desc_with_diagnostics, read_tokens,
};
pub use error::{ParseError, ParseErrorKind, ParseErrorReport};
pub use lexer::{Token, Value};

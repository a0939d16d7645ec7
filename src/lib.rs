pub mod cli;
pub mod commands;
pub mod config;
pub mod loader;
pub mod logging;
pub mod parser;
pub mod query;
pub mod report;
pub mod utils;

pub use parser::parse_desc;
pub use parser::parse_desc_from_str;

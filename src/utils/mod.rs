// Shared utilities

pub mod file;

pub use file::{DESC_EXTENSION, FileUtils};

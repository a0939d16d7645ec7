// Report module - serializable command reports

pub mod diagnostics;

pub use diagnostics::{
    CheckReport, CheckSummary, Diagnostic, DiagnosticRange, DiagnosticSeverity, InspectReport,
    Position, TypeInfo,
};

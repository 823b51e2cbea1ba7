//! Report assembly and output formatting

pub mod formatter;
pub mod report;

pub use formatter::{ConsoleFormatter, JsonFormatter, MarkdownFormatter, OutputFormatter};
pub use report::{AnalysisReport, ReportMetadata};

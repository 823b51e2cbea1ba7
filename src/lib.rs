//! Resume analyzer library

pub mod ai;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeAnalyzerError};
pub use processing::{AnalysisResult, AnalysisType, RuleBasedAnalyzer};

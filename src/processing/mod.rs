//! Core analysis pipeline: text normalization, section extraction, and
//! deterministic rule-based scoring

pub mod analyzer;
pub mod result;
pub mod sections;
pub mod text_processor;

pub use analyzer::{KeywordOverlap, RuleBasedAnalyzer};
pub use result::{clamp_score, AnalysisResult, AnalysisType, SubScores};
pub use sections::{ResumeSections, SectionExtractor};
pub use text_processor::TextProcessor;

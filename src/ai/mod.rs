//! AI analysis integration
//!
//! The provider seam hands raw model text to the normalizer, which coerces
//! it into the same `AnalysisResult` shape the rule-based path produces.
//! Every failure along the way falls back to rule-based analysis.

pub mod normalizer;
pub mod provider;

pub use normalizer::{extract_score, extract_section, AiResponseNormalizer};
pub use provider::{analyze_with_fallback, AiProvider, CannedResponseProvider};

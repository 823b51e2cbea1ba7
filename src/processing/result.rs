//! Canonical analysis result type shared by the rule-based and AI paths

use crate::processing::sections::ResumeSections;
use crate::processing::text_processor::round2;
use serde::{Deserialize, Serialize};

/// Which path produced the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisType {
    #[serde(rename = "rule_based")]
    RuleBased,
    #[serde(rename = "ai")]
    Ai,
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisType::RuleBased => write!(f, "rule_based"),
            AnalysisType::Ai => write!(f, "ai"),
        }
    }
}

/// The five component scores, clamped to [0,100] at construction.
///
/// Clamping lives here rather than in callers so no score can escape the
/// valid range, whatever computed it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub skills: f32,
    pub experience: f32,
    pub education: f32,
    pub similarity: f32,
    pub keyword_match: f32,
}

impl SubScores {
    pub fn new(
        skills: f32,
        experience: f32,
        education: f32,
        similarity: f32,
        keyword_match: f32,
    ) -> Self {
        Self {
            skills: clamp_score(skills),
            experience: clamp_score(experience),
            education: clamp_score(education),
            similarity: clamp_score(similarity),
            keyword_match: clamp_score(keyword_match),
        }
    }

    /// Arithmetic mean of the five sub-scores, rounded to two decimals
    pub fn overall(&self) -> f32 {
        round2(
            (self.skills + self.experience + self.education + self.similarity + self.keyword_match)
                / 5.0,
        )
    }
}

/// Clamp a score into [0,100]. Infinities are out-of-range values and
/// clamp to the nearest bound; only NaN collapses to the 50.0 no-data
/// fallback.
pub fn clamp_score(score: f32) -> f32 {
    if score.is_nan() {
        return 50.0;
    }
    score.clamp(0.0, 100.0)
}

/// Complete analysis output. Always fully populated, even when built from a
/// partially-usable AI response. Field names are the wire contract for
/// downstream consumers and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overall_score: f32,
    pub skills_score: f32,
    pub experience_score: f32,
    pub education_score: f32,
    pub similarity_score: f32,
    pub keyword_match_percentage: f32,

    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,

    pub summary_critique: String,
    pub detailed_analysis: String,
    pub analysis_type: AnalysisType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_resume: Option<ResumeSections>,
}

impl AnalysisResult {
    /// Build a result with every numeric field derived from the clamped
    /// sub-scores. Qualitative fields start empty and are filled by the
    /// producing path.
    pub fn from_scores(scores: SubScores, analysis_type: AnalysisType) -> Self {
        Self {
            overall_score: scores.overall(),
            skills_score: scores.skills,
            experience_score: scores.experience,
            education_score: scores.education,
            similarity_score: scores.similarity,
            keyword_match_percentage: scores.keyword_match,
            matched_keywords: Vec::new(),
            missing_keywords: Vec::new(),
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            recommendations: Vec::new(),
            summary_critique: String::new(),
            detailed_analysis: String::new(),
            analysis_type,
            structured_resume: None,
        }
    }

    pub fn scores(&self) -> SubScores {
        SubScores {
            skills: self.skills_score,
            experience: self.experience_score,
            education: self.education_score,
            similarity: self.similarity_score,
            keyword_match: self.keyword_match_percentage,
        }
    }
}

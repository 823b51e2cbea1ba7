//! Normalization of free-form AI responses into analysis results
//!
//! Models return anything from clean JSON to rambling prose. The normalizer
//! tries JSON first (raw, fenced, or embedded), then falls back to regex
//! harvesting of scores and labeled sections. It only errors when the
//! response contains nothing usable at all.

use crate::error::{Result, ResumeAnalyzerError};
use crate::processing::result::{clamp_score, AnalysisResult, AnalysisType, SubScores};
use crate::processing::RuleBasedAnalyzer;
use regex::Regex;
use serde::Deserialize;

/// Fallback sub-scores when a response omits a dimension
const DEFAULT_SKILLS_SCORE: f32 = 65.0;
const DEFAULT_EXPERIENCE_SCORE: f32 = 65.0;
const DEFAULT_EDUCATION_SCORE: f32 = 70.0;

/// Extract the first captured number matching `pattern` from `text`,
/// clamped to [0,100]. Returns the clamped `default` when the pattern does
/// not match, captures nothing numeric, or fails to compile.
pub fn extract_score(text: &str, pattern: &str, default: f32) -> f32 {
    Regex::new(pattern)
        .ok()
        .and_then(|re| capture_score(text, &re))
        .unwrap_or_else(|| clamp_score(default))
}

/// First captured number matching `re`, clamped; `None` when absent. The
/// single capture/clamp implementation behind both `extract_score` and the
/// prose path.
fn capture_score(text: &str, re: &Regex) -> Option<f32> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f32>().ok())
        .map(clamp_score)
}

/// Extract the first labeled block matching `pattern` and split it into
/// bullet/line items; the block ends at the first paragraph break. Returns
/// `fallback` when the pattern is absent or the block holds no items.
pub fn extract_section(text: &str, pattern: &str, fallback: Vec<String>) -> Vec<String> {
    let found = Regex::new(pattern).ok().and_then(|re| re.find(text));
    let Some(m) = found else {
        return fallback;
    };

    let block = text[m.end()..].split("\n\n").next().unwrap_or("");
    let items = split_items(block);
    if items.is_empty() {
        fallback
    } else {
        items
    }
}

/// Lenient mirror of the result shape: every field optional so a partial
/// model response still parses.
#[derive(Debug, Default, Deserialize)]
struct RawAiAnalysis {
    overall_score: Option<f32>,
    skills_score: Option<f32>,
    experience_score: Option<f32>,
    education_score: Option<f32>,
    similarity_score: Option<f32>,
    keyword_match_percentage: Option<f32>,
    matched_keywords: Option<Vec<String>>,
    missing_keywords: Option<Vec<String>>,
    strengths: Option<Vec<String>>,
    weaknesses: Option<Vec<String>>,
    recommendations: Option<Vec<String>>,
    summary_critique: Option<String>,
    detailed_analysis: Option<String>,
}

impl RawAiAnalysis {
    /// A JSON object with none of our fields is not a usable response
    fn has_content(&self) -> bool {
        self.overall_score.is_some()
            || self.skills_score.is_some()
            || self.experience_score.is_some()
            || self.education_score.is_some()
            || self.similarity_score.is_some()
            || self.keyword_match_percentage.is_some()
            || self.matched_keywords.is_some()
            || self.missing_keywords.is_some()
            || self.strengths.is_some()
            || self.weaknesses.is_some()
            || self.recommendations.is_some()
            || self.summary_critique.is_some()
            || self.detailed_analysis.is_some()
    }
}

pub struct AiResponseNormalizer {
    analyzer: RuleBasedAnalyzer,
    fence_regex: Regex,
    overall_regex: Regex,
    skills_regex: Regex,
    experience_regex: Regex,
    education_regex: Regex,
    label_regex: Regex,
}

impl Default for AiResponseNormalizer {
    fn default() -> Self {
        Self::new(RuleBasedAnalyzer::default())
    }
}

impl AiResponseNormalizer {
    pub fn new(analyzer: RuleBasedAnalyzer) -> Self {
        let fence_regex = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```")
            .expect("Invalid code fence regex");

        // Score phrases: the dimension word, a short gap, then a number
        let overall_regex = Regex::new(r"(?i)overall[^\d]{0,30}(\d{1,3}(?:\.\d+)?)")
            .expect("Invalid overall score regex");
        let skills_regex = Regex::new(r"(?i)skills?[^\d]{0,30}(\d{1,3}(?:\.\d+)?)")
            .expect("Invalid skills score regex");
        let experience_regex = Regex::new(r"(?i)experience[^\d]{0,30}(\d{1,3}(?:\.\d+)?)")
            .expect("Invalid experience score regex");
        let education_regex = Regex::new(r"(?i)education[^\d]{0,30}(\d{1,3}(?:\.\d+)?)")
            .expect("Invalid education score regex");

        // Labeled blocks at line starts, tolerating markdown decoration
        let label_regex = Regex::new(
            r"(?im)^[\s#*>]*(strengths?|weaknesses|areas for improvement|recommendations?|suggestions?|summary)\b\s*:?",
        )
        .expect("Invalid section label regex");

        Self {
            analyzer,
            fence_regex,
            overall_regex,
            skills_regex,
            experience_regex,
            education_regex,
            label_regex,
        }
    }

    /// Coerce a raw model response into a fully-populated result.
    ///
    /// Errors with `AiParse` only when neither a JSON object with known
    /// fields nor any recognizable score or labeled section can be found;
    /// callers fall back to rule-based analysis on that error.
    pub fn parse_ai_analysis(
        &self,
        raw: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult> {
        if let Some(parsed) = self.try_json(raw) {
            return Ok(self.from_json(parsed, raw, resume_text, job_description));
        }
        self.from_prose(raw, resume_text, job_description)
    }

    /// Try the response as JSON: verbatim, inside a markdown fence, or as
    /// the outermost brace-delimited span.
    fn try_json(&self, raw: &str) -> Option<RawAiAnalysis> {
        let mut candidates: Vec<&str> = vec![raw.trim()];

        if let Some(caps) = self.fence_regex.captures(raw) {
            if let Some(m) = caps.get(1) {
                candidates.push(m.as_str());
            }
        }

        if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
            if start < end {
                candidates.push(&raw[start..=end]);
            }
        }

        candidates
            .into_iter()
            .filter_map(|candidate| serde_json::from_str::<RawAiAnalysis>(candidate).ok())
            .find(RawAiAnalysis::has_content)
    }

    fn from_json(
        &self,
        parsed: RawAiAnalysis,
        raw: &str,
        resume_text: &str,
        job_description: &str,
    ) -> AnalysisResult {
        let overlap = self.analyzer.keyword_overlap(resume_text, job_description);

        // Keyword lists only come from the model when it actually produced
        // some; otherwise they are recomputed deterministically
        let (matched, missing, keyword_match) =
            match (parsed.matched_keywords, parsed.missing_keywords) {
                (Some(matched), Some(missing)) if !(matched.is_empty() && missing.is_empty()) => {
                    let percentage = parsed
                        .keyword_match_percentage
                        .unwrap_or(overlap.match_percentage);
                    (matched, missing, percentage)
                }
                _ => (overlap.matched, overlap.missing, overlap.match_percentage),
            };

        let similarity = parsed
            .similarity_score
            .unwrap_or_else(|| self.analyzer.similarity(resume_text, job_description));

        let scores = SubScores::new(
            parsed.skills_score.unwrap_or(DEFAULT_SKILLS_SCORE),
            parsed.experience_score.unwrap_or(DEFAULT_EXPERIENCE_SCORE),
            parsed.education_score.unwrap_or(DEFAULT_EDUCATION_SCORE),
            similarity,
            keyword_match,
        );

        let mut result = AnalysisResult::from_scores(scores, AnalysisType::Ai);
        result.matched_keywords = matched;
        result.missing_keywords = missing;
        result.strengths = parsed.strengths.unwrap_or_default();
        result.weaknesses = parsed.weaknesses.unwrap_or_default();
        result.recommendations = parsed.recommendations.unwrap_or_default();
        result.summary_critique = parsed
            .summary_critique
            .unwrap_or_else(|| self.default_summary(&result));
        result.detailed_analysis = parsed
            .detailed_analysis
            .unwrap_or_else(|| raw.trim().to_string());
        result.structured_resume = Some(self.analyzer.extract_sections(resume_text));
        result
    }

    /// Harvest scores and labeled sections from prose
    fn from_prose(
        &self,
        raw: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult> {
        let skills = capture_score(raw, &self.skills_regex);
        let experience = capture_score(raw, &self.experience_regex);
        let education = capture_score(raw, &self.education_regex);
        let overall = capture_score(raw, &self.overall_regex);

        let sections = self.labeled_sections(raw);
        let strengths = sections.strengths;
        let weaknesses = sections.weaknesses;
        let recommendations = sections.recommendations;
        let summary = sections.summary;

        let any_score =
            skills.is_some() || experience.is_some() || education.is_some() || overall.is_some();
        let any_section = !strengths.is_empty()
            || !weaknesses.is_empty()
            || !recommendations.is_empty()
            || summary.is_some();

        if !any_score && !any_section {
            return Err(ResumeAnalyzerError::AiParse(
                "no scores or labeled sections recognized in response".to_string(),
            ));
        }

        let overlap = self.analyzer.keyword_overlap(resume_text, job_description);
        let similarity = self.analyzer.similarity(resume_text, job_description);

        let scores = SubScores::new(
            skills.unwrap_or(DEFAULT_SKILLS_SCORE),
            experience.unwrap_or(DEFAULT_EXPERIENCE_SCORE),
            education.unwrap_or(DEFAULT_EDUCATION_SCORE),
            similarity,
            overlap.match_percentage,
        );

        let mut result = AnalysisResult::from_scores(scores, AnalysisType::Ai);
        result.matched_keywords = overlap.matched;
        result.missing_keywords = overlap.missing;
        result.strengths = strengths;
        result.weaknesses = weaknesses;
        result.recommendations = recommendations;
        result.summary_critique = summary.unwrap_or_else(|| self.default_summary(&result));
        result.detailed_analysis = raw.trim().to_string();
        result.structured_resume = Some(self.analyzer.extract_sections(resume_text));
        Ok(result)
    }

    fn labeled_sections(&self, raw: &str) -> LabeledSections {
        let mut sections = LabeledSections::default();

        let labels: Vec<(String, usize)> = self
            .label_regex
            .find_iter(raw)
            .map(|m| {
                let label = m
                    .as_str()
                    .trim()
                    .trim_matches(|c: char| !c.is_alphabetic())
                    .to_lowercase();
                (label, m.end())
            })
            .collect();

        let ends: Vec<usize> = self
            .label_regex
            .find_iter(raw)
            .skip(1)
            .map(|m| m.start())
            .chain(std::iter::once(raw.len()))
            .collect();

        for ((label, content_start), content_end) in labels.into_iter().zip(ends) {
            let block = raw[content_start..content_end].trim();
            match label.as_str() {
                "strength" | "strengths" if sections.strengths.is_empty() => {
                    sections.strengths = split_items(block);
                }
                "weaknesses" | "areas for improvement" if sections.weaknesses.is_empty() => {
                    sections.weaknesses = split_items(block);
                }
                "recommendation" | "recommendations" | "suggestion" | "suggestions"
                    if sections.recommendations.is_empty() =>
                {
                    sections.recommendations = split_items(block);
                }
                "summary" if sections.summary.is_none() => {
                    if !block.is_empty() {
                        sections.summary = Some(block.to_string());
                    }
                }
                _ => {}
            }
        }

        sections
    }

    fn default_summary(&self, result: &AnalysisResult) -> String {
        format!(
            "AI analysis scored this resume {:.2}/100 against the job description.",
            result.overall_score
        )
    }
}

#[derive(Debug, Default)]
struct LabeledSections {
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    recommendations: Vec<String>,
    summary: Option<String>,
}

/// Split a labeled block into items, stripping bullet markers and list
/// numbering
fn split_items(block: &str) -> Vec<String> {
    block
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '•', '*', '–'])
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "SKILLS\nPython, JavaScript, React\n\nEXPERIENCE\nBuilt web applications at Example Corp using Python";
    const JOB: &str = "Looking for Python, JavaScript, and Docker expertise";

    #[test]
    fn test_extract_score_clamps_high() {
        assert_eq!(extract_score("overall: 150", r"(?i)overall[^\d]*(\d+)", 70.0), 100.0);
    }

    #[test]
    fn test_extract_score_clamps_low() {
        assert_eq!(extract_score("score: -10", r"score: (-?\d+)", 70.0), 0.0);
    }

    #[test]
    fn test_extract_score_missing_uses_default() {
        assert_eq!(extract_score("no numbers here", r"(?i)overall[^\d]*(\d+)", 70.0), 70.0);
    }

    #[test]
    fn test_extract_section_splits_items() {
        let text = "Strengths:\n- Good Python\n- Clear writing\n\nWeaknesses:\n- None";
        let items = extract_section(text, r"(?i)strengths:", vec![]);
        assert_eq!(items, vec!["Good Python", "Clear writing"]);
    }

    #[test]
    fn test_extract_section_missing_uses_fallback() {
        let fallback = vec!["default".to_string()];
        let items = extract_section("nothing labeled here", r"(?i)strengths:", fallback.clone());
        assert_eq!(items, fallback);
    }

    #[test]
    fn test_parse_json_response() {
        let normalizer = AiResponseNormalizer::default();
        let raw = r#"{
            "overall_score": 82,
            "skills_score": 85,
            "experience_score": 80,
            "education_score": 75,
            "strengths": ["Solid Python background"],
            "weaknesses": ["No container experience"],
            "recommendations": ["Learn Docker"],
            "summary_critique": "Good fit overall."
        }"#;

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        assert_eq!(result.analysis_type, AnalysisType::Ai);
        assert_eq!(result.skills_score, 85.0);
        assert_eq!(result.strengths, vec!["Solid Python background"]);
        assert_eq!(result.summary_critique, "Good fit overall.");
    }

    #[test]
    fn test_parse_json_inside_markdown_fence() {
        let normalizer = AiResponseNormalizer::default();
        let raw = "Here is my assessment:\n```json\n{\"skills_score\": 90}\n```\nHope that helps!";

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        assert_eq!(result.skills_score, 90.0);
    }

    #[test]
    fn test_json_scores_are_clamped() {
        let normalizer = AiResponseNormalizer::default();
        let raw = r#"{"skills_score": 150, "experience_score": -20}"#;

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        assert_eq!(result.skills_score, 100.0);
        assert_eq!(result.experience_score, 0.0);
    }

    #[test]
    fn test_keyword_fields_recomputed_when_absent() {
        let normalizer = AiResponseNormalizer::default();
        let raw = r#"{"overall_score": 75}"#;

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        assert!(result.matched_keywords.contains(&"python".to_string()));
        assert!(result.missing_keywords.contains(&"docker".to_string()));
    }

    #[test]
    fn test_parse_prose_response() {
        let normalizer = AiResponseNormalizer::default();
        let raw = "Overall score: 78\nSkills score: 82\n\nStrengths:\n- Strong Python skills\n- Solid frontend background\n\nWeaknesses:\n- No Docker exposure\n\nRecommendations:\n1. Learn Docker\n2. Add deployment projects";

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        assert_eq!(result.analysis_type, AnalysisType::Ai);
        assert_eq!(result.skills_score, 82.0);
        assert_eq!(result.strengths.len(), 2);
        assert_eq!(result.weaknesses, vec!["No Docker exposure"]);
        assert_eq!(result.recommendations[0], "Learn Docker");
    }

    #[test]
    fn test_prose_scores_agree_with_extract_score() {
        let normalizer = AiResponseNormalizer::default();
        let raw = "Skills assessment: 91 out of 100";

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        let helper = extract_score(raw, r"(?i)skills?[^\d]{0,30}(\d{1,3}(?:\.\d+)?)", 65.0);
        assert_eq!(result.skills_score, helper);
        assert_eq!(result.skills_score, 91.0);
    }

    #[test]
    fn test_unusable_response_is_parse_error() {
        let normalizer = AiResponseNormalizer::default();
        let err = normalizer
            .parse_ai_analysis("lorem ipsum dolor", RESUME, JOB)
            .unwrap_err();
        assert!(err.is_ai_parse());
    }

    #[test]
    fn test_overall_recomputed_as_mean() {
        let normalizer = AiResponseNormalizer::default();
        let raw = r#"{"overall_score": 1, "skills_score": 80, "experience_score": 80, "education_score": 80, "similarity_score": 80, "keyword_match_percentage": 80, "matched_keywords": ["python"], "missing_keywords": ["docker"]}"#;

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        // Model-reported overall is discarded; it is always the mean of the
        // five component scores
        assert_eq!(result.overall_score, 80.0);
    }

    #[test]
    fn test_structured_resume_populated() {
        let normalizer = AiResponseNormalizer::default();
        let raw = r#"{"overall_score": 60}"#;

        let result = normalizer.parse_ai_analysis(raw, RESUME, JOB).unwrap();
        let sections = result.structured_resume.unwrap();
        assert!(!sections.skills.is_empty());
    }
}

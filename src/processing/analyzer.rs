//! Rule-based analysis engine
//!
//! Deterministic fallback/baseline scoring of a resume against a job
//! description. No I/O, no external calls; every string input, including
//! empty text, produces a fully-populated result.

use crate::config::AnalysisConfig;
use crate::processing::result::{clamp_score, AnalysisResult, AnalysisType, SubScores};
use crate::processing::sections::{ResumeSections, SectionExtractor};
use crate::processing::text_processor::{round2, TextProcessor};
use aho_corasick::AhoCorasick;
use std::collections::HashSet;

/// Baseline credit for a non-empty experience section
const EXPERIENCE_BASELINE: f32 = 40.0;
/// Score for a resume with no detectable experience section
const EXPERIENCE_MISSING: f32 = 20.0;
/// Education score never drops below this, even when a stated degree
/// requirement is absent
const EDUCATION_FLOOR: f32 = 25.0;
/// Fallback for dimensions with no data to divide by
const NO_DATA_SCORE: f32 = 50.0;

/// Degree-level and credential terms used to spot education requirements in
/// a job description
const DEGREE_TERMS: &[&str] = &[
    "bachelor", "bachelors", "master", "masters", "phd", "doctorate", "mba", "b.s.", "m.s.",
    "b.sc", "m.sc", "degree", "diploma",
];

/// Deterministic keyword overlap between a resume and a job description.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordOverlap {
    /// Job keywords also ranked as resume keywords, in job-relevance order
    pub matched: Vec<String>,
    /// Job keywords found neither in the resume keyword set nor anywhere in
    /// the resume text
    pub missing: Vec<String>,
    /// |matched| / |job keywords| × 100; an empty job keyword set is
    /// trivially satisfied at 100.0
    pub match_percentage: f32,
}

pub struct RuleBasedAnalyzer {
    processor: TextProcessor,
    extractor: SectionExtractor,
    config: AnalysisConfig,
}

impl Default for RuleBasedAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl RuleBasedAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            processor: TextProcessor::new(),
            extractor: SectionExtractor::new(config.min_entry_length),
            config,
        }
    }

    /// Analyze a resume against a job description.
    ///
    /// Identical inputs always produce byte-identical output: keyword order
    /// follows job-relevance ranking, and every template is parameterized
    /// only by computed values.
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let sections = self.extractor.extract(resume_text);
        let job_keywords = self
            .processor
            .extract_keywords(job_description, self.config.top_keywords);

        let overlap = self.keyword_overlap(resume_text, job_description);
        let similarity = self.processor.text_similarity(resume_text, job_description);

        let scores = SubScores::new(
            self.score_skills(&sections, &job_keywords),
            self.score_experience(&sections, &job_keywords),
            self.score_education(resume_text, job_description, &sections),
            similarity,
            overlap.match_percentage,
        );

        let strengths = self.describe_strengths(&scores);
        let weaknesses = self.describe_weaknesses(&scores);
        let recommendations = self.build_recommendations(&scores, &overlap.missing);
        let summary_critique = self.summarize(&scores, &overlap);
        let detailed_analysis = self.detail(&scores, &overlap, &sections);

        let mut result = AnalysisResult::from_scores(scores, AnalysisType::RuleBased);
        result.matched_keywords = overlap.matched;
        result.missing_keywords = overlap.missing;
        result.strengths = strengths;
        result.weaknesses = weaknesses;
        result.recommendations = recommendations;
        result.summary_critique = summary_critique;
        result.detailed_analysis = detailed_analysis;
        result.structured_resume = Some(sections);
        result
    }

    /// Structured view of the resume, using this analyzer's section
    /// extraction settings
    pub fn extract_sections(&self, resume_text: &str) -> ResumeSections {
        self.extractor.extract(resume_text)
    }

    /// Full-text Jaccard similarity, scaled to [0,100]
    pub fn similarity(&self, resume_text: &str, job_description: &str) -> f32 {
        self.processor.text_similarity(resume_text, job_description)
    }

    /// Shared matched/missing/percentage computation. The AI path reuses
    /// this instead of trusting model-reported keyword lists.
    pub fn keyword_overlap(&self, resume_text: &str, job_description: &str) -> KeywordOverlap {
        let job_keywords = self
            .processor
            .extract_keywords(job_description, self.config.top_keywords);
        let resume_keywords: HashSet<String> = self
            .processor
            .extract_keywords(resume_text, self.config.top_keywords)
            .into_iter()
            .collect();

        if job_keywords.is_empty() {
            return KeywordOverlap {
                matched: Vec::new(),
                missing: Vec::new(),
                match_percentage: 100.0,
            };
        }

        let mut matched = Vec::new();
        let mut unmatched = Vec::new();
        for keyword in &job_keywords {
            if resume_keywords.contains(keyword) {
                matched.push(keyword.clone());
            } else {
                unmatched.push(keyword.clone());
            }
        }

        // Substring fallback over the full resume text catches multi-word
        // skills the tokenizer split apart, and terms below the keyword
        // ranking cutoff
        let missing = if unmatched.is_empty() {
            Vec::new()
        } else {
            let searcher = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&unmatched);
            match searcher {
                Ok(searcher) => {
                    let found: HashSet<usize> = searcher
                        .find_iter(resume_text)
                        .map(|m| m.pattern().as_usize())
                        .collect();
                    unmatched
                        .into_iter()
                        .enumerate()
                        .filter(|(idx, _)| !found.contains(idx))
                        .map(|(_, keyword)| keyword)
                        .collect()
                }
                Err(_) => unmatched,
            }
        };

        let match_percentage = round2(matched.len() as f32 / job_keywords.len() as f32 * 100.0);

        KeywordOverlap {
            matched,
            missing,
            match_percentage,
        }
    }

    /// Ratio of job keywords present among the resume's skills section
    /// tokens, widened with experience/education text so skills listed only
    /// in work history still count.
    fn score_skills(&self, sections: &ResumeSections, job_keywords: &[String]) -> f32 {
        if job_keywords.is_empty() {
            return NO_DATA_SCORE;
        }

        let haystack = format!(
            "{}\n{}\n{}",
            sections.skills_text(),
            sections.experience_text(),
            sections.education_text()
        );
        let tokens: HashSet<String> = self.processor.tokenize(&haystack).into_iter().collect();

        let hits = job_keywords
            .iter()
            .filter(|keyword| tokens.contains(*keyword))
            .count();

        round2(hits as f32 / job_keywords.len() as f32 * 100.0)
    }

    /// Baseline credit for having an experience section, a small length
    /// credit per entry, and the rest from keyword overlap with the job
    /// description.
    fn score_experience(&self, sections: &ResumeSections, job_keywords: &[String]) -> f32 {
        let experience_text = sections.experience_text();
        if experience_text.trim().is_empty() {
            return EXPERIENCE_MISSING;
        }

        let mut score = EXPERIENCE_BASELINE;
        score += (sections.experience.len() as f32 * 10.0).min(20.0);

        if job_keywords.is_empty() {
            // Nothing to match against; half of the overlap credit
            score += 20.0;
        } else {
            let tokens: HashSet<String> = self
                .processor
                .tokenize(&experience_text)
                .into_iter()
                .collect();
            let hits = job_keywords
                .iter()
                .filter(|keyword| tokens.contains(*keyword))
                .count();
            score += hits as f32 / job_keywords.len() as f32 * 40.0;
        }

        round2(clamp_score(score))
    }

    /// Baseline credit for a non-empty education section, adjusted by
    /// whether degree requirements stated in the job description show up in
    /// the resume. Never drops below the floor.
    fn score_education(
        &self,
        resume_text: &str,
        job_description: &str,
        sections: &ResumeSections,
    ) -> f32 {
        let education_text = sections.education_text().to_lowercase();
        let job_lower = job_description.to_lowercase();
        let resume_lower = resume_text.to_lowercase();

        let required_terms: Vec<&&str> = DEGREE_TERMS
            .iter()
            .filter(|term| job_lower.contains(*(*term)))
            .collect();

        let mut score = if education_text.trim().is_empty() {
            30.0
        } else {
            60.0
        };

        if required_terms.is_empty() {
            if !education_text.trim().is_empty() {
                score += 10.0;
            }
        } else if required_terms
            .iter()
            .any(|term| education_text.contains(*(*term)))
        {
            score += 25.0;
        } else if !required_terms
            .iter()
            .any(|term| resume_lower.contains(*(*term)))
        {
            score -= 20.0;
        }

        round2(clamp_score(score).max(EDUCATION_FLOOR))
    }

    fn describe_strengths(&self, scores: &SubScores) -> Vec<String> {
        let threshold = self.config.strength_threshold;
        let mut strengths = Vec::new();

        if scores.skills >= threshold {
            strengths.push(format!(
                "Skills closely match the job requirements ({:.1}% of job keywords covered).",
                scores.skills
            ));
        }
        if scores.experience >= threshold {
            strengths.push(
                "Work experience is substantial and aligns with the role described.".to_string(),
            );
        }
        if scores.education >= threshold {
            strengths
                .push("Educational background satisfies the stated requirements.".to_string());
        }
        if scores.similarity >= threshold {
            strengths.push(
                "Overall resume language mirrors the job description closely.".to_string(),
            );
        }
        if scores.keyword_match >= threshold {
            strengths.push(format!(
                "Strong keyword coverage: {:.1}% of the job's key terms appear in the resume.",
                scores.keyword_match
            ));
        }

        strengths
    }

    fn describe_weaknesses(&self, scores: &SubScores) -> Vec<String> {
        let threshold = self.config.weakness_threshold;
        let mut weaknesses = Vec::new();

        if scores.skills < threshold {
            weaknesses.push(format!(
                "Only {:.1}% of the job's keywords appear in the skills and experience sections.",
                scores.skills
            ));
        }
        if scores.experience < threshold {
            weaknesses.push(
                "The experience section is thin or does not reflect the role's requirements."
                    .to_string(),
            );
        }
        if scores.education < threshold {
            weaknesses.push(
                "The education section is missing or does not address the stated requirements."
                    .to_string(),
            );
        }
        if scores.similarity < threshold {
            weaknesses.push(format!(
                "Low textual overlap with the job description ({:.1}% similarity).",
                scores.similarity
            ));
        }
        if scores.keyword_match < threshold {
            weaknesses.push(format!(
                "Keyword coverage is {:.1}%; important terms from the posting are absent.",
                scores.keyword_match
            ));
        }

        weaknesses
    }

    fn build_recommendations(&self, scores: &SubScores, missing: &[String]) -> Vec<String> {
        let mut recommendations = Vec::new();

        for keyword in missing.iter().take(self.config.max_keyword_recommendations) {
            recommendations.push(format!(
                "Add '{}' to your resume if you have experience with it.",
                keyword
            ));
        }

        let threshold = self.config.weakness_threshold;
        if scores.skills < threshold {
            recommendations.push(
                "Expand the skills section with the technologies the posting asks for."
                    .to_string(),
            );
        }
        if scores.experience < threshold {
            recommendations.push(
                "Describe concrete accomplishments in past roles that relate to this job."
                    .to_string(),
            );
        }
        if scores.education < threshold {
            recommendations.push(
                "List your education, including degree, field of study, and institution."
                    .to_string(),
            );
        }
        if scores.keyword_match < threshold {
            recommendations.push(
                "Mirror the job posting's terminology where it accurately describes your background."
                    .to_string(),
            );
        }

        recommendations
    }

    fn summarize(&self, scores: &SubScores, overlap: &KeywordOverlap) -> String {
        let overall = scores.overall();
        let verdict = match overall {
            s if s >= 80.0 => "a strong match",
            s if s >= 70.0 => "a good match with minor gaps",
            s if s >= 60.0 => "a moderate match needing targeted improvements",
            _ => "a weak match requiring significant revisions",
        };

        format!(
            "Rule-based screening scored this resume {:.2}/100 against the job description, {}. \
             {} of the job's key terms were matched and {} were not found in the resume.",
            overall,
            verdict,
            overlap.matched.len(),
            overlap.missing.len()
        )
    }

    fn detail(
        &self,
        scores: &SubScores,
        overlap: &KeywordOverlap,
        sections: &ResumeSections,
    ) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "Skills alignment scored {:.2}: the skills and work-history sections were checked \
             against the job description's ranked keywords.",
            scores.skills
        ));
        lines.push(format!(
            "Experience scored {:.2} across {} extracted entr{}.",
            scores.experience,
            sections.experience.len(),
            if sections.experience.len() == 1 { "y" } else { "ies" }
        ));
        lines.push(format!(
            "Education scored {:.2} based on section presence and stated degree requirements.",
            scores.education
        ));
        lines.push(format!(
            "Full-text similarity (Jaccard) between resume and posting is {:.2}%.",
            scores.similarity
        ));
        lines.push(format!(
            "Keyword coverage is {:.2}% ({} matched, {} missing).",
            scores.keyword_match,
            overlap.matched.len(),
            overlap.missing.len()
        ));
        if !overlap.missing.is_empty() {
            lines.push(format!(
                "Top missing terms: {}.",
                overlap
                    .missing
                    .iter()
                    .take(self.config.max_keyword_recommendations)
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        lines.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str = "\
John Doe
Email: john.doe@email.com
Phone: 555-123-4567

SUMMARY
Seasoned software engineer focused on building web platforms.

SKILLS
Python, JavaScript, React, Node.js, MongoDB, PostgreSQL

EXPERIENCE
Software Engineer at Tech Corp (2020-2024)
- Developed web applications using React and Node.js with Python services
- Implemented RESTful APIs backed by MongoDB and PostgreSQL

EDUCATION
Bachelor of Science in Computer Science, University of Technology (2016-2020)
";

    const SAMPLE_JOB: &str = "\
We need a Software Engineer who knows:
- Python and JavaScript
- React and Node.js
- RESTful API development
- MongoDB and PostgreSQL
A bachelor degree in computer science is required.
";

    #[test]
    fn test_analyze_populates_every_field() {
        let analyzer = RuleBasedAnalyzer::default();
        let result = analyzer.analyze(SAMPLE_RESUME, SAMPLE_JOB);

        assert_eq!(result.analysis_type, AnalysisType::RuleBased);
        assert!(!result.summary_critique.is_empty());
        assert!(!result.detailed_analysis.is_empty());
        assert!(result.structured_resume.is_some());
        assert!(!result.matched_keywords.is_empty());
    }

    #[test]
    fn test_all_scores_bounded() {
        let analyzer = RuleBasedAnalyzer::default();
        let result = analyzer.analyze(SAMPLE_RESUME, SAMPLE_JOB);

        for score in [
            result.overall_score,
            result.skills_score,
            result.experience_score,
            result.education_score,
            result.similarity_score,
            result.keyword_match_percentage,
        ] {
            assert!((0.0..=100.0).contains(&score), "score out of range: {}", score);
        }
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let analyzer = RuleBasedAnalyzer::default();
        let first = analyzer.analyze(SAMPLE_RESUME, SAMPLE_JOB);
        let second = analyzer.analyze(SAMPLE_RESUME, SAMPLE_JOB);
        assert_eq!(first, second);
    }

    #[test]
    fn test_analyze_total_on_empty_inputs() {
        let analyzer = RuleBasedAnalyzer::default();

        for (resume, job) in [("", ""), (SAMPLE_RESUME, ""), ("", SAMPLE_JOB)] {
            let result = analyzer.analyze(resume, job);
            assert!((0.0..=100.0).contains(&result.overall_score));
            assert_eq!(result.analysis_type, AnalysisType::RuleBased);
        }
    }

    #[test]
    fn test_empty_job_keywords_trivially_satisfied() {
        let analyzer = RuleBasedAnalyzer::default();
        let result = analyzer.analyze(SAMPLE_RESUME, "");
        assert_eq!(result.keyword_match_percentage, 100.0);
    }

    #[test]
    fn test_matched_and_missing_keywords() {
        let analyzer = RuleBasedAnalyzer::default();
        let overlap = analyzer.keyword_overlap(
            "Skilled in Python, JavaScript, React, and Node.js development",
            "Looking for Python, JavaScript, and Docker expertise",
        );

        assert!(overlap.matched.contains(&"python".to_string()));
        assert!(overlap.matched.contains(&"javascript".to_string()));
        assert!(overlap.missing.contains(&"docker".to_string()));
    }

    #[test]
    fn test_substring_fallback_excludes_found_terms() {
        let analyzer = RuleBasedAnalyzer::default();
        // "kubernetes" appears only once in a long resume, so it may miss
        // the keyword ranking cut, but substring search still finds it
        let resume = "Cloud engineer. Deployed workloads to kubernetes clusters. \
                      aws aws aws terraform terraform docker docker python python python";
        let overlap = analyzer.keyword_overlap(resume, "kubernetes experience required");
        assert!(!overlap.missing.contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_missing_experience_scores_low() {
        let analyzer = RuleBasedAnalyzer::default();
        let resume = "SKILLS\nPython, Rust";
        let result = analyzer.analyze(resume, SAMPLE_JOB);
        assert_eq!(result.experience_score, EXPERIENCE_MISSING);
    }

    #[test]
    fn test_education_floor_holds() {
        let analyzer = RuleBasedAnalyzer::default();
        let result = analyzer.analyze(
            "SKILLS\nWelding",
            "A master degree in metallurgy is required.",
        );
        assert!(result.education_score >= EDUCATION_FLOOR);
    }

    #[test]
    fn test_degree_match_raises_education_score() {
        let analyzer = RuleBasedAnalyzer::default();
        let without_degree = analyzer.analyze(
            "EDUCATION\nAttended evening courses at the local community center",
            "Bachelor degree required",
        );
        let with_degree = analyzer.analyze(
            "EDUCATION\nBachelor of Science in Computer Science, University of Technology",
            "Bachelor degree required",
        );
        assert!(with_degree.education_score > without_degree.education_score);
    }

    #[test]
    fn test_strengths_and_weaknesses_follow_thresholds() {
        let analyzer = RuleBasedAnalyzer::default();
        let result = analyzer.analyze("completely unrelated text", SAMPLE_JOB);

        assert!(!result.weaknesses.is_empty());
        assert!(!result.recommendations.is_empty());
    }

    #[test]
    fn test_recommendation_cap() {
        let analyzer = RuleBasedAnalyzer::default();
        let job = "haskell erlang clojure fortran cobol prolog smalltalk scheme racket idris";
        let result = analyzer.analyze("I write documentation", job);

        let keyword_recs = result
            .recommendations
            .iter()
            .filter(|r| r.starts_with("Add '"))
            .count();
        assert!(keyword_recs <= analyzer.config.max_keyword_recommendations);
    }
}

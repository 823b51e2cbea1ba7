//! AI provider seam and the mandatory rule-based fallback chain

use crate::ai::normalizer::AiResponseNormalizer;
use crate::error::{Result, ResumeAnalyzerError};
use crate::processing::{AnalysisResult, RuleBasedAnalyzer};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Source of raw AI analysis text. Implementations return the model's
/// response verbatim; normalization happens downstream.
pub trait AiProvider {
    fn analyze(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> impl std::future::Future<Output = Result<String>> + Send;

    fn name(&self) -> &str;
}

/// Replays a saved model response from disk.
///
/// Lets the full AI normalization and fallback path run without network
/// access, both from the CLI and in tests.
pub struct CannedResponseProvider {
    path: PathBuf,
}

impl CannedResponseProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl AiProvider for CannedResponseProvider {
    async fn analyze(&self, _resume_text: &str, _job_description: &str) -> Result<String> {
        let response = fs::read_to_string(&self.path).await.map_err(|e| {
            ResumeAnalyzerError::AiProvider(format!(
                "Failed to read saved response '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        Ok(response)
    }

    fn name(&self) -> &str {
        "canned-response"
    }
}

/// Run AI analysis with the mandatory rule-based fallback.
///
/// Never fails: a provider error or an unusable response is logged and the
/// deterministic analyzer produces the result instead.
pub async fn analyze_with_fallback<P: AiProvider>(
    provider: &P,
    normalizer: &AiResponseNormalizer,
    fallback: &RuleBasedAnalyzer,
    resume_text: &str,
    job_description: &str,
) -> AnalysisResult {
    match provider.analyze(resume_text, job_description).await {
        Ok(raw) => match normalizer.parse_ai_analysis(&raw, resume_text, job_description) {
            Ok(result) => result,
            Err(e) => {
                log::warn!(
                    "AI response from '{}' was unusable ({}); falling back to rule-based analysis",
                    provider.name(),
                    e
                );
                fallback.analyze(resume_text, job_description)
            }
        },
        Err(e) => {
            log::warn!(
                "AI provider '{}' failed ({}); falling back to rule-based analysis",
                provider.name(),
                e
            );
            fallback.analyze(resume_text, job_description)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::AnalysisType;
    use std::io::Write;

    struct FailingProvider;

    impl AiProvider for FailingProvider {
        async fn analyze(&self, _resume: &str, _job: &str) -> Result<String> {
            Err(ResumeAnalyzerError::AiProvider(
                "connection refused".to_string(),
            ))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct GibberishProvider;

    impl AiProvider for GibberishProvider {
        async fn analyze(&self, _resume: &str, _job: &str) -> Result<String> {
            Ok("lorem ipsum dolor".to_string())
        }

        fn name(&self) -> &str {
            "gibberish"
        }
    }

    const RESUME: &str = "SKILLS\nPython, JavaScript";
    const JOB: &str = "Python and Docker required";

    #[tokio::test]
    async fn test_provider_error_falls_back_to_rule_based() {
        let result = analyze_with_fallback(
            &FailingProvider,
            &AiResponseNormalizer::default(),
            &RuleBasedAnalyzer::default(),
            RESUME,
            JOB,
        )
        .await;

        assert_eq!(result.analysis_type, AnalysisType::RuleBased);
    }

    #[tokio::test]
    async fn test_unusable_response_falls_back_to_rule_based() {
        let result = analyze_with_fallback(
            &GibberishProvider,
            &AiResponseNormalizer::default(),
            &RuleBasedAnalyzer::default(),
            RESUME,
            JOB,
        )
        .await;

        assert_eq!(result.analysis_type, AnalysisType::RuleBased);
    }

    #[tokio::test]
    async fn test_canned_response_produces_ai_result() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"overall_score": 80, "skills_score": 85}}"#).unwrap();

        let provider = CannedResponseProvider::new(file.path());
        let result = analyze_with_fallback(
            &provider,
            &AiResponseNormalizer::default(),
            &RuleBasedAnalyzer::default(),
            RESUME,
            JOB,
        )
        .await;

        assert_eq!(result.analysis_type, AnalysisType::Ai);
        assert_eq!(result.skills_score, 85.0);
    }

    #[tokio::test]
    async fn test_missing_canned_file_falls_back() {
        let provider = CannedResponseProvider::new("/nonexistent/response.txt");
        let result = analyze_with_fallback(
            &provider,
            &AiResponseNormalizer::default(),
            &RuleBasedAnalyzer::default(),
            RESUME,
            JOB,
        )
        .await;

        assert_eq!(result.analysis_type, AnalysisType::RuleBased);
    }
}

//! Analysis report structure

use crate::processing::AnalysisResult;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// An analysis result plus the run context it was produced in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: String,
    pub resume_path: String,
    pub job_path: String,
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn new(
        result: AnalysisResult,
        resume_path: &Path,
        job_path: &Path,
        processing_time_ms: u64,
    ) -> Self {
        Self {
            result,
            metadata: ReportMetadata {
                generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
                resume_path: resume_path.display().to_string(),
                job_path: job_path.display().to_string(),
                processing_time_ms,
            },
        }
    }
}

//! Report formatters: colored console, JSON, and markdown

use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::report::AnalysisReport;
use colored::{Color, Colorize};

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colored score bands
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter preserving the wire field names verbatim
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown formatter for saved reports
pub struct MarkdownFormatter;

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self {
            use_colors,
            detailed,
        }
    }

    fn score_color(score: f32) -> Color {
        match score {
            s if s >= 80.0 => Color::Green,
            s if s >= 60.0 => Color::Yellow,
            _ => Color::Red,
        }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn header(&self, title: &str) -> String {
        if self.use_colors {
            format!("\n{}\n", title.cyan().bold())
        } else {
            format!("\n{}\n", title)
        }
    }

    fn score_line(&self, label: &str, score: f32) -> String {
        let value = format!("{:.2}", score);
        format!(
            "  {:<22} {}\n",
            label,
            self.colorize(&value, Self::score_color(score))
        )
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str(&self.header("📊 RESUME ANALYSIS"));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms | Mode: {}\n",
            report.metadata.generated_at,
            report.metadata.processing_time_ms,
            result.analysis_type
        ));

        output.push_str(&self.header("Overall"));
        output.push_str(&self.score_line("Overall Score:", result.overall_score));

        output.push_str(&self.header("Score Breakdown"));
        output.push_str(&self.score_line("Skills:", result.skills_score));
        output.push_str(&self.score_line("Experience:", result.experience_score));
        output.push_str(&self.score_line("Education:", result.education_score));
        output.push_str(&self.score_line("Text Similarity:", result.similarity_score));
        output.push_str(&self.score_line("Keyword Coverage:", result.keyword_match_percentage));

        if !result.matched_keywords.is_empty() {
            output.push_str(&self.header("✅ Matched Keywords"));
            output.push_str(&format!("  {}\n", result.matched_keywords.join(", ")));
        }
        if !result.missing_keywords.is_empty() {
            output.push_str(&self.header("❌ Missing Keywords"));
            output.push_str(&format!("  {}\n", result.missing_keywords.join(", ")));
        }

        if !result.strengths.is_empty() {
            output.push_str(&self.header("💪 Strengths"));
            for strength in &result.strengths {
                output.push_str(&format!("  • {}\n", self.colorize(strength, Color::Green)));
            }
        }
        if !result.weaknesses.is_empty() {
            output.push_str(&self.header("🎯 Areas to Improve"));
            for weakness in &result.weaknesses {
                output.push_str(&format!("  • {}\n", self.colorize(weakness, Color::Yellow)));
            }
        }
        if !result.recommendations.is_empty() {
            output.push_str(&self.header("📋 Recommendations"));
            for (idx, recommendation) in result.recommendations.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", idx + 1, recommendation));
            }
        }

        output.push_str(&self.header("Summary"));
        output.push_str(&format!("{}\n", result.summary_critique));

        if self.detailed {
            output.push_str(&self.header("📊 Detailed Analysis"));
            output.push_str(&format!("{}\n", result.detailed_analysis));

            if let Some(sections) = &result.structured_resume {
                output.push_str(&self.header("Extracted Resume Structure"));
                if !sections.email.is_empty() {
                    output.push_str(&format!("  Email: {}\n", sections.email));
                }
                if !sections.phone.is_empty() {
                    output.push_str(&format!("  Phone: {}\n", sections.phone));
                }
                output.push_str(&format!("  Skills found: {}\n", sections.skills.len()));
                output.push_str(&format!(
                    "  Experience entries: {}\n",
                    sections.experience.len()
                ));
                output.push_str(&format!(
                    "  Education entries: {}\n",
                    sections.education.len()
                ));
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let result = &report.result;
        let mut output = String::new();

        output.push_str("# 📊 Resume Analysis Report\n\n");
        output.push_str(&format!(
            "**Generated:** {} | **Processing Time:** {}ms | **Mode:** {}\n\n",
            report.metadata.generated_at,
            report.metadata.processing_time_ms,
            result.analysis_type
        ));
        output.push_str(&format!(
            "**Resume:** `{}` | **Job:** `{}`\n\n",
            report.metadata.resume_path, report.metadata.job_path
        ));

        output.push_str("## Scores\n\n");
        output.push_str("| Dimension | Score |\n");
        output.push_str("|-----------|-------|\n");
        output.push_str(&format!("| Overall | {:.2} |\n", result.overall_score));
        output.push_str(&format!("| Skills | {:.2} |\n", result.skills_score));
        output.push_str(&format!("| Experience | {:.2} |\n", result.experience_score));
        output.push_str(&format!("| Education | {:.2} |\n", result.education_score));
        output.push_str(&format!("| Text Similarity | {:.2} |\n", result.similarity_score));
        output.push_str(&format!(
            "| Keyword Coverage | {:.2} |\n\n",
            result.keyword_match_percentage
        ));

        if !result.matched_keywords.is_empty() {
            output.push_str("## ✅ Matched Keywords\n\n");
            output.push_str(&format!("{}\n\n", result.matched_keywords.join(", ")));
        }
        if !result.missing_keywords.is_empty() {
            output.push_str("## ❌ Missing Keywords\n\n");
            output.push_str(&format!("{}\n\n", result.missing_keywords.join(", ")));
        }

        if !result.strengths.is_empty() {
            output.push_str("## 💪 Strengths\n\n");
            for strength in &result.strengths {
                output.push_str(&format!("- {}\n", strength));
            }
            output.push('\n');
        }
        if !result.weaknesses.is_empty() {
            output.push_str("## 🎯 Areas to Improve\n\n");
            for weakness in &result.weaknesses {
                output.push_str(&format!("- {}\n", weakness));
            }
            output.push('\n');
        }
        if !result.recommendations.is_empty() {
            output.push_str("## 📋 Recommendations\n\n");
            for (idx, recommendation) in result.recommendations.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", idx + 1, recommendation));
            }
            output.push('\n');
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!("{}\n\n", result.summary_critique));
        output.push_str("## Detailed Analysis\n\n");
        output.push_str(&format!("{}\n", result.detailed_analysis));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

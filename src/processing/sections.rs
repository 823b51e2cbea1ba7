//! Resume section extraction
//!
//! Resumes have no fixed grammar, so sections are anchored on a closed
//! vocabulary of header synonyms; a section spans from just after its header
//! to the next recognized header or the end of the document. Nonstandard
//! headers mis-segment, which is the accepted failure mode.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured view of a resume, built once per document and never mutated.
///
/// Missing sections are empty strings or empty lists, never absent fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSections {
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub education: Vec<String>,
}

impl ResumeSections {
    pub fn skills_text(&self) -> String {
        self.skills.join(", ")
    }

    pub fn experience_text(&self) -> String {
        self.experience.join("\n")
    }

    pub fn education_text(&self) -> String {
        self.education.join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SectionKind {
    Summary,
    Skills,
    Experience,
    Education,
}

/// Header synonyms recognized as section anchors. Longer synonyms are
/// matched before their shorter substrings ("work experience" before
/// "experience").
const HEADER_SYNONYMS: &[(&str, SectionKind)] = &[
    ("professional experience", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("academic background", SectionKind::Education),
    ("technical skills", SectionKind::Skills),
    ("core competencies", SectionKind::Skills),
    ("qualifications", SectionKind::Education),
    ("experience", SectionKind::Experience),
    ("employment", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("objective", SectionKind::Summary),
    ("expertise", SectionKind::Skills),
    ("summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("skills", SectionKind::Skills),
];

pub struct SectionExtractor {
    email_regex: Regex,
    phone_regex: Regex,
    header_regex: Regex,
    item_split_regex: Regex,
    min_entry_length: usize,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(25)
    }
}

impl SectionExtractor {
    pub fn new(min_entry_length: usize) -> Self {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("Invalid email regex");

        let phone_regex =
            Regex::new(r"\b(?:\+?1[-. ]?)?\(?[0-9]{3}\)?[-. ]?[0-9]{3}[-. ]?[0-9]{4}\b")
                .expect("Invalid phone regex");

        let alternation = HEADER_SYNONYMS
            .iter()
            .map(|(synonym, _)| regex::escape(synonym))
            .collect::<Vec<_>>()
            .join("|");
        let header_regex = Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
            .expect("Invalid section header regex");

        // Bullet markers, numeric list markers, or runs of 2+ spaces after a
        // line break delimit individual entries
        let item_split_regex =
            Regex::new(r"\n(?:[-•*\d.)\s]+|\s{2,})").expect("Invalid item split regex");

        Self {
            email_regex,
            phone_regex,
            header_regex,
            item_split_regex,
            min_entry_length,
        }
    }

    /// Extract labeled sections from raw resume text. Total: any string
    /// input, including empty, yields a fully-populated `ResumeSections`.
    pub fn extract(&self, text: &str) -> ResumeSections {
        let mut sections = ResumeSections {
            email: self
                .email_regex
                .find(text)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            phone: self
                .phone_regex
                .find(text)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            ..ResumeSections::default()
        };

        let headers: Vec<(SectionKind, usize, usize)> = self
            .header_regex
            .find_iter(text)
            .filter_map(|m| {
                Self::kind_for_header(m.as_str()).map(|kind| (kind, m.start(), m.end()))
            })
            .collect();

        for (idx, (kind, _, content_start)) in headers.iter().enumerate() {
            let content_end = headers
                .get(idx + 1)
                .map(|(_, next_start, _)| *next_start)
                .unwrap_or(text.len());
            let content = text[*content_start..content_end].trim();

            // Earliest header in document order wins for each section
            match kind {
                SectionKind::Summary if sections.summary.is_empty() => {
                    sections.summary = content.to_string();
                }
                SectionKind::Skills if sections.skills.is_empty() => {
                    sections.skills = Self::split_skills(content);
                }
                SectionKind::Experience if sections.experience.is_empty() => {
                    sections.experience = self.split_entries(content);
                }
                SectionKind::Education if sections.education.is_empty() => {
                    sections.education = self.split_entries(content);
                }
                _ => {}
            }
        }

        sections
    }

    fn kind_for_header(matched: &str) -> Option<SectionKind> {
        let lowered = matched.to_lowercase();
        HEADER_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == lowered)
            .map(|(_, kind)| *kind)
    }

    /// Skills are comma- or newline-separated short phrases
    fn split_skills(content: &str) -> Vec<String> {
        content
            .split(|c| c == ',' || c == '\n')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Split narrative sections into entries, discarding stray short lines
    /// (dates, separators). When nothing survives the split the whole
    /// content is kept as a single entry.
    fn split_entries(&self, content: &str) -> Vec<String> {
        if content.is_empty() {
            return Vec::new();
        }

        let items: Vec<String> = self
            .item_split_regex
            .split(content)
            .map(str::trim)
            .filter(|item| item.chars().count() > self.min_entry_length)
            .map(str::to_string)
            .collect();

        if items.is_empty() {
            vec![content.to_string()]
        } else {
            items
        }
    }
}

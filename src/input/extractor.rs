//! Text extraction from resume and job description files

use crate::error::{Result, ResumeAnalyzerError};
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Text,
    Markdown,
}

impl FileKind {
    /// Determine the file kind from its extension; `.txt` and
    /// extension-less files are treated as plain text.
    pub fn detect(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(FileKind::Pdf),
            "md" | "markdown" => Ok(FileKind::Markdown),
            "txt" | "text" | "" => Ok(FileKind::Text),
            other => Err(ResumeAnalyzerError::UnsupportedFormat(format!(
                "'{}' files are not supported (expected pdf, txt, or md): {}",
                other,
                path.display()
            ))),
        }
    }
}

/// Load a document and extract its plain text.
pub async fn extract_text(path: &Path) -> Result<String> {
    let kind = FileKind::detect(path)?;
    log::debug!("Extracting text from {} as {:?}", path.display(), kind);

    let text = match kind {
        FileKind::Pdf => extract_pdf(path).await?,
        FileKind::Text => fs::read_to_string(path).await?,
        FileKind::Markdown => {
            let markdown = fs::read_to_string(path).await?;
            strip_markdown(&markdown)
        }
    };

    if text.trim().is_empty() {
        return Err(ResumeAnalyzerError::InvalidInput(format!(
            "No text content found in {}",
            path.display()
        )));
    }

    Ok(text)
}

async fn extract_pdf(path: &Path) -> Result<String> {
    let bytes = fs::read(path).await?;

    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        ResumeAnalyzerError::PdfExtraction(format!(
            "Failed to extract text from '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Reduce markdown to its text content, keeping line structure so section
/// headers still land at line starts.
fn strip_markdown(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(content) | Event::Code(content) => text.push_str(&content),
            Event::SoftBreak | Event::HardBreak => text.push('\n'),
            // Only block-level ends break lines; inline emphasis must not
            // split a paragraph
            Event::End(
                Tag::Paragraph
                | Tag::Heading(..)
                | Tag::Item
                | Tag::BlockQuote
                | Tag::CodeBlock(_)
                | Tag::TableRow,
            ) => {
                if !text.ends_with('\n') {
                    text.push('\n');
                }
            }
            _ => {}
        }
    }

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(FileKind::detect(Path::new("resume.pdf")).unwrap(), FileKind::Pdf);
        assert_eq!(FileKind::detect(Path::new("resume.txt")).unwrap(), FileKind::Text);
        assert_eq!(FileKind::detect(Path::new("resume.md")).unwrap(), FileKind::Markdown);
        assert_eq!(FileKind::detect(Path::new("RESUME.PDF")).unwrap(), FileKind::Pdf);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = FileKind::detect(Path::new("resume.docx")).unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_no_extension_treated_as_text() {
        assert_eq!(FileKind::detect(Path::new("resume")).unwrap(), FileKind::Text);
    }

    #[tokio::test]
    async fn test_extract_plain_text() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "SKILLS\nPython, Rust").unwrap();

        let text = extract_text(file.path()).await.unwrap();
        assert!(text.contains("Python"));
    }

    #[tokio::test]
    async fn test_empty_file_rejected() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = extract_text(file.path()).await.unwrap_err();
        assert!(matches!(err, ResumeAnalyzerError::InvalidInput(_)));
    }

    #[test]
    fn test_strip_markdown_keeps_headers_on_own_lines() {
        let text = strip_markdown("## SKILLS\n\n- Python\n- **Rust**\n");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "SKILLS");
        assert!(lines.contains(&"Python"));
        assert!(lines.contains(&"Rust"));
    }
}

//! Document loading: file type detection and text extraction

pub mod extractor;

pub use extractor::{extract_text, FileKind};

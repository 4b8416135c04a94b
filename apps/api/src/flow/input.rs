//! Input collector: pasted text or one imported plain-text file.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;

/// Submission stays disabled below this many characters.
pub const MIN_RESUME_CHARS: usize = 50;

const ACCEPTED_EXTENSIONS: &[&str] = &["txt", "md"];
const PLAIN_TEXT_MIME: &str = "text/plain";
const UTF8_BOM: &str = "\u{feff}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("'{0}' is not supported: only .txt or .md files can be imported, or paste the text directly")]
    UnsupportedFileType(String),

    #[error("'{0}' is not readable as UTF-8 text")]
    NotText(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The file replaced the previous text.
    Replaced { chars: usize },
    /// The file was empty; the previous text is untouched.
    Empty,
}

/// Accepts `.txt`/`.md` by extension (any case) or a declared `text/plain` type.
pub fn is_supported_file(file_name: &str, content_type: Option<&str>) -> bool {
    let by_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        });

    let by_mime = content_type
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(PLAIN_TEXT_MIME));

    by_extension || by_mime
}

#[derive(Debug, Clone, Default)]
pub struct InputCollector {
    text: String,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn can_submit(&self) -> bool {
        self.char_count() >= MIN_RESUME_CHARS
    }

    pub fn set_text(&mut self, text: String) {
        self.text = text;
    }

    /// Reads an uploaded file. On any error the current text is left as is.
    pub fn import_file(
        &mut self,
        file_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<ImportOutcome, InputError> {
        if !is_supported_file(file_name, content_type) {
            return Err(InputError::UnsupportedFileType(file_name.to_string()));
        }

        let decoded = std::str::from_utf8(bytes)
            .map_err(|_| InputError::NotText(file_name.to_string()))?;
        let decoded = decoded.strip_prefix(UTF8_BOM).unwrap_or(decoded);

        if decoded.is_empty() {
            return Ok(ImportOutcome::Empty);
        }

        self.text = decoded.to_string();
        Ok(ImportOutcome::Replaced {
            chars: self.char_count(),
        })
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            text: self.text.clone(),
            char_count: self.char_count(),
            min_chars: MIN_RESUME_CHARS,
            can_submit: self.can_submit(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InputSnapshot {
    pub text: String,
    pub char_count: usize,
    pub min_chars: usize,
    pub can_submit: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(text: &str) -> InputCollector {
        let mut input = InputCollector::new();
        input.set_text(text.to_string());
        input
    }

    #[test]
    fn test_threshold_is_fifty_characters() {
        assert!(!filled(&"a".repeat(49)).can_submit());
        assert!(filled(&"a".repeat(50)).can_submit());
        assert!(!InputCollector::new().can_submit());
    }

    #[test]
    fn test_threshold_counts_characters_not_bytes() {
        // 20 CJK characters are 60 bytes but only 20 characters.
        let input = filled(&"简".repeat(20));
        assert_eq!(input.char_count(), 20);
        assert!(!input.can_submit());
        assert!(filled(&"历".repeat(50)).can_submit());
    }

    #[test]
    fn test_pdf_is_rejected_without_touching_text() {
        let mut input = filled("existing text");
        let err = input
            .import_file("resume.pdf", Some("application/pdf"), b"%PDF-1.7")
            .unwrap_err();
        assert_eq!(err, InputError::UnsupportedFileType("resume.pdf".to_string()));
        assert_eq!(input.text(), "existing text");
    }

    #[test]
    fn test_txt_replaces_text() {
        let mut input = filled("existing text");
        let outcome = input.import_file("resume.txt", None, b"X").unwrap();
        assert_eq!(outcome, ImportOutcome::Replaced { chars: 1 });
        assert_eq!(input.text(), "X");
    }

    #[test]
    fn test_markdown_and_uppercase_extensions_accepted() {
        assert!(is_supported_file("cv.md", None));
        assert!(is_supported_file("CV.TXT", None));
        assert!(is_supported_file("resume", Some("text/plain; charset=utf-8")));
        assert!(!is_supported_file("resume.docx", Some("application/vnd.openxmlformats")));
        assert!(!is_supported_file("resume.txt.exe", None));
    }

    #[test]
    fn test_binary_content_rejected() {
        let mut input = filled("keep me");
        let err = input
            .import_file("resume.txt", None, &[0xff, 0xfe, 0x00, 0x9f])
            .unwrap_err();
        assert!(matches!(err, InputError::NotText(_)));
        assert_eq!(input.text(), "keep me");
    }

    #[test]
    fn test_empty_file_keeps_text_and_bom_is_dropped() {
        let mut input = filled("keep me");
        assert_eq!(
            input.import_file("empty.md", None, b"").unwrap(),
            ImportOutcome::Empty
        );
        assert_eq!(input.text(), "keep me");

        input
            .import_file("bom.txt", None, "\u{feff}张三".as_bytes())
            .unwrap();
        assert_eq!(input.text(), "张三");
    }
}

//! Text extraction for uploaded resumes (PDF and DOCX).
//!
//! Parsing runs on the blocking pool; a panic inside a parser is reported as
//! an extraction failure for that file rather than taking the request down.

use bytes::Bytes;
use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type for '{filename}'. Please upload PDF or DOCX.")]
    UnsupportedFormat { filename: String },

    #[error("Error processing file {filename}: {message}")]
    Failed { filename: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Detects the format from the file name's extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentFormat::Pdf),
            "docx" => Some(DocumentFormat::Docx),
            _ => None,
        }
    }
}

/// A file received from the client, before extraction.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Extracts raw text from an uploaded PDF or DOCX file.
/// Empty text is a valid result.
#[instrument(skip(file), fields(filename = %file.filename, size = file.data.len()))]
pub async fn extract_text(file: UploadedFile) -> Result<String, ExtractionError> {
    let UploadedFile { filename, data } = file;

    let format =
        DocumentFormat::from_filename(&filename).ok_or_else(|| ExtractionError::UnsupportedFormat {
            filename: filename.clone(),
        })?;

    let result = tokio::task::spawn_blocking(move || match format {
        DocumentFormat::Pdf => extract_pdf(&data),
        DocumentFormat::Docx => extract_docx(&data),
    })
    .await
    .map_err(|e| format!("extraction task failed: {e}"))
    .and_then(|r| r);

    match result {
        Ok(text) => {
            debug!(chars = text.chars().count(), "Text extraction complete");
            Ok(text)
        }
        Err(message) => Err(ExtractionError::Failed { filename, message }),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(data).map_err(|e| e.to_string())
}

/// Joins the text of every non-blank top-level paragraph with newlines.
fn extract_docx(data: &[u8]) -> Result<String, String> {
    let docx = docx_rs::read_docx(data).map_err(|e| e.to_string())?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(&p.children)),
            _ => None,
        })
        .filter(|text| !text.trim().is_empty())
        .collect();

    Ok(paragraphs.join("\n"))
}

fn paragraph_text(children: &[ParagraphChild]) -> String {
    let mut text = String::new();
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => text.push_str(&paragraph_text(&link.children)),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::Cursor;

    fn build_docx(paragraphs: &[&str]) -> Bytes {
        let mut docx = Docx::new();
        for p in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*p)));
        }
        let mut cursor = Cursor::new(Vec::new());
        docx.build().pack(&mut cursor).unwrap();
        Bytes::from(cursor.into_inner())
    }

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_filename("Jane_Doe.PDF"),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_filename("resume.final.docx"),
            Some(DocumentFormat::Docx)
        );
    }

    #[test]
    fn test_format_detection_rejects_other_extensions() {
        assert_eq!(DocumentFormat::from_filename("resume.doc"), None);
        assert_eq!(DocumentFormat::from_filename("resume.txt"), None);
        assert_eq!(DocumentFormat::from_filename("pdf"), None);
    }

    #[tokio::test]
    async fn test_unsupported_extension_names_file() {
        let file = UploadedFile {
            filename: "cover_letter.txt".to_string(),
            data: Bytes::from_static(b"plain text"),
        };
        let err = extract_text(file).await.unwrap_err();
        match err {
            ExtractionError::UnsupportedFormat { filename } => {
                assert_eq!(filename, "cover_letter.txt")
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_docx_paragraphs_joined_and_blank_lines_dropped() {
        let file = UploadedFile {
            filename: "alice.docx".to_string(),
            data: build_docx(&["Alice Smith", "   ", "Senior Rust Engineer", "Kubernetes, Kafka"]),
        };
        let text = extract_text(file).await.unwrap();
        assert_eq!(text, "Alice Smith\nSenior Rust Engineer\nKubernetes, Kafka");
    }

    #[tokio::test]
    async fn test_corrupt_docx_is_extraction_failure() {
        let file = UploadedFile {
            filename: "broken.docx".to_string(),
            data: Bytes::from_static(b"not a zip archive"),
        };
        let err = extract_text(file).await.unwrap_err();
        match err {
            ExtractionError::Failed { filename, message } => {
                assert_eq!(filename, "broken.docx");
                assert!(!message.is_empty());
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_extraction_failure() {
        let file = UploadedFile {
            filename: "broken.pdf".to_string(),
            data: Bytes::from_static(b"%PDF-1.4 truncated"),
        };
        let err = extract_text(file).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Failed { .. }));
    }
}

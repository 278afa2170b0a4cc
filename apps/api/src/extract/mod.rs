//! Document text extractor — raw upload bytes to a single plain-text string.
//!
//! The file extension is used purely as a format selector. Unsupported
//! extensions return the fixed sentinel string rather than an error; corrupt
//! input for a supported format fails with an extraction error that callers
//! surface as a validation message.

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use tracing::debug;

use crate::errors::AppError;

/// Sentinel returned for any extension other than `.pdf`/`.docx`/`.txt`.
pub const UNSUPPORTED_FORMAT: &str =
    "Format non supporté. Veuillez télécharger un fichier PDF, DOCX ou TXT.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

fn detect_format(file_name: &str) -> Option<DocumentFormat> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(DocumentFormat::Pdf)
    } else if lower.ends_with(".docx") {
        Some(DocumentFormat::Docx)
    } else if lower.ends_with(".txt") {
        Some(DocumentFormat::Txt)
    } else {
        None
    }
}

/// Whether the upload interface accepts this file name at all.
pub fn is_supported(file_name: &str) -> bool {
    detect_format(file_name).is_some()
}

/// Extracts plain text from an uploaded document. Page and paragraph
/// boundaries are joined by newlines.
pub fn extract_text(bytes: &[u8], file_name: &str) -> Result<String, AppError> {
    let format = match detect_format(file_name) {
        Some(f) => f,
        None => return Ok(UNSUPPORTED_FORMAT.to_string()),
    };

    let text = match format {
        DocumentFormat::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("PDF extraction failed: {e}")))?,
        DocumentFormat::Docx => extract_docx(bytes)?,
        DocumentFormat::Txt => String::from_utf8(bytes.to_vec())
            .map_err(|e| AppError::Extraction(format!("TXT file is not valid UTF-8: {e}")))?,
    };

    debug!(file_name, chars = text.len(), "document text extracted");
    Ok(text)
}

fn extract_docx(bytes: &[u8]) -> Result<String, AppError> {
    let docx = read_docx(bytes)
        .map_err(|e| AppError::Extraction(format!("DOCX extraction failed: {e}")))?;

    let mut paragraphs: Vec<String> = Vec::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(para) = child {
            let mut text = String::new();
            for pc in para.children {
                if let ParagraphChild::Run(run) = pc {
                    for rc in run.children {
                        if let RunChild::Text(t) = rc {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            paragraphs.push(text);
        }
    }

    Ok(paragraphs.join("\n"))
}

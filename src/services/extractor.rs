use crate::config::ExtractionMode;
use thiserror::Error;

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Cap on extracted text forwarded to the provider.
const MAX_TEXT_LENGTH: usize = 500_000;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document contains no extractable text")]
    Empty,

    #[error("unreadable {format} content: {reason}")]
    Unreadable {
        format: &'static str,
        reason: String,
    },
}

/// What gets handed to the summarizer: locally extracted plain text, or the
/// raw bytes for the provider to extract itself.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedContent {
    Text(String),
    Native { bytes: Vec<u8>, media_type: String },
}

/// Resolves the effective media type: the declared type wins unless it is
/// absent or the generic octet-stream, then the filename extension decides,
/// and anything still unresolved is treated as plain text.
pub fn resolve_media_type(declared: Option<&str>, filename: &str) -> String {
    let resolved = match declared {
        Some(t) if !t.is_empty() && t != "application/octet-stream" => t.to_string(),
        _ => mime_guess::from_path(filename)
            .first()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    };

    if resolved == "application/octet-stream" {
        "text/plain".to_string()
    } else {
        resolved
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContentExtractor {
    mode: ExtractionMode,
}

impl ContentExtractor {
    pub fn new(mode: ExtractionMode) -> Self {
        Self { mode }
    }

    /// Pure transform of upload bytes into summarizable content. Empty
    /// input, or structured input that yields only whitespace, is an error
    /// here rather than a wasted provider call.
    pub fn extract(
        &self,
        bytes: &[u8],
        media_type: &str,
    ) -> Result<ExtractedContent, ExtractError> {
        if bytes.is_empty() {
            return Err(ExtractError::Empty);
        }

        match self.mode {
            ExtractionMode::Native => Ok(ExtractedContent::Native {
                bytes: bytes.to_vec(),
                media_type: media_type.to_string(),
            }),
            ExtractionMode::Local => {
                let text = match media_type {
                    "application/pdf" => extract_pdf(bytes)?,
                    DOCX_MIME => extract_docx(bytes)?,
                    _ => String::from_utf8_lossy(bytes).into_owned(),
                };

                let text = clean_text(&text);
                if text.is_empty() {
                    return Err(ExtractError::Empty);
                }

                Ok(ExtractedContent::Text(truncate_text(text)))
            }
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract (via its font parser) can panic on malformed glyph data,
    // so the call is panic-guarded.
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    })) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractError::Unreadable {
            format: "PDF",
            reason: e.to_string(),
        }),
        Err(_) => Err(ExtractError::Unreadable {
            format: "PDF",
            reason: "malformed font or glyph data".to_string(),
        }),
    }
}

fn extract_docx(bytes: &[u8]) -> Result<String, ExtractError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| ExtractError::Unreadable {
        format: "DOCX",
        reason: e.to_string(),
    })?;

    let mut text = String::new();
    for child in docx.document.children {
        collect_docx_text(&child, &mut text);
    }

    Ok(text)
}

/// Walks paragraphs and tables in document order, collecting run text.
fn collect_docx_text(element: &docx_rs::DocumentChild, output: &mut String) {
    match element {
        docx_rs::DocumentChild::Paragraph(para) => {
            collect_paragraph_text(para, output);
            output.push('\n');
        }
        docx_rs::DocumentChild::Table(table) => {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(tr) = row;
                for cell in &tr.cells {
                    let docx_rs::TableRowChild::TableCell(tc) = cell;
                    for content in &tc.children {
                        if let docx_rs::TableCellContent::Paragraph(para) = content {
                            collect_paragraph_text(para, output);
                            output.push(' ');
                        }
                    }
                }
                output.push('\n');
            }
        }
        _ => {}
    }
}

fn collect_paragraph_text(para: &docx_rs::Paragraph, output: &mut String) {
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    if let docx_rs::RunChild::Text(text) = run_child {
                        output.push_str(&text.text);
                    }
                }
            }
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for link_child in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = link_child {
                        for run_child in &run.children {
                            if let docx_rs::RunChild::Text(text) = run_child {
                                output.push_str(&text.text);
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn truncate_text(text: String) -> String {
    if text.len() <= MAX_TEXT_LENGTH {
        return text;
    }

    let mut end = MAX_TEXT_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_media_type_wins() {
        assert_eq!(
            resolve_media_type(Some("application/pdf"), "report.txt"),
            "application/pdf"
        );
    }

    #[test]
    fn octet_stream_falls_back_to_the_filename_extension() {
        assert_eq!(
            resolve_media_type(Some("application/octet-stream"), "report.pdf"),
            "application/pdf"
        );
        assert_eq!(resolve_media_type(None, "notes.md"), "text/markdown");
    }

    #[test]
    fn unresolvable_types_default_to_plain_text() {
        assert_eq!(resolve_media_type(None, "blob.xyz123"), "text/plain");
        assert_eq!(resolve_media_type(None, "no-extension"), "text/plain");
    }

    #[test]
    fn empty_input_is_rejected_in_both_modes() {
        for mode in [ExtractionMode::Local, ExtractionMode::Native] {
            let extractor = ContentExtractor::new(mode);
            assert!(matches!(
                extractor.extract(b"", "text/plain"),
                Err(ExtractError::Empty)
            ));
        }
    }

    #[test]
    fn whitespace_only_text_is_rejected() {
        let extractor = ContentExtractor::new(ExtractionMode::Local);
        assert!(matches!(
            extractor.extract(b"  \n\t \n", "text/plain"),
            Err(ExtractError::Empty)
        ));
    }

    #[test]
    fn plain_text_passes_through_trimmed() {
        let extractor = ContentExtractor::new(ExtractionMode::Local);
        let content = extractor
            .extract(b"  Q3 revenue grew 12%.  \n", "text/plain")
            .unwrap();
        assert_eq!(
            content,
            ExtractedContent::Text("Q3 revenue grew 12%.".to_string())
        );
    }

    #[test]
    fn native_mode_forwards_raw_bytes() {
        let extractor = ContentExtractor::new(ExtractionMode::Native);
        let content = extractor.extract(b"%PDF-1.4 ...", "application/pdf").unwrap();
        assert_eq!(
            content,
            ExtractedContent::Native {
                bytes: b"%PDF-1.4 ...".to_vec(),
                media_type: "application/pdf".to_string(),
            }
        );
    }

    #[test]
    fn corrupt_pdf_is_a_client_error() {
        let extractor = ContentExtractor::new(ExtractionMode::Local);
        let result = extractor.extract(b"not actually a pdf", "application/pdf");
        assert!(matches!(result, Err(ExtractError::Unreadable { .. })));
    }

    #[test]
    fn corrupt_docx_is_a_client_error() {
        let extractor = ContentExtractor::new(ExtractionMode::Local);
        let docx_mime =
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        let result = extractor.extract(b"not actually a docx", docx_mime);
        assert!(matches!(result, Err(ExtractError::Unreadable { .. })));
    }
}

use crate::error::PassbookError;
use crate::extraction::{check_pdf_magic, TextLayerProvider};
use crate::model::TextToken;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;

/// Text layer backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -bbox` to get every word with its bounding box.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayerProvider for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<Vec<TextToken>>, PassbookError> {
        check_pdf_magic(pdf_bytes)?;

        let mut tmpfile = tempfile::NamedTempFile::new()?;
        tmpfile.write_all(pdf_bytes)?;

        let output = Command::new("pdftotext")
            .arg("-bbox")
            .arg(tmpfile.path())
            .arg("-")
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PassbookError::PdftotextNotFound
                } else {
                    PassbookError::Decode(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(PassbookError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let pages = parse_bbox_words(&xml)?;
        tracing::debug!(pages = pages.len(), "pdftotext text layer decoded");
        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse `pdftotext -bbox` XHTML into per-page word tokens.
///
/// pdftotext measures `y` downward from the top of the page; tokens are
/// flipped to upward `y` using each word's bottom edge.
pub(crate) fn parse_bbox_words(xml: &str) -> Result<Vec<Vec<TextToken>>, PassbookError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut pages: Vec<Vec<TextToken>> = Vec::new();
    let mut page_height = 0.0f32;
    let mut word: Option<(f32, f32)> = None;
    let mut word_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => {
                    page_height = attr_f32(&e, "height").unwrap_or(0.0);
                    pages.push(Vec::new());
                }
                b"word" => {
                    let x = attr_f32(&e, "xMin").unwrap_or(0.0);
                    let y_max = attr_f32(&e, "yMax").unwrap_or(0.0);
                    word = Some((x, page_height - y_max));
                    word_text.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"page" => {
                pages.push(Vec::new());
            }
            Ok(Event::Text(t)) if word.is_some() => {
                let text = t
                    .unescape()
                    .map_err(|e| PassbookError::Decode(format!("bad word text: {e}")))?;
                word_text.push_str(&text);
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"word" => {
                if let (Some((x, y)), Some(page)) = (word.take(), pages.last_mut()) {
                    let text = word_text.trim();
                    if !text.is_empty() {
                        page.push(TextToken::new(text, x, y));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(PassbookError::Decode(format!(
                    "invalid pdftotext output at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    Ok(pages)
}

fn attr_f32(tag: &BytesStart<'_>, name: &str) -> Option<f32> {
    let attr = tag.try_get_attribute(name).ok()??;
    attr.unescape_value().ok()?.trim().parse().ok()
}

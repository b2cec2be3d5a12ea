pub mod columns;
pub mod header;
pub mod lines;
pub mod normalize;
pub mod segment;

use crate::model::{HeaderFields, TextToken, TransactionRow};
use columns::classify_segment;
use header::extract_header;
use lines::reconstruct_lines;
use normalize::clean_lines;
use segment::segment_lines;

/// Lines this short (in characters, after trimming) are dropped as noise.
pub const MIN_LINE_CHARS: usize = 5;

/// How many leading lines of a positioned page feed header detection.
pub const HEADER_LINE_WINDOW: usize = 10;

/// The two ways a page's text reaches the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum PageInput {
    /// Text layer tokens with coordinates.
    PositionedTokens(Vec<TextToken>),
    /// OCR output, one visual line per text line.
    PlainText(String),
}

impl PageInput {
    /// Resolve the input into cleaned lines plus the text used for header detection.
    pub fn into_lines(self) -> (Vec<String>, String) {
        match self {
            PageInput::PositionedTokens(tokens) => {
                let rebuilt = reconstruct_lines(&tokens);
                let lines = clean_lines(rebuilt.iter().map(String::as_str), MIN_LINE_CHARS);
                let header_text = lines
                    .iter()
                    .take(HEADER_LINE_WINDOW)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                (lines, header_text)
            }
            PageInput::PlainText(text) => {
                let lines = clean_lines(text.lines(), MIN_LINE_CHARS);
                (lines, text)
            }
        }
    }
}

/// Everything one page contributes to the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    pub header: HeaderFields,
    pub rows: Vec<TransactionRow>,
    pub line_count: usize,
}

/// Run header detection, segmentation and classification over one page.
pub fn parse_page(input: PageInput, merge_multiline_particulars: bool) -> ParsedPage {
    let (lines, header_text) = input.into_lines();
    let header = extract_header(&header_text);
    let rows = segment_lines(&lines, merge_multiline_particulars)
        .iter()
        .filter_map(classify_segment)
        .collect();

    ParsedPage {
        header,
        rows,
        line_count: lines.len(),
    }
}

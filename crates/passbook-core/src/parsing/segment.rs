use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::parsing::normalize::collapse_whitespace;

/// Shortest trimmed line (in characters) that can start a transaction.
pub const MIN_TRANSACTION_CHARS: usize = 10;

fn leading_date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([0-9]{1,2}[-/][0-9]{1,2}[-/][0-9]{2,4})").expect("date regex"))
}

/// A candidate transaction: the leading date and whatever followed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub date: String,
    pub remainder: String,
}

/// Split a trimmed line into its leading date and the rest, if it starts a transaction.
pub fn split_leading_date(line: &str) -> Option<Segment> {
    let line = line.trim();
    if line.chars().count() < MIN_TRANSACTION_CHARS {
        return None;
    }
    let m = leading_date_re().captures(line)?.get(1)?;
    Some(Segment {
        date: m.as_str().to_string(),
        remainder: line[m.end()..].trim().to_string(),
    })
}

/// Group a page's lines into date-anchored segments.
///
/// Lines before the first date line and after the last one are dropped.
/// Lines in between are dropped too unless `merge_multiline_particulars` is
/// set, in which case they are appended to the preceding segment.
pub fn segment_lines<S: AsRef<str>>(lines: &[S], merge_multiline_particulars: bool) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();
        if let Some(segment) = split_leading_date(line) {
            // Flush held continuation lines into the segment they belong to
            if let Some(prev) = segments.last_mut() {
                for extra in pending.drain(..) {
                    if !prev.remainder.is_empty() {
                        prev.remainder.push(' ');
                    }
                    prev.remainder.push_str(&extra);
                }
            }
            segments.push(segment);
        } else if merge_multiline_particulars && !segments.is_empty() {
            let normalized = collapse_whitespace(line);
            if !normalized.is_empty() {
                pending.push(normalized);
            }
        }
    }

    segments
}

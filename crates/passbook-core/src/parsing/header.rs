use regex::Regex;
use std::sync::OnceLock;

use crate::model::{HeaderField, HeaderFields};
use crate::parsing::normalize::collapse_whitespace;

fn account_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Account\s*(?:No|Number|#|:)\s*[:\-\s]*([A-Za-z0-9_\-]{5,30})").expect("account regex")
    })
}

fn account_short_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)A/C\s*No[:\s]*([A-Za-z0-9_\-]{5,30})").expect("a/c regex"))
}

fn ifsc_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u:\b)[A-Z]{4}0[A-Z0-9]{6}(?-u:\b)").expect("ifsc regex"))
}

fn holder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:Account\s*Holder|Customer|Name)[:\s\-]*([A-Z][a-zA-Z.\s]{2,50})")
            .expect("holder regex")
    })
}

fn branch_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)Branch[:\s\-]*([A-Za-z0-9.,\-\s]{2,40})").expect("branch regex"))
}

fn bank_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[A-Z][A-Z\s&]{3,30}Bank|Bank of [A-Z\s]{1,30}").expect("bank regex"))
}

/// Detect account/bank metadata in statement text.
///
/// Each field is matched independently; the first match in the text wins.
/// Fields with no match are left out.
pub fn extract_header(text: &str) -> HeaderFields {
    let txt = collapse_whitespace(text);
    let mut header = HeaderFields::new();

    // Account: labelled form first, then the short "A/C No" label
    let account = capture(account_re(), &txt).or_else(|| capture(account_short_re(), &txt));
    if let Some(v) = account {
        header.set_if_absent(HeaderField::Account, v);
    }

    // IFSC: bare code, no label needed
    if let Some(m) = ifsc_re().find(&txt) {
        header.set_if_absent(HeaderField::Ifsc, m.as_str());
    }

    if let Some(v) = capture(holder_re(), &txt) {
        header.set_if_absent(HeaderField::Holder, v);
    }

    if let Some(v) = capture(branch_re(), &txt) {
        header.set_if_absent(HeaderField::Branch, v);
    }

    // Bank: "... Bank" or "Bank of ..."
    if let Some(m) = bank_re().find(&txt) {
        let v = m.as_str().trim();
        if !v.is_empty() {
            header.set_if_absent(HeaderField::Bank, v);
        }
    }

    header
}

/// First capture group of the first match, trimmed. Blank captures count as no match.
fn capture(re: &Regex, txt: &str) -> Option<String> {
    let caps = re.captures(txt)?;
    let value = caps.get(1)?.as_str().trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

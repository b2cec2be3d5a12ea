use regex::Regex;
use std::sync::OnceLock;

use crate::model::TransactionRow;
use crate::parsing::normalize::collapse_whitespace;
use crate::parsing::segment::Segment;

/// Description words that turn a lone amount into a credit.
pub const CREDIT_KEYWORDS: [&str; 4] = ["salary", "credit", "deposit", "interest"];

fn amount_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // ASCII digits and boundaries only: other scripts' digits are not amounts,
    // and a non-ASCII letter must not glue onto the number next to it.
    RE.get_or_init(|| {
        Regex::new(r"(?-u:\b)[0-9]{1,3}(?:,[0-9]{3})*(?:\.[0-9]{2})?(?-u:\b)").expect("amount regex")
    })
}

fn reference_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?-u:\b)[0-9]{6,}(?-u:\b)").expect("reference regex"))
}

/// How many amount tokens a segment carried. Keys the decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountCount {
    None,
    One,
    Two,
    Three,
    Many,
}

impl AmountCount {
    pub fn of(n: usize) -> Self {
        match n {
            0 => AmountCount::None,
            1 => AmountCount::One,
            2 => AmountCount::Two,
            3 => AmountCount::Three,
            _ => AmountCount::Many,
        }
    }
}

/// Amount cells chosen for one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnAssignment {
    pub debit: String,
    pub credit: String,
    pub balance: String,
}

pub fn has_credit_keyword(description: &str) -> bool {
    let lower = description.to_lowercase();
    CREDIT_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Map extracted amounts to debit/credit/balance.
///
/// | count | assignment                                      |
/// |-------|-------------------------------------------------|
/// | 0     | rejected                                        |
/// | 1     | credit if a credit keyword is present, else debit |
/// | 2     | debit, balance                                  |
/// | 3     | debit, credit, balance                          |
/// | >3    | first is debit, last is balance, rest dropped   |
///
/// The count rows for two or more amounts ignore credit keywords.
pub fn assign_columns(amounts: &[&str], description: &str) -> Option<ColumnAssignment> {
    let cell = |i: usize| amounts[i].to_string();
    let assignment = match AmountCount::of(amounts.len()) {
        AmountCount::None => return None,
        AmountCount::One if has_credit_keyword(description) => ColumnAssignment {
            credit: cell(0),
            ..Default::default()
        },
        AmountCount::One => ColumnAssignment {
            debit: cell(0),
            ..Default::default()
        },
        AmountCount::Two => ColumnAssignment {
            debit: cell(0),
            balance: cell(1),
            ..Default::default()
        },
        AmountCount::Three => ColumnAssignment {
            debit: cell(0),
            credit: cell(1),
            balance: cell(2),
        },
        AmountCount::Many => ColumnAssignment {
            debit: cell(0),
            balance: cell(amounts.len() - 1),
            ..Default::default()
        },
    };
    Some(assignment)
}

/// Split a remainder into (amounts, reference, description).
fn split_remainder(remainder: &str) -> (Vec<&str>, String, String) {
    let amounts: Vec<&str> = amount_re().find_iter(remainder).map(|m| m.as_str()).collect();

    // Blank out amounts so the reference search cannot land inside one
    let raw = amount_re().replace_all(remainder, " ");

    // First long digit run that is not itself an amount
    let mut reference = String::new();
    let mut description = raw.to_string();
    if let Some(m) = reference_re()
        .find_iter(&raw)
        .find(|m| !amounts.contains(&m.as_str()))
    {
        reference = m.as_str().to_string();
        description = format!("{} {}", &raw[..m.start()], &raw[m.end()..]);
    }

    (amounts, reference, collapse_whitespace(&description))
}

/// Turn one segment into a row, or None when it cannot form a valid row.
pub fn classify_segment(segment: &Segment) -> Option<TransactionRow> {
    let (amounts, reference, description) = split_remainder(&segment.remainder);
    let Some(columns) = assign_columns(&amounts, &description) else {
        tracing::trace!(date = %segment.date, "segment has no amounts");
        return None;
    };

    let row = TransactionRow {
        date: segment.date.clone(),
        reference,
        description,
        debit: columns.debit,
        credit: columns.credit,
        balance: columns.balance,
    };

    if row.is_valid() {
        Some(row)
    } else {
        tracing::trace!(date = %row.date, "segment rejected: empty description");
        None
    }
}

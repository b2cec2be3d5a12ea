/// Collapse every run of whitespace to a single space and trim both ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into lines on `\n` or `\r\n`, trimming each line and dropping
/// lines of `min_chars` characters or fewer.
pub fn clean_lines<'a, I>(lines: I, min_chars: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    lines
        .into_iter()
        .map(str::trim)
        .filter(|l| l.chars().count() > min_chars)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_mixed_whitespace() {
        assert_eq!(collapse_whitespace("  NEFT\t\tTRANSFER \n  ACME  "), "NEFT TRANSFER ACME");
    }

    #[test]
    fn test_collapse_empty() {
        assert_eq!(collapse_whitespace(" \t "), "");
    }

    #[test]
    fn test_clean_lines_drops_short_lines() {
        let text = "Page 1\r\n  ab  \n\n01-01-24 SALARY 5,000.00\n";
        let lines = clean_lines(text.lines(), 5);
        assert_eq!(lines, vec!["Page 1", "01-01-24 SALARY 5,000.00"]);
    }
}

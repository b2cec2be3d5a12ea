use crate::model::TextToken;

/// Tokens whose vertical positions differ by less than this sit on one line.
pub const LINE_Y_TOLERANCE: f32 = 2.0;

/// Rebuild visual lines from positioned tokens, top of page first.
///
/// Tokens are ordered by descending `y` and ascending `x`; a token continues
/// the current line while it stays within `LINE_Y_TOLERANCE` of the previous
/// token. Each line is re-sorted by `x` and joined with single spaces.
pub fn reconstruct_lines(tokens: &[TextToken]) -> Vec<String> {
    // Reading order: top to bottom, then left to right
    let mut sorted: Vec<&TextToken> = tokens.iter().filter(|t| !t.text.trim().is_empty()).collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

    let mut groups: Vec<Vec<&TextToken>> = Vec::new();
    let mut current: Vec<&TextToken> = Vec::new();
    let mut last_y: Option<f32> = None;

    // Start a new line on a vertical jump
    for token in sorted {
        match last_y {
            Some(y) if (token.y - y).abs() >= LINE_Y_TOLERANCE => {
                groups.push(std::mem::take(&mut current));
            }
            _ => {}
        }
        current.push(token);
        last_y = Some(token.y);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    // Tokens within tolerance may still be out of x order
    groups
        .into_iter()
        .map(|mut group| {
            group.sort_by(|a, b| a.x.total_cmp(&b.x));
            group
                .iter()
                .map(|t| t.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

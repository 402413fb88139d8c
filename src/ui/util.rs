use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::view::Highlighted;

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is guaranteed to be at most `max` characters (counting "…" as one).
/// Safe for multi-byte UTF-8 characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Render highlighted text as styled spans, truncated like [`truncate`].
pub(crate) fn highlight_line(h: &Highlighted, max: usize, base: Style, hit: Style) -> Line<'static> {
    if max == 0 {
        return Line::default();
    }
    let total = h.text.chars().count();
    let budget = if total <= max { total } else { max - 1 };

    let mut spans = Vec::new();
    let mut used = 0;
    for (segment, is_match) in h.segments() {
        if used >= budget {
            break;
        }
        let piece: String = segment.chars().take(budget - used).collect();
        used += piece.chars().count();
        spans.push(Span::styled(piece, if is_match { hit } else { base }));
    }
    if total > max {
        spans.push(Span::styled("…", base));
    }
    Line::from(spans)
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

/// Jump cursor to the top of a list.
pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

/// Jump cursor to the bottom of a list.
pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

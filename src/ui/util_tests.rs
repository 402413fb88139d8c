#![allow(clippy::unwrap_used)]

use ratatui::style::Style;

use super::theme;
use super::util::*;
use crate::view::Highlighted;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 5), "hell…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("hello", 0), "");
}

#[test]
fn test_truncate_unicode() {
    // Japanese characters are multi-byte UTF-8
    assert_eq!(truncate("日本語テスト", 4), "日本語…");
}

#[test]
fn test_truncate_emoji() {
    assert_eq!(truncate("🎉🎊🎈🎁", 3), "🎉🎊…");
}

#[test]
fn test_truncate_one_char() {
    assert_eq!(truncate("hello", 1), "…");
}

#[test]
fn test_truncate_mixed_unicode() {
    assert_eq!(truncate("café résumé", 5), "café…");
}

#[test]
fn test_truncate_two_chars() {
    assert_eq!(truncate("hello", 2), "h…");
}

#[test]
fn test_truncate_single_char_string() {
    assert_eq!(truncate("a", 1), "a");
    assert_eq!(truncate("a", 5), "a");
}

#[test]
fn test_truncate_max_one_with_long_string() {
    // max=1 should always produce "…" for strings longer than 1
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("abc", 1), "…");
}

// ── highlight_line ────────────────────────────────────────

fn spans_of(line: &ratatui::text::Line<'_>) -> Vec<(String, bool)> {
    line.spans
        .iter()
        .map(|s| (s.content.to_string(), s.style == theme::match_style()))
        .collect()
}

#[test]
fn test_highlight_line_marks_matches() {
    let h = Highlighted {
        text: "Bus pass".into(),
        spans: vec![4..8],
    };
    let line = highlight_line(&h, 20, Style::default(), theme::match_style());
    assert_eq!(
        spans_of(&line),
        vec![("Bus ".to_string(), false), ("pass".to_string(), true)]
    );
}

#[test]
fn test_highlight_line_truncates() {
    let h = Highlighted {
        text: "Coffee and cake".into(),
        spans: vec![0..6],
    };
    let line = highlight_line(&h, 8, Style::default(), theme::match_style());
    let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "Coffee …");
    assert_eq!(text.chars().count(), 8);
    assert!(spans_of(&line)[0].1);
}

#[test]
fn test_highlight_line_zero_width() {
    let h = Highlighted {
        text: "abc".into(),
        spans: vec![],
    };
    assert!(highlight_line(&h, 0, Style::default(), theme::match_style())
        .spans
        .is_empty());
}

// ── scrolling ─────────────────────────────────────────────

#[test]
fn test_scroll_down_keeps_cursor_visible() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!(index, 5);
    assert_eq!(scroll, 3);
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (2, 0);
    scroll_down(&mut index, &mut scroll, 3, 10);
    assert_eq!(index, 2);
}

#[test]
fn test_scroll_up_moves_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Currency;
use crate::ui::app::{App, InputMode, SettingsField};
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(" Settings ", theme::title_style()));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let form = &app.settings_form;
    let fields = form.fields();
    let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Length(1));
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let editing = app.input_mode == InputMode::Editing;
    let focused = form.focused();
    for (i, field) in fields.iter().enumerate() {
        let is_focused = *field == focused;
        let (label, value) = match field {
            SettingsField::Cap => (
                format!("Spending cap ({}, 0 = none)", Currency::BASE),
                form.cap.clone(),
            ),
            SettingsField::Currency => (
                "Display currency (+/- to change)".to_string(),
                format!("\u{25c2} {} \u{25b8}", form.currency),
            ),
            SettingsField::Rate(c) => (
                format!("{c} per 1 {}", Currency::BASE),
                form.rates.get(c).cloned().unwrap_or_default(),
            ),
        };
        let border = if is_focused && editing {
            theme::focused_field_style()
        } else {
            Style::default().fg(theme::OVERLAY)
        };
        let label_style = if is_focused {
            theme::focused_field_style()
        } else {
            theme::dim_style()
        };
        let cursor_offset = value.chars().count() as u16;
        let widget = Paragraph::new(Line::from(Span::styled(value, theme::normal_style()))).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(format!(" {label} "), label_style)),
        );
        f.render_widget(widget, chunks[i]);

        if is_focused && editing && *field != SettingsField::Currency {
            let x = (chunks[i].x + 1 + cursor_offset).min(chunks[i].right().saturating_sub(2));
            f.set_cursor_position((x, chunks[i].y + 1));
        }
    }

    let hint = if editing {
        " Tab move | +/- currency | Enter save | Esc discard "
    } else {
        " Enter or i to edit | :reset-settings restore defaults "
    };
    f.render_widget(
        Paragraph::new(Span::styled(hint, theme::dim_style())),
        chunks[fields.len()],
    );
}

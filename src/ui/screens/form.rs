use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::models::Field;
use crate::ui::app::{App, InputMode};
use crate::ui::theme;

fn label(field: Field) -> &'static str {
    match field {
        Field::Description => "Description",
        Field::Amount => "Amount (RWF)",
        Field::Category => "Category",
        Field::Date => "Date (YYYY-MM-DD)",
    }
}

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let title = match &form.editing_id {
        Some(_) => " Edit Record ",
        None => " New Record ",
    };
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let mut constraints: Vec<Constraint> = Field::all()
        .iter()
        .flat_map(|_| [Constraint::Length(3), Constraint::Length(1)])
        .collect();
    constraints.push(Constraint::Min(0));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let editing = app.input_mode == InputMode::Editing;
    for (i, field) in Field::all().iter().enumerate() {
        let focused = form.focused() == *field;
        let error = form.errors.get(field);
        let border = if error.is_some() {
            theme::error_style()
        } else if focused && editing {
            theme::focused_field_style()
        } else {
            Style::default().fg(theme::OVERLAY)
        };
        let label_style = if focused {
            theme::focused_field_style()
        } else {
            theme::dim_style()
        };

        let value = form.fields.get(*field);
        let input = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            theme::normal_style(),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(format!(" {} ", label(*field)), label_style)),
        );
        let box_area = chunks[i * 2];
        f.render_widget(input, box_area);

        if let Some(reason) = error {
            f.render_widget(
                Paragraph::new(Span::styled(format!("  {reason}"), theme::error_style())),
                chunks[i * 2 + 1],
            );
        }

        if focused && editing {
            let offset = value.chars().count() as u16;
            let x = (box_area.x + 1 + offset).min(box_area.right().saturating_sub(2));
            f.set_cursor_position((x, box_area.y + 1));
        }
    }

    let hint = if editing {
        " Tab/Shift-Tab move | Enter save | Esc clear "
    } else {
        " Enter or i to edit | :new blank form "
    };
    if let Some(last) = chunks.last() {
        f.render_widget(
            Paragraph::new(Span::styled(hint, theme::dim_style())),
            *last,
        );
    }
}

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::highlight_line;
use crate::view::{SortField, ViewOutcome};

const DESCRIPTION_WIDTH: usize = 40;
const CATEGORY_WIDTH: usize = 18;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let title = Span::styled(title(app), theme::title_style());

    if app.view.rows.is_empty() {
        let msg = match app.view.outcome {
            ViewOutcome::NoResults => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!("No records matching '{}'", app.query.pattern),
                    theme::dim_style(),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press Esc to clear the search",
                    theme::dim_style(),
                )),
            ],
            _ => vec![
                Line::from(""),
                Line::from(Span::styled("No records yet", theme::dim_style())),
                Line::from(""),
                Line::from(Span::styled(
                    "Add one with :new or import a JSON file with :import <path>",
                    theme::dim_style(),
                )),
            ],
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(title);
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = [
        header_label(app, "Date", Some(SortField::Date)),
        header_label(app, "Description", Some(SortField::Description)),
        header_label(app, "Category", None),
        header_label(
            app,
            &format!("Amount ({})", app.settings.currency),
            Some(SortField::Amount),
        ),
    ]
    .into_iter()
    .map(|h| Cell::from(h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let hit = theme::match_style();
    let rows: Vec<Row> = app
        .view
        .rows
        .iter()
        .enumerate()
        .skip(app.record_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, row)| {
            let style = if i == app.record_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(highlight_line(&row.date, 12, style, hit)),
                Cell::from(highlight_line(&row.description, DESCRIPTION_WIDTH, style, hit)),
                Cell::from(highlight_line(&row.category, CATEGORY_WIDTH, style, hit)),
                Cell::from(highlight_line(&row.amount, 16, style, hit).right_aligned()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Min(20),
        Constraint::Length(CATEGORY_WIDTH as u16),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(title),
    );

    f.render_widget(table, area);
}

fn title(app: &App) -> String {
    let mut title = format!(" Records ({}/{}) ", app.view.rows.len(), app.record_count);
    if !app.query.pattern.is_empty() {
        title.push_str(&format!("search: '{}' ", app.query.pattern));
        if app.view.invalid_pattern {
            title.push_str("[invalid pattern] ");
        }
    }
    if app.query.case_sensitive {
        title.push_str("[Aa] ");
    }
    title
}

fn header_label(app: &App, label: &str, field: Option<SortField>) -> String {
    match field {
        Some(field) if app.query.sort.field() == Some(field) => {
            format!("{label} {}", app.query.sort.direction().arrow())
        }
        _ => label.to_string(),
    }
}

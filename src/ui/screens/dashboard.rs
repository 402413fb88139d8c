use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use crate::dashboard::CapStatus;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Length(3), // Cap status
            Constraint::Min(8),    // Category chart
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_cap_status(f, chunks[1], app);
    render_category_chart(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &app.summary;
    let settings = &app.settings;

    render_card(
        f,
        cards[0],
        "Records",
        summary.count.to_string(),
        Style::default().fg(theme::ACCENT),
        None,
    );
    render_card(
        f,
        cards[1],
        "Total Spent",
        settings.format_money(summary.total),
        Style::default().fg(theme::TEXT),
        None,
    );
    render_card(
        f,
        cards[2],
        "Top Category",
        summary.top_category_label().to_string(),
        Style::default().fg(theme::YELLOW),
        None,
    );

    let (remaining, style, subtitle) = match summary.status {
        CapStatus::NoCap => ("\u{2014}".to_string(), theme::dim_style(), "no cap".to_string()),
        CapStatus::OverCap => (
            settings.format_money(summary.remaining),
            theme::over_cap_style(),
            format!("cap {}", settings.format_money(settings.cap)),
        ),
        CapStatus::Remaining => (
            settings.format_money(summary.remaining),
            theme::under_cap_style(),
            format!("cap {}", settings.format_money(settings.cap)),
        ),
    };
    render_card(f, cards[3], "Remaining", remaining, style, Some(subtitle));
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    style: Style,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(value, style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_cap_status(f: &mut Frame, area: Rect, app: &App) {
    let message = app.summary.status_message(&app.settings);
    let (style, border) = match app.summary.status {
        CapStatus::NoCap => (theme::dim_style(), theme::OVERLAY),
        CapStatus::OverCap => (theme::over_cap_style(), theme::RED),
        CapStatus::Remaining => (theme::under_cap_style(), theme::OVERLAY),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(message, style)))
            .centered()
            .block(block),
        area,
    );
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Spending by Category ({}) ", app.settings.currency);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()));

    if app.category_totals.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No records yet. Add one with :new or import with :import <file>",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .category_totals
        .iter()
        .take(12)
        .map(|(name, total)| {
            // Heights use base amounts so small display values still scale
            let converted = app.settings.convert(*total);
            Bar::default()
                .value(total.to_u64().unwrap_or(0))
                .text_value(format!("{converted:.2}"))
                .label(Line::from(truncate(name, 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, InputMode, Screen};
use super::commands;
use super::theme;

/// Key reference shown in the help overlay, as (section, rows of (keys, action)).
const KEY_HELP: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("j/k, Up/Down", "Move cursor"),
            ("g/G", "Top/Bottom"),
            ("Ctrl-d/u", "Half page down/up"),
            ("1-4, Tab", "Switch screen"),
            ("Ctrl-q", "Quit"),
        ],
    ),
    (
        "Records",
        &[
            ("/", "Live regex search"),
            ("c", "Toggle case sensitivity"),
            ("t / n / a", "Sort by date/description/amount, again to reverse"),
            ("e, Enter", "Edit selected"),
            ("D", "Delete selected"),
        ],
    ),
    (
        "Form & Settings",
        &[
            ("i, Enter", "Start editing"),
            ("Tab/Shift-Tab", "Next/previous field"),
            ("Enter", "Save"),
            ("Esc", "Clear form / discard settings"),
            ("+/-", "Cycle display currency"),
        ],
    ),
];

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_command_bar(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let label_style = if *s == app.screen {
                Style::default()
                    .fg(theme::ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::dim_style()
            };
            Line::from(vec![
                Span::styled(format!("{}:", i + 1), theme::dim_style()),
                Span::styled(s.to_string(), label_style),
            ])
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, area, app),
        Screen::Records => super::screens::records::render(f, area, app),
        Screen::Form => super::screens::form::render(f, area, app),
        Screen::Settings => super::screens::settings::render(f, area, app),
    }
}

fn mode_color(mode: InputMode) -> Color {
    match mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Search => theme::YELLOW,
        InputMode::Confirm => theme::RED,
    }
}

/// Key hints for the right side of the status bar.
fn hints(screen: Screen, mode: InputMode) -> &'static str {
    match (screen, mode) {
        (_, InputMode::Confirm) => " y confirm | any key cancels ",
        (_, InputMode::Search) => " Enter keep | Esc clear ",
        (_, InputMode::Command) => " Enter run | Esc cancel ",
        (Screen::Form | Screen::Settings, InputMode::Editing) => " Tab next | Enter save | Esc ",
        (Screen::Dashboard, _) => " 3 new record | :export | ? help ",
        (Screen::Records, _) => " t/n/a sort | c case | e edit | D delete | ? help ",
        (Screen::Form, _) => " i edit | :new | ? help ",
        (Screen::Settings, _) => " i edit | :reset-settings | ? help ",
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_color(app.input_mode))
        .add_modifier(Modifier::BOLD);

    let info = format!(
        " {} | {} records | {} ",
        app.screen, app.record_count, app.settings.currency
    );
    let right = hints(app.screen, app.input_mode);

    let used = mode_label.len() + info.len() + right.len();
    let pad = (area.width as usize).saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(mode_label, mode_style),
        Span::styled(info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

/// A prompt character followed by the text being typed; returns the cursor column.
fn prompt_line<'a>(prompt: &'a str, color: Color, text: &'a str) -> (Vec<Span<'a>>, u16) {
    let spans = vec![
        Span::styled(prompt, Style::default().fg(color)),
        Span::styled(text, theme::command_bar_style()),
    ];
    (spans, (prompt.len() + text.chars().count()) as u16)
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor) = match app.input_mode {
        InputMode::Command => {
            let (spans, col) = prompt_line(":", theme::ACCENT, &app.command_input);
            (Line::from(spans), Some(col))
        }
        InputMode::Search => {
            let (mut spans, col) = prompt_line("/", theme::YELLOW, &app.query.pattern);
            if !app.query.pattern.trim().is_empty() {
                let info = if app.view.invalid_pattern {
                    "  (invalid pattern)".to_string()
                } else {
                    format!("  ({} matches)", app.view.rows.len())
                };
                spans.push(Span::styled(info, theme::dim_style()));
            }
            (Line::from(spans), Some(col))
        }
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(app.confirm_message.as_str(), Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Editing | InputMode::Normal if !app.status_message.is_empty() => (
            Line::from(Span::styled(
                app.status_message.as_str(),
                theme::command_bar_style(),
            )),
            None,
        ),
        InputMode::Editing => (
            Line::from(Span::styled(
                " Editing. Enter saves, Esc cancels",
                theme::command_bar_style(),
            )),
            None,
        ),
        InputMode::Normal => (
            Line::from(Span::styled(
                " Press : for commands, / to search, ? for help",
                theme::dim_style(),
            )),
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(col) = cursor {
        f.set_cursor_position((area.x + col, area.y));
    }
}

fn section_heading(name: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!(" {name}"),
        Style::default()
            .fg(theme::YELLOW)
            .add_modifier(Modifier::BOLD),
    ))
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(" FinTrack Help ", theme::focused_field_style())),
        Line::from(""),
    ];

    for (section, rows) in KEY_HELP {
        lines.push(section_heading(section));
        for (keys, action) in *rows {
            lines.push(Line::from(Span::styled(
                format!("  {keys:<16} {action}"),
                theme::normal_style(),
            )));
        }
        lines.push(Line::from(""));
    }

    // Long names only; aliases share a description with their full command
    let mut listed: Vec<(&str, &str)> = commands::COMMANDS
        .iter()
        .filter(|(name, _)| name.len() > 2)
        .map(|(name, cmd)| (*name, cmd.description))
        .collect();
    listed.sort_unstable();
    listed.dedup_by_key(|(_, desc)| *desc);

    lines.push(section_heading("Commands"));
    for (name, desc) in listed {
        lines.push(Line::from(Span::styled(
            format!("  :{name:<16} {desc}"),
            theme::normal_style(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Press any key to close ",
        theme::dim_style(),
    )));
    lines
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let help_text = help_lines();

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 76.min(area.width.saturating_sub(4));
    let x = area.x + area.width.saturating_sub(popup_width) / 2;
    let y = area.y + area.height.saturating_sub(popup_height) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}

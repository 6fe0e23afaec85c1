// Handles the rendering of widgets to the terminal frame.

use super::filter::FilterMode;
use super::input::InputMode;
use super::model::ActionKind;
use super::view::{RowView, ViewSnapshot};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
};

/// Main render function called every frame.
pub fn render(f: &mut Frame, view: &ViewSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_unit_table(f, chunks[0], view);
    render_status(f, chunks[1], view);
    render_footer(f, chunks[2], view);

    if view.prompt.is_some() {
        render_action_prompt(f, view);
    }
}

fn render_unit_table(f: &mut Frame, area: Rect, view: &ViewSnapshot) {
    let rows: Vec<Row> = view.rows.iter().map(unit_row).collect();

    let header = Row::new(["", "Name", "Load", "Active", "Sub", "Description"])
        .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Gray));

    let title = if view.query.is_empty() || view.mode == InputMode::Filter {
        format!(
            " Units | page {}/{} | {} units ",
            view.page, view.total_pages, view.total_units
        )
    } else {
        format!(
            " Units matching '{}' | page {}/{} | {} of {} ",
            view.query, view.page, view.total_pages, view.matching_units, view.total_units
        )
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(2),
            Constraint::Percentage(30),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Green)),
    );

    f.render_widget(table, area);
}

fn unit_row(row: &RowView) -> Row<'_> {
    let (status_symbol, color) = if row.running {
        ("●", Color::Green)
    } else if row.failed {
        ("✖", Color::Red)
    } else {
        ("○", Color::DarkGray)
    };

    let style = if row.selected {
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::White)
            .bg(Color::Blue)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(Span::styled(status_symbol, Style::default().fg(color))),
        Cell::from(row.name.as_str()),
        Cell::from(row.load_state.as_str()),
        Cell::from(row.active_state.as_str()),
        Cell::from(row.sub_state.as_str()),
        Cell::from(row.description.as_str()),
    ])
    .style(style)
}

fn render_status(f: &mut Frame, area: Rect, view: &ViewSnapshot) {
    let mut spans = Vec::new();

    if let Some(busy) = &view.busy {
        spans.push(Span::styled(
            format!(" ⟳ {} {} ({}s) ", busy.action, busy.unit, busy.elapsed_secs),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(error) = &view.error {
        spans.push(Span::styled(
            format!(" Error: {error} "),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(notice) = &view.notice {
        spans.push(Span::styled(
            format!(" {notice} "),
            Style::default().fg(Color::Cyan),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer(f: &mut Frame, area: Rect, view: &ViewSnapshot) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let (title, help_text) = match view.mode {
        InputMode::Filter => {
            let hint = match view.filter_mode {
                FilterMode::Live => "| Done: Enter | Clear: Esc",
                FilterMode::OnCommit => "| Apply: Enter | Clear: Esc",
            };
            (
                " Filter ",
                Line::from(vec![
                    Span::raw("/"),
                    Span::styled(format!("{}_ ", view.query), bold),
                    Span::styled(hint, Style::default().fg(Color::DarkGray)),
                ]),
            )
        }
        InputMode::Normal | InputMode::Action => (
            " Controls ",
            Line::from(vec![
                Span::raw("Nav: "),
                Span::styled("j/k ", bold),
                Span::raw("| Page: "),
                Span::styled("h/l ", bold),
                Span::raw("| Filter: "),
                Span::styled("/ ", bold),
                Span::raw("| Action: "),
                Span::styled("Enter ", bold),
                Span::styled(
                    "s(start) x(stop) r(restart) e(enable) d(disable) ",
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw("| Refresh: "),
                Span::styled("R ", bold),
                Span::raw("| Quit: "),
                Span::styled("q", Style::default().fg(Color::Red)),
            ]),
        ),
    };

    let paragraph =
        Paragraph::new(help_text).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}

fn render_action_prompt(f: &mut Frame, view: &ViewSnapshot) {
    let Some(prompt) = &view.prompt else {
        return;
    };
    let area = centered_rect(60, 30, f.area());

    f.render_widget(Clear, area);

    let choices = ActionKind::ALL.map(ActionKind::as_str).join("/");
    let content = vec![
        Line::from(vec![
            Span::raw("Unit: "),
            Span::styled(
                prompt.unit.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("> "),
            Span::styled(
                format!("{}_", prompt.input),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(Span::styled(
            format!("{choices} | Run: Enter | Cancel: Esc"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Enter action ");

    f.render_widget(Paragraph::new(content).block(block), area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

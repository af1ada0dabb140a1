use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

use crate::models::Milestone;
use crate::tui::app::{App, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let title = Paragraph::new("🕹️ Arcade Leaderboard")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    draw_board(frame, app, chunks[1]);
    draw_status(frame, app, chunks[2]);

    if app.screen == Screen::Detail {
        draw_detail(frame, app);
    }
}

fn milestone_color(milestone: Milestone) -> Color {
    match milestone {
        Milestone::M4 => Color::Magenta,
        Milestone::M3 => Color::Cyan,
        Milestone::M2 => Color::Yellow,
        Milestone::M1 => Color::Green,
        Milestone::None => Color::Gray,
    }
}

fn draw_board(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Rankings (↑/↓ to select, Enter for details)");

    if app.participants().is_empty() {
        let message = if app.snapshot.loading {
            "Loading leaderboard..."
        } else {
            "No leaderboard data available"
        };
        let empty = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(vec!["Rank", "Name", "Points", "Milestone"])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .participants()
        .iter()
        .map(|entry| {
            let p = &entry.participant;
            Row::new(vec![
                Cell::from(format!("#{}", entry.rank)),
                Cell::from(p.name.clone()),
                Cell::from(p.score.to_string()),
                Cell::from(p.milestone.as_str())
                    .style(Style::default().fg(milestone_color(p.milestone))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(20),
        Constraint::Length(8),
        Constraint::Length(10),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = &app.snapshot;

    let mut status = Vec::new();
    if snapshot.loading {
        status.push(Span::styled("⏳ Refreshing... ", Style::default().fg(Color::Yellow)));
    }
    match (&snapshot.last_updated, &snapshot.source) {
        (Some(updated), Some(source)) => status.push(Span::raw(format!(
            "Updated {} from {} ({} participants)",
            updated.format("%H:%M:%S UTC"),
            source,
            snapshot.participants.len()
        ))),
        _ if !snapshot.loading => status.push(Span::raw("Not loaded yet")),
        _ => {}
    }

    let mut lines = vec![Line::from(status)];
    if let Some(error) = &snapshot.last_error {
        lines.push(Line::from(vec![
            Span::styled("Last refresh failed: ", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::styled(error.as_str(), Style::default().fg(Color::Red)),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("r", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" refresh | "),
            Span::styled("Enter", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" details | "),
            Span::styled("q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]));
    }

    let bar = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(bar, area);
}

fn count_line(label: &str, value: u32) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("  {}: ", label)),
        Span::styled(value.to_string(), Style::default().fg(Color::Cyan)),
    ])
}

fn draw_detail(frame: &mut Frame, app: &App) {
    let Some(entry) = app.selected_participant() else {
        return;
    };
    let p = &entry.participant;

    let mut text = vec![
        Line::from(vec![
            Span::raw("Rank: "),
            Span::styled(format!("#{}", entry.rank), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("Points: "),
            Span::styled(
                p.score.to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::raw("Milestone: "),
            Span::styled(
                p.milestone.as_str(),
                Style::default()
                    .fg(milestone_color(p.milestone))
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from("Badges:"),
        count_line("Arcade games", p.arcade_games),
        count_line("Special arcade games", p.special_arcade_games),
        count_line("Trivia games", p.trivia_games),
        count_line("Skill badges", p.skill_badges),
        count_line("Lab-free courses", p.lab_free_courses),
        Line::from(""),
    ];

    match app.selected_progress() {
        Some((tier, missing)) if missing.is_empty() => {
            text.push(Line::from(format!("All {} requirements met", tier.milestone)));
        }
        Some((tier, missing)) => {
            text.push(Line::from(format!(
                "Next: {} (+{} bonus points) needs",
                tier.milestone, tier.bonus
            )));
            for (label, value) in [
                ("Arcade games", missing.arcade_games),
                ("Trivia games", missing.trivia_games),
                ("Skill badges", missing.skill_badges),
                ("Lab-free courses", missing.lab_free_courses),
            ] {
                if value > 0 {
                    text.push(count_line(label, value));
                }
            }
        }
        None => text.push(Line::from(Span::styled(
            "Ultimate milestone reached",
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ))),
    }

    if let Some(url) = &p.profile_url {
        text.push(Line::from(""));
        text.push(Line::from(vec![
            Span::raw("Profile: "),
            Span::styled(url.as_str(), Style::default().fg(Color::Blue)),
        ]));
    }

    let area = centered_rect(60, 70, frame.size());
    let detail = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} (Esc to close)", p.name)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, area);
    frame.render_widget(detail, area);
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

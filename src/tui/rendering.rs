//! Frame rendering. Read-only over the application state.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::models::{FileStatus, MediaType, ProcessableFile};

use super::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_file_list(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    if app.input_mode != InputMode::Browse {
        render_input_popup(f, app);
    }
    if app.show_help {
        render_help_popup(f);
    }
}

fn status_color(status: FileStatus) -> Color {
    match status {
        FileStatus::Ready => Color::Green,
        FileStatus::NeedsYear => Color::Yellow,
        FileStatus::Invalid => Color::Red,
        FileStatus::AlreadyNormalized => Color::Cyan,
        FileStatus::Duplicate => Color::Magenta,
    }
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Ready => "ready",
        FileStatus::NeedsYear => "needs year",
        FileStatus::Invalid => "invalid",
        FileStatus::AlreadyNormalized => "normalized",
        FileStatus::Duplicate => "duplicate",
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.session.media_type() {
        Some(MediaType::Movie) => "Media Rename - movies",
        Some(MediaType::Series) => "Media Rename - series",
        None => "Media Rename - press m (movies) or s (series) to load a directory",
    };
    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    f.render_widget(header, area);
}

fn file_line(file: &ProcessableFile) -> Line<'_> {
    let color = status_color(file.status);
    let mut spans = vec![
        Span::styled(format!("[{:>10}] ", status_label(file.status)), Style::default().fg(color)),
        Span::styled(file.original_name.as_str(), Style::default().fg(Color::White)),
    ];
    if file.proposed_name != file.original_name {
        spans.push(Span::styled(" -> ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(file.proposed_name.as_str(), Style::default().fg(color)));
    }
    if let Some(reason) = file.reason {
        spans.push(Span::styled(
            format!("  ({reason})"),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

fn render_file_list(f: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app.session.files().iter().map(|file| ListItem::new(file_line(file))).collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("Files")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        )
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    f.render_stateful_widget(list, area, &mut app.list_state.clone());
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let counts = app.session.status_counts();
    let summary = if let Some(message) = &app.status_message {
        message.clone()
    } else {
        format!(
            "{} ready, {} need year, {} invalid, {} normalized, {} duplicate",
            counts.ready, counts.needs_year, counts.invalid, counts.already_normalized, counts.duplicate
        )
    };
    let status = Paragraph::new(summary)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, chunks[0]);

    let hint = if app.session.can_apply() && !app.session.is_empty() {
        "a apply  e edit  d remove  h help  q quit"
    } else {
        "e edit  y year  d remove  h help  q quit"
    };
    let controls = Paragraph::new(hint)
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Keys"));
    f.render_widget(controls, chunks[1]);
}

fn render_input_popup(f: &mut Frame, app: &App) {
    let title = match app.input_mode {
        InputMode::Directory(MediaType::Movie) => "Movie directory",
        InputMode::Directory(MediaType::Series) => "Series directory",
        InputMode::EditName => "Edit proposed name",
        InputMode::SharedYear => "Shared year",
        InputMode::Browse => "",
    };
    let area = centered_rect(70, 20, f.area());
    let input = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .title(format!("{title} (Enter to confirm, Esc to cancel)"))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, area);
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame) {
    let area = centered_rect(60, 60, f.area());
    let lines = vec![
        Line::from(Span::styled("Keys", Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from("  m       load a movie directory"),
        Line::from("  s       load a series directory"),
        Line::from("  j/k     move selection"),
        Line::from("  e       edit the proposed name"),
        Line::from("  p       propagate an edited series name to siblings"),
        Line::from("  y       set the shared year for a series"),
        Line::from("  d       remove the selected file from the session"),
        Line::from("  a       rename everything that is ready"),
        Line::from("  o       start over"),
        Line::from("  q/Esc   quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or h to close",
            Style::default().fg(Color::Gray),
        )),
    ];
    let help = Paragraph::new(lines)
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, area);
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

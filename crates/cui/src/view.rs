use crate::app::App;
use rankguess_core::{Item, Phase};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Style, Stylize};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(10),
            Constraint::Length(10),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(root[1]);

    draw_current(frame, middle[0], app);
    draw_next(frame, middle[1], app);
    draw_events(frame, root[2], app);

    if app.show_help {
        draw_help_popup(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.engine.session;
    let title = format!("Higher or Lower | Hint: {}", app.next_hint());
    let summary = format!(
        "Score {}  Best {}  Levels {}  Source {}",
        session.score,
        session.high_score,
        app.engine.catalog().len(),
        app.source_label
    );
    let lines = vec![
        Line::from(title.bold()),
        Line::from(summary),
        Line::from(format!("Status: {}", app.status_line)),
    ];
    let block = Block::default().borders(Borders::ALL).title("Overview");
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    frame.render_widget(paragraph, area);
}

fn draw_current(frame: &mut Frame, area: Rect, app: &App) {
    let Some(round) = app.engine.round.as_ref() else {
        draw_empty(frame, area, "Current");
        return;
    };
    let lines = card_lines(app, &round.current, format!("#{}", round.current.rank));
    let block = Block::default().borders(Borders::ALL).title("Current");
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn draw_next(frame: &mut Frame, area: Rect, app: &App) {
    let Some(round) = app.engine.round.as_ref() else {
        draw_empty(frame, area, "Next");
        return;
    };
    let rank = if round.revealed {
        format!("#{}", round.next.rank)
    } else {
        "#?".to_string()
    };
    let mut lines = card_lines(app, &round.next, rank);
    lines.push(Line::from(""));
    match (app.engine.phase(), app.last_outcome) {
        (Phase::AwaitingGuess, _) => {
            lines.push(Line::from(format!("is {}", round.next.name)));
            lines.push(Line::from("[k] HIGHER  or  [j] LOWER".bold()));
            lines.push(Line::from(format!("than {}?", round.current.name)));
        }
        (_, Some(outcome)) => {
            let color = if outcome.correct {
                Color::Green
            } else {
                Color::Red
            };
            lines.push(Line::from(
                format!("answer: {}", outcome.truth.label().to_uppercase()).fg(color),
            ));
        }
        _ => {}
    }
    let border = match app.last_outcome {
        Some(outcome) if outcome.correct => Style::default().fg(Color::Green),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::Yellow),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title("Next");
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

fn card_lines(app: &App, item: &Item, rank: String) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(item.name.clone().add_modifier(Modifier::BOLD)),
        Line::from(rank.fg(Color::Cyan)),
        Line::from(""),
        Line::from(app.thumbnail_label(item).dim()),
        Line::from(
            item.video
                .clone()
                .unwrap_or_else(|| "no video".to_string())
                .dim(),
        ),
    ]
}

fn draw_empty(frame: &mut Frame, area: Rect, title: &str) {
    let block = Block::default().borders(Borders::ALL).title(title);
    frame.render_widget(Paragraph::new("loading...").block(block), area);
}

fn draw_events(frame: &mut Frame, area: Rect, app: &App) {
    let capacity = area.height.saturating_sub(2) as usize;
    let start = app.event_log.len().saturating_sub(capacity);
    let lines: Vec<Line<'_>> = app
        .event_log
        .iter()
        .skip(start)
        .map(|line| Line::from(line.clone()))
        .collect();
    let block = Block::default().borders(Borders::ALL).title("Events");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_help_popup(frame: &mut Frame) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let lines = vec![
        Line::from("k / h / up     guess HIGHER (closer to #1)"),
        Line::from("j / l / down   guess LOWER"),
        Line::from("enter          next level, or restart after game over"),
        Line::from("n / space      next level"),
        Line::from("r              restart"),
        Line::from("? help | esc close | q quit"),
    ];
    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

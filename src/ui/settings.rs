//! Settings screen rendering
//!
//! Shows the editable source URL, the auto-refresh interval and where the
//! offline copy of the quizzes is kept.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::QuizSource;
use crate::settings::REFRESH_INTERVAL_STEP_SECS;

/// Renders the settings screen
pub fn render<S: QuizSource>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Form
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_form(frame, app, chunks[0]);
    render_help(frame, chunks[1]);
}

fn render_form<S: QuizSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = Style::default().fg(Color::DarkGray);

    let mut lines = vec![
        Line::from(Span::styled("Data Source", heading)),
        Line::from(vec![
            Span::raw("Source URL: "),
            Span::styled(app.url_input.clone(), Style::default().fg(Color::White)),
            Span::styled("\u{2581}", Style::default().fg(Color::Yellow)), // ▁ cursor
        ]),
        Line::from(Span::styled("Enter: save & check now", hint)),
        Line::from(""),
        Line::from(Span::styled("Auto-Refresh Interval", heading)),
        Line::from(vec![
            Span::raw("Every "),
            Span::styled(
                format!("{} seconds", app.store.settings().refresh_interval),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(Span::styled(
            format!("↑/↓: change by {} seconds", REFRESH_INTERVAL_STEP_SECS),
            hint,
        )),
        Line::from(""),
    ];

    if let Some(cache) = app.store.cache() {
        lines.push(Line::from(Span::styled("Offline Copy", heading)));
        lines.push(Line::from(Span::styled(
            cache.path().display().to_string(),
            Style::default().fg(Color::Gray),
        )));
    }

    let block = Block::default()
        .title(" Settings ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Save & check  "),
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Interval  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" Done"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::ui::test_support::{create_test_app, render_to_string};

    #[test]
    fn test_settings_shows_url_being_edited() {
        let (mut app, _temp_dir) = create_test_app();
        app.state = AppState::Settings;
        app.url_input = "https://example.com/q.json".to_string();

        let content = render_to_string(&app);

        assert!(content.contains("Data Source"));
        assert!(content.contains("https://example.com/q.json"));
        assert!(content.contains("save & check now"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_shows_interval() {
        let (mut app, _temp_dir) = create_test_app();
        app.state = AppState::Settings;
        app.store.set_refresh_interval(120);

        let content = render_to_string(&app);

        assert!(content.contains("Auto-Refresh Interval"));
        assert!(content.contains("120 seconds"));
    }

    #[test]
    fn test_settings_shows_cache_location() {
        let (mut app, _temp_dir) = create_test_app();
        app.state = AppState::Settings;

        let content = render_to_string(&app);

        assert!(content.contains("Offline Copy"));
    }
}

//! Quiz list screen rendering
//!
//! Renders the main list of quizzes with their icon, title and description,
//! plus a footer showing key bindings and how fresh the list is.

use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::QuizSource;
use crate::store::FeedOrigin;

/// Renders the quiz list screen
pub fn render<S: QuizSource>(frame: &mut Frame, app: &App<S>) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Quiz list
            Constraint::Length(1), // Data freshness
            Constraint::Length(1), // Help text
        ])
        .split(area);

    render_list(frame, app, chunks[0]);
    render_status(frame, app, chunks[1]);
    render_help(frame, chunks[2]);
}

fn render_list<S: QuizSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let quizzes = app.store.quizzes();
    let mut lines: Vec<Line> = Vec::with_capacity(quizzes.len() * 3);

    if quizzes.is_empty() {
        let message = if app.store.is_fetching() {
            "Loading quizzes..."
        } else {
            "No quizzes yet. Press r to refresh or s to change the source."
        };
        lines.push(Line::from(Span::styled(
            message,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (index, quiz) in quizzes.iter().enumerate() {
        let is_selected = index == app.selected_index;
        let cursor = if is_selected { "\u{25B8} " } else { "  " }; // ▸ or space

        let title_style = if is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        };

        lines.push(Line::from(vec![
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
            Span::raw(quiz.icon.glyph()),
            Span::raw(" "),
            Span::styled(quiz.title.clone(), title_style),
            Span::styled(
                format!("  ({} questions)", quiz.question_count()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(quiz.description.clone(), Style::default().fg(Color::Gray)),
        ]));
        lines.push(Line::from(""));
    }

    let block = Block::default()
        .title(" iQuiz ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

/// Renders the line telling where the list came from
fn render_status<S: QuizSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let paragraph = Paragraph::new(freshness_text(app)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Renders the help text at the bottom of the screen
fn render_help(frame: &mut Frame, area: Rect) {
    let help_spans = vec![
        Span::styled("↑/↓", Style::default().fg(Color::Yellow)),
        Span::raw(" Navigate  "),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" Start  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" Refresh  "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(" Settings  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" Help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" Quit"),
    ];

    let paragraph =
        Paragraph::new(Line::from(help_spans)).style(Style::default().fg(Color::DarkGray));

    frame.render_widget(paragraph, area);
}

/// Describes where the list came from and how old it is
fn freshness_text<S: QuizSource>(app: &App<S>) -> String {
    if app.store.is_fetching() {
        return " Refreshing...".to_string();
    }

    let Some(last_refresh) = app.store.last_refresh() else {
        return String::new();
    };

    let source = match app.store.origin() {
        Some(FeedOrigin::Cache) => "cache",
        _ => "network",
    };

    let mins_ago = (Local::now() - last_refresh).num_minutes();
    if mins_ago < 1 {
        format!(" From {}: just now", source)
    } else if mins_ago < 60 {
        format!(" From {}: {}m ago", source, mins_ago)
    } else {
        format!(" From {}: {}h ago", source, mins_ago / 60)
    }
}

#[cfg(test)]
mod tests {
    use crate::ui::test_support::{create_test_app, render_to_string};

    #[test]
    fn test_quiz_list_renders_titles_and_descriptions() {
        let (app, _temp_dir) = create_test_app();

        let content = render_to_string(&app);

        assert!(content.contains("iQuiz"), "Should render the title block");
        assert!(content.contains("Mathematics"));
        assert!(content.contains("Did you pass the third grade?"));
        assert!(content.contains("Marvel Super Heroes"));
        assert!(content.contains("(2 questions)"));
    }

    #[test]
    fn test_quiz_list_shows_freshness() {
        let (app, _temp_dir) = create_test_app();

        let content = render_to_string(&app);

        assert!(content.contains("From cache: just now"));
    }

    #[test]
    fn test_quiz_list_empty_state() {
        let (mut app, temp_dir) = create_test_app();
        std::fs::write(temp_dir.path().join("quizzes.json"), "[]").unwrap();
        app.store.load_from_disk().unwrap();

        let content = render_to_string(&app);

        assert!(content.contains("No quizzes yet"));
    }
}

//! Quiz attempt screen rendering
//!
//! Three scenes share this screen: the question (pick an option), the answer
//! (was the pick right, and what was correct), and the final score.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::QuizSource;
use crate::flow::{FlowPhase, QuizFlow};

/// Renders the quiz attempt screen
pub fn render<S: QuizSource>(frame: &mut Frame, app: &App<S>) {
    let Some(flow) = app.flow.as_ref() else {
        return;
    };

    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Scene
            Constraint::Length(1), // Gesture hint
        ])
        .split(area);

    let lines = match flow.phase() {
        FlowPhase::Asking => question_lines(flow),
        FlowPhase::Revealing => answer_lines(flow),
        FlowPhase::Finished => finished_lines(flow),
        FlowPhase::Abandoned => Vec::new(),
    };

    let title = match flow.phase() {
        FlowPhase::Asking | FlowPhase::Revealing => format!(
            " {} · Question {} of {} ",
            flow.quiz().title,
            flow.current_index() + 1,
            flow.total()
        ),
        FlowPhase::Finished | FlowPhase::Abandoned => format!(" {} ", flow.quiz().title),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, chunks[0]);
    render_hint(frame, flow, chunks[1]);
}

fn question_lines(flow: &QuizFlow) -> Vec<Line<'static>> {
    let Some(question) = flow.current_question() else {
        return Vec::new();
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            question.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (index, option) in question.options.iter().enumerate() {
        let is_selected = flow.selected() == Some(index);
        let marker = if is_selected { "\u{25C9}" } else { "\u{25CB}" }; // ◉ or ○
        let style = if is_selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{} {}. {}", marker, index + 1, option),
            style,
        )));
    }

    lines.push(Line::from(""));
    let submit_style = if flow.selected().is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled("[ Enter: Submit ]", submit_style)));
    lines
}

fn answer_lines(flow: &QuizFlow) -> Vec<Line<'static>> {
    let Some(question) = flow.current_question() else {
        return Vec::new();
    };

    let correct_text = question
        .correct_option()
        .unwrap_or("(no valid answer in this quiz)")
        .to_string();

    let verdict = if flow.answered_correctly() == Some(true) {
        Span::styled("\u{1F389} Right!", Style::default().fg(Color::Green)) // 🎉
    } else {
        Span::styled("\u{274C} Wrong", Style::default().fg(Color::Red)) // ❌
    };

    vec![
        Line::from(""),
        Line::from(Span::styled(
            question.text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Correct answer:",
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            correct_text,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(verdict),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter: Next ]",
            Style::default().fg(Color::Yellow),
        )),
    ]
}

fn finished_lines(flow: &QuizFlow) -> Vec<Line<'static>> {
    let Some(result) = flow.result() else {
        return Vec::new();
    };

    vec![
        Line::from(""),
        Line::from(Span::styled(
            result.feedback.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(result.summary()),
        Line::from(""),
        Line::from(Span::styled(
            "[ Enter: Done ]",
            Style::default().fg(Color::Yellow),
        )),
    ]
}

/// Renders the navigation hint at the bottom of the screen
fn render_hint(frame: &mut Frame, flow: &QuizFlow, area: Rect) {
    let text = if flow.is_finished() {
        "Enter/Esc to return to the list"
    } else {
        "→ Submit/Next   ← Abandon   1-9 or ↑/↓ to choose"
    };
    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use crate::app::AppState;
    use crate::flow::QuizFlow;
    use crate::ui::test_support::{create_test_app, render_to_string};

    fn start_first_quiz(app: &mut crate::app::App) {
        let quiz = app.store.quizzes()[0].clone();
        app.flow = Some(QuizFlow::new(quiz));
        app.state = AppState::Quiz;
    }

    #[test]
    fn test_question_scene_renders_options() {
        let (mut app, _temp_dir) = create_test_app();
        start_first_quiz(&mut app);

        let content = render_to_string(&app);

        assert!(content.contains("Question 1 of 2"));
        assert!(content.contains("What is 2+2?"));
        assert!(content.contains("1. 4"));
        assert!(content.contains("2. 22"));
        assert!(content.contains("Submit"));
    }

    #[test]
    fn test_answer_scene_shows_correct_answer() {
        let (mut app, _temp_dir) = create_test_app();
        start_first_quiz(&mut app);
        let flow = app.flow.as_mut().unwrap();
        flow.select(1).unwrap();
        flow.submit().unwrap();

        let content = render_to_string(&app);

        assert!(content.contains("Correct answer:"));
        assert!(content.contains("Wrong"));
        assert!(content.contains("Next"));
    }

    #[test]
    fn test_answer_scene_right_verdict() {
        let (mut app, _temp_dir) = create_test_app();
        start_first_quiz(&mut app);
        let flow = app.flow.as_mut().unwrap();
        flow.select(0).unwrap();
        flow.submit().unwrap();

        let content = render_to_string(&app);

        assert!(content.contains("Right!"));
    }

    #[test]
    fn test_finished_scene_shows_feedback_and_score() {
        let (mut app, _temp_dir) = create_test_app();
        start_first_quiz(&mut app);
        let flow = app.flow.as_mut().unwrap();
        for _ in 0..2 {
            flow.select(1).unwrap();
            flow.submit().unwrap();
            flow.advance().unwrap();
        }

        let content = render_to_string(&app);

        assert!(content.contains("Almost!"));
        assert!(content.contains("You got 1 of 2 correct."));
    }
}

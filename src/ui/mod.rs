//! UI rendering module for iQuiz
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod error_popup;
pub mod help_overlay;
pub mod quiz_flow;
pub mod quiz_list;
pub mod settings;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::{App, AppState};
use crate::data::QuizSource;

/// Renders the current view plus any overlay on top of it
pub fn render<S: QuizSource>(frame: &mut Frame, app: &App<S>) {
    match app.state {
        AppState::QuizList => quiz_list::render(frame, app),
        AppState::Quiz => quiz_flow::render(frame, app),
        AppState::Settings => settings::render(frame, app),
    }

    if app.show_help {
        help_overlay::render(frame);
    }

    if app.store.show_error() {
        error_popup::render(frame, &app.store.error_message());
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
pub(crate) mod test_support {
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    use crate::app::App;
    use crate::cache::QuizCache;
    use crate::settings::Settings;
    use crate::store::QuizStore;

    pub const FEED: &str = r#"[
        {"title": "Mathematics", "desc": "Did you pass the third grade?", "questions": [
            {"text": "What is 2+2?", "answer": "1", "answers": ["4", "22"]},
            {"text": "What is 3*3?", "answer": "2", "answers": ["6", "9"]}
        ]},
        {"title": "Marvel Super Heroes", "desc": "Avengers, Assemble!", "questions": [
            {"text": "Who is Iron Man?", "answer": "1", "answers": ["Tony Stark", "Bruce Wayne"]}
        ]}
    ]"#;

    /// App with the test feed published from a temp cache
    pub fn create_test_app() -> (App, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let cache = QuizCache::with_dir(temp_dir.path().to_path_buf());
        cache.write(FEED.as_bytes()).unwrap();
        let mut store = QuizStore::new(Settings::default(), Some(cache));
        store.load_from_disk().unwrap();
        (App::new(store), temp_dir)
    }

    /// Renders the app into an 80x24 test terminal and returns the screen text
    pub fn render_to_string(app: &App) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| super::render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{create_test_app, render_to_string};
    use super::*;

    #[test]
    fn test_centered_rect_is_centered() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = centered_rect(40, 10, area);
        assert_eq!(rect, Rect::new(20, 7, 40, 10));
    }

    #[test]
    fn test_centered_rect_clamps_to_small_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered_rect(40, 10, area);
        assert!(rect.width <= 20);
        assert!(rect.height <= 5);
    }

    #[test]
    fn test_render_shows_error_popup_over_list() {
        let (mut app, _temp_dir) = create_test_app();
        app.store.set_source_url("not a url");
        app.store.load();

        let content = render_to_string(&app);

        assert!(content.contains("Network Error"));
        assert!(content.contains("Bad URL"));
    }

    #[test]
    fn test_render_dispatches_on_state() {
        let (mut app, _temp_dir) = create_test_app();

        app.state = AppState::Settings;
        let content = render_to_string(&app);

        assert!(content.contains("Settings"));
        assert!(content.contains("Source URL"));
    }
}

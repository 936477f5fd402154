//! Application state management for iQuiz
//!
//! This module contains the main application state, handling keyboard input,
//! applying store updates, and switching between the quiz list, a quiz
//! attempt and the settings form.

use crossterm::event::{KeyCode, KeyEvent};
use tracing::debug;

use crate::data::{HttpSource, Quiz, QuizSource};
use crate::flow::{FlowPhase, QuizFlow};
use crate::store::QuizStore;

/// Application state enum representing the current view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// List of all quizzes
    QuizList,
    /// An attempt at one quiz
    Quiz,
    /// Source URL and refresh interval form
    Settings,
}

/// Main application struct managing state and data
pub struct App<S: QuizSource = HttpSource> {
    /// Current application state/view
    pub state: AppState,
    /// The quiz store backing the list
    pub store: QuizStore<S>,
    /// Index of currently selected quiz in list view
    pub selected_index: usize,
    /// The attempt in progress, if any
    pub flow: Option<QuizFlow>,
    /// Source URL being edited in the settings form
    pub url_input: String,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
}

impl<S: QuizSource> App<S> {
    /// Creates a new App around a store
    pub fn new(store: QuizStore<S>) -> Self {
        let url_input = store.settings().source_url.clone();
        Self {
            state: AppState::QuizList,
            store,
            selected_index: 0,
            flow: None,
            url_input,
            show_help: false,
            should_quit: false,
        }
    }

    /// Returns the currently selected quiz, if any
    pub fn selected_quiz(&self) -> Option<&Quiz> {
        self.store.quizzes().get(self.selected_index)
    }

    /// Applies pending store messages and keeps the selection in range
    ///
    /// Called once per frame from the main loop.
    pub fn on_tick(&mut self) {
        if self.store.process_pending() > 0 {
            self.clamp_selection();
        }
    }

    fn clamp_selection(&mut self) {
        let count = self.store.quizzes().len();
        if self.selected_index >= count {
            self.selected_index = count.saturating_sub(1);
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - Error alert: any of `Enter`, `Esc`, `q` dismisses it
    /// - QuizList: `Up`/`k`, `Down`/`j` move, `Enter` starts the quiz,
    ///   `r` refreshes, `s` opens settings, `?` help, `q`/`Esc` quit
    /// - Quiz: `Up`/`k`, `Down`/`j` or `1`-`9` pick an option, `Enter`/`Right`/`l`
    ///   submits or moves on, `Left`/`h`/`Esc` abandons
    /// - Settings: type to edit the URL, `Up`/`Down` change the interval,
    ///   `Enter` saves and checks now, `Esc` saves and closes
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Error alert intercepts all keys when shown
        if self.store.show_error() {
            if matches!(
                key_event.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char(' ')
            ) {
                self.store.dismiss_error();
            }
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        match self.state {
            AppState::QuizList => self.handle_list_key(key_event.code),
            AppState::Quiz => self.handle_quiz_key(key_event.code),
            AppState::Settings => self.handle_settings_key(key_event.code),
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_index + 1 < self.store.quizzes().len() {
                    self.selected_index += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(quiz) = self.selected_quiz().cloned() {
                    debug!(quiz = %quiz.title, "starting quiz");
                    self.flow = Some(QuizFlow::new(quiz));
                    self.state = AppState::Quiz;
                }
            }
            KeyCode::Char('r') => {
                self.store.load();
            }
            KeyCode::Char('s') => {
                self.url_input = self.store.settings().source_url.clone();
                self.state = AppState::Settings;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, code: KeyCode) {
        let Some(flow) = self.flow.as_mut() else {
            self.state = AppState::QuizList;
            return;
        };

        match (flow.phase(), code) {
            (_, KeyCode::Char('q')) => {
                self.should_quit = true;
            }
            (FlowPhase::Finished, KeyCode::Enter | KeyCode::Esc) => {
                self.leave_quiz();
            }
            (_, KeyCode::Left | KeyCode::Char('h') | KeyCode::Esc) => {
                flow.abandon();
                self.leave_quiz();
            }
            (_, KeyCode::Enter | KeyCode::Right | KeyCode::Char('l')) => {
                flow.forward();
            }
            (FlowPhase::Asking, KeyCode::Up | KeyCode::Char('k')) => {
                let _ = flow.select_previous();
            }
            (FlowPhase::Asking, KeyCode::Down | KeyCode::Char('j')) => {
                let _ = flow.select_next();
            }
            (FlowPhase::Asking, KeyCode::Char(c @ '1'..='9')) => {
                let index = c as usize - '1' as usize;
                let _ = flow.select(index);
            }
            _ => {}
        }
    }

    fn leave_quiz(&mut self) {
        self.flow = None;
        self.state = AppState::QuizList;
    }

    fn handle_settings_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.save_url_input();
                self.state = AppState::QuizList;
            }
            KeyCode::Enter => {
                self.save_url_input();
                self.store.load();
            }
            KeyCode::Up => {
                self.store.increment_refresh_interval();
            }
            KeyCode::Down => {
                self.store.decrement_refresh_interval();
            }
            KeyCode::Backspace => {
                self.url_input.pop();
            }
            KeyCode::Char(c) => {
                self.url_input.push(c);
            }
            _ => {}
        }
    }

    fn save_url_input(&mut self) {
        let url = self.url_input.trim().to_string();
        if url != self.store.settings().source_url {
            self.store.set_source_url(url);
        }
    }
}

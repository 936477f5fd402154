//! Core data models for iQuiz
//!
//! This module contains the quiz and question types shown by the application,
//! the wire-format mirrors decoded from the remote feed, and the source used
//! to fetch that feed.

pub mod remote;
pub mod source;

pub use remote::{decode_quizzes, RemoteQuestion, RemoteQuiz};
pub use source::{FetchError, HttpSource, QuizSource};

use serde::Serialize;

/// Identifier of a quiz, unique within the published list it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuizId(pub usize);

/// Identifier of a question, unique within its quiz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct QuestionId(pub usize);

/// Icon shown next to a quiz in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizIcon {
    Math,
    Marvel,
    Science,
    /// Placeholder for any quiz without a dedicated icon
    Generic,
}

impl QuizIcon {
    /// Picks an icon from a quiz title
    ///
    /// Matching is a case-insensitive substring test, checked in the order
    /// math, marvel, science. Anything else gets the generic placeholder.
    pub fn for_title(title: &str) -> Self {
        let title = title.to_lowercase();
        if title.contains("math") {
            QuizIcon::Math
        } else if title.contains("marvel") {
            QuizIcon::Marvel
        } else if title.contains("science") {
            QuizIcon::Science
        } else {
            QuizIcon::Generic
        }
    }

    /// Name of the image asset for this icon
    pub fn asset_name(&self) -> &'static str {
        match self {
            QuizIcon::Math => "mathIcon",
            QuizIcon::Marvel => "marvelIcon",
            QuizIcon::Science => "scienceIcon",
            QuizIcon::Generic => "questionmark.circle",
        }
    }

    /// Terminal glyph for this icon
    pub fn glyph(&self) -> &'static str {
        match self {
            QuizIcon::Math => "\u{2797}",    // ➗
            QuizIcon::Marvel => "\u{1F9B8}", // 🦸
            QuizIcon::Science => "\u{1F52C}", // 🔬
            QuizIcon::Generic => "\u{2753}", // ❓
        }
    }
}

/// A multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Identifier within the owning quiz
    pub id: QuestionId,
    /// Prompt shown to the user
    pub text: String,
    /// Answer options in display order
    pub options: Vec<String>,
    /// Zero-based index of the correct option
    pub correct_index: usize,
}

impl Question {
    /// Returns the text of the correct option
    ///
    /// Questions decoded from the remote feed are not bounds-checked, so this
    /// is `None` when the feed names an option that does not exist.
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// Whether `index` is the correct option
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index && index < self.options.len()
    }
}

/// A named, ordered collection of questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quiz {
    /// Identifier within the published list
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub icon: QuizIcon,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Number of questions in the quiz
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

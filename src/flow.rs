//! One attempt at a quiz
//!
//! A [`QuizFlow`] walks through a quiz's questions in order. Each question is
//! first asked (the user picks an option and submits), then revealed (the
//! correct answer is shown), then the flow advances. After the last question
//! the flow is finished and produces a [`QuizResult`]. The attempt can be
//! abandoned at any point, in which case no result is produced.

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::data::{Question, Quiz};

/// Where the flow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    /// Waiting for the user to pick and submit an option
    Asking,
    /// Showing whether the submitted option was correct
    Revealing,
    /// All questions answered
    Finished,
    /// The user left before finishing
    Abandoned,
}

/// Errors returned for transitions the current phase doesn't allow
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    /// Submit was attempted with nothing selected
    #[error("No option selected")]
    NoSelection,

    /// The selected option doesn't exist on the current question
    #[error("Option {index} is out of range (question has {count} options)")]
    OptionOutOfRange { index: usize, count: usize },

    /// The action isn't allowed in the current phase
    #[error("Cannot {action} while {phase:?}")]
    WrongPhase {
        action: &'static str,
        phase: FlowPhase,
    },
}

/// Closing remark for a finished attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Perfect,
    Almost,
    Finished,
}

impl Feedback {
    /// Picks the remark for `score` out of `total`
    ///
    /// Every answer right is "Perfect!", at most one wrong is "Almost!",
    /// anything else is "Finished". With one question or fewer, a score of
    /// zero still counts as "Almost!".
    pub fn for_score(score: usize, total: usize) -> Self {
        if score == total {
            Feedback::Perfect
        } else if score >= total.saturating_sub(1) {
            Feedback::Almost
        } else {
            Feedback::Finished
        }
    }

    /// Text shown for this remark
    pub fn message(&self) -> &'static str {
        match self {
            Feedback::Perfect => "Perfect!",
            Feedback::Almost => "Almost!",
            Feedback::Finished => "Finished",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of a finished attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub feedback: Feedback,
}

impl QuizResult {
    /// One-line summary, e.g. "You got 3 of 4 correct."
    pub fn summary(&self) -> String {
        format!("You got {} of {} correct.", self.score, self.total)
    }
}

/// State of one attempt at a quiz
#[derive(Debug, Clone)]
pub struct QuizFlow {
    quiz: Quiz,
    current: usize,
    score: usize,
    selected: Option<usize>,
    phase: FlowPhase,
}

impl QuizFlow {
    /// Starts an attempt at `quiz`
    ///
    /// A quiz without questions starts out finished.
    pub fn new(quiz: Quiz) -> Self {
        let phase = if quiz.questions.is_empty() {
            FlowPhase::Finished
        } else {
            FlowPhase::Asking
        };
        Self {
            quiz,
            current: 0,
            score: 0,
            selected: None,
            phase,
        }
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    /// Zero-based index of the current question
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The question being asked or revealed
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            FlowPhase::Asking | FlowPhase::Revealing => self.quiz.questions.get(self.current),
            FlowPhase::Finished | FlowPhase::Abandoned => None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.quiz.question_count()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == FlowPhase::Finished
    }

    /// Whether the attempt is over, finished or abandoned
    pub fn is_over(&self) -> bool {
        matches!(self.phase, FlowPhase::Finished | FlowPhase::Abandoned)
    }

    /// Whether the submitted option was correct, while revealing
    pub fn answered_correctly(&self) -> Option<bool> {
        if self.phase != FlowPhase::Revealing {
            return None;
        }
        let question = self.current_question()?;
        Some(self.selected.is_some_and(|sel| question.is_correct(sel)))
    }

    /// Selects option `index` on the current question
    pub fn select(&mut self, index: usize) -> Result<(), FlowError> {
        self.require_phase(FlowPhase::Asking, "select")?;
        let count = self
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or_default();
        if index >= count {
            return Err(FlowError::OptionOutOfRange { index, count });
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Moves the selection down one option, selecting the first if none is selected
    pub fn select_next(&mut self) -> Result<(), FlowError> {
        let next = self.selected.map_or(0, |sel| sel + 1);
        let count = self
            .current_question()
            .map(|q| q.options.len())
            .unwrap_or_default();
        self.select(next.min(count.saturating_sub(1)))
    }

    /// Moves the selection up one option, selecting the first if none is selected
    pub fn select_previous(&mut self) -> Result<(), FlowError> {
        let previous = self.selected.map_or(0, |sel| sel.saturating_sub(1));
        self.select(previous)
    }

    /// Submits the selected option and reveals the answer
    ///
    /// # Returns
    /// * `Ok(true)` if the selection was correct (the score goes up by one)
    /// * `Ok(false)` if it was wrong
    /// * `Err(FlowError::NoSelection)` if nothing is selected
    pub fn submit(&mut self) -> Result<bool, FlowError> {
        self.require_phase(FlowPhase::Asking, "submit")?;
        let selected = self.selected.ok_or(FlowError::NoSelection)?;

        let correct = self
            .current_question()
            .is_some_and(|q| q.is_correct(selected));
        if correct {
            self.score += 1;
        }
        self.phase = FlowPhase::Revealing;
        debug!(question = self.current, selected, correct, "answer submitted");
        Ok(correct)
    }

    /// Moves past a revealed answer to the next question, or finishes
    pub fn advance(&mut self) -> Result<(), FlowError> {
        self.require_phase(FlowPhase::Revealing, "advance")?;
        self.current += 1;
        self.selected = None;
        self.phase = if self.current >= self.quiz.question_count() {
            FlowPhase::Finished
        } else {
            FlowPhase::Asking
        };
        Ok(())
    }

    /// Single "next" action: submit while asking, advance while revealing
    ///
    /// Does nothing when asking with no selection or when the attempt is over.
    pub fn forward(&mut self) -> Option<FlowPhase> {
        let moved = match self.phase {
            FlowPhase::Asking => self.submit().is_ok(),
            FlowPhase::Revealing => self.advance().is_ok(),
            FlowPhase::Finished | FlowPhase::Abandoned => false,
        };
        moved.then_some(self.phase)
    }

    /// Ends the attempt without a result
    pub fn abandon(&mut self) {
        debug!(quiz = %self.quiz.title, question = self.current, "attempt abandoned");
        self.phase = FlowPhase::Abandoned;
        self.selected = None;
    }

    /// Result of the attempt, once finished
    pub fn result(&self) -> Option<QuizResult> {
        if self.phase != FlowPhase::Finished {
            return None;
        }
        let total = self.total();
        Some(QuizResult {
            score: self.score,
            total,
            feedback: Feedback::for_score(self.score, total),
        })
    }

    fn require_phase(&self, expected: FlowPhase, action: &'static str) -> Result<(), FlowError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(FlowError::WrongPhase {
                action,
                phase: self.phase,
            })
        }
    }
}

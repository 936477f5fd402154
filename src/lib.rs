//! iQuiz library
//!
//! Exposes the quiz store, quiz flow and interface modules to the binary and
//! to integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod flow;
pub mod refresh;
pub mod settings;
pub mod store;
pub mod ui;

//! Ratatui front-end: one tab per table, modal forms for new rows, and a
//! footer for status messages. All store access goes through [`App`], which
//! owns the session's connection.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;

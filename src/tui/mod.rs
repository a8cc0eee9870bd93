//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides:
//! - The sleep questionnaire form
//! - Result page with advice and an input chart
//! - About and Credits pages

mod app;
mod styles;
mod ui;

pub use app::App;
pub use styles::NightTheme;

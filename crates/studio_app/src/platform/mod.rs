//! Terminal front-end: input parsing, effect execution and rendering.
mod app;
mod commands;
mod effects;
mod logging;
mod ui;

pub use app::run_app;

mod app;
mod cli;
mod commands;
mod effects;
mod logging;
mod notifier;
mod persistence;
mod render;

pub use app::{run_app, AppExit};
pub use cli::Cli;

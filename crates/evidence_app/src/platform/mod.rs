pub mod app;
pub mod cli;
mod effects;
mod logging;
mod persistence;
mod render;

pub use app::run_app;
pub use cli::Cli;

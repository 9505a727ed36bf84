mod args;
mod commands;
mod handlers;
pub mod loader;
pub mod logging;
pub mod output;
pub mod types;

pub use args::{Cli, Commands};
pub use commands::run;

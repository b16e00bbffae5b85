//! CLI command handlers, one file per command.

mod config_path;
mod get;
mod serve;
mod show;

pub use config_path::run_config_path;
pub use get::run_get;
pub use serve::run_serve;
pub use show::run_show;

//! CLI command implementations.

mod analyze;
mod config;
mod doctor;
mod list;
mod mcp;
mod serve;
mod transcript;

pub use analyze::run_analyze;
pub use config::run_config;
pub use doctor::run_doctor;
pub use list::run_list;
pub use mcp::run_mcp;
pub use serve::run_serve;
pub use transcript::run_transcript;

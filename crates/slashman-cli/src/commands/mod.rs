//! CLI command handlers
//!
//! One module per subcommand.

pub mod agents;
pub mod cleanup;
pub mod generate;
pub mod list;

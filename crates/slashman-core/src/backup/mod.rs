//! Timestamped backups of command files before they are overwritten

mod create;

pub use create::create_backup;
pub use slashman_scanner::backup::{backup_path_for, count_backups, is_backup_path};

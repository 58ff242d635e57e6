//! Backup creation

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use slashman_scanner::backup::backup_path_for;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Copy `path` to `<name>.<YYYYMMDD-HHMMSS>.bak` beside it.
///
/// Content and permissions are copied; the modification time is carried
/// over when the platform allows it. A backup taken in the same second as
/// an earlier one replaces it.
///
/// # Errors
/// Returns an error if the copy fails
pub fn create_backup(path: &Path, timestamp: DateTime<Utc>) -> CoreResult<PathBuf> {
    let backup_path = backup_path_for(path, timestamp);
    fs::copy(path, &backup_path).map_err(|e| CoreError::io(&backup_path, &e))?;

    let preserved = fs::metadata(path)
        .and_then(|meta| meta.modified())
        .and_then(|modified| {
            File::options()
                .write(true)
                .open(&backup_path)?
                .set_modified(modified)
        });
    if let Err(e) = preserved {
        tracing::debug!("Could not preserve mtime on {}: {e}", backup_path.display());
    }

    tracing::debug!("Backed up {} to {}", path.display(), backup_path.display());
    Ok(backup_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_backup_copies_content_and_mtime() {
        let dir = TempDir::new().unwrap();
        let original = dir.path().join("review.md");
        fs::write(&original, "original content").unwrap();

        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let backup = create_backup(&original, ts).unwrap();

        assert_eq!(
            backup.file_name().unwrap().to_string_lossy(),
            "review.md.20250101-000000.bak"
        );
        assert_eq!(fs::read_to_string(&backup).unwrap(), "original content");
        assert_eq!(
            fs::metadata(&backup).unwrap().modified().unwrap(),
            fs::metadata(&original).unwrap().modified().unwrap()
        );
    }

    #[test]
    fn test_backup_of_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let result = create_backup(&dir.path().join("gone.md"), Utc::now());
        assert!(matches!(result, Err(CoreError::Io { .. })));
    }
}

//! JSON output formatter

use crate::discovery::ListReport;
use crate::error::ScanResult;

/// Convert a list report to a JSON string
///
/// # Errors
/// Returns an error if serialization fails
pub fn to_json(report: &ListReport) -> ScanResult<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

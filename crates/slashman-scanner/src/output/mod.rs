//! Output formatters for list reports

pub mod json;
pub mod text;

pub use json::to_json;
pub use text::to_text;

//! Output formatting modules.

pub mod json;
pub mod text;

pub use json::{format_json, format_named_json, json_schema};
pub use text::{format_context_text, format_segments_text};

//! JSON parsing for contents API responses.

use crate::error::{GithubError, GithubResult};
use crate::models::{ContentsEntry, ContentsEntryType};
use ddp_core::{EntryKind, RemoteEntry};
use serde_json::Value;

/// Parse one page of a directory listing.
///
/// The endpoint answers a file path with a single object instead of an
/// array; that is reported as an invalid response rather than a listing of
/// one.
pub fn parse_listing_page(json: Value) -> GithubResult<Vec<ContentsEntry>> {
    match json {
        Value::Array(_) => Ok(serde_json::from_value(json)?),
        Value::Object(ref obj) => {
            let path = obj.get("path").and_then(Value::as_str).unwrap_or("?");
            Err(GithubError::InvalidResponse {
                message: format!("'{path}' is not a directory"),
            })
        }
        other => Err(GithubError::InvalidResponse {
            message: format!("expected a directory listing, got {}", json_kind(&other)),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Convert an API entry into the core listing type.
pub fn to_remote_entry(entry: ContentsEntry) -> RemoteEntry {
    let kind = match entry.entry_type {
        ContentsEntryType::File => EntryKind::File,
        ContentsEntryType::Dir => EntryKind::Directory,
        ContentsEntryType::Symlink | ContentsEntryType::Submodule | ContentsEntryType::Unknown => {
            EntryKind::Other
        }
    };

    RemoteEntry {
        name: entry.name,
        path: entry.path,
        kind,
        download_locator: entry.download_url.filter(|u| !u.is_empty()),
        size: entry.size,
    }
}

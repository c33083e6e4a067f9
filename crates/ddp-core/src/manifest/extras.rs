//! Parser for the free-form `extra.txt` key/value file.
//!
//! Each non-empty line is either `key: value` (split at the first colon,
//! both sides trimmed) or `key value...` (first whitespace token is the key,
//! the rest joined by single spaces). Anything else is ignored. Later
//! duplicates overwrite the value but keep the first key position.

use indexmap::IndexMap;

/// Ordered key/value pairs parsed from `extra.txt`.
pub type Extras = IndexMap<String, String>;

/// Parse a single line. Returns `None` for lines that carry no pair.
pub fn parse_extra_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    if let Some((key, value)) = line.split_once(':') {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        return Some((key.to_string(), value.trim().to_string()));
    }

    let mut tokens = line.split_whitespace();
    let key = tokens.next()?;
    let rest: Vec<&str> = tokens.collect();
    if rest.is_empty() {
        return None;
    }
    Some((key.to_string(), rest.join(" ")))
}

/// Parse the whole file. Never fails.
pub fn parse_extras(text: &str) -> Extras {
    let mut extras = Extras::new();
    for (key, value) in text.lines().filter_map(parse_extra_line) {
        extras.insert(key, value);
    }
    extras
}

/// Render extras back into `key: value` lines.
///
/// Parsing the output yields the same map.
pub fn serialize_extras(extras: &Extras) -> String {
    let mut out = String::new();
    for (key, value) in extras {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out
}

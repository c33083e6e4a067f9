//! Filesystem-safe folder names for app ids.
//!
//! Percent-encoding over an ASCII allow-list: `[A-Za-z0-9._-]` pass through,
//! every other byte becomes `%XX`. Because `%` itself is always encoded the
//! mapping is injective, so two distinct ids never share an install folder.
//! A leading or trailing `.` and the first character of a Windows device
//! name are encoded too.

const HEX: &[u8; 16] = b"0123456789ABCDEF";

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

const fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'_' | b'-')
}

fn is_device_name(id: &str) -> bool {
    let stem = id.split('.').next().unwrap_or(id);
    WINDOWS_DEVICE_NAMES
        .iter()
        .any(|device| stem.eq_ignore_ascii_case(device))
}

fn push_escaped(out: &mut String, byte: u8) {
    out.push('%');
    out.push(char::from(HEX[usize::from(byte >> 4)]));
    out.push(char::from(HEX[usize::from(byte & 0x0F)]));
}

/// Map an app id to a folder name that is valid on every supported platform.
pub fn sanitize_folder_name(id: &str) -> String {
    if id.is_empty() {
        return "%".to_string();
    }

    let bytes = id.as_bytes();
    let last = bytes.len() - 1;
    let device = is_device_name(id);
    let mut out = String::with_capacity(id.len());

    for (i, &byte) in bytes.iter().enumerate() {
        let edge_dot = byte == b'.' && (i == 0 || i == last);
        let device_head = device && i == 0;
        if is_unreserved(byte) && !edge_dot && !device_head {
            out.push(char::from(byte));
        } else {
            push_escaped(&mut out, byte);
        }
    }
    out
}

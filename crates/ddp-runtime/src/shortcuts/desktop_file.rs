//! Freedesktop `.desktop` launchers.

use std::path::Path;

#[cfg(not(windows))]
use ddp_core::ports::ShortcutError;

/// Escape a value per the "string" rules of the desktop entry format.
fn escape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Quote a path as a single `Exec` argument.
///
/// Quoting happens first, then field codes (`%`) are doubled, then the
/// general string escaping runs over the result.
fn exec_argument(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '"' | '`' | '$' | '\\' => {
                quoted.push('\\');
                quoted.push(c);
            }
            '%' => quoted.push_str("%%"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    escape_value(&quoted)
}

/// Contents of a launcher for `target`.
pub fn render_desktop_entry(app_name: &str, target: &Path) -> String {
    let working_dir = target.parent().unwrap_or(target);
    format!(
        "[Desktop Entry]\nType=Application\nVersion=1.0\nName={}\nExec={}\nPath={}\nTerminal=false\n",
        escape_value(app_name),
        exec_argument(target),
        escape_value(&working_dir.display().to_string()),
    )
}

/// Write the launcher and mark it executable (desktops refuse to launch
/// untrusted non-executable entries).
#[cfg(not(windows))]
pub fn write_desktop_file(path: &Path, app_name: &str, target: &Path) -> Result<(), ShortcutError> {
    let io_error = |e: std::io::Error| ShortcutError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    std::fs::write(path, render_desktop_entry(app_name, target)).map_err(io_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).map_err(io_error)?;
    }

    Ok(())
}

//! Windows `.lnk` shortcuts via PowerShell's `WScript.Shell` COM object.

use std::path::Path;

#[cfg(windows)]
use ddp_core::ports::ShortcutError;

/// Quote a path as a PowerShell single-quoted literal.
///
/// PowerShell also treats the typographic single quotes as delimiters, so
/// those are doubled too.
fn ps_quote(path: &Path) -> String {
    let raw = path.display().to_string();
    let mut out = String::with_capacity(raw.len() + 2);
    out.push('\'');
    for c in raw.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            out.push(c);
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Script that creates `shortcut` pointing at `target`.
pub fn powershell_script(shortcut: &Path, target: &Path) -> String {
    let working_dir = target.parent().unwrap_or(target);
    format!(
        "$s = (New-Object -ComObject WScript.Shell).CreateShortcut({}); \
         $s.TargetPath = {}; $s.WorkingDirectory = {}; $s.Save()",
        ps_quote(shortcut),
        ps_quote(target),
        ps_quote(working_dir),
    )
}

#[cfg(windows)]
pub fn create_lnk(shortcut: &Path, target: &Path) -> Result<(), ShortcutError> {
    use std::process::Command;

    let output = Command::new("powershell")
        .args([
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-Command",
        ])
        .arg(powershell_script(shortcut, target))
        .output()
        .map_err(|e| ShortcutError::CommandFailed {
            message: format!("failed to run powershell: {e}"),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShortcutError::CommandFailed {
            message: format!("powershell exited with {}: {}", output.status, stderr.trim()),
        });
    }
    Ok(())
}

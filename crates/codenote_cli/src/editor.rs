//! Interactive editing through `$EDITOR`.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::process::Command;

/// Opens `initial_content` in the user's editor and returns the saved text.
///
/// `extension` only affects the temp file name so editors pick the right
/// highlighting mode.
pub fn edit_text(initial_content: &str, extension: &str) -> Result<String> {
    let editor = find_editor()?;
    let temp_path = env::temp_dir().join(format!(
        "codenote_edit_{}.{extension}",
        std::process::id()
    ));

    fs::write(&temp_path, initial_content)
        .with_context(|| format!("failed to create temp file {}", temp_path.display()))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("failed to run editor `{editor}`"));
    let status = match status {
        Ok(status) => status,
        Err(err) => {
            let _ = fs::remove_file(&temp_path);
            return Err(err);
        }
    };
    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!("editor `{editor}` exited with {status}; the document was not changed");
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("failed to read edited file {}", temp_path.display()));
    let _ = fs::remove_file(&temp_path);
    content
}

fn find_editor() -> Result<String> {
    for var in ["EDITOR", "VISUAL"] {
        if let Ok(value) = env::var(var) {
            if !value.trim().is_empty() {
                return Ok(value);
            }
        }
    }

    for candidate in ["nano", "vim", "vi", "notepad"] {
        if command_exists(candidate) {
            return Ok(candidate.to_string());
        }
    }

    bail!("no editor found; set $EDITOR (for example `export EDITOR=nano`)")
}

fn command_exists(cmd: &str) -> bool {
    let probe = if cfg!(windows) { "where" } else { "which" };
    Command::new(probe)
        .arg(cmd)
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

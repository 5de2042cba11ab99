use crate::domain::HexColor;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

pub const PICKER_ENV: &str = "SWATCHBOX_PICKER";

/// Known pickers, tried in order. Each prints the sampled color as hex on stdout.
const KNOWN_PICKERS: &[&str] = &["hyprpicker", "xcolor"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickOutcome {
    Picked(HexColor),
    Cancelled,
}

#[derive(Debug, Error)]
pub enum ScreenPickError {
    #[error("failed to run {program}: {source}")]
    Spawn { program: String, source: io::Error },
}

/// Host capability that samples a color from anywhere on screen.
pub trait ScreenPicker {
    fn label(&self) -> &str;

    /// Blocks until the user picks a color or backs out.
    fn pick(&self) -> Result<PickOutcome, ScreenPickError>;
}

/// Runs an external picker program and reads the color from its stdout.
#[derive(Clone, Debug)]
pub struct CommandScreenPicker {
    program: PathBuf,
    args: Vec<String>,
    label: String,
}

impl CommandScreenPicker {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        let program = program.into();
        let label = program
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| program.display().to_string());
        Self {
            program,
            args,
            label,
        }
    }

    /// Splits a command line on whitespace: program first, then arguments.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts.map(str::to_string).collect()))
    }
}

impl ScreenPicker for CommandScreenPicker {
    fn label(&self) -> &str {
        &self.label
    }

    fn pick(&self) -> Result<PickOutcome, ScreenPickError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|error| ScreenPickError::Spawn {
                program: self.label.clone(),
                source: error,
            })?;

        if !output.status.success() {
            return Ok(PickOutcome::Cancelled);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(match first_color_in(&stdout) {
            Some(color) => PickOutcome::Picked(color),
            None => PickOutcome::Cancelled,
        })
    }
}

fn first_color_in(text: &str) -> Option<HexColor> {
    text.split_whitespace().find_map(HexColor::parse)
}

/// `SWATCHBOX_PICKER` when set, otherwise the first known picker on `PATH`.
pub fn detect_screen_picker() -> Option<CommandScreenPicker> {
    if let Some(line) = std::env::var_os(PICKER_ENV) {
        let line = line.to_string_lossy();
        if let Some(picker) = CommandScreenPicker::from_command_line(&line) {
            return Some(picker);
        }
    }

    let path = std::env::var_os("PATH")?;
    KNOWN_PICKERS
        .iter()
        .find_map(|name| find_in_path(&path, name))
        .map(|program| CommandScreenPicker::new(program, Vec::new()))
}

fn find_in_path(path: &OsString, name: &str) -> Option<PathBuf> {
    std::env::split_paths(path)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_color_token_in_output() {
        assert_eq!(
            first_color_in("picked: #a1b2c3\n"),
            HexColor::parse("#A1B2C3")
        );
        assert_eq!(first_color_in("\n"), None);
        assert_eq!(first_color_in("rgb(1, 2, 3)"), None);
    }

    #[test]
    fn command_line_splits_program_and_args() {
        let picker = CommandScreenPicker::from_command_line("  /usr/bin/gpick -pso --no-newline ")
            .expect("picker");
        assert_eq!(picker.label(), "gpick");
        assert_eq!(picker.args, vec!["-pso".to_string(), "--no-newline".to_string()]);
        assert!(CommandScreenPicker::from_command_line("   ").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn reads_picked_color_from_program_output() {
        let picker = CommandScreenPicker::new(
            "sh",
            vec!["-c".to_string(), "printf '#00ff7f\\n'".to_string()],
        );
        assert_eq!(
            picker.pick().expect("pick"),
            PickOutcome::Picked(HexColor::parse("#00FF7F").expect("valid color"))
        );
    }

    #[cfg(unix)]
    #[test]
    fn failed_exit_or_empty_output_is_cancellation() {
        let failing = CommandScreenPicker::new("sh", vec!["-c".to_string(), "exit 1".to_string()]);
        assert_eq!(failing.pick().expect("pick"), PickOutcome::Cancelled);

        let silent = CommandScreenPicker::new("sh", vec!["-c".to_string(), "true".to_string()]);
        assert_eq!(silent.pick().expect("pick"), PickOutcome::Cancelled);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let picker = CommandScreenPicker::new("/nonexistent/swatchbox-picker", Vec::new());
        assert!(matches!(
            picker.pick(),
            Err(ScreenPickError::Spawn { .. })
        ));
    }
}

use crate::domain::{ClearOutcome, HexColor, contrast_color, format_hsl, format_rgb};
use crate::infra::{
    ClipboardError, ClipboardWriter, LoadPaletteError, PaletteStore, PickOutcome,
    SavePaletteError, ScreenPickError, ScreenPicker, detect_screen_picker,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Tui {
        state_dir: Option<PathBuf>,
    },
    Command {
        state_dir: Option<PathBuf>,
        command: CliCommand,
    },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    Show { color: String },
    List,
    Add { color: String },
    /// 1-based, as printed by `list`.
    Remove { position: usize },
    Clear { yes: bool },
    Export { copy: bool },
    Pick { add: bool },
}

impl CliCommand {
    fn touches_palette(&self) -> bool {
        !matches!(self, Self::Show { .. } | Self::Pick { add: false })
    }
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut state_dir: Option<PathBuf> = None;
    let mut subcommand: Option<&String> = None;
    let mut rest: Vec<&String> = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--state-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--state-dir".to_string()))?;
                state_dir = Some(PathBuf::from(value));
            }
            _ if subcommand.is_none() && arg.starts_with('-') => {
                return Err(CliParseError::UnknownFlag(arg.to_string()));
            }
            _ if subcommand.is_none() => subcommand = Some(arg),
            _ => rest.push(arg),
        }
    }

    let Some(subcommand) = subcommand else {
        return Ok(CliInvocation::Tui { state_dir });
    };

    let command = match subcommand.as_str() {
        "show" => CliCommand::Show {
            color: single_positional(&rest, "COLOR")?,
        },
        "list" => {
            no_arguments(&rest)?;
            CliCommand::List
        }
        "add" => CliCommand::Add {
            color: single_positional(&rest, "COLOR")?,
        },
        "remove" | "rm" => {
            let value = single_positional(&rest, "N")?;
            let position = value
                .parse::<usize>()
                .map_err(|_| CliParseError::InvalidFlagValue {
                    flag: "N".to_string(),
                    value,
                })?;
            CliCommand::Remove { position }
        }
        "clear" => CliCommand::Clear {
            yes: switches(&rest, &["--yes", "-y"])?,
        },
        "export" => CliCommand::Export {
            copy: switches(&rest, &["--copy", "-c"])?,
        },
        "pick" => CliCommand::Pick {
            add: switches(&rest, &["--add", "-a"])?,
        },
        other => return Err(CliParseError::UnknownSubcommand(other.to_string())),
    };

    Ok(CliInvocation::Command { state_dir, command })
}

fn single_positional(rest: &[&String], name: &'static str) -> Result<String, CliParseError> {
    let mut value: Option<String> = None;
    for arg in rest {
        if arg.starts_with("--") || (arg.starts_with('-') && arg.len() == 2) {
            return Err(CliParseError::UnknownFlag(arg.to_string()));
        }
        if value.is_some() {
            return Err(CliParseError::UnexpectedArgument(arg.to_string()));
        }
        value = Some(arg.to_string());
    }
    value.ok_or(CliParseError::MissingArgument(name))
}

fn no_arguments(rest: &[&String]) -> Result<(), CliParseError> {
    match rest.first() {
        None => Ok(()),
        Some(arg) if arg.starts_with('-') => Err(CliParseError::UnknownFlag(arg.to_string())),
        Some(arg) => Err(CliParseError::UnexpectedArgument(arg.to_string())),
    }
}

/// Returns whether any of `accepted` was given; anything else is an error.
fn switches(rest: &[&String], accepted: &[&str]) -> Result<bool, CliParseError> {
    let mut seen = false;
    for arg in rest {
        if accepted.contains(&arg.as_str()) {
            seen = true;
        } else if arg.starts_with('-') {
            return Err(CliParseError::UnknownFlag(arg.to_string()));
        } else {
            return Err(CliParseError::UnexpectedArgument(arg.to_string()));
        }
    }
    Ok(seen)
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    Load(#[from] LoadPaletteError),

    #[error(transparent)]
    Save(#[from] SavePaletteError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Pick(#[from] ScreenPickError),

    #[error("not a color: {0}\nHint: use six hex digits, e.g. #6366F1")]
    InvalidColor(String),

    #[error("no palette entry {position} (palette has {len})\nHint: run `swatchbox list` to see entry numbers.")]
    EntryNotFound { position: usize, len: usize },

    #[error("screen picker not found\nHint: install hyprpicker or xcolor, or set SWATCHBOX_PICKER.")]
    PickerUnavailable,

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

pub fn run(command: CliCommand, state_dir: &Path) -> Result<(), CliRunError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut err = io::BufWriter::new(stderr.lock());
    let stdin = io::stdin();
    let mut input = stdin.lock();

    let picker = match command {
        CliCommand::Pick { .. } => detect_screen_picker(),
        _ => None,
    };
    let picker = picker.as_ref().map(|picker| picker as &dyn ScreenPicker);

    let mut console = Console {
        out: &mut out,
        err: &mut err,
        input: &mut input,
    };
    let result = run_with(command, state_dir, &mut console, picker);
    let _ = out.flush();
    let _ = err.flush();
    result
}

struct Console<'a, O: Write, E: Write, I: BufRead> {
    out: &'a mut O,
    err: &'a mut E,
    input: &'a mut I,
}

fn run_with<O: Write, E: Write, I: BufRead>(
    command: CliCommand,
    state_dir: &Path,
    console: &mut Console<'_, O, E, I>,
    picker: Option<&dyn ScreenPicker>,
) -> Result<(), CliRunError> {
    let mut store = if command.touches_palette() {
        Some(PaletteStore::open(state_dir)?)
    } else {
        None
    };

    match command {
        CliCommand::Show { color } => {
            let color = parse_color(&color)?;
            print_color(console.out, &color)?;
        }
        CliCommand::List => {
            let Some(store) = store.as_ref() else {
                return Ok(());
            };
            if store.palette().is_empty() {
                write_line(console.err, "No colors saved yet.")?;
                return Ok(());
            }
            for (index, color) in store.colors().iter().enumerate() {
                if !write_line(console.out, &format!("{}\t{color}", index + 1))? {
                    return Ok(());
                }
            }
        }
        CliCommand::Add { color } => {
            let color = parse_color(&color)?;
            let Some(store) = store.as_mut() else {
                return Ok(());
            };
            let outcome = store.add(color)?;
            write_line(console.err, &outcome.notice())?;
        }
        CliCommand::Remove { position } => {
            let Some(store) = store.as_mut() else {
                return Ok(());
            };
            let len = store.palette().len();
            let removed = match position.checked_sub(1) {
                Some(index) => store.remove_at(index)?,
                None => None,
            };
            let Some(removed) = removed else {
                return Err(CliRunError::EntryNotFound { position, len });
            };
            write_line(console.err, &format!("Removed {removed}"))?;
        }
        CliCommand::Clear { yes } => {
            let Some(store) = store.as_mut() else {
                return Ok(());
            };
            let outcome = store.clear(|prompt| yes || confirm(console.err, console.input, prompt))?;
            let message = match outcome {
                ClearOutcome::AlreadyEmpty => "No colors to clear".to_string(),
                ClearOutcome::Declined => "Cancelled".to_string(),
                ClearOutcome::Cleared { removed } => {
                    let noun = if removed == 1 { "color" } else { "colors" };
                    format!("Palette cleared ({removed} {noun} removed)")
                }
            };
            write_line(console.err, &message)?;
        }
        CliCommand::Export { copy } => {
            let Some(store) = store.as_ref() else {
                return Ok(());
            };
            let Some(css) = store.export_css() else {
                write_line(console.err, "No colors to export")?;
                return Ok(());
            };
            if !write_line(console.out, &css)? {
                return Ok(());
            }
            if copy {
                ClipboardWriter::new().write_text(&css)?;
                write_line(console.err, "CSS variables copied to clipboard!")?;
            }
        }
        CliCommand::Pick { add } => {
            let Some(picker) = picker else {
                return Err(CliRunError::PickerUnavailable);
            };
            tracing::debug!(picker = picker.label(), "cli pick started");
            let PickOutcome::Picked(color) = picker.pick()? else {
                return Ok(());
            };
            if !write_line(console.out, color.as_str())? {
                return Ok(());
            }
            if add {
                if let Some(store) = store.as_mut() {
                    let outcome = store.add(color)?;
                    write_line(console.err, &outcome.notice())?;
                }
            }
        }
    }

    Ok(())
}

fn parse_color(input: &str) -> Result<HexColor, CliRunError> {
    HexColor::parse(input).ok_or_else(|| CliRunError::InvalidColor(input.to_string()))
}

fn print_color(out: &mut impl Write, color: &HexColor) -> io::Result<()> {
    let lines = [
        format!("HEX\t{color}"),
        format!("RGB\t{}", format_rgb(color.rgb())),
        format!("HSL\t{}", format_hsl(color.hsl())),
        format!("TEXT\t{}", contrast_color(color)),
    ];
    for line in lines {
        if !write_line(out, &line)? {
            break;
        }
    }
    Ok(())
}

/// Asks `prompt [y/N]`; anything but `y`/`yes` (including EOF) declines.
fn confirm(err: &mut impl Write, input: &mut impl BufRead, prompt: &str) -> bool {
    let _ = write!(err, "{prompt} [y/N] ");
    let _ = err.flush();

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
    }
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::load_palette;
    use std::io::Cursor;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn command(values: &[&str]) -> CliCommand {
        match parse_invocation(&args(values)).expect("parse") {
            CliInvocation::Command { command, .. } => command,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    struct Captured {
        out: String,
        err: String,
    }

    fn exec_with(
        dir: &Path,
        values: &[&str],
        stdin: &str,
        picker: Option<&dyn ScreenPicker>,
    ) -> (Result<(), CliRunError>, Captured) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(stdin.as_bytes().to_vec());
        let mut console = Console {
            out: &mut out,
            err: &mut err,
            input: &mut input,
        };
        let result = run_with(command(values), dir, &mut console, picker);
        let captured = Captured {
            out: String::from_utf8(out).expect("utf8"),
            err: String::from_utf8(err).expect("utf8"),
        };
        (result, captured)
    }

    fn exec(dir: &Path, values: &[&str]) -> (Result<(), CliRunError>, Captured) {
        exec_with(dir, values, "", None)
    }

    fn stored(dir: &Path) -> Vec<String> {
        load_palette(dir)
            .expect("load")
            .colors()
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    struct FixedPicker(PickOutcome);

    impl ScreenPicker for FixedPicker {
        fn label(&self) -> &str {
            "fixed"
        }

        fn pick(&self) -> Result<PickOutcome, ScreenPickError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn parse_defaults_to_tui_when_no_args() {
        let parsed = parse_invocation(&args(&["swatchbox"])).expect("parse");
        assert_eq!(parsed, CliInvocation::Tui { state_dir: None });
    }

    #[test]
    fn parse_help_flag_wins() {
        let parsed = parse_invocation(&args(&["swatchbox", "add", "--help"])).expect("parse");
        assert_eq!(parsed, CliInvocation::PrintHelp);
    }

    #[test]
    fn parse_state_dir_before_and_after_subcommand() {
        let parsed =
            parse_invocation(&args(&["swatchbox", "--state-dir", "/tmp/a", "list"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command {
                state_dir: Some(PathBuf::from("/tmp/a")),
                command: CliCommand::List,
            }
        );

        let parsed = parse_invocation(&args(&["swatchbox", "export", "--state-dir", "/tmp/b"]))
            .expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command {
                state_dir: Some(PathBuf::from("/tmp/b")),
                command: CliCommand::Export { copy: false },
            }
        );
    }

    #[test]
    fn parse_subcommands() {
        assert_eq!(
            command(&["swatchbox", "add", "#abcdef"]),
            CliCommand::Add {
                color: "#abcdef".to_string()
            }
        );
        assert_eq!(
            command(&["swatchbox", "remove", "2"]),
            CliCommand::Remove { position: 2 }
        );
        assert_eq!(
            command(&["swatchbox", "clear", "--yes"]),
            CliCommand::Clear { yes: true }
        );
        assert_eq!(
            command(&["swatchbox", "pick", "--add"]),
            CliCommand::Pick { add: true }
        );
    }

    #[test]
    fn parse_rejects_bad_arguments() {
        assert!(matches!(
            parse_invocation(&args(&["swatchbox", "paint"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["swatchbox", "add"])),
            Err(CliParseError::MissingArgument("COLOR"))
        ));
        assert!(matches!(
            parse_invocation(&args(&["swatchbox", "remove", "two"])),
            Err(CliParseError::InvalidFlagValue { .. })
        ));
        assert!(matches!(
            parse_invocation(&args(&["swatchbox", "list", "--all"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["swatchbox", "--state-dir"])),
            Err(CliParseError::MissingFlagValue(_))
        ));
    }

    #[test]
    fn show_prints_all_notations() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (result, captured) = exec(dir.path(), &["swatchbox", "show", "6366f1"]);
        result.expect("run");
        assert_eq!(
            captured.out,
            "HEX\t#6366F1\nRGB\trgb(99, 102, 241)\nHSL\thsl(239, 84%, 67%)\nTEXT\t#ffffff\n"
        );
    }

    #[test]
    fn show_rejects_invalid_color() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (result, _) = exec(dir.path(), &["swatchbox", "show", "#12345"]);
        assert!(matches!(result, Err(CliRunError::InvalidColor(_))));
    }

    #[test]
    fn add_list_and_remove_round_trip_through_storage() {
        let dir = tempfile::tempdir().expect("tempdir");

        let (result, captured) = exec(dir.path(), &["swatchbox", "add", "#abcdef"]);
        result.expect("add");
        assert_eq!(captured.err, "Added #ABCDEF to palette\n");

        let (result, captured) = exec(dir.path(), &["swatchbox", "add", "ABCDEF"]);
        result.expect("add again");
        assert_eq!(captured.err, "#ABCDEF already in palette\n");

        exec(dir.path(), &["swatchbox", "add", "#111111"]).0.expect("add");

        let (result, captured) = exec(dir.path(), &["swatchbox", "list"]);
        result.expect("list");
        assert_eq!(captured.out, "1\t#ABCDEF\n2\t#111111\n");

        let (result, captured) = exec(dir.path(), &["swatchbox", "remove", "1"]);
        result.expect("remove");
        assert_eq!(captured.err, "Removed #ABCDEF\n");
        assert_eq!(stored(dir.path()), vec!["#111111"]);
    }

    #[test]
    fn remove_out_of_range_is_an_error_and_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        exec(dir.path(), &["swatchbox", "add", "#111111"]).0.expect("add");

        for position in ["0", "2"] {
            let (result, _) = exec(dir.path(), &["swatchbox", "remove", position]);
            assert!(matches!(
                result,
                Err(CliRunError::EntryNotFound { len: 1, .. })
            ));
        }
        assert_eq!(stored(dir.path()), vec!["#111111"]);
    }

    #[test]
    fn empty_palette_list_and_export_explain_on_stderr() {
        let dir = tempfile::tempdir().expect("tempdir");

        let (result, captured) = exec(dir.path(), &["swatchbox", "list"]);
        result.expect("list");
        assert_eq!(captured.out, "");
        assert_eq!(captured.err, "No colors saved yet.\n");

        let (result, captured) = exec(dir.path(), &["swatchbox", "export"]);
        result.expect("export");
        assert_eq!(captured.out, "");
        assert_eq!(captured.err, "No colors to export\n");
        assert!(!crate::infra::palette_path(dir.path()).exists());
    }

    #[test]
    fn export_prints_css_variables() {
        let dir = tempfile::tempdir().expect("tempdir");
        exec(dir.path(), &["swatchbox", "add", "#111111"]).0.expect("add");
        exec(dir.path(), &["swatchbox", "add", "#222222"]).0.expect("add");

        let (result, captured) = exec(dir.path(), &["swatchbox", "export"]);
        result.expect("export");
        assert_eq!(
            captured.out,
            ":root {\n  --color-1: #111111;\n  --color-2: #222222;\n}\n"
        );
    }

    #[test]
    fn clear_asks_before_removing() {
        let dir = tempfile::tempdir().expect("tempdir");
        exec(dir.path(), &["swatchbox", "add", "#111111"]).0.expect("add");

        let (result, captured) = exec_with(dir.path(), &["swatchbox", "clear"], "n\n", None);
        result.expect("decline");
        assert_eq!(captured.err, "Clear all saved colors? [y/N] Cancelled\n");
        assert_eq!(stored(dir.path()), vec!["#111111"]);

        let (result, _) = exec_with(dir.path(), &["swatchbox", "clear"], "", None);
        result.expect("eof declines");
        assert_eq!(stored(dir.path()), vec!["#111111"]);

        let (result, captured) = exec_with(dir.path(), &["swatchbox", "clear"], "yes\n", None);
        result.expect("accept");
        assert!(captured.err.ends_with("Palette cleared (1 color removed)\n"));
        assert!(stored(dir.path()).is_empty());
    }

    #[test]
    fn clear_with_yes_skips_the_prompt() {
        let dir = tempfile::tempdir().expect("tempdir");
        exec(dir.path(), &["swatchbox", "add", "#111111"]).0.expect("add");
        exec(dir.path(), &["swatchbox", "add", "#222222"]).0.expect("add");

        let (result, captured) = exec(dir.path(), &["swatchbox", "clear", "--yes"]);
        result.expect("clear");
        assert_eq!(captured.err, "Palette cleared (2 colors removed)\n");
        assert!(stored(dir.path()).is_empty());

        let (result, captured) = exec(dir.path(), &["swatchbox", "clear", "--yes"]);
        result.expect("clear empty");
        assert_eq!(captured.err, "No colors to clear\n");
    }

    #[test]
    fn pick_prints_color_and_optionally_adds_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let color = HexColor::parse("#0a0b0c").expect("valid color");
        let picker = FixedPicker(PickOutcome::Picked(color));

        let (result, captured) = exec_with(dir.path(), &["swatchbox", "pick"], "", Some(&picker));
        result.expect("pick");
        assert_eq!(captured.out, "#0A0B0C\n");
        assert!(!crate::infra::palette_path(dir.path()).exists());

        let (result, captured) =
            exec_with(dir.path(), &["swatchbox", "pick", "--add"], "", Some(&picker));
        result.expect("pick --add");
        assert_eq!(captured.err, "Added #0A0B0C to palette\n");
        assert_eq!(stored(dir.path()), vec!["#0A0B0C"]);
    }

    #[test]
    fn pick_cancel_is_silent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let picker = FixedPicker(PickOutcome::Cancelled);
        let (result, captured) =
            exec_with(dir.path(), &["swatchbox", "pick", "--add"], "", Some(&picker));
        result.expect("pick");
        assert_eq!(captured.out, "");
        assert_eq!(captured.err, "");
    }

    #[test]
    fn pick_without_picker_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (result, _) = exec(dir.path(), &["swatchbox", "pick"]);
        assert!(matches!(result, Err(CliRunError::PickerUnavailable)));
    }
}

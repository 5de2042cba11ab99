mod app;
mod cli;
mod domain;
mod infra;
mod ui;

use crate::app::{
    AppCommand, AppEvent, AppModel, CopiedMarker, CopyTarget, PaletteAction, PickerStatus,
};
use crate::cli::CliInvocation;
use crate::domain::ClearOutcome;
use crate::infra::{
    ClipboardWriter, PICKER_ENV, PaletteStore, PickOutcome, ScreenPicker, detect_screen_picker,
    init_logging, resolve_state_dir,
};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEventKind, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use crossterm::terminal::size as terminal_size;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{ExecutableCommand, execute};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{Sender, channel};
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    App(#[from] crate::app::AppError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

#[derive(Debug)]
enum PickSignal {
    Finished(Result<PickOutcome, String>),
}

type SharedPicker = Arc<dyn ScreenPicker + Send + Sync>;

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Tui { state_dir } => Ok(run_tui(state_dir.as_deref())?),
        CliInvocation::Command { state_dir, command } => {
            let state_dir = resolve_state_dir(state_dir.as_deref()).map_err(app::AppError::from)?;
            if let Err(error) = init_logging(&state_dir) {
                let mut err = io::stderr().lock();
                let _ = writeln!(err, "warning: logging disabled: {error}");
            }
            crate::cli::run(command, &state_dir)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} - pick, inspect and collect colors\n\nUSAGE:\n  {name} [--state-dir DIR]        Start the TUI\n  {name} show COLOR               Print HEX, RGB, HSL and the readable text color\n  {name} list                     Print the palette (index<TAB>hex)\n  {name} add COLOR                Add a color to the palette\n  {name} remove N                 Remove palette entry N (1-based, as printed by list)\n  {name} clear [--yes]            Clear the palette (asks first unless --yes)\n  {name} export [--copy]          Print the palette as CSS variables (--copy also copies it)\n  {name} pick [--add]             Pick a color from the screen (--add saves it)\n  {name} --help | --version\n\nCOLOR:\n  Six hex digits with an optional leading #, any case (e.g. #6366f1).\n\nENV:\n  SWATCHBOX_STATE_DIR   Palette + log directory (default: ~/.swatchbox)\n  SWATCHBOX_PICKER      Screen picker command (default: hyprpicker or xcolor from PATH)\n  SWATCHBOX_LOG         Log filter, e.g. swatchbox=debug (default: info)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}

fn run_tui(state_dir: Option<&Path>) -> Result<(), crate::app::AppError> {
    let state_dir = resolve_state_dir(state_dir)?;
    let mut notices: Vec<String> = Vec::new();

    if let Err(error) = init_logging(&state_dir) {
        notices.push(format!("Logging disabled: {error}"));
    }

    let mut store = match PaletteStore::open(&state_dir) {
        Ok(store) => store,
        Err(error) => {
            tracing::warn!(%error, "palette load failed; starting empty");
            notices.push(format!("Palette reset (failed to load): {error}"));
            PaletteStore::empty(&state_dir)
        }
    };

    let picker: Option<SharedPicker> = detect_screen_picker().map(|picker| {
        tracing::info!(picker = picker.label(), "screen picker detected");
        Arc::new(picker) as SharedPicker
    });
    let picker_status = match &picker {
        Some(picker) => PickerStatus::Ready {
            label: picker.label().to_string(),
        },
        None => {
            notices.push(format!(
                "Screen picker not found - install hyprpicker or xcolor, or set {PICKER_ENV}"
            ));
            PickerStatus::Unavailable
        }
    };

    let notice = (!notices.is_empty()).then(|| notices.join(" · "));
    let mut model = AppModel::new(store.colors().to_vec(), picker_status).with_notice(notice);

    let mut terminal = setup_terminal()?;
    if let Ok((width, height)) = terminal_size() {
        model = model.with_terminal_size(width, height);
    }
    let result = run(&mut terminal, &mut model, &mut store, picker);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, app::AppError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let _ = stdout.execute(EnableBracketedPaste);
    let _ = stdout.execute(EnableMouseCapture);
    let keyboard_flags = KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES;
    let _ = stdout.execute(PushKeyboardEnhancementFlags(keyboard_flags));
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
) -> Result<(), app::AppError> {
    disable_raw_mode()?;
    let _ = execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        PopKeyboardEnhancementFlags
    );
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    model: &mut AppModel,
    store: &mut PaletteStore,
    picker: Option<SharedPicker>,
) -> Result<(), app::AppError> {
    let (pick_tx, pick_rx) = channel::<PickSignal>();
    let mut clipboard = ClipboardWriter::new();

    loop {
        while let Ok(signal) = pick_rx.try_recv() {
            match signal {
                PickSignal::Finished(result) => {
                    *model = app::apply_pick_result(model.clone(), result);
                }
            }
        }

        if model
            .copied
            .is_some_and(|marker| !marker.is_fresh(Instant::now()))
        {
            model.copied = None;
        }

        terminal.draw(|frame| ui::render(frame, model))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let app_event = match event::read()? {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                AppEvent::Key(key)
            }
            Event::Paste(text) => AppEvent::Paste(text),
            Event::Mouse(mouse) => AppEvent::Mouse(mouse),
            Event::Resize(width, height) => {
                *model = model.clone().with_terminal_size(width, height);
                continue;
            }
            _ => continue,
        };

        let (next, command) = app::update(model.clone(), app_event);
        *model = next;
        match command {
            AppCommand::None => {}
            AppCommand::Quit => return Ok(()),
            AppCommand::Palette(action) => apply_palette_action(model, store, &mut clipboard, action),
            AppCommand::PickFromScreen => match &picker {
                Some(picker) => spawn_pick(Arc::clone(picker), pick_tx.clone()),
                None => {
                    *model = app::apply_pick_result(
                        model.clone(),
                        Err("no screen picker available".to_string()),
                    );
                }
            },
            AppCommand::Copy(target) => copy_value(model, &mut clipboard, target),
        }
    }
}

fn spawn_pick(picker: SharedPicker, tx: Sender<PickSignal>) {
    std::thread::spawn(move || {
        tracing::debug!(picker = picker.label(), "screen pick started");
        let result = picker.pick().map_err(|error| {
            tracing::warn!(%error, "screen pick failed");
            error.to_string()
        });
        let _ = tx.send(PickSignal::Finished(result));
    });
}

fn apply_palette_action(
    model: &mut AppModel,
    store: &mut PaletteStore,
    clipboard: &mut ClipboardWriter,
    action: PaletteAction,
) {
    let notice = match action {
        PaletteAction::Add(color) => match store.add(color) {
            Ok(outcome) => outcome.notice(),
            Err(error) => save_failed(&error),
        },
        PaletteAction::RemoveAt(index) => match store.remove_at(index) {
            Ok(Some(color)) => format!("Removed {color}"),
            Ok(None) => return,
            Err(error) => save_failed(&error),
        },
        // The dialog already asked.
        PaletteAction::Clear => match store.clear(|_| true) {
            Ok(ClearOutcome::Cleared { .. }) => "Palette cleared".to_string(),
            Ok(ClearOutcome::AlreadyEmpty | ClearOutcome::Declined) => {
                "No colors to clear".to_string()
            }
            Err(error) => save_failed(&error),
        },
        PaletteAction::Export => match store.export_css() {
            None => "No colors to export".to_string(),
            Some(css) => match clipboard.write_text(&css) {
                Ok(()) => "CSS variables copied to clipboard!".to_string(),
                Err(error) => format!("Export failed: {error}"),
            },
        },
    };

    *model = model
        .clone()
        .with_palette(store.colors().to_vec())
        .with_notice(Some(notice));
}

fn save_failed(error: &crate::infra::SavePaletteError) -> String {
    tracing::warn!(%error, "palette save failed");
    format!("Palette not saved: {error}")
}

fn copy_value(model: &mut AppModel, clipboard: &mut ClipboardWriter, target: CopyTarget) {
    let value = target.value(&model.current);
    match clipboard.write_text(&value) {
        Ok(()) => {
            model.copied = Some(CopiedMarker {
                target,
                at: Instant::now(),
            });
        }
        Err(error) => {
            model.copied = None;
            model.notice = Some(format!("Copy failed: {error}"));
        }
    }
}

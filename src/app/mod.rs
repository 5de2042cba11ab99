mod hex_input;
pub mod layout;
mod mouse;

use crate::domain::{HexColor, Rgb, format_hsl, format_rgb};
use crate::infra::PickOutcome;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use std::time::{Duration, Instant};
use thiserror::Error;

pub use hex_input::HexInput;

pub const INITIAL_COLOR: Rgb = Rgb {
    r: 0x63,
    g: 0x66,
    b: 0xF1,
};

/// How long a copied field shows its `Copied!` marker.
pub const COPIED_MARKER_TTL: Duration = Duration::from_millis(1500);

const PAGE_STEP: usize = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResolveStateDir(#[from] crate::infra::ResolveStateDirError),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Focus {
    Palette,
    Input,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PickerStatus {
    Unavailable,
    Ready { label: String },
    Picking { label: String },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CopyTarget {
    Hex,
    Rgb,
    Hsl,
}

impl CopyTarget {
    pub const ALL: [CopyTarget; 3] = [CopyTarget::Hex, CopyTarget::Rgb, CopyTarget::Hsl];

    pub fn label(self) -> &'static str {
        match self {
            Self::Hex => "HEX",
            Self::Rgb => "RGB",
            Self::Hsl => "HSL",
        }
    }

    pub fn hotkey(self) -> char {
        match self {
            Self::Hex => '1',
            Self::Rgb => '2',
            Self::Hsl => '3',
        }
    }

    pub fn from_hotkey(ch: char) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.hotkey() == ch)
    }

    pub fn value(self, color: &HexColor) -> String {
        match self {
            Self::Hex => color.to_string(),
            Self::Rgb => format_rgb(color.rgb()),
            Self::Hsl => format_hsl(color.hsl()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct CopiedMarker {
    pub target: CopyTarget,
    pub at: Instant,
}

impl CopiedMarker {
    pub fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.at) < COPIED_MARKER_TTL
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfirmSelection {
    Cancel,
    Clear,
}

impl ConfirmSelection {
    fn toggle(self) -> Self {
        match self {
            Self::Cancel => Self::Clear,
            Self::Clear => Self::Cancel,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClearConfirmDialog {
    pub color_count: usize,
    pub selection: ConfirmSelection,
}

#[derive(Clone, Debug)]
pub struct AppModel {
    pub current: HexColor,
    pub palette: Vec<HexColor>,
    pub selected: usize,
    pub palette_scroll: usize,
    pub focus: Focus,
    pub input: HexInput,
    pub picker: PickerStatus,
    pub clear_confirm: Option<ClearConfirmDialog>,
    pub help_open: bool,
    pub notice: Option<String>,
    pub copied: Option<CopiedMarker>,
    pub terminal_size: (u16, u16),
}

impl AppModel {
    pub fn new(palette: Vec<HexColor>, picker: PickerStatus) -> Self {
        let current = INITIAL_COLOR.to_hex();
        let input = HexInput::from_text(current.as_str());
        Self {
            current,
            palette,
            selected: 0,
            palette_scroll: 0,
            focus: Focus::Palette,
            input,
            picker,
            clear_confirm: None,
            help_open: false,
            notice: None,
            copied: None,
            terminal_size: (0, 0),
        }
    }

    pub fn with_notice(mut self, notice: Option<String>) -> Self {
        self.notice = notice;
        self
    }

    pub fn with_terminal_size(mut self, width: u16, height: u16) -> Self {
        self.terminal_size = (width, height);
        self.ensure_selection_visible();
        self
    }

    pub fn with_palette(mut self, palette: Vec<HexColor>) -> Self {
        self.palette = palette;
        self.selected = self.selected.min(self.palette.len().saturating_sub(1));
        self.ensure_selection_visible();
        self
    }

    /// Makes `color` the displayed color and mirrors it into the input field.
    pub fn with_current_color(mut self, color: HexColor) -> Self {
        self.input = HexInput::from_text(color.as_str());
        self.current = color;
        self
    }

    pub fn selected_color(&self) -> Option<&HexColor> {
        self.palette.get(self.selected)
    }

    fn select(&mut self, index: usize) {
        self.selected = index.min(self.palette.len().saturating_sub(1));
        self.ensure_selection_visible();
    }

    fn ensure_selection_visible(&mut self) {
        let rows = layout::palette_visible_rows(self.terminal_size).max(1);
        let max_scroll = self.palette.len().saturating_sub(rows);
        if self.selected < self.palette_scroll {
            self.palette_scroll = self.selected;
        } else if self.selected >= self.palette_scroll + rows {
            self.palette_scroll = self.selected + 1 - rows;
        }
        self.palette_scroll = self.palette_scroll.min(max_scroll);
    }
}

#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Paste(String),
    Mouse(MouseEvent),
}

/// Palette mutations requested by the UI, executed against the store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PaletteAction {
    Add(HexColor),
    RemoveAt(usize),
    /// Already confirmed by the user.
    Clear,
    Export,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppCommand {
    None,
    Quit,
    Palette(PaletteAction),
    PickFromScreen,
    Copy(CopyTarget),
}

pub fn update(model: AppModel, event: AppEvent) -> (AppModel, AppCommand) {
    match event {
        AppEvent::Key(key) => update_on_key(model, key),
        AppEvent::Paste(text) => update_on_paste(model, text),
        AppEvent::Mouse(mouse) => mouse::update_on_mouse(model, mouse),
    }
}

/// Folds the result of a screen pick back into the model. Cancellation is
/// silent.
pub fn apply_pick_result(model: AppModel, result: Result<PickOutcome, String>) -> AppModel {
    let mut model = model;
    model.picker = match model.picker {
        PickerStatus::Picking { label } => PickerStatus::Ready { label },
        other => other,
    };

    match result {
        Ok(PickOutcome::Picked(color)) => {
            let notice = format!("Picked {color}");
            model.with_current_color(color).with_notice(Some(notice))
        }
        Ok(PickOutcome::Cancelled) => model,
        Err(error) => model.with_notice(Some(format!("Screen picker failed: {error}"))),
    }
}

fn update_on_key(model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    model.notice = None;

    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
    {
        return (model, AppCommand::Quit);
    }

    if let Some(confirm) = model.clear_confirm.take() {
        return update_clear_confirm(model, confirm, key);
    }

    if model.help_open {
        if matches!(
            key.code,
            KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Esc | KeyCode::Enter
        ) {
            model.help_open = false;
        }
        return (model, AppCommand::None);
    }

    if key.code == KeyCode::F(1) {
        model.help_open = true;
        return (model, AppCommand::None);
    }

    match model.focus {
        Focus::Input => update_input(model, key),
        Focus::Palette => update_palette(model, key),
    }
}

fn update_palette(mut model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    if let KeyCode::Char(ch) = key.code {
        if let Some(target) = CopyTarget::from_hotkey(ch) {
            return (model, AppCommand::Copy(target));
        }
    }

    match key.code {
        KeyCode::Char('q') => return (model, AppCommand::Quit),
        KeyCode::Char('?') => model.help_open = true,
        KeyCode::Up | KeyCode::Char('k') => {
            let index = model.selected.saturating_sub(1);
            model.select(index);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let index = model.selected.saturating_add(1);
            model.select(index);
        }
        KeyCode::PageUp => {
            let index = model.selected.saturating_sub(PAGE_STEP);
            model.select(index);
        }
        KeyCode::PageDown => {
            let index = model.selected.saturating_add(PAGE_STEP);
            model.select(index);
        }
        KeyCode::Home | KeyCode::Char('g') => model.select(0),
        KeyCode::End | KeyCode::Char('G') => model.select(usize::MAX),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(color) = model.selected_color().cloned() {
                model = model.with_current_color(color);
            }
        }
        KeyCode::Char('a') | KeyCode::Char('+') => {
            let color = model.current.clone();
            return (model, AppCommand::Palette(PaletteAction::Add(color)));
        }
        KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => {
            if model.selected < model.palette.len() {
                let index = model.selected;
                return (model, AppCommand::Palette(PaletteAction::RemoveAt(index)));
            }
        }
        KeyCode::Char('c') => {
            if model.palette.is_empty() {
                model.notice = Some("No colors to clear".to_string());
            } else {
                model.clear_confirm = Some(ClearConfirmDialog {
                    color_count: model.palette.len(),
                    selection: ConfirmSelection::Cancel,
                });
            }
        }
        KeyCode::Char('x') => {
            return (model, AppCommand::Palette(PaletteAction::Export));
        }
        KeyCode::Char('p') => return request_pick(model),
        KeyCode::Char('e') | KeyCode::Char('/') | KeyCode::Tab => {
            model.input = HexInput::from_text(model.current.as_str());
            model.focus = Focus::Input;
        }
        KeyCode::Char('#') => {
            model.input = HexInput::from_text("#");
            model.focus = Focus::Input;
        }
        _ => {}
    }

    (model, AppCommand::None)
}

fn request_pick(mut model: AppModel) -> (AppModel, AppCommand) {
    match model.picker {
        PickerStatus::Unavailable => {
            model.notice = Some(
                "Screen picker not supported here - type a hex value instead (e)".to_string(),
            );
            (model, AppCommand::None)
        }
        PickerStatus::Picking { .. } => (model, AppCommand::None),
        PickerStatus::Ready { label } => {
            model.picker = PickerStatus::Picking { label };
            (model, AppCommand::PickFromScreen)
        }
    }
}

fn update_input(mut model: AppModel, key: KeyEvent) -> (AppModel, AppCommand) {
    let edited = match key.code {
        KeyCode::Esc | KeyCode::Tab => {
            model.focus = Focus::Palette;
            model.input = HexInput::from_text(model.current.as_str());
            return (model, AppCommand::None);
        }
        KeyCode::Enter => {
            match model.input.color() {
                Some(color) => {
                    model = model.with_current_color(color);
                    model.focus = Focus::Palette;
                }
                None => {
                    model.notice =
                        Some(format!("Not a color: {:?} (expected #RRGGBB)", model.input.text));
                }
            }
            return (model, AppCommand::None);
        }
        KeyCode::Backspace => model.input.backspace(),
        KeyCode::Delete => model.input.delete_forward(),
        KeyCode::Left => {
            model.input.move_left();
            false
        }
        KeyCode::Right => {
            model.input.move_right();
            false
        }
        KeyCode::Home => {
            model.input.move_home();
            false
        }
        KeyCode::End => {
            model.input.move_end();
            false
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            model.input.clear();
            true
        }
        KeyCode::Char(ch) => model.input.insert_char(ch),
        _ => false,
    };

    if edited {
        model = apply_live_input(model);
    }
    (model, AppCommand::None)
}

/// The display follows the field whenever it holds a complete color.
fn apply_live_input(mut model: AppModel) -> AppModel {
    if let Some(color) = model.input.color() {
        model.current = color;
    }
    model
}

fn update_on_paste(model: AppModel, text: String) -> (AppModel, AppCommand) {
    let mut model = model;
    model.notice = None;
    if model.clear_confirm.is_some() || model.help_open {
        return (model, AppCommand::None);
    }

    match model.focus {
        Focus::Input => {
            if model.input.insert_str(&text) {
                model = apply_live_input(model);
            }
        }
        Focus::Palette => match HexColor::parse(text.trim()) {
            Some(color) => {
                let notice = format!("Pasted {color}");
                model = model.with_current_color(color).with_notice(Some(notice));
            }
            None => {
                model.notice = Some("Clipboard text is not a #RRGGBB color".to_string());
            }
        },
    }
    (model, AppCommand::None)
}

fn update_clear_confirm(
    mut model: AppModel,
    mut confirm: ClearConfirmDialog,
    key: KeyEvent,
) -> (AppModel, AppCommand) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('n') | KeyCode::Char('N') => {
            return (model, AppCommand::None);
        }
        KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
            confirm.selection = confirm.selection.toggle();
        }
        KeyCode::Enter => {
            let command = if confirm.selection == ConfirmSelection::Clear {
                AppCommand::Palette(PaletteAction::Clear)
            } else {
                AppCommand::None
            };
            return (model, command);
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            return (model, AppCommand::Palette(PaletteAction::Clear));
        }
        _ => {}
    }

    model.clear_confirm = Some(confirm);
    (model, AppCommand::None)
}

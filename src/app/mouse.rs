use super::layout::{REMOVE_TARGET_WIDTH, palette_list_area, screen_layout_for_size};
use super::{AppCommand, AppModel, Focus, PaletteAction};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

const SCROLL_STEP: usize = 3;

pub(super) fn update_on_mouse(model: AppModel, mouse: MouseEvent) -> (AppModel, AppCommand) {
    let mut model = model;
    if model.terminal_size.0 == 0 || model.terminal_size.1 == 0 {
        return (model, AppCommand::None);
    }
    if model.clear_confirm.is_some() || model.help_open {
        return (model, AppCommand::None);
    }

    let list = palette_list_area(screen_layout_for_size(model.terminal_size).palette);
    let position = Position::new(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp if list.contains(position) => {
            let index = model.selected.saturating_sub(SCROLL_STEP);
            model.select(index);
        }
        MouseEventKind::ScrollDown if list.contains(position) => {
            let index = model.selected.saturating_add(SCROLL_STEP);
            model.select(index);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            return apply_left_click(model, list, position);
        }
        _ => {}
    }

    (model, AppCommand::None)
}

/// A click on a row loads that color; a click on its `×` removes it.
fn apply_left_click(mut model: AppModel, list: Rect, position: Position) -> (AppModel, AppCommand) {
    let Some(index) = palette_index_at(&model, list, position) else {
        return (model, AppCommand::None);
    };

    model.focus = Focus::Palette;
    model.select(index);

    let remove_from = list.right().saturating_sub(REMOVE_TARGET_WIDTH);
    if position.x >= remove_from {
        return (model, AppCommand::Palette(PaletteAction::RemoveAt(index)));
    }

    if let Some(color) = model.palette.get(index).cloned() {
        model = model.with_current_color(color);
    }
    (model, AppCommand::None)
}

fn palette_index_at(model: &AppModel, list: Rect, position: Position) -> Option<usize> {
    if !list.contains(position) {
        return None;
    }
    let index = model.palette_scroll + usize::from(position.y - list.y);
    (index < model.palette.len()).then_some(index)
}

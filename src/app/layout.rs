use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Screen regions shared by rendering and mouse hit-testing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScreenLayout {
    pub menu_bar: Rect,
    pub swatch: Rect,
    pub values: Rect,
    pub input: Rect,
    pub palette: Rect,
    pub footer: Rect,
}

pub const VALUES_HEIGHT: u16 = 5;
pub const INPUT_HEIGHT: u16 = 3;

/// Width of the `×` remove target at the right edge of a palette row.
pub const REMOVE_TARGET_WIDTH: u16 = 3;

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(VALUES_HEIGHT),
            Constraint::Length(INPUT_HEIGHT),
        ])
        .split(columns[0]);

    ScreenLayout {
        menu_bar: rows[0],
        swatch: left[0],
        values: left[1],
        input: left[2],
        palette: columns[1],
        footer: rows[2],
    }
}

pub fn screen_layout_for_size(terminal_size: (u16, u16)) -> ScreenLayout {
    screen_layout(Rect::new(0, 0, terminal_size.0, terminal_size.1))
}

/// Rows available to palette entries inside the bordered, padded block.
pub fn palette_list_area(palette: Rect) -> Rect {
    Rect {
        x: palette.x.saturating_add(2),
        y: palette.y.saturating_add(1),
        width: palette.width.saturating_sub(4),
        height: palette.height.saturating_sub(2),
    }
}

pub fn palette_visible_rows(terminal_size: (u16, u16)) -> usize {
    let layout = screen_layout_for_size(terminal_size);
    palette_list_area(layout.palette).height as usize
}

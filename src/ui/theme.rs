use crate::domain::{CONTRAST_DARK, HexColor, contrast_color};
use ratatui::style::Color;

// Chrome colors stay neutral so the swatches carry all the hue on screen.
pub const BAR_BG: Color = Color::Rgb(14, 18, 24);
pub const FG: Color = Color::Rgb(229, 231, 235);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const DIM: Color = Color::Rgb(107, 114, 128);
pub const BORDER: Color = Color::Rgb(55, 65, 81);

pub const ACCENT: Color = Color::Rgb(255, 159, 26);

pub const SUCCESS: Color = Color::Rgb(134, 239, 172);
pub const ERROR: Color = Color::Rgb(248, 113, 113);

pub fn swatch(color: &HexColor) -> Color {
    let rgb = color.rgb();
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Text color readable on top of `color`.
pub fn on_swatch(color: &HexColor) -> Color {
    if contrast_color(color) == CONTRAST_DARK {
        Color::Rgb(0, 0, 0)
    } else {
        Color::Rgb(255, 255, 255)
    }
}

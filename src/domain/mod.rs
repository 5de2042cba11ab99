mod color;
mod palette;

pub use color::*;
pub use palette::*;

mod clipboard;
mod logging;
mod palette_store;
mod screen_picker;
mod state_dir;

pub use clipboard::*;
pub use logging::*;
pub use palette_store::*;
pub use screen_picker::*;
pub use state_dir::*;

//! Horizontally scrolling text rows

mod line;
mod text;

pub use line::{ScrollLineBuffer, LINE_BYTES, LINE_PIXELS};
pub use text::{ScrollState, ScrollText, MAX_VIEWPORT_WIDTH, ROW_COUNT, VIEWPORT_HEIGHT};

//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod button;
pub mod display;

pub use button::button_task;
pub use display::{display_task, DisplayResources};

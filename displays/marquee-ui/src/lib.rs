//! View plumbing for Marquee displays
//!
//! This crate provides:
//! - `Surface` trait: what a view needs from the display (canvas + present)
//! - `View` trait and `ViewController` for switching between a fixed set
//!   of screens with exactly one active at a time
//! - `PopupOverlay`, a timed modal box drawn over whatever view is active
//!
//! # Architecture
//!
//! Screens are a closed set: the application defines one enum with a
//! variant per screen and implements [`View`] for it. The controller owns
//! the enum values in a fixed-capacity array and remembers the active one
//! by index. Views draw only into the canvas; presenting to the panel is
//! done through the same [`Surface`].

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod popup;
pub mod surface;
pub mod view;

// Re-export key types
pub use popup::{PopupOverlay, BAR_WIDTH, IDLE_TIMEOUT_MS};
pub use surface::Surface;
pub use view::{Response, View, ViewController, ViewId};

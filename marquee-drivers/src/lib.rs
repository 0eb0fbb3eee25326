//! Panel driver implementations
//!
//! This crate talks to the display controller on top of the traits in
//! marquee-hal and the rendering state in marquee-core:
//!
//! - Bus interfaces (bit-banged 8-bit 6800-style parallel bus)
//! - SSD1322 command driver (power-up sequence, address windows, modes,
//!   full and partial frame streaming)
//! - [`Display`] context object owning the panel, canvas, fonts and sprites

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod display;
pub mod interface;
pub mod ssd1322;

pub use display::Display;
pub use interface::{DisplayInterface, InterfaceError, ParallelInterface};
pub use ssd1322::{DisplayMode, Ssd1322};

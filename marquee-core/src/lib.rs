//! Board-agnostic display logic for the Marquee OLED panel
//!
//! This crate contains everything that does not touch the bus:
//!
//! - 4-bit packed framebuffer and drawing canvas with a popup region
//! - Bitmap fonts with hashed glyph lookup and a multi-byte text decoder
//! - Sprites and sprite lists
//! - Pre-rendered two-row scrolling text and its animation state machine
//! - Panel and timing configuration

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod asset;
pub mod canvas;
pub mod config;
pub mod font;
pub mod framebuffer;
pub mod geometry;
pub mod image;
pub mod scroll;

pub use asset::AssetError;
pub use canvas::{Canvas, PopupDrawing};
pub use config::{FontSize, FontSpec, PanelConfig, ScrollTiming};
pub use font::{Font, Glyph};
pub use framebuffer::Framebuffer;
pub use geometry::Rectangle;
pub use image::{Image, ImageList};
pub use scroll::{ScrollState, ScrollText};

//! Marquee Hardware Abstraction Layer
//!
//! This crate defines the board-facing traits the display subsystem needs
//! beyond what `embedded-hal` already covers. Chip-specific firmware
//! implements them; host tests implement them with in-memory mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (marquee-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-core / marquee-drivers         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  marquee-hal (this crate - traits)      │
//! │  + embedded-hal (pins, delay)           │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`port::DataPort`] - 8-bit parallel data lines of the panel bus
//! - [`storage::AssetStorage`] - read-only named asset streams
//! - [`clock::Clock`] - free-running millisecond clock

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod port;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use port::DataPort;
pub use storage::{AssetStorage, StorageError};

//! Retained, incrementally redrawn status bar for a first-person shooter.
//!
//! Data flows one way: the host hands a `PlayerSnapshot` to
//! `StatusBar::tick`, widgets read the derived values during
//! `StatusBar::draw`, and only what changed reaches the `Video` service.

pub mod config;
pub mod domain;
pub mod error;
pub mod gfx;
pub mod sim;
pub mod ui;
pub mod widget;

pub use domain::player::PlayerSnapshot;
pub use error::HudError;
pub use gfx::glyph::{Glyph, GlyphBank, GlyphRepository};
pub use gfx::video::{Screen, Video};
pub use sim::event::{HudEffect, HudEvent};
pub use sim::statusbar::StatusBar;

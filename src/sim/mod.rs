//! The status bar controller and the events crossing its boundary.

pub mod event;
pub mod messages;
pub mod statusbar;

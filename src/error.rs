//! Error taxonomy for the status bar.
//!
//! Only configuration/layout bugs are errors. Bad cheat parameters and
//! malformed automap signals are dropped where they arrive, and a missing
//! optional glyph just means nothing is drawn for it.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HudError {
    /// A glyph the bar cannot work without is not in the repository.
    #[error("required glyph `{name}` not found in repository")]
    MissingGlyph { name: String },

    /// An erase footprint falls outside the backing band. Always a layout bug.
    #[error("{widget}: footprint y={y} h={height} outside status bar band")]
    OutOfBand {
        widget: &'static str,
        y: i32,
        height: i32,
    },

    /// `draw` was called before `start`.
    #[error("status bar drawn before start()")]
    NotStarted,
}

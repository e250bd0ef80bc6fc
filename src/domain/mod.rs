//! Pure game-side rules the status bar reacts to.

pub mod angle;
pub mod cheat;
pub mod face;
pub mod mission;
pub mod palette;
pub mod player;

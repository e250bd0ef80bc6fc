//! Terminal front end for the demo host.

pub mod glyphs;
pub mod input;
pub mod renderer;

pub mod glyph;
pub mod video;

//! Glyphs ("patches") and the repository they are looked up from.
//!
//! A glyph is a small paletted bitmap with a declared size and a left/top
//! offset. Offsets follow the usual patch convention: drawing at `(x, y)`
//! puts the glyph's top-left corner at `(x - left_offset, y - top_offset)`.
//!
//! The repository is read-only from the status bar's point of view. Glyph
//! sets (`DigitFont`, `IconSet`) are built once at load time and handed out
//! as cheap `Rc` clones to the widgets that draw with them.

use std::collections::HashMap;
use std::rc::Rc;

use crate::domain::face::Face;
use crate::error::HudError;

// ── Glyph ──

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Glyph {
    name: String,
    width: i32,
    height: i32,
    left_offset: i32,
    top_offset: i32,
    /// Row-major, `None` = transparent.
    pixels: Vec<Option<u8>>,
}

impl Glyph {
    /// Build a glyph from row-major pixels. Short pixel data is padded with
    /// transparency; extra data is dropped.
    pub fn new(
        name: &str,
        width: i32,
        height: i32,
        left_offset: i32,
        top_offset: i32,
        mut pixels: Vec<Option<u8>>,
    ) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        pixels.resize(len, None);
        Glyph {
            name: name.to_string(),
            width,
            height,
            left_offset,
            top_offset,
            pixels,
        }
    }

    /// A fully opaque single-colour block.
    pub fn solid(name: &str, width: i32, height: i32, color: u8) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        Self::new(name, width, height, 0, 0, vec![Some(color); len])
    }

    /// Same pixels, different offsets.
    pub fn with_offsets(mut self, left: i32, top: i32) -> Self {
        self.left_offset = left;
        self.top_offset = top;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn left_offset(&self) -> i32 {
        self.left_offset
    }

    pub fn top_offset(&self) -> i32 {
        self.top_offset
    }

    /// Pixel at glyph-local `(x, y)`; `None` if transparent or outside.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.pixels[(y * self.width + x) as usize]
    }
}

// ── Repository ──

/// Named lookup of glyphs. Implemented by whatever owns the game's assets.
pub trait GlyphRepository {
    fn glyph(&self, name: &str) -> Option<Rc<Glyph>>;

    /// Lookup that turns absence into a load error.
    fn require(&self, name: &str) -> Result<Rc<Glyph>, HudError> {
        self.glyph(name).ok_or_else(|| HudError::MissingGlyph {
            name: name.to_string(),
        })
    }
}

/// In-memory repository keyed by glyph name.
#[derive(Default)]
pub struct GlyphBank {
    glyphs: HashMap<String, Rc<Glyph>>,
}

impl GlyphBank {
    pub fn new() -> Self {
        GlyphBank { glyphs: HashMap::new() }
    }

    /// Insert under the glyph's own name, replacing any previous entry.
    pub fn insert(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.name().to_string(), Rc::new(glyph));
    }

    pub fn remove(&mut self, name: &str) -> Option<Rc<Glyph>> {
        self.glyphs.remove(name)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphRepository for GlyphBank {
    fn glyph(&self, name: &str) -> Option<Rc<Glyph>> {
        self.glyphs.get(name).cloned()
    }
}

// ── Glyph sets ──

/// Ten digit glyphs, `0..=9`. Cell size is taken from the `0` glyph.
#[derive(Clone, Debug)]
pub struct DigitFont {
    digits: Rc<[Rc<Glyph>]>,
}

impl DigitFont {
    /// Load `{prefix}0` .. `{prefix}9`.
    pub fn load(repo: &impl GlyphRepository, prefix: &str) -> Result<Self, HudError> {
        let digits = (0..10)
            .map(|d| repo.require(&format!("{prefix}{d}")))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DigitFont { digits: digits.into() })
    }

    /// Digit glyph for `d % 10`.
    #[inline]
    pub fn digit(&self, d: u32) -> &Glyph {
        &self.digits[(d % 10) as usize]
    }

    /// Shared handle to a digit glyph, for building icon sets.
    pub fn digit_rc(&self, d: u32) -> Rc<Glyph> {
        Rc::clone(&self.digits[(d % 10) as usize])
    }

    pub fn width(&self) -> i32 {
        self.digits[0].width()
    }

    pub fn height(&self) -> i32 {
        self.digits[0].height()
    }
}

/// An ordered glyph list selected by index.
#[derive(Clone, Debug)]
pub struct IconSet {
    icons: Rc<[Rc<Glyph>]>,
}

impl IconSet {
    pub fn new(icons: Vec<Rc<Glyph>>) -> Self {
        IconSet { icons: icons.into() }
    }

    pub fn load(repo: &impl GlyphRepository, names: &[String]) -> Result<Self, HudError> {
        let icons = names
            .iter()
            .map(|n| repo.require(n))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(icons))
    }

    /// Bounds-checked lookup.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Glyph> {
        self.icons.get(index).map(|g| g.as_ref())
    }

    pub fn len(&self) -> usize {
        self.icons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// The 42 face glyphs, addressed by `Face` rather than raw offsets.
#[derive(Clone, Debug)]
pub struct FaceGlyphs {
    set: IconSet,
}

impl FaceGlyphs {
    pub fn load(repo: &impl GlyphRepository) -> Result<Self, HudError> {
        let names: Vec<String> = Face::all().map(Face::glyph_name).collect();
        Ok(FaceGlyphs {
            set: IconSet::load(repo, &names)?,
        })
    }

    pub fn get(&self, face: Face) -> Option<&Glyph> {
        self.set.get(face.index())
    }

    /// The underlying set, indexed by `Face::index`.
    pub fn icons(&self) -> &IconSet {
        &self.set
    }
}

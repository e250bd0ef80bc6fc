//! Built-in glyphs for the demo host.
//!
//! Everything is drawn from small ASCII sketches so the binary runs without
//! a game data file. Sizes match what the layout expects: tall digits 14×16,
//! short digits 4×6, faces 24×29, key icons 7×5, the bar 320×32.

use crate::domain::face::{Expression, Face, NUM_PAIN_LEVELS};
use crate::gfx::glyph::{Glyph, GlyphBank};

// Palette indices: ramp * 16 + shade.
const GREY_DARK: u8 = 3;
const GREY: u8 = 9;
const GREY_LIGHT: u8 = 13;
const RED: u8 = 16 + 12;
const RED_DARK: u8 = 16 + 6;
const YELLOW: u8 = 48 + 15;
const GOLD: u8 = 48 + 11;
const GREEN: u8 = 64 + 10;
const BLUE: u8 = 96 + 14;
const BROWN: u8 = 128 + 6;
const BROWN_DARK: u8 = 128 + 3;
const BROWN_LIGHT: u8 = 128 + 9;
const SKIN: u8 = 144 + 12;
const SKIN_DARK: u8 = 144 + 7;
const BLACK: u8 = 0;

const DIGITS_3X5: [[&str; 5]; 10] = [
    ["###", "#.#", "#.#", "#.#", "###"],
    [".#.", "##.", ".#.", ".#.", "###"],
    ["###", "..#", "###", "#..", "###"],
    ["###", "..#", ".##", "..#", "###"],
    ["#.#", "#.#", "###", "..#", "..#"],
    ["###", "#..", "###", "..#", "###"],
    ["###", "#..", "###", "#.#", "###"],
    ["###", "..#", ".#.", ".#.", ".#."],
    ["###", "#.#", "###", "#.#", "###"],
    ["###", "#.#", "###", "..#", "###"],
];

/// Rasterise `rows` into a `width`×`height` glyph: `#` is `ink`, anything
/// else is transparent. Each sketch cell covers `sx`×`sy` pixels, placed at
/// (`ox`, `oy`).
fn sketch(
    name: &str,
    width: i32,
    height: i32,
    rows: &[&str],
    (sx, sy): (i32, i32),
    (ox, oy): (i32, i32),
    ink: u8,
) -> Glyph {
    let mut pixels = vec![None; (width * height) as usize];
    for (row, line) in rows.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c != '#' {
                continue;
            }
            for dy in 0..sy {
                for dx in 0..sx {
                    let x = ox + col as i32 * sx + dx;
                    let y = oy + row as i32 * sy + dy;
                    if (0..width).contains(&x) && (0..height).contains(&y) {
                        pixels[(y * width + x) as usize] = Some(ink);
                    }
                }
            }
        }
    }
    Glyph::new(name, width, height, 0, 0, pixels)
}

/// Opaque canvas the caller paints into, then freezes as a glyph.
struct Paint {
    width: i32,
    height: i32,
    pixels: Vec<Option<u8>>,
}

impl Paint {
    fn new(width: i32, height: i32, fill: Option<u8>) -> Self {
        Paint {
            width,
            height,
            pixels: vec![fill; (width * height) as usize],
        }
    }

    fn rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Option<u8>) -> &mut Self {
        for py in y.max(0)..(y + h).min(self.height) {
            for px in x.max(0)..(x + w).min(self.width) {
                self.pixels[(py * self.width + px) as usize] = color;
            }
        }
        self
    }

    fn frame(&mut self, x: i32, y: i32, w: i32, h: i32, color: u8) -> &mut Self {
        let c = Some(color);
        self.rect(x, y, w, 1, c)
            .rect(x, y + h - 1, w, 1, c)
            .rect(x, y, 1, h, c)
            .rect(x + w - 1, y, 1, h, c)
    }

    fn glyph(&self, name: &str) -> Glyph {
        Glyph::new(name, self.width, self.height, 0, 0, self.pixels.clone())
    }
}

// ── Fonts ──

fn tall_digit(name: &str, d: usize, ink: u8) -> Glyph {
    sketch(name, 14, 16, &DIGITS_3X5[d], (4, 3), (1, 0), ink)
}

fn short_digit(name: &str, d: usize, ink: u8) -> Glyph {
    sketch(name, 4, 6, &DIGITS_3X5[d], (1, 1), (0, 0), ink)
}

fn percent() -> Glyph {
    let rows = ["#..#", "...#", "..#.", ".#..", "#...", "#..#"];
    sketch("STTPRCNT", 14, 16, &rows, (3, 2), (1, 2), RED)
}

fn minus() -> Glyph {
    let mut p = Paint::new(6, 16, None);
    p.rect(0, 7, 6, 3, Some(RED));
    p.glyph("STTMINUS")
}

// ── Faces ──

fn face(f: Face) -> Glyph {
    let mut p = Paint::new(24, 29, None);
    let (skin, level) = match f {
        Face::Pain { level, .. } => (SKIN, level),
        Face::God => (SKIN, 0),
        Face::Dead => (SKIN_DARK, NUM_PAIN_LEVELS - 1),
    };
    p.rect(4, 2, 16, 25, Some(skin)).rect(2, 6, 20, 16, Some(skin));
    p.rect(4, 0, 16, 4, Some(BROWN_DARK));

    // Eyes.
    let eye = match f {
        Face::God => GOLD,
        _ => BLACK,
    };
    let glance = match f {
        Face::Pain { expression: Expression::Straight(n), .. } => i32::from(n) - 1,
        Face::Pain { expression: Expression::TurnRight, .. } => 2,
        Face::Pain { expression: Expression::TurnLeft, .. } => -2,
        _ => 0,
    };
    if f == Face::Dead {
        for i in 0..3 {
            p.rect(6 + i, 9 + i, 1, 1, Some(BLACK)).rect(8 - i, 9 + i, 1, 1, Some(BLACK));
            p.rect(15 + i, 9 + i, 1, 1, Some(BLACK)).rect(17 - i, 9 + i, 1, 1, Some(BLACK));
        }
    } else {
        p.rect(7 + glance, 10, 3, 2, Some(eye)).rect(14 + glance, 10, 3, 2, Some(eye));
    }

    // Mouth.
    match f {
        Face::Pain { expression: Expression::Ouch, .. } => {
            p.rect(9, 19, 6, 5, Some(BLACK));
        }
        Face::Pain { expression: Expression::EvilGrin, .. } => {
            p.rect(7, 20, 10, 2, Some(GREY_LIGHT)).rect(6, 19, 1, 1, Some(BLACK));
            p.rect(17, 19, 1, 1, Some(BLACK));
        }
        Face::Pain { expression: Expression::Rampage, .. } => {
            p.rect(7, 19, 10, 3, Some(GREY_LIGHT)).rect(7, 22, 10, 1, Some(BLACK));
        }
        _ => {
            p.rect(8, 21, 8, 1, Some(SKIN_DARK));
        }
    }

    // Blood grows with pain.
    for i in 0..i32::from(level) {
        p.rect(3 + i * 5, 13 + (i % 2) * 4, 2, 3 + i, Some(RED_DARK));
    }
    p.glyph(&f.glyph_name())
}

// ── Icons and panels ──

fn key(name: &str, color: u8, skull: bool) -> Glyph {
    let rows: [&str; 5] = if skull {
        [".###.", "#.#.#", "#####", ".###.", ".#.#."]
    } else {
        ["#####", "#####", "##.##", "#####", "#####"]
    };
    sketch(name, 7, 5, &rows, (1, 1), (1, 0), color)
}

fn arms_background() -> Glyph {
    let mut p = Paint::new(40, 32, Some(BROWN));
    p.frame(0, 0, 40, 32, BROWN_DARK).rect(4, 24, 32, 6, Some(BROWN_DARK));
    p.glyph("STARMS")
}

fn status_bar() -> Glyph {
    let mut p = Paint::new(320, 32, Some(BROWN));
    p.rect(0, 0, 320, 1, Some(BROWN_LIGHT));
    // Panel boxes: ammo, health, arms, face, armor, keys, fractions.
    for (x, w) in [(0, 48), (48, 56), (104, 40), (143, 34), (177, 58), (235, 14), (249, 71)] {
        p.frame(x, 1, w, 31, BROWN_DARK);
    }
    p.rect(236, 2, 12, 29, Some(GREY_DARK));
    p.glyph("STBAR")
}

fn status_bar_right() -> Glyph {
    let mut p = Paint::new(40, 32, Some(BROWN));
    p.frame(0, 0, 40, 32, BROWN_DARK).rect(2, 2, 36, 28, Some(GREY_DARK));
    p.glyph("STMBARR")
}

fn face_background(player: usize) -> Glyph {
    let color = [GREEN, GREY, BROWN_LIGHT, RED][player % 4];
    Paint::new(33, 31, Some(color)).glyph(&format!("STFB{player}"))
}

/// Every glyph the status bar loads, keyed by its usual name.
pub fn builtin_glyphs() -> GlyphBank {
    let mut bank = GlyphBank::new();
    for d in 0..10 {
        bank.insert(tall_digit(&format!("STTNUM{d}"), d, RED));
        bank.insert(short_digit(&format!("STYSNUM{d}"), d, YELLOW));
        bank.insert(short_digit(&format!("STGNUM{d}"), d, GREY));
    }
    bank.insert(percent());
    bank.insert(minus());
    for f in Face::all() {
        bank.insert(face(f));
    }
    for (i, color) in [BLUE, YELLOW, RED].into_iter().enumerate() {
        bank.insert(key(&format!("STKEYS{i}"), color, false));
        bank.insert(key(&format!("STKEYS{}", i + 3), color, true));
    }
    bank.insert(arms_background());
    bank.insert(status_bar());
    bank.insert(status_bar_right());
    for player in 0..4 {
        bank.insert(face_background(player));
    }
    bank
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::face::NUM_FACES;
    use crate::gfx::glyph::{DigitFont, FaceGlyphs, GlyphRepository};

    #[test]
    fn fonts_have_layout_sizes() {
        let bank = builtin_glyphs();
        let tall = DigitFont::load(&bank, "STTNUM").unwrap();
        assert_eq!((tall.width(), tall.height()), (14, 16));
        let short = DigitFont::load(&bank, "STYSNUM").unwrap();
        assert_eq!((short.width(), short.height()), (4, 6));
    }

    #[test]
    fn every_face_is_present_and_distinct() {
        let bank = builtin_glyphs();
        let faces = FaceGlyphs::load(&bank).unwrap();
        assert_eq!(faces.icons().len(), NUM_FACES);
        let god = faces.get(Face::God).unwrap();
        let dead = faces.get(Face::Dead).unwrap();
        assert_eq!((god.width(), god.height()), (24, 29));
        assert_ne!(god.pixel(8, 10), dead.pixel(8, 10));
    }

    #[test]
    fn sketch_marks_ink_only() {
        let g = sketch("T", 4, 2, &["#.", ".#"], (2, 1), (0, 0), 7);
        assert_eq!(g.pixel(0, 0), Some(7));
        assert_eq!(g.pixel(1, 0), Some(7));
        assert_eq!(g.pixel(2, 0), None);
        assert_eq!(g.pixel(2, 1), Some(7));
    }

    #[test]
    fn panels_fill_the_band() {
        let bank = builtin_glyphs();
        let bar = bank.require("STBAR").unwrap();
        assert_eq!((bar.width(), bar.height()), (320, 32));
        assert!(bar.pixel(160, 16).is_some());
        assert!(bank.glyph("STFB3").is_some());
        assert!(bank.glyph("STKEYS5").is_some());
    }
}

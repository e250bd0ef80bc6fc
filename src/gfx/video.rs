//! Pixel surfaces and the drawing service the status bar draws through.
//!
//! The status bar never touches the frame buffer directly. It issues three
//! primitive calls against a `Video` implementation: draw a glyph, copy a
//! rectangle out of its own backing band, and select a palette. `Screen` is
//! the in-memory implementation the demo host presents; tests use the
//! recording double in `testing`.

use crate::gfx::glyph::Glyph;

pub const SCREEN_WIDTH: i32 = 320;
pub const SCREEN_HEIGHT: i32 = 200;

// ── PixelBuffer ──

/// A paletted, row-major 8-bit surface.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PixelBuffer {
    width: i32,
    height: i32,
    pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: i32, height: i32) -> Self {
        let len = (width.max(0) * height.max(0)) as usize;
        PixelBuffer {
            width,
            height,
            pixels: vec![0; len],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[(y * self.width + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: i32, y: i32, color: u8) {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return;
        }
        self.pixels[(y * self.width + x) as usize] = color;
    }

    pub fn fill(&mut self, color: u8) {
        self.pixels.fill(color);
    }

    /// Blit a glyph, honouring its offsets and transparency. Clipped.
    pub fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph) {
        let ox = x - glyph.left_offset();
        let oy = y - glyph.top_offset();
        for gy in 0..glyph.height() {
            for gx in 0..glyph.width() {
                if let Some(c) = glyph.pixel(gx, gy) {
                    self.set(ox + gx, oy + gy, c);
                }
            }
        }
    }

    /// Copy a `width`×`height` block from `src` at `(src_x, src_y)` to
    /// `(dest_x, dest_y)` here. Clipped on both surfaces.
    #[allow(clippy::too_many_arguments)]
    pub fn copy_from(
        &mut self,
        src: &PixelBuffer,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dest_x: i32,
        dest_y: i32,
    ) {
        for dy in 0..height {
            let sy = src_y + dy;
            if sy < 0 || sy >= src.height {
                continue;
            }
            for dx in 0..width {
                let sx = src_x + dx;
                if sx < 0 || sx >= src.width {
                    continue;
                }
                self.set(dest_x + dx, dest_y + dy, src.get(sx, sy));
            }
        }
    }
}

// ── Drawing service ──

pub trait Video {
    /// Draw at `(x, y)` adjusted by the glyph's own offsets.
    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph);

    /// Copy a block of the status bar's backing band onto the screen.
    #[allow(clippy::too_many_arguments)]
    fn copy_rect(
        &mut self,
        src: &PixelBuffer,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dest_x: i32,
        dest_y: i32,
    );

    fn set_palette(&mut self, palette: usize);
}

/// The full-size frame the host presents.
pub struct Screen {
    frame: PixelBuffer,
    palette: usize,
    palette_changes: u32,
}

impl Screen {
    pub fn new() -> Self {
        Screen {
            frame: PixelBuffer::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            palette: 0,
            palette_changes: 0,
        }
    }

    pub fn frame(&self) -> &PixelBuffer {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut PixelBuffer {
        &mut self.frame
    }

    pub fn palette(&self) -> usize {
        self.palette
    }

    pub fn palette_changes(&self) -> u32 {
        self.palette_changes
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Video for Screen {
    fn draw_glyph(&mut self, x: i32, y: i32, glyph: &Glyph) {
        self.frame.draw_glyph(x, y, glyph);
    }

    fn copy_rect(
        &mut self,
        src: &PixelBuffer,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dest_x: i32,
        dest_y: i32,
    ) {
        self.frame
            .copy_from(src, src_x, src_y, width, height, dest_x, dest_y);
    }

    fn set_palette(&mut self, palette: usize) {
        self.palette = palette;
        self.palette_changes += 1;
    }
}

// ── Palettes ──

pub const NUM_PALETTES: usize = 14;

pub type Rgb = (u8, u8, u8);

/// Fourteen 256-colour palettes: the base ramp, eight red pain tints, four
/// gold pickup tints and one green radiation tint.
pub struct PlayPal {
    palettes: Vec<[Rgb; 256]>,
}

/// Hue per 16-entry ramp. Colour `i` is hue `i / 16` at shade `i % 16`.
const RAMP_HUES: [Rgb; 16] = [
    (255, 255, 255), // grey
    (255, 60, 40),   // red
    (255, 140, 30),  // orange
    (255, 230, 60),  // yellow
    (70, 220, 60),   // green
    (60, 220, 220),  // cyan
    (70, 110, 255),  // blue
    (190, 80, 230),  // purple
    (170, 110, 60),  // brown
    (240, 180, 140), // skin
    (150, 150, 120), // khaki
    (120, 150, 170), // steel
    (255, 120, 180), // pink
    (120, 90, 60),   // dark brown
    (200, 200, 160), // bone
    (255, 255, 200), // light
];

impl PlayPal {
    pub fn new() -> Self {
        let mut base = [(0u8, 0u8, 0u8); 256];
        for (i, c) in base.iter_mut().enumerate() {
            let (r, g, b) = RAMP_HUES[i / 16];
            let shade = (i % 16) as u32 + 1;
            *c = (
                (r as u32 * shade / 16) as u8,
                (g as u32 * shade / 16) as u8,
                (b as u32 * shade / 16) as u8,
            );
        }

        let mut palettes = Vec::with_capacity(NUM_PALETTES);
        palettes.push(base);
        for step in 1..=8u32 {
            palettes.push(tint(&base, (255, 0, 0), step, 9));
        }
        for step in 1..=4u32 {
            palettes.push(tint(&base, (215, 186, 69), step, 8));
        }
        palettes.push(tint(&base, (0, 255, 0), 1, 8));
        PlayPal { palettes }
    }

    /// Colour of `index` in `palette`; unknown palettes fall back to the base.
    pub fn rgb(&self, palette: usize, index: u8) -> Rgb {
        let pal = self.palettes.get(palette).unwrap_or(&self.palettes[0]);
        pal[index as usize]
    }
}

impl Default for PlayPal {
    fn default() -> Self {
        Self::new()
    }
}

fn tint(base: &[Rgb; 256], toward: Rgb, num: u32, den: u32) -> [Rgb; 256] {
    let mix = |from: u8, to: u8| -> u8 {
        let f = from as u32;
        let t = to as u32;
        ((f * (den - num) + t * num) / den) as u8
    };
    let mut out = *base;
    for c in out.iter_mut() {
        *c = (mix(c.0, toward.0), mix(c.1, toward.1), mix(c.2, toward.2));
    }
    out
}

// ── Test double ──


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_glyph_applies_offsets_and_transparency() {
        let mut buf = PixelBuffer::new(8, 8);
        let g = Glyph::new("G", 2, 1, 1, 1, vec![Some(5), None]).with_offsets(1, 1);
        buf.draw_glyph(3, 3, &g);
        assert_eq!(buf.get(2, 2), 5);
        assert_eq!(buf.get(3, 2), 0);
    }

    #[test]
    fn draw_glyph_clips_at_edges() {
        let mut buf = PixelBuffer::new(4, 4);
        buf.draw_glyph(-1, -1, &Glyph::solid("S", 3, 3, 9));
        assert_eq!(buf.get(0, 0), 9);
        assert_eq!(buf.get(1, 1), 9);
        assert_eq!(buf.get(2, 2), 0);
    }

    #[test]
    fn copy_from_moves_block() {
        let mut band = PixelBuffer::new(10, 4);
        band.set(2, 1, 7);
        let mut screen = PixelBuffer::new(10, 10);
        screen.copy_from(&band, 0, 0, 10, 4, 0, 6);
        assert_eq!(screen.get(2, 7), 7);
        assert_eq!(screen.get(2, 1), 0);
    }

    #[test]
    fn screen_counts_palette_changes() {
        let mut screen = Screen::new();
        screen.set_palette(3);
        screen.set_palette(0);
        assert_eq!(screen.palette(), 0);
        assert_eq!(screen.palette_changes(), 2);
    }

    #[test]
    fn playpal_tints_toward_red() {
        let pal = PlayPal::new();
        let base = pal.rgb(0, 0x1f);
        let hurt = pal.rgb(8, 0x1f);
        assert!(hurt.0 >= base.0);
        assert!(hurt.1 <= base.1);
        assert_eq!(pal.rgb(99, 0x1f), base);
    }
}

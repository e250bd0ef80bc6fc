//! Double-buffered, diff-based terminal renderer for the status bar band.
//!
//! Each frame is composed into `front`, compared cell by cell against
//! `back` (the previous frame), and only changed cells are written, batched
//! with `queue!` and flushed once. The band's pixels are shown with upper
//! half blocks: the foreground carries the top pixel and the background the
//! one below, both looked up through the palette the status bar selected.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::gfx::video::{PixelBuffer, PlayPal, Screen};
use crate::widget::{ST_HEIGHT, ST_WIDTH, ST_Y};

const UPPER_HALF: char = '\u{2580}';

// ── Cell ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit background for empty cells, so row gaps match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Differs from every real cell; forces a full repaint.
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };
}

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer {
            width: w,
            height: h,
            cells: vec![Cell::BLANK; w * h],
        }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell { ch, fg, bg: Cell::BASE_BG });
        }
    }
}

// ── Overlay ──

/// Text lines drawn around the band.
#[derive(Clone, Debug, Default)]
pub struct Overlay {
    pub message: Option<String>,
    pub status: String,
    pub help: String,
}

// ── Renderer ──

const TITLE_ROW: usize = 0;
const MESSAGE_ROW: usize = 1;
const BAND_ROW: usize = 3;

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    playpal: PlayPal,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            playpal: PlayPal::new(),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    pub fn render(&mut self, screen: &Screen, overlay: &Overlay) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        let rows = compose(&mut self.front, screen, &self.playpal, overlay);
        log::trace!("composed {rows} band rows at palette {}", screen.palette());

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        queue!(
            self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }
                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

// ── Compose ──

/// Pixels per terminal column so the band fits `columns`.
fn sample_step(columns: usize) -> i32 {
    let columns = columns.max(1) as i32;
    ((ST_WIDTH + columns - 1) / columns).max(1)
}

fn rgb(playpal: &PlayPal, palette: usize, index: u8) -> Color {
    let (r, g, b) = playpal.rgb(palette, index);
    Color::Rgb { r, g, b }
}

/// Half-block sample the band rows of `frame` into `buf` from `row`.
/// Returns the number of terminal rows used.
fn compose_band(
    buf: &mut FrameBuffer,
    frame: &PixelBuffer,
    playpal: &PlayPal,
    palette: usize,
    row: usize,
) -> usize {
    let step = sample_step(buf.width);
    let columns = (ST_WIDTH / step) as usize;
    let rows = (ST_HEIGHT / (2 * step)) as usize;
    for ty in 0..rows {
        let top_y = ST_Y + (ty as i32) * 2 * step;
        for tx in 0..columns {
            let x = tx as i32 * step;
            let top = frame.get(x, top_y);
            let bottom = frame.get(x, top_y + step);
            buf.set(
                tx,
                row + ty,
                Cell {
                    ch: UPPER_HALF,
                    fg: rgb(playpal, palette, top),
                    bg: rgb(playpal, palette, bottom),
                },
            );
        }
    }
    rows
}

fn compose(buf: &mut FrameBuffer, screen: &Screen, playpal: &PlayPal, overlay: &Overlay) -> usize {
    buf.put_str(1, TITLE_ROW, "STATUS BAR", Color::Yellow);
    if let Some(msg) = &overlay.message {
        buf.put_str(1, MESSAGE_ROW, msg, Color::Red);
    }
    let rows = compose_band(buf, screen.frame(), playpal, screen.palette(), BAND_ROW);
    let below = BAND_ROW + rows + 1;
    buf.put_str(1, below, &overlay.status, Color::Grey);
    buf.put_str(1, below + 1, &overlay.help, Color::DarkGrey);
    rows
}

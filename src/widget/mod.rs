//! Status bar widgets.
//!
//! A widget owns its position, its glyphs and a cache of what it last put
//! on screen. Everything else (whether it is enabled and what it should
//! show) is looked up through bindings against a `WidgetValues`
//! implementation owned by the status bar. A widget never writes those
//! values.
//!
//! Erasing restores the band from the backing buffer the status bar keeps
//! with the bare background drawn into it.

pub mod registry;

use log::debug;

use crate::error::HudError;
use crate::gfx::glyph::{DigitFont, Glyph, IconSet};
use crate::gfx::video::{PixelBuffer, Video};
use std::rc::Rc;

pub const ST_WIDTH: i32 = 320;
pub const ST_HEIGHT: i32 = 32;
/// Screen row of the band's top edge.
pub const ST_Y: i32 = 168;

/// Gap between a fraction's numerator and denominator anchors.
pub const FRACTION_SPACING: i32 = 26;
/// Minus sign sits this far left of the leftmost digit.
pub const MINUS_SPACING: i32 = 8;

// ── Bindings ──

/// What a number widget shows.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Readout {
    Value(i32),
    /// Erase and draw nothing.
    Blank,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flag {
    StatusBar,
    Arms,
    Frags,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NumberSource {
    CurrentAmmo,
    Health,
    Armor,
    Frags,
    Ammo(usize),
    MaxAmmo(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IconSource {
    /// Ownership of arms slot `n` (pistol is slot 0).
    Weapon(usize),
    Face,
    KeyBox(usize),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SwitchSource {
    ArmsBackground,
}

/// The values widgets read, resolved through their bindings.
pub trait WidgetValues {
    fn enabled(&self, flag: Flag) -> bool;
    fn number(&self, source: NumberSource) -> Readout;
    /// `None` draws nothing and erases nothing.
    fn icon(&self, source: IconSource) -> Option<usize>;
    fn switch(&self, source: SwitchSource) -> bool;
}

/// Where widgets draw, and what they erase from.
pub struct Canvas<'a, V: Video> {
    pub video: &'a mut V,
    pub backing: &'a PixelBuffer,
}

impl<'a, V: Video> Canvas<'a, V> {
    pub fn new(video: &'a mut V, backing: &'a PixelBuffer) -> Self {
        Canvas { video, backing }
    }

    /// Restore a screen rectangle from the backing band.
    pub fn erase(
        &mut self,
        widget: &'static str,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), HudError> {
        check_band(widget, y, height)?;
        self.video
            .copy_rect(self.backing, x, y - ST_Y, width, height, x, y);
        Ok(())
    }
}

/// Footprints must lie wholly inside the band.
fn check_band(widget: &'static str, y: i32, height: i32) -> Result<(), HudError> {
    let top = y - ST_Y;
    if top < 0 || top + height > ST_HEIGHT {
        return Err(HudError::OutOfBand { widget, y, height });
    }
    Ok(())
}

// ── Number ──

#[derive(Clone, Debug)]
pub struct NumberWidget {
    /// Right edge of the digits.
    x: i32,
    y: i32,
    digits: usize,
    source: NumberSource,
    flag: Flag,
    font: DigitFont,
    percent: Option<Rc<Glyph>>,
    minus: Option<Rc<Glyph>>,
    last: Option<Readout>,
}

impl NumberWidget {
    pub fn new(
        x: i32,
        y: i32,
        digits: usize,
        source: NumberSource,
        flag: Flag,
        font: DigitFont,
    ) -> Self {
        NumberWidget {
            x,
            y,
            digits,
            source,
            flag,
            font,
            percent: None,
            minus: None,
            last: None,
        }
    }

    /// Draw a percent sign at the anchor on full refreshes.
    pub fn with_percent(mut self, percent: Rc<Glyph>) -> Self {
        self.percent = Some(percent);
        self
    }

    pub fn with_minus(mut self, minus: Option<Rc<Glyph>>) -> Self {
        self.minus = minus;
        self
    }

    pub fn draw<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        if !values.enabled(self.flag) {
            return Ok(());
        }
        if refresh {
            if let Some(percent) = &self.percent {
                canvas.video.draw_glyph(self.x, self.y, percent);
            }
        }

        let readout = values.number(self.source);
        if !refresh && self.last == Some(readout) {
            return Ok(());
        }
        self.last = Some(readout);

        let w = self.font.width();
        let digits = self.digits as i32;
        canvas.erase("number", self.x - digits * w, self.y, digits * w, self.font.height())?;

        let Readout::Value(value) = readout else {
            return Ok(());
        };

        let negative = value < 0;
        let mut num = if negative {
            let limit = 10i32.pow(self.digits.saturating_sub(1) as u32) - 1;
            -value.max(-limit)
        } else {
            value
        };

        let mut x = self.x;
        if num == 0 {
            canvas.video.draw_glyph(x - w, self.y, self.font.digit(0));
        }
        let mut left = self.digits;
        while num != 0 && left > 0 {
            x -= w;
            canvas.video.draw_glyph(x, self.y, self.font.digit((num % 10) as u32));
            num /= 10;
            left -= 1;
        }

        if negative {
            if let Some(minus) = &self.minus {
                canvas.video.draw_glyph(x - MINUS_SPACING, self.y, minus);
            }
        }
        Ok(())
    }
}

// ── Fraction ──

/// Two three-digit numbers, current over maximum.
#[derive(Clone, Debug)]
pub struct FractionWidget {
    numerator: NumberWidget,
    denominator: NumberWidget,
}

impl FractionWidget {
    pub fn new(
        x: i32,
        y: i32,
        numerator: NumberSource,
        denominator: NumberSource,
        flag: Flag,
        font: DigitFont,
    ) -> Self {
        FractionWidget {
            numerator: NumberWidget::new(x, y, 3, numerator, flag, font.clone()),
            denominator: NumberWidget::new(x + FRACTION_SPACING, y, 3, denominator, flag, font),
        }
    }

    pub fn draw<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        self.numerator.draw(refresh, values, canvas)?;
        self.denominator.draw(refresh, values, canvas)
    }
}

// ── MultiIcon ──

#[derive(Clone, Debug)]
pub struct MultiIconWidget {
    x: i32,
    y: i32,
    icons: IconSet,
    source: IconSource,
    flag: Flag,
    last: Option<usize>,
}

impl MultiIconWidget {
    pub fn new(x: i32, y: i32, icons: IconSet, source: IconSource, flag: Flag) -> Self {
        MultiIconWidget {
            x,
            y,
            icons,
            source,
            flag,
            last: None,
        }
    }

    pub fn draw<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        if !values.enabled(self.flag) {
            return Ok(());
        }
        let Some(index) = values.icon(self.source) else {
            return Ok(());
        };
        if !refresh && self.last == Some(index) {
            return Ok(());
        }
        let Some(glyph) = self.icons.get(index) else {
            debug!("multi-icon at ({}, {}): index {index} out of range", self.x, self.y);
            return Ok(());
        };

        if let Some(old) = self.last.and_then(|i| self.icons.get(i)) {
            canvas.erase(
                "multi-icon",
                self.x - old.left_offset(),
                self.y - old.top_offset(),
                old.width(),
                old.height(),
            )?;
        }
        canvas.video.draw_glyph(self.x, self.y, glyph);
        self.last = Some(index);
        Ok(())
    }
}

// ── BinaryIcon ──

#[derive(Clone, Debug)]
pub struct BinaryIconWidget {
    x: i32,
    y: i32,
    glyph: Rc<Glyph>,
    source: SwitchSource,
    flag: Flag,
    last: bool,
}

impl BinaryIconWidget {
    pub fn new(x: i32, y: i32, glyph: Rc<Glyph>, source: SwitchSource, flag: Flag) -> Self {
        BinaryIconWidget {
            x,
            y,
            glyph,
            source,
            flag,
            last: false,
        }
    }

    pub fn draw<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        if !values.enabled(self.flag) {
            return Ok(());
        }
        let on = values.switch(self.source);
        if !refresh && self.last == on {
            return Ok(());
        }

        let g = &self.glyph;
        let (x, y) = (self.x - g.left_offset(), self.y - g.top_offset());
        check_band("binary-icon", y, g.height())?;
        if on {
            canvas.video.draw_glyph(self.x, self.y, g);
        } else {
            canvas.erase("binary-icon", x, y, g.width(), g.height())?;
        }
        self.last = on;
        Ok(())
    }
}

// ── Widget ──

#[derive(Clone, Debug)]
pub enum Widget {
    Number(NumberWidget),
    Fraction(FractionWidget),
    MultiIcon(MultiIconWidget),
    BinaryIcon(BinaryIconWidget),
}

impl Widget {
    pub fn draw<V: Video>(
        &mut self,
        refresh: bool,
        values: &impl WidgetValues,
        canvas: &mut Canvas<V>,
    ) -> Result<(), HudError> {
        match self {
            Widget::Number(w) => w.draw(refresh, values, canvas),
            Widget::Fraction(w) => w.draw(refresh, values, canvas),
            Widget::MultiIcon(w) => w.draw(refresh, values, canvas),
            Widget::BinaryIcon(w) => w.draw(refresh, values, canvas),
        }
    }
}

impl From<NumberWidget> for Widget {
    fn from(w: NumberWidget) -> Self {
        Widget::Number(w)
    }
}

impl From<FractionWidget> for Widget {
    fn from(w: FractionWidget) -> Self {
        Widget::Fraction(w)
    }
}

impl From<MultiIconWidget> for Widget {
    fn from(w: MultiIconWidget) -> Self {
        Widget::MultiIcon(w)
    }
}

impl From<BinaryIconWidget> for Widget {
    fn from(w: BinaryIconWidget) -> Self {
        Widget::BinaryIcon(w)
    }
}

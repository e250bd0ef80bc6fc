//! Screen tint selection: red on damage (or berserk), gold on pickups,
//! green while the radiation suit is on.

use crate::domain::player::{PlayerSnapshot, PowerType};
use crate::gfx::video::Video;

pub const NEUTRAL_PAL: usize = 0;
pub const START_RED_PALS: usize = 1;
pub const NUM_RED_PALS: usize = 8;
pub const START_BONUS_PALS: usize = 9;
pub const NUM_BONUS_PALS: usize = 4;
pub const RADIATION_PAL: usize = 13;

/// Remaining suit ticks above which the tint is steady; below it flickers.
pub const RADIATION_STEADY: i32 = 4 * 32;

/// Palette for the given counters. Pain dominates bonus, bonus dominates
/// radiation.
pub fn select_palette(damage_count: i32, strength: i32, bonus_count: i32, iron_feet: i32) -> usize {
    let mut count = damage_count;
    if strength != 0 {
        // Berserk fades out as the power counts up.
        let fade = 12 - (strength >> 6);
        count = count.max(fade);
    }

    if count > 0 {
        let step = ((count + 7) >> 3).min(NUM_RED_PALS as i32 - 1) as usize;
        START_RED_PALS + step
    } else if bonus_count > 0 {
        let step = ((bonus_count + 7) >> 3).min(NUM_BONUS_PALS as i32 - 1) as usize;
        START_BONUS_PALS + step
    } else if iron_feet > RADIATION_STEADY || iron_feet & 8 != 0 {
        RADIATION_PAL
    } else {
        NEUTRAL_PAL
    }
}

pub struct PaletteController {
    wanted: usize,
    /// Last palette pushed to the video service; `None` until the first.
    applied: Option<usize>,
}

impl PaletteController {
    pub fn new() -> Self {
        PaletteController {
            wanted: NEUTRAL_PAL,
            applied: None,
        }
    }

    /// Forget what was applied, so the next `apply` always pushes.
    pub fn reset(&mut self) {
        self.wanted = NEUTRAL_PAL;
        self.applied = None;
    }

    pub fn tick(&mut self, player: &PlayerSnapshot) {
        self.wanted = select_palette(
            player.damage_count,
            player.power(PowerType::Strength),
            player.bonus_count,
            player.power(PowerType::IronFeet),
        );
    }

    pub fn wanted(&self) -> usize {
        self.wanted
    }

    pub fn applied(&self) -> Option<usize> {
        self.applied
    }

    /// Push the wanted palette if it differs from the applied one.
    pub fn apply(&mut self, video: &mut impl Video) {
        if self.applied != Some(self.wanted) {
            video.set_palette(self.wanted);
            self.applied = Some(self.wanted);
        }
    }
}

impl Default for PaletteController {
    fn default() -> Self {
        Self::new()
    }
}

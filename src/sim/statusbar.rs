//! The status bar controller.
//!
//! Owns every piece of mutable HUD state: the widget set and its caches,
//! the face machine, the palette controller, the cheat book and the value
//! aggregate widgets read through. The host drives it through four calls:
//! `tick` once per logic step, `draw` once per frame, `handle_input` for
//! each key or automap signal, and `start`/`stop` around each level.

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::rc::Rc;

use crate::domain::cheat::{CheatBook, CheatKind};
use crate::domain::face::{Face, FaceInput, FaceMachine};
use crate::domain::mission::{music_for_params, warp_for_params, GameMode, Session, Skill};
use crate::domain::palette::{PaletteController, NEUTRAL_PAL};
use crate::domain::player::{
    AmmoType, Card, Cheats, PlayerSnapshot, PowerType, WeaponType, CHEAT_ARMOR,
    CHEAT_ARMOR_CLASS, GOD_MODE_HEALTH, NUM_AMMO, TICRATE,
};
use crate::error::HudError;
use crate::gfx::glyph::{DigitFont, FaceGlyphs, Glyph, GlyphRepository, IconSet};
use crate::gfx::video::{PixelBuffer, Video};
use crate::sim::event::{AutomapSignal, HudEffect, HudEvent, AM_MSG_HEADER};
use crate::sim::messages::*;
use crate::widget::registry::WidgetRegistry;
use crate::widget::{
    BinaryIconWidget, Canvas, Flag, FractionWidget, IconSource, MultiIconWidget, NumberSource,
    NumberWidget, Readout, SwitchSource, WidgetValues, ST_HEIGHT, ST_WIDTH, ST_Y,
};

pub const MESSAGE_TICS: i32 = 4 * TICRATE;

// ── Layout ──

const AMMO_X: i32 = 44;
const AMMO_Y: i32 = 171;
const AMMO_DIGITS: usize = 3;
const HEALTH_X: i32 = 90;
const HEALTH_Y: i32 = 171;
const ARMOR_X: i32 = 221;
const ARMOR_Y: i32 = 171;
const FRAGS_X: i32 = 138;
const FRAGS_Y: i32 = 171;
const FRAGS_DIGITS: usize = 2;
const ARMS_BG_X: i32 = 104;
const ARMS_BG_Y: i32 = 168;
const ARMS_X: i32 = 111;
const ARMS_Y: i32 = 172;
const ARMS_XSPACE: i32 = 12;
const ARMS_YSPACE: i32 = 10;
const NUM_ARMS: usize = 6;
const FACES_X: i32 = 143;
const FACES_Y: i32 = 168;
const FACE_BACK_X: i32 = 143;
const FACE_BACK_Y: i32 = 169;
const BAR_RIGHT_X: i32 = 104;
const KEY_X: i32 = 239;
const KEY_YS: [i32; 3] = [171, 181, 191];
const AMMO_FRACTION_X: i32 = 288;
/// Rows of the secondary ammo fractions, by ammo type.
const AMMO_FRACTION_YS: [(AmmoType, i32); NUM_AMMO] = [
    (AmmoType::Clip, 173),
    (AmmoType::Shell, 179),
    (AmmoType::Missile, 191),
    (AmmoType::Cell, 185),
];

// ── Values ──

/// Everything widgets read, refreshed at the end of each tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudValues {
    pub status_bar_on: bool,
    pub arms_on: bool,
    pub frags_on: bool,
    pub not_deathmatch: bool,
    pub current_ammo: Readout,
    pub health: i32,
    pub armor: i32,
    pub frags: i32,
    pub ammo: [i32; NUM_AMMO],
    pub max_ammo: [i32; NUM_AMMO],
    pub arms: [bool; NUM_ARMS],
    pub face: usize,
    pub key_boxes: [Option<usize>; 3],
}

impl HudValues {
    fn new(player: &PlayerSnapshot, session: &Session, face: usize) -> Self {
        let mut values = HudValues {
            status_bar_on: true,
            arms_on: false,
            frags_on: false,
            not_deathmatch: !session.deathmatch,
            current_ammo: Readout::Blank,
            health: 0,
            armor: 0,
            frags: 0,
            ammo: [0; NUM_AMMO],
            max_ammo: [0; NUM_AMMO],
            arms: [false; NUM_ARMS],
            face,
            key_boxes: [None; 3],
        };
        values.set_enables(true, session.deathmatch);
        values.copy_player(player, session);
        values
    }

    fn set_enables(&mut self, status_bar_on: bool, deathmatch: bool) {
        self.status_bar_on = status_bar_on;
        self.arms_on = status_bar_on && !deathmatch;
        self.frags_on = status_bar_on && deathmatch;
        self.not_deathmatch = !deathmatch;
    }

    fn copy_player(&mut self, player: &PlayerSnapshot, session: &Session) {
        self.current_ammo = match player.ready_weapon.ammo() {
            Some(ammo) => Readout::Value(player.ammo[ammo.index()]),
            None => Readout::Blank,
        };
        self.health = player.health;
        self.armor = player.armor_points;
        self.ammo = player.ammo;
        self.max_ammo = player.max_ammo;
        for (slot, owned) in self.arms.iter_mut().enumerate() {
            *owned = player.weapon_owned[slot + 1];
        }
        for (slot, key) in self.key_boxes.iter_mut().enumerate() {
            *key = if player.cards[slot + 3] {
                Some(slot + 3)
            } else if player.cards[slot] {
                Some(slot)
            } else {
                None
            };
        }
        self.frags = player
            .frags
            .iter()
            .enumerate()
            .map(|(i, &f)| if i == session.console_player { -f } else { f })
            .sum();
    }
}

impl WidgetValues for HudValues {
    fn enabled(&self, flag: Flag) -> bool {
        match flag {
            Flag::StatusBar => self.status_bar_on,
            Flag::Arms => self.arms_on,
            Flag::Frags => self.frags_on,
        }
    }

    fn number(&self, source: NumberSource) -> Readout {
        match source {
            NumberSource::CurrentAmmo => self.current_ammo,
            NumberSource::Health => Readout::Value(self.health),
            NumberSource::Armor => Readout::Value(self.armor),
            NumberSource::Frags => Readout::Value(self.frags),
            NumberSource::Ammo(i) => self.ammo.get(i).map_or(Readout::Blank, |&n| Readout::Value(n)),
            NumberSource::MaxAmmo(i) => {
                self.max_ammo.get(i).map_or(Readout::Blank, |&n| Readout::Value(n))
            }
        }
    }

    fn icon(&self, source: IconSource) -> Option<usize> {
        match source {
            IconSource::Weapon(slot) => self.arms.get(slot).map(|&owned| usize::from(owned)),
            IconSource::Face => Some(self.face),
            IconSource::KeyBox(slot) => self.key_boxes.get(slot).copied().flatten(),
        }
    }

    fn switch(&self, source: SwitchSource) -> bool {
        match source {
            SwitchSource::ArmsBackground => self.not_deathmatch,
        }
    }
}

// ── Assets ──

struct Assets {
    tall: DigitFont,
    short: DigitFont,
    percent: Rc<Glyph>,
    minus: Option<Rc<Glyph>>,
    keys: IconSet,
    arms_bg: Rc<Glyph>,
    arms: Vec<IconSet>,
    faces: FaceGlyphs,
    background: Rc<Glyph>,
    background_right: Option<Rc<Glyph>>,
    face_back: Option<Rc<Glyph>>,
}

impl Assets {
    fn load(repo: &impl GlyphRepository, console_player: usize) -> Result<Self, HudError> {
        let tall = DigitFont::load(repo, "STTNUM")?;
        let short = DigitFont::load(repo, "STYSNUM")?;
        let keys: Vec<String> = (0..6).map(|i| format!("STKEYS{i}")).collect();
        let arms = (0..NUM_ARMS)
            .map(|i| {
                Ok(IconSet::new(vec![
                    repo.require(&format!("STGNUM{}", i + 2))?,
                    short.digit_rc(i as u32 + 2),
                ]))
            })
            .collect::<Result<Vec<_>, HudError>>()?;
        Ok(Assets {
            percent: repo.require("STTPRCNT")?,
            minus: repo.glyph("STTMINUS"),
            keys: IconSet::load(repo, &keys)?,
            arms_bg: repo.require("STARMS")?,
            arms,
            faces: FaceGlyphs::load(repo)?,
            background: repo.require("STBAR")?,
            background_right: repo.glyph("STMBARR"),
            face_back: repo.glyph(&format!("STFB{console_player}")),
            tall,
            short,
        })
    }
}

// ── Controller ──

pub struct StatusBar {
    session: Session,
    cheats_enabled: bool,
    assets: Assets,
    started: bool,
    /// Next draw is a full refresh.
    first_time: bool,
    automap_active: bool,
    backing: Option<PixelBuffer>,
    widgets: WidgetRegistry,
    values: HudValues,
    face: FaceMachine,
    palette: PaletteController,
    cheats: CheatBook,
    message: Option<String>,
    message_timer: i32,
    effects: Vec<HudEffect>,
    rng: StdRng,
    clock: u32,
}

impl StatusBar {
    /// Load every glyph the bar needs. Fails if a required one is missing.
    pub fn new(
        repo: &impl GlyphRepository,
        session: Session,
        cheats_enabled: bool,
    ) -> Result<Self, HudError> {
        let assets = Assets::load(repo, session.console_player)?;
        let player = PlayerSnapshot::new();
        let face = FaceMachine::new(&player.weapon_owned);
        Ok(StatusBar {
            session,
            cheats_enabled,
            assets,
            started: false,
            first_time: true,
            automap_active: false,
            backing: None,
            widgets: WidgetRegistry::new(),
            values: HudValues::new(&player, &session, face.index()),
            face,
            palette: PaletteController::new(),
            cheats: CheatBook::new(),
            message: None,
            message_timer: 0,
            effects: Vec::new(),
            rng: StdRng::from_entropy(),
            clock: 0,
        })
    }

    /// Fix the idle-face randomness.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Begin a level (or a new life) for `player`. Restarts if running.
    pub fn start(&mut self, video: &mut impl Video, player: &PlayerSnapshot) {
        if self.started {
            self.stop(video);
        }
        self.backing = Some(PixelBuffer::new(ST_WIDTH, ST_HEIGHT));
        self.first_time = true;
        self.clock = 0;
        self.face.reset(&player.weapon_owned);
        self.palette.reset();
        self.cheats.reset();
        self.values = HudValues::new(player, &self.session, self.face.index());
        self.create_widgets();
        self.started = true;
        info!(
            "status bar started ({} widgets, {:?} {:?})",
            self.widgets.len(),
            self.session.mission,
            self.session.mode
        );
    }

    /// Tear down and put the neutral palette back. No-op when stopped.
    pub fn stop(&mut self, video: &mut impl Video) {
        if !self.started {
            return;
        }
        video.set_palette(NEUTRAL_PAL);
        self.widgets.clear();
        self.backing = None;
        self.started = false;
        info!("status bar stopped");
    }

    fn create_widgets(&mut self) {
        let a = &self.assets;
        let w = &mut self.widgets;
        w.clear();

        w.push(
            "ammo",
            NumberWidget::new(
                AMMO_X,
                AMMO_Y,
                AMMO_DIGITS,
                NumberSource::CurrentAmmo,
                Flag::StatusBar,
                a.tall.clone(),
            ),
        );
        for (ammo, y) in AMMO_FRACTION_YS {
            let tag = match ammo {
                AmmoType::Clip => "ammo_clip",
                AmmoType::Shell => "ammo_shell",
                AmmoType::Missile => "ammo_missile",
                AmmoType::Cell => "ammo_cell",
            };
            w.push(
                tag,
                FractionWidget::new(
                    AMMO_FRACTION_X,
                    y,
                    NumberSource::Ammo(ammo.index()),
                    NumberSource::MaxAmmo(ammo.index()),
                    Flag::StatusBar,
                    a.short.clone(),
                ),
            );
        }
        w.push(
            "health",
            NumberWidget::new(HEALTH_X, HEALTH_Y, 3, NumberSource::Health, Flag::StatusBar, a.tall.clone())
                .with_percent(Rc::clone(&a.percent))
                .with_minus(a.minus.clone()),
        );
        w.push(
            "armor",
            NumberWidget::new(ARMOR_X, ARMOR_Y, 3, NumberSource::Armor, Flag::StatusBar, a.tall.clone())
                .with_percent(Rc::clone(&a.percent))
                .with_minus(a.minus.clone()),
        );
        w.push(
            "arms_bg",
            BinaryIconWidget::new(
                ARMS_BG_X,
                ARMS_BG_Y,
                Rc::clone(&a.arms_bg),
                SwitchSource::ArmsBackground,
                Flag::StatusBar,
            ),
        );
        const ARMS_TAGS: [&str; NUM_ARMS] = ["arms2", "arms3", "arms4", "arms5", "arms6", "arms7"];
        for (i, icons) in a.arms.iter().enumerate() {
            let x = ARMS_X + (i as i32 % 3) * ARMS_XSPACE;
            let y = ARMS_Y + (i as i32 / 3) * ARMS_YSPACE;
            w.push(
                ARMS_TAGS[i],
                MultiIconWidget::new(x, y, icons.clone(), IconSource::Weapon(i), Flag::Arms),
            );
        }
        w.push(
            "face",
            MultiIconWidget::new(
                FACES_X,
                FACES_Y,
                a.faces.icons().clone(),
                IconSource::Face,
                Flag::StatusBar,
            ),
        );
        const KEY_TAGS: [&str; 3] = ["key0", "key1", "key2"];
        for (slot, y) in KEY_YS.iter().enumerate() {
            w.push(
                KEY_TAGS[slot],
                MultiIconWidget::new(KEY_X, *y, a.keys.clone(), IconSource::KeyBox(slot), Flag::StatusBar),
            );
        }
        w.push(
            "frags",
            NumberWidget::new(
                FRAGS_X,
                FRAGS_Y,
                FRAGS_DIGITS,
                NumberSource::Frags,
                Flag::Frags,
                a.tall.clone(),
            )
            .with_minus(a.minus.clone()),
        );
    }

    // ── Tick ──

    /// Advance one logic step from `player`.
    pub fn tick(&mut self, player: &PlayerSnapshot) {
        if !self.started {
            return;
        }
        self.clock = self.clock.wrapping_add(1);
        let random: u8 = self.rng.gen();

        self.face.tick(&FaceInput::from_player(player, random));
        self.palette.tick(player);

        let on = self.values.status_bar_on;
        self.values.set_enables(on, self.session.deathmatch);
        self.values.copy_player(player, &self.session);
        self.values.face = self.face.index();

        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }
        trace!(
            "tick {}: face {:?} palette {}",
            self.clock,
            self.face.face(),
            self.palette.wanted()
        );
    }

    // ── Draw ──

    /// Render the bar. `fullscreen` hides it unless the automap is up;
    /// `refresh` forces every widget to redraw.
    pub fn draw(
        &mut self,
        video: &mut impl Video,
        fullscreen: bool,
        refresh: bool,
    ) -> Result<(), HudError> {
        if !self.started {
            return Err(HudError::NotStarted);
        }
        let on = !fullscreen || self.automap_active;
        if on != self.values.status_bar_on {
            self.first_time = true;
        }
        self.values.set_enables(on, self.session.deathmatch);
        self.first_time |= refresh;

        self.palette.apply(video);

        let full = self.first_time;
        if full {
            self.first_time = false;
            self.refresh_background(video)?;
        }

        let backing = self.backing.as_ref().ok_or(HudError::NotStarted)?;
        let mut canvas = Canvas::new(video, backing);
        self.widgets.draw_all(full, &self.values, &mut canvas)
    }

    /// Paint the background into the backing band and copy it on screen.
    fn refresh_background(&mut self, video: &mut impl Video) -> Result<(), HudError> {
        if !self.values.status_bar_on {
            return Ok(());
        }
        let backing = self.backing.as_mut().ok_or(HudError::NotStarted)?;
        let a = &self.assets;
        backing.fill(0);
        backing.draw_glyph(0, 0, &a.background);
        if let Some(right) = &a.background_right {
            backing.draw_glyph(BAR_RIGHT_X, 0, right);
        }
        if self.session.netgame {
            if let Some(back) = &a.face_back {
                backing.draw_glyph(FACE_BACK_X, FACE_BACK_Y - ST_Y, back);
            }
        }
        video.copy_rect(backing, 0, 0, ST_WIDTH, ST_HEIGHT, 0, ST_Y);
        Ok(())
    }

    // ── Input ──

    /// Feed one event. Returns `true` when a cheat took effect.
    pub fn handle_input(&mut self, event: HudEvent, player: &mut PlayerSnapshot) -> bool {
        match event {
            HudEvent::Automap(code) => {
                if code & 0xffff_0000 != AM_MSG_HEADER {
                    return false;
                }
                match AutomapSignal::decode(code) {
                    Some(AutomapSignal::Entered) => {
                        debug!("automap entered");
                        self.automap_active = true;
                        self.first_time = true;
                    }
                    Some(AutomapSignal::Exited) => {
                        debug!("automap exited");
                        self.automap_active = false;
                        self.first_time = true;
                    }
                    None => debug!("malformed automap signal {code:#010x}"),
                }
                false
            }
            HudEvent::KeyDown(key) => {
                if !self.cheats_enabled {
                    return false;
                }
                let mut applied = false;
                for (kind, params) in self.cheats.feed(key) {
                    applied |= self.apply_cheat(kind, &params, player);
                }
                applied
            }
        }
    }

    fn cheat_allowed(&self, kind: CheatKind) -> bool {
        let s = &self.session;
        match kind {
            CheatKind::LevelWarp => !s.netgame,
            CheatKind::NoClip if s.mode == GameMode::Commercial => false,
            CheatKind::NoClipCommercial if s.mode != GameMode::Commercial => false,
            _ => !s.netgame && s.skill != Skill::Nightmare,
        }
    }

    fn apply_cheat(&mut self, kind: CheatKind, params: &[char], player: &mut PlayerSnapshot) -> bool {
        if !self.cheat_allowed(kind) {
            debug!("cheat {kind:?} not allowed in this session");
            return false;
        }
        match kind {
            CheatKind::God => {
                player.cheats.toggle(Cheats::GOD_MODE);
                if player.cheats.contains(Cheats::GOD_MODE) {
                    player.health = GOD_MODE_HEALTH;
                    self.set_message(player, STSTR_DQDON);
                } else {
                    self.set_message(player, STSTR_DQDOFF);
                }
            }
            CheatKind::AmmoNoKeys => {
                give_arsenal(player);
                self.set_message(player, STSTR_FAADDED);
            }
            CheatKind::AmmoAndKeys => {
                give_arsenal(player);
                player.cards = [true; Card::ALL.len()];
                self.set_message(player, STSTR_KFAADDED);
            }
            CheatKind::Music => match music_for_params(self.session.mode, params) {
                Some(track) => {
                    self.effects.push(HudEffect::ChangeMusic(track));
                    self.set_message(player, STSTR_MUS);
                }
                None => {
                    debug!("idmus: bad selection {params:?}");
                    self.set_message(player, STSTR_NOMUS);
                    return false;
                }
            },
            CheatKind::NoClip | CheatKind::NoClipCommercial => {
                player.cheats.toggle(Cheats::NO_CLIP);
                if player.cheats.contains(Cheats::NO_CLIP) {
                    self.set_message(player, STSTR_NCON);
                } else {
                    self.set_message(player, STSTR_NCOFF);
                }
            }
            CheatKind::Power(power) => {
                if !player.has_power(power) {
                    player.give_power(power);
                } else if power != PowerType::Strength {
                    player.powers[power.index()] = 1;
                } else {
                    player.powers[power.index()] = 0;
                }
                self.set_message(player, STSTR_BEHOLDX);
            }
            CheatKind::PowerMenu => self.set_message(player, STSTR_BEHOLD),
            CheatKind::Choppers => {
                player.weapon_owned[WeaponType::Chainsaw.index()] = true;
                player.powers[PowerType::Invulnerability.index()] = 1;
                self.set_message(player, STSTR_CHOPPERS);
            }
            CheatKind::MyPos => {
                let text = my_pos(player.angle.0, player.x, player.y);
                self.set_message(player, &text);
            }
            CheatKind::LevelWarp => {
                let Some((episode, map)) =
                    warp_for_params(self.session.mission, self.session.mode, params)
                else {
                    debug!("idclev: no such level {params:?}");
                    return false;
                };
                self.effects.push(HudEffect::WarpLevel {
                    skill: self.session.skill,
                    episode,
                    map,
                });
                self.set_message(player, STSTR_CLEV);
            }
        }
        info!("cheat {kind:?} applied");
        true
    }

    fn set_message(&mut self, player: &mut PlayerSnapshot, text: &str) {
        player.message = Some(text.to_string());
        self.message = Some(text.to_string());
        self.message_timer = MESSAGE_TICS;
    }

    // ── Accessors ──

    /// Drain queued host effects.
    pub fn take_effects(&mut self) -> Vec<HudEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn values(&self) -> &HudValues {
        &self.values
    }

    pub fn face(&self) -> Face {
        self.face.face()
    }

    /// Palette the bar wants on screen.
    pub fn palette(&self) -> usize {
        self.palette.wanted()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn automap_active(&self) -> bool {
        self.automap_active
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }
}

/// Every weapon, full ammo, and heavy armor.
fn give_arsenal(player: &mut PlayerSnapshot) {
    player.armor_points = CHEAT_ARMOR;
    player.armor_type = CHEAT_ARMOR_CLASS;
    player.weapon_owned = [true; WeaponType::ALL.len()];
    player.ammo = player.max_ammo;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::mission::{GameMission, MusicTrack};
    use crate::domain::player::Attacker;
    use crate::gfx::glyph::GlyphBank;
    use crate::gfx::video::testing::{RecordingVideo, VideoCall};
    use crate::sim::event::{AM_MSG_ENTERED, AM_MSG_EXITED};
    use crate::ui::glyphs::builtin_glyphs;

    fn session() -> Session {
        Session::default()
    }

    fn bar_with(session: Session) -> StatusBar {
        StatusBar::new(&builtin_glyphs(), session, true).unwrap().with_seed(7)
    }

    fn started(session: Session) -> (StatusBar, RecordingVideo, PlayerSnapshot) {
        let mut bar = bar_with(session);
        let mut video = RecordingVideo::new();
        let player = PlayerSnapshot::new();
        bar.start(&mut video, &player);
        (bar, video, player)
    }

    fn type_keys(bar: &mut StatusBar, player: &mut PlayerSnapshot, keys: &str) -> bool {
        let mut applied = false;
        for c in keys.chars() {
            applied |= bar.handle_input(HudEvent::KeyDown(c), player);
        }
        applied
    }

    fn full_band_copy() -> VideoCall {
        VideoCall::Copy { x: 0, y: ST_Y, width: ST_WIDTH, height: ST_HEIGHT }
    }

    // ── Lifecycle ──

    #[test]
    fn missing_required_glyph_fails_load() {
        let mut bank: GlyphBank = builtin_glyphs();
        bank.remove("STBAR");
        let err = StatusBar::new(&bank, session(), true).err();
        assert_eq!(err, Some(HudError::MissingGlyph { name: "STBAR".into() }));
    }

    #[test]
    fn optional_glyphs_may_be_absent() {
        let mut bank: GlyphBank = builtin_glyphs();
        bank.remove("STMBARR");
        bank.remove("STTMINUS");
        bank.remove("STFB0");
        assert!(StatusBar::new(&bank, session(), true).is_ok());
    }

    #[test]
    fn draw_before_start_is_an_error() {
        let mut bar = bar_with(session());
        let mut video = RecordingVideo::new();
        assert_eq!(bar.draw(&mut video, false, false), Err(HudError::NotStarted));
    }

    #[test]
    fn start_builds_widget_set() {
        let (bar, _, _) = started(session());
        assert!(bar.is_started());
        assert_eq!(bar.widget_count(), 19);
    }

    #[test]
    fn start_while_running_restarts() {
        let (mut bar, mut video, player) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        video.take();
        bar.start(&mut video, &player);
        assert_eq!(video.take(), vec![VideoCall::Palette(0)]);
        assert_eq!(bar.widget_count(), 19);
        bar.draw(&mut video, false, false).unwrap();
        assert!(video.calls.contains(&full_band_copy()));
    }

    #[test]
    fn stop_restores_neutral_palette() {
        let (mut bar, mut video, mut player) = started(session());
        player.damage_count = 30;
        bar.tick(&player);
        bar.draw(&mut video, false, false).unwrap();
        assert_eq!(video.palettes(), vec![5]);
        video.take();
        bar.stop(&mut video);
        assert_eq!(video.take(), vec![VideoCall::Palette(0)]);
        assert!(!bar.is_started());
        bar.stop(&mut video);
        assert!(video.calls.is_empty());
    }

    // ── Drawing ──

    #[test]
    fn first_draw_is_full_refresh() {
        let (mut bar, mut video, _) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        assert_eq!(video.calls[0], VideoCall::Palette(0));
        assert_eq!(video.calls[1], full_band_copy());
        let names = video.glyph_names();
        assert!(names.contains(&"STTPRCNT"));
        assert!(names.contains(&"STARMS"));
        assert!(names.contains(&"STFST00") || names.contains(&"STFST01") || names.contains(&"STFST02"));
    }

    #[test]
    fn second_draw_without_tick_is_silent() {
        let (mut bar, mut video, player) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        bar.tick(&player);
        bar.draw(&mut video, false, false).unwrap();
        video.take();
        bar.draw(&mut video, false, false).unwrap();
        assert!(video.calls.is_empty());
    }

    #[test]
    fn forced_refresh_redraws_everything() {
        let (mut bar, mut video, _) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        let first = video.take();
        let first_names: Vec<String> = first
            .iter()
            .filter_map(|c| match c {
                VideoCall::Glyph { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect();
        bar.draw(&mut video, false, true).unwrap();
        assert_eq!(video.calls[0], full_band_copy());
        let again: Vec<String> = video.glyph_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(first_names, again);
    }

    #[test]
    fn changed_value_redraws_only_that_widget() {
        let (mut bar, mut video, mut player) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        bar.tick(&player);
        bar.draw(&mut video, false, false).unwrap();
        video.take();

        player.armor_points = 50;
        bar.values.copy_player(&player, &session());
        bar.draw(&mut video, false, false).unwrap();
        let calls = video.take();
        assert_eq!(
            calls,
            vec![
                VideoCall::Copy { x: ARMOR_X - 42, y: ARMOR_Y, width: 42, height: 16 },
                VideoCall::Glyph { x: ARMOR_X - 14, y: ARMOR_Y, name: "STTNUM0".into() },
                VideoCall::Glyph { x: ARMOR_X - 28, y: ARMOR_Y, name: "STTNUM5".into() },
            ]
        );
    }

    #[test]
    fn fullscreen_hides_bar_until_automap() {
        let (mut bar, mut video, mut player) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        video.take();

        bar.draw(&mut video, true, false).unwrap();
        assert!(video.take().is_empty());

        bar.handle_input(HudEvent::Automap(AM_MSG_ENTERED), &mut player);
        assert!(bar.automap_active());
        bar.draw(&mut video, true, false).unwrap();
        assert!(video.take().contains(&full_band_copy()));

        bar.handle_input(HudEvent::Automap(AM_MSG_EXITED), &mut player);
        bar.draw(&mut video, true, false).unwrap();
        assert!(video.take().is_empty());
    }

    #[test]
    fn malformed_automap_signal_is_ignored() {
        let (mut bar, mut video, mut player) = started(session());
        bar.draw(&mut video, false, false).unwrap();
        video.take();
        assert!(!bar.handle_input(HudEvent::Automap(AM_MSG_ENTERED | 0x11), &mut player));
        assert!(!bar.handle_input(HudEvent::Automap(0x1234_6500), &mut player));
        assert!(!bar.automap_active());
        bar.draw(&mut video, false, false).unwrap();
        assert!(video.calls.is_empty());
    }

    // ── Derived values ──

    #[test]
    fn melee_weapon_blanks_ammo() {
        let (mut bar, _, mut player) = started(session());
        assert_eq!(bar.values().current_ammo, Readout::Value(50));
        player.ready_weapon = WeaponType::Fist;
        bar.tick(&player);
        assert_eq!(bar.values().current_ammo, Readout::Blank);
    }

    #[test]
    fn skull_keys_override_cards() {
        let (mut bar, _, mut player) = started(session());
        player.cards[Card::BlueCard.index()] = true;
        player.cards[Card::BlueSkull.index()] = true;
        player.cards[Card::YellowCard.index()] = true;
        bar.tick(&player);
        assert_eq!(bar.values().key_boxes, [Some(3), Some(1), None]);
    }

    #[test]
    fn frags_subtract_suicides() {
        let (mut bar, _, mut player) = started(session());
        player.frags = [1, 3, 2, 0];
        bar.tick(&player);
        assert_eq!(bar.values().frags, 4);
    }

    #[test]
    fn deathmatch_swaps_arms_for_frags() {
        let dm = Session { deathmatch: true, netgame: true, ..session() };
        let (mut bar, mut video, player) = started(dm);
        bar.tick(&player);
        assert!(!bar.values().arms_on);
        assert!(bar.values().frags_on);
        assert!(!bar.values().not_deathmatch);
        bar.draw(&mut video, false, false).unwrap();
        let names = video.glyph_names();
        assert!(!names.contains(&"STARMS"));
        assert!(!names.iter().any(|n| n.starts_with("STGNUM")));
    }

    #[test]
    fn dead_player_shows_dead_face() {
        let (mut bar, _, mut player) = started(session());
        player.health = 0;
        player.damage_count = 20;
        player.attacker = Some(Attacker::Other { x: 0, y: 100 });
        bar.tick(&player);
        assert_eq!(bar.face(), Face::Dead);
        assert_eq!(bar.values().face, 41);
    }

    #[test]
    fn palette_follows_damage() {
        let (mut bar, mut video, mut player) = started(session());
        player.damage_count = 200;
        bar.tick(&player);
        bar.draw(&mut video, false, false).unwrap();
        assert_eq!(video.palettes(), vec![8]);
    }

    #[test]
    fn tick_before_start_is_ignored() {
        let mut bar = bar_with(session());
        bar.tick(&PlayerSnapshot::new());
        assert_eq!(bar.clock, 0);
    }

    // ── Cheats ──

    #[test]
    fn iddqd_toggles_god_mode() {
        let (mut bar, _, mut player) = started(session());
        assert!(type_keys(&mut bar, &mut player, "iddqd"));
        assert!(player.cheats.contains(Cheats::GOD_MODE));
        assert_eq!(player.health, 200);
        assert_eq!(bar.message(), Some(STSTR_DQDON));

        type_keys(&mut bar, &mut player, "iddqd");
        assert!(!player.cheats.contains(Cheats::GOD_MODE));
        assert_eq!(bar.message(), Some(STSTR_DQDOFF));
    }

    #[test]
    fn broken_prefix_still_recognised() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idd");
        type_keys(&mut bar, &mut player, "qx");
        type_keys(&mut bar, &mut player, "iddqd");
        assert!(player.cheats.contains(Cheats::GOD_MODE));
    }

    #[test]
    fn cheats_blocked_in_nightmare_and_netgames() {
        let nightmare = Session { skill: Skill::Nightmare, ..session() };
        let (mut bar, _, mut player) = started(nightmare);
        assert!(!type_keys(&mut bar, &mut player, "iddqd"));
        assert!(!player.cheats.contains(Cheats::GOD_MODE));
        // Warping is still fine at nightmare.
        assert!(type_keys(&mut bar, &mut player, "idclev21"));

        let net = Session { netgame: true, ..session() };
        let (mut bar, _, mut player) = started(net);
        assert!(!type_keys(&mut bar, &mut player, "idclev21"));
        assert!(bar.take_effects().is_empty());
    }

    #[test]
    fn cheats_can_be_switched_off() {
        let mut bar = StatusBar::new(&builtin_glyphs(), session(), false).unwrap();
        let mut player = PlayerSnapshot::new();
        assert!(!type_keys(&mut bar, &mut player, "idkfa"));
        assert!(!player.cards[0]);
    }

    #[test]
    fn idkfa_gives_everything() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idkfa");
        assert_eq!(player.armor_points, 200);
        assert_eq!(player.armor_type, 2);
        assert!(player.weapon_owned.iter().all(|&w| w));
        assert_eq!(player.ammo, player.max_ammo);
        assert!(player.cards.iter().all(|&c| c));
        assert_eq!(bar.message(), Some(STSTR_KFAADDED));
    }

    #[test]
    fn idfa_leaves_keys() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idfa");
        assert!(player.cards.iter().all(|&c| !c));
        assert_eq!(bar.message(), Some(STSTR_FAADDED));
    }

    #[test]
    fn invalid_warp_is_silently_rejected() {
        let (mut bar, _, mut player) = started(session());
        assert!(!type_keys(&mut bar, &mut player, "idclev99"));
        assert!(bar.take_effects().is_empty());
        assert_eq!(bar.message(), None);

        assert!(type_keys(&mut bar, &mut player, "idclev11"));
        assert_eq!(
            bar.take_effects(),
            vec![HudEffect::WarpLevel { skill: Skill::Medium, episode: 1, map: 1 }]
        );
        assert_eq!(bar.message(), Some(STSTR_CLEV));
        assert!(bar.take_effects().is_empty());
    }

    #[test]
    fn music_change_and_bad_selection() {
        let (mut bar, _, mut player) = started(session());
        assert!(type_keys(&mut bar, &mut player, "idmus12"));
        assert_eq!(bar.take_effects(), vec![HudEffect::ChangeMusic(MusicTrack(1))]);

        assert!(!type_keys(&mut bar, &mut player, "idmus1x"));
        assert!(bar.take_effects().is_empty());
        assert_eq!(bar.message(), Some(STSTR_NOMUS));
    }

    #[test]
    fn noclip_spelling_depends_on_mode() {
        let (mut bar, _, mut player) = started(session());
        assert!(!type_keys(&mut bar, &mut player, "idclip"));
        assert!(type_keys(&mut bar, &mut player, "idspispopd"));
        assert!(player.cheats.contains(Cheats::NO_CLIP));

        let doom2 = Session {
            mission: GameMission::Doom2,
            mode: GameMode::Commercial,
            ..session()
        };
        let (mut bar, _, mut player) = started(doom2);
        assert!(type_keys(&mut bar, &mut player, "idclip"));
        assert!(player.cheats.contains(Cheats::NO_CLIP));
        assert_eq!(bar.message(), Some(STSTR_NCON));
    }

    #[test]
    fn behold_toggles_powers() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idbehold");
        assert_eq!(bar.message(), Some(STSTR_BEHOLD));
        type_keys(&mut bar, &mut player, "r");
        assert!(player.has_power(PowerType::IronFeet));
        assert_eq!(bar.message(), Some(STSTR_BEHOLDX));
        type_keys(&mut bar, &mut player, "idbeholdr");
        assert_eq!(player.power(PowerType::IronFeet), 1);

        type_keys(&mut bar, &mut player, "idbeholds");
        assert!(player.has_power(PowerType::Strength));
        type_keys(&mut bar, &mut player, "idbeholds");
        assert!(!player.has_power(PowerType::Strength));
    }

    #[test]
    fn choppers_and_mypos() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idchoppers");
        assert!(player.owns(WeaponType::Chainsaw));
        assert_eq!(player.power(PowerType::Invulnerability), 1);

        player.x = 0x20_0000;
        player.y = 0x10_0000;
        type_keys(&mut bar, &mut player, "idmypos");
        assert_eq!(bar.message(), Some("ang=0x0;x,y=(0x200000,0x100000)"));
    }

    #[test]
    fn message_expires() {
        let (mut bar, _, mut player) = started(session());
        type_keys(&mut bar, &mut player, "idbehold");
        for _ in 0..MESSAGE_TICS - 1 {
            bar.tick(&player);
        }
        assert!(bar.message().is_some());
        bar.tick(&player);
        assert_eq!(bar.message(), None);
    }
}

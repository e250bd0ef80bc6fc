//! Demo host: a scripted player driving the status bar in a terminal.

use std::fs::File;
use std::time::{Duration, Instant};

use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use statusbar::config::HudConfig;
use statusbar::domain::player::{
    Attacker, Cheats, PlayerSnapshot, PowerType, WeaponType, FRACUNIT,
};
use statusbar::gfx::video::{Screen, SCREEN_HEIGHT, SCREEN_WIDTH};
use statusbar::sim::event::{AutomapSignal, HudEffect, HudEvent};
use statusbar::sim::statusbar::StatusBar;
use statusbar::ui::glyphs::builtin_glyphs;
use statusbar::ui::input::{HostAction, InputState};
use statusbar::ui::renderer::{Overlay, Renderer};
use statusbar::widget::ST_Y;

const HELP: &str = "F1 hit  F2 self  F3 weapon  F4 suit  F5 berserk  F6 full  F7 next  \
                    F8 respawn  Tab map  Space fire  Esc quit  (type cheats)";
/// Damage and bonus increments for scripted events.
const MONSTER_DAMAGE: i32 = 15;
const SELF_DAMAGE: i32 = 10;
const BONUS_ADD: i32 = 6;
/// Ticks between shots while fire is held.
const REFIRE_TICS: u32 = 8;

fn init_logging(config: &HudConfig) {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log.level.as_str()),
    );
    builder.format_timestamp_millis();
    // The terminal is in raw alternate-screen mode, so logs go to a file.
    match File::create(&config.log.file) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(e) => {
            eprintln!("could not open {}: {e}", config.log.file.display());
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    let _ = builder.try_init();
}

fn main() {
    let config = HudConfig::load();
    init_logging(&config);
    info!("session {:?}", config.session());

    let mut bar = match StatusBar::new(&builtin_glyphs(), config.session(), config.cheats_enabled) {
        Ok(bar) => bar,
        Err(e) => {
            error!("status bar load failed: {e}");
            eprintln!("status bar load failed: {e}");
            std::process::exit(1);
        }
    };

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let result = run(&mut bar, &mut renderer, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        error!("fatal: {e}");
        eprintln!("fatal: {e}");
        std::process::exit(1);
    }
}

// ── Scripted player ──

struct Demo {
    player: PlayerSnapshot,
    fullscreen: bool,
    automap: bool,
    fire_clock: u32,
    level: (u8, u8),
    music: Option<u8>,
    rng: StdRng,
}

impl Demo {
    fn new() -> Self {
        Demo {
            player: PlayerSnapshot::new(),
            fullscreen: false,
            automap: false,
            fire_clock: 0,
            level: (1, 1),
            music: None,
            rng: StdRng::from_entropy(),
        }
    }

    fn hurt(&mut self, amount: i32, attacker: Attacker) {
        let p = &mut self.player;
        if p.health <= 0 {
            return;
        }
        p.attacker = Some(attacker);
        p.damage_count = (p.damage_count + amount).min(100);
        if !p.is_invulnerable() {
            p.health = (p.health - amount).max(0);
        }
    }

    fn monster_position(&mut self) -> Attacker {
        let theta: f64 = self.rng.gen_range(0.0..std::f64::consts::TAU);
        let dist = f64::from(256 * FRACUNIT);
        Attacker::Other {
            x: self.player.x + (theta.cos() * dist) as i32,
            y: self.player.y + (theta.sin() * dist) as i32,
        }
    }

    /// Returns `true` when the HUD needs a restart.
    fn apply(&mut self, action: HostAction, bar: &mut StatusBar) -> bool {
        match action {
            HostAction::MonsterHit => {
                let from = self.monster_position();
                self.hurt(MONSTER_DAMAGE, from);
            }
            HostAction::SelfDamage => self.hurt(SELF_DAMAGE, Attacker::Player),
            HostAction::WeaponPickup => {
                let p = &mut self.player;
                if let Some(w) = WeaponType::ALL.iter().find(|w| !p.owns(**w)) {
                    p.weapon_owned[w.index()] = true;
                    p.bonus_count += BONUS_ADD;
                    if let Some(ammo) = w.ammo() {
                        let max = p.max_ammo[ammo.index()];
                        p.ammo[ammo.index()] = (p.ammo[ammo.index()] + 20).min(max);
                    }
                }
            }
            HostAction::RadSuit => {
                self.player.give_power(PowerType::IronFeet);
                self.player.bonus_count += BONUS_ADD;
            }
            HostAction::Berserk => {
                self.player.give_power(PowerType::Strength);
                self.player.bonus_count += BONUS_ADD;
            }
            HostAction::ToggleFullscreen => self.fullscreen = !self.fullscreen,
            HostAction::CycleWeapon => {
                let p = &mut self.player;
                let current = p.ready_weapon.index();
                let n = WeaponType::ALL.len();
                if let Some(next) = (1..n)
                    .map(|i| WeaponType::ALL[(current + i) % n])
                    .find(|w| p.owns(*w))
                {
                    p.ready_weapon = next;
                }
            }
            HostAction::ToggleAutomap => {
                self.automap = !self.automap;
                let signal = if self.automap {
                    AutomapSignal::Entered
                } else {
                    AutomapSignal::Exited
                };
                bar.handle_input(HudEvent::Automap(signal.code()), &mut self.player);
            }
            HostAction::Respawn => {
                self.player = PlayerSnapshot::new();
                return true;
            }
            HostAction::Quit => {}
        }
        false
    }

    fn tick(&mut self, fire_held: bool) {
        let p = &mut self.player;
        p.attack_down = fire_held && p.health > 0;
        if p.attack_down {
            if self.fire_clock % REFIRE_TICS == 0 {
                if let Some(ammo) = p.ready_weapon.ammo() {
                    let slot = &mut p.ammo[ammo.index()];
                    *slot = (*slot - 1).max(0);
                }
            }
            self.fire_clock = self.fire_clock.wrapping_add(1);
        } else {
            self.fire_clock = 0;
        }
        p.tick_powers();
        p.tick_counters();
    }

    fn status_line(&self, bar: &StatusBar) -> String {
        let p = &self.player;
        let mut line = format!(
            "E{}M{}  face {:?}  palette {}  {:?}",
            self.level.0,
            self.level.1,
            bar.face(),
            bar.palette(),
            p.ready_weapon
        );
        if p.cheats.contains(Cheats::GOD_MODE) {
            line.push_str("  god");
        }
        if p.cheats.contains(Cheats::NO_CLIP) {
            line.push_str("  noclip");
        }
        if let Some(track) = self.music {
            line.push_str(&format!("  music {track}"));
        }
        line
    }
}

// ── Loop ──

/// Stand-in for the 3D view: blank the band while the bar is hidden.
fn clear_band(screen: &mut Screen) {
    let frame = screen.frame_mut();
    for y in ST_Y..SCREEN_HEIGHT {
        for x in 0..SCREEN_WIDTH {
            frame.set(x, y, 0);
        }
    }
}

fn run(
    bar: &mut StatusBar,
    renderer: &mut Renderer,
    config: &HudConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut input = InputState::new();
    let mut screen = Screen::new();
    let mut demo = Demo::new();
    let tick_rate = config.tick_interval();
    let frame_sleep = Duration::from_millis(config.timing.frame_sleep_ms);
    let mut last_tick = Instant::now();

    bar.start(&mut screen, &demo.player);

    loop {
        input.drain_events();

        let mut restart = false;
        for action in input.actions() {
            if action == HostAction::Quit {
                bar.stop(&mut screen);
                return Ok(());
            }
            restart |= demo.apply(action, bar);
        }
        for event in input.hud_events() {
            bar.handle_input(event, &mut demo.player);
        }
        for effect in bar.take_effects() {
            match effect {
                HudEffect::ChangeMusic(track) => {
                    info!("music -> {}", track.0);
                    demo.music = Some(track.0);
                }
                HudEffect::WarpLevel { skill, episode, map } => {
                    info!("warp to E{episode}M{map} at {skill:?}");
                    demo.level = (episode, map);
                    restart = true;
                }
            }
        }
        if restart {
            bar.start(&mut screen, &demo.player);
        }

        while last_tick.elapsed() >= tick_rate {
            demo.tick(input.fire_held());
            bar.tick(&demo.player);
            last_tick += tick_rate;
        }

        let hidden = demo.fullscreen && !demo.automap;
        if hidden {
            clear_band(&mut screen);
        }
        bar.draw(&mut screen, demo.fullscreen, false)?;

        let overlay = Overlay {
            message: bar.message().map(str::to_string),
            status: demo.status_line(bar),
            help: HELP.to_string(),
        };
        renderer.render(&screen, &overlay)?;
        std::thread::sleep(frame_sleep);
    }
}

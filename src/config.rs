//! External configuration loader.
//!
//! Reads `statusbar.toml` from the executable's directory, the working
//! directory or `~/.config/statusbar`. Missing files or keys fall back to
//! defaults; a file that fails to parse is reported and ignored.

use log::warn;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::mission::{valid_game_mode, GameMission, GameMode, Session, Skill};
use crate::domain::player::{MAX_PLAYERS, TICRATE};

const CONFIG_FILE: &str = "statusbar.toml";

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct HudConfig {
    pub game: GameConfig,
    pub timing: TimingConfig,
    pub cheats_enabled: bool,
    pub log: LogConfig,
}

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub mission: GameMission,
    pub mode: GameMode,
    pub skill: Skill,
    pub netgame: bool,
    pub deathmatch: bool,
    pub console_player: usize,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub tick_rate: u32,
    pub frame_sleep_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    cheats: TomlCheats,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_mission")]
    mission: GameMission,
    #[serde(default = "default_mode")]
    mode: GameMode,
    #[serde(default = "default_skill")]
    skill: u8,
    #[serde(default)]
    netgame: bool,
    #[serde(default)]
    deathmatch: bool,
    #[serde(default)]
    console_player: usize,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_tick_rate")]
    tick_rate: u32,
    #[serde(default = "default_frame_sleep")]
    frame_sleep_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlCheats {
    #[serde(default = "default_true")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_mission() -> GameMission { GameMission::Doom }
fn default_mode() -> GameMode { GameMode::Registered }
fn default_skill() -> u8 { 3 }
fn default_tick_rate() -> u32 { TICRATE as u32 }
fn default_frame_sleep() -> u64 { 2 }
fn default_true() -> bool { true }
fn default_log_file() -> String { "statusbar.log".into() }
fn default_log_level() -> String { "info".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            mission: default_mission(),
            mode: default_mode(),
            skill: default_skill(),
            netgame: false,
            deathmatch: false,
            console_player: 0,
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            tick_rate: default_tick_rate(),
            frame_sleep_ms: default_frame_sleep(),
        }
    }
}

impl Default for TomlCheats {
    fn default() -> Self {
        TomlCheats { enabled: true }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

// ── Loading ──

impl HudConfig {
    /// Load from the first `statusbar.toml` found.
    pub fn load() -> Self {
        Self::from_toml(load_toml(&candidate_dirs()))
    }

    /// Parse a config document. Invalid text yields the defaults.
    pub fn parse(text: &str) -> Self {
        match toml::from_str::<TomlConfig>(text) {
            Ok(cfg) => Self::from_toml(cfg),
            Err(e) => {
                warn!("{CONFIG_FILE} parse error, using defaults: {e}");
                Self::from_toml(TomlConfig::default())
            }
        }
    }

    fn from_toml(cfg: TomlConfig) -> Self {
        let mut game = cfg.game;
        if !valid_game_mode(game.mission, game.mode) {
            warn!(
                "{:?} has no {:?} release, using defaults",
                game.mission, game.mode
            );
            game.mission = default_mission();
            game.mode = default_mode();
        }
        let skill = Skill::from_level(game.skill).unwrap_or_else(|| {
            warn!("skill {} out of range 1..=5, using 3", game.skill);
            Skill::Medium
        });
        let console_player = if game.console_player < MAX_PLAYERS {
            game.console_player
        } else {
            warn!("console_player {} out of range, using 0", game.console_player);
            0
        };
        let tick_rate = if cfg.timing.tick_rate == 0 {
            warn!("tick_rate must be positive, using {TICRATE}");
            default_tick_rate()
        } else {
            cfg.timing.tick_rate
        };

        HudConfig {
            game: GameConfig {
                mission: game.mission,
                mode: game.mode,
                skill,
                netgame: game.netgame || game.deathmatch,
                deathmatch: game.deathmatch,
                console_player,
            },
            timing: TimingConfig {
                tick_rate,
                frame_sleep_ms: cfg.timing.frame_sleep_ms,
            },
            cheats_enabled: cfg.cheats.enabled,
            log: LogConfig {
                file: PathBuf::from(cfg.log.file),
                level: cfg.log.level,
            },
        }
    }

    pub fn session(&self) -> Session {
        Session {
            mission: self.game.mission,
            mode: self.game.mode,
            skill: self.game.skill,
            netgame: self.game.netgame,
            deathmatch: self.game.deathmatch,
            console_player: self.game.console_player,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.timing.tick_rate))
    }
}

impl Default for HudConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir, CWD, then the user config dir.
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if let Ok(home) = std::env::var("HOME") {
        let user = PathBuf::from(&home).join(".config/statusbar");
        if user.is_dir() && !dirs.iter().any(|d| d == &user) {
            dirs.push(user);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            continue;
        }
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!("{} parse error, using defaults: {e}", path.display());
                    return TomlConfig::default();
                }
            },
            Err(e) => warn!("could not read {}: {e}", path.display()),
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = HudConfig::parse("");
        assert_eq!(cfg.session(), Session::default());
        assert_eq!(cfg.timing.tick_rate, 35);
        assert!(cfg.cheats_enabled);
        assert_eq!(cfg.log.file, PathBuf::from("statusbar.log"));
        assert_eq!(cfg.log.level, "info");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = HudConfig::parse(
            r#"
            [game]
            mission = "doom2"
            mode = "commercial"
            skill = 5

            [cheats]
            enabled = false
            "#,
        );
        let s = cfg.session();
        assert_eq!(s.mission, GameMission::Doom2);
        assert_eq!(s.mode, GameMode::Commercial);
        assert_eq!(s.skill, Skill::Nightmare);
        assert!(!s.netgame);
        assert!(!cfg.cheats_enabled);
        assert_eq!(cfg.timing.frame_sleep_ms, 2);
    }

    #[test]
    fn malformed_document_falls_back() {
        let cfg = HudConfig::parse("[game\nmission = 4");
        assert_eq!(cfg.session(), Session::default());
    }

    #[test]
    fn unknown_mission_falls_back() {
        let cfg = HudConfig::parse("[game]\nmission = \"quake\"\n");
        assert_eq!(cfg.session().mission, GameMission::Doom);
    }

    // ── Validation ──

    #[test]
    fn impossible_mode_pairs_are_replaced() {
        let cfg = HudConfig::parse("[game]\nmission = \"doom\"\nmode = \"commercial\"\n");
        assert_eq!(cfg.session().mode, GameMode::Registered);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = HudConfig::parse(
            "[game]\nskill = 9\nconsole_player = 7\n[timing]\ntick_rate = 0\n",
        );
        assert_eq!(cfg.session().skill, Skill::Medium);
        assert_eq!(cfg.session().console_player, 0);
        assert_eq!(cfg.timing.tick_rate, 35);
    }

    #[test]
    fn deathmatch_implies_netgame() {
        let cfg = HudConfig::parse("[game]\ndeathmatch = true\n");
        assert!(cfg.session().netgame);
        assert!(cfg.session().deathmatch);
    }

    #[test]
    fn tick_interval_follows_rate() {
        let cfg = HudConfig::default();
        let ms = cfg.tick_interval().as_micros();
        assert!((28_500..=28_600).contains(&ms));
    }
}

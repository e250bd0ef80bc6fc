//! Which game is running, and the episode/map and music bounds that follow
//! from it.

use serde::Deserialize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMission {
    Doom,
    Doom2,
    Heretic,
    Hexen,
    Strife,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Shareware,
    Registered,
    Retail,
    Commercial,
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Skill {
    Baby = 1,
    Easy,
    Medium,
    Hard,
    Nightmare,
}

impl Skill {
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Skill::Baby),
            2 => Some(Skill::Easy),
            3 => Some(Skill::Medium),
            4 => Some(Skill::Hard),
            5 => Some(Skill::Nightmare),
            _ => None,
        }
    }
}

/// The running game as far as the status bar cares.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Session {
    pub mission: GameMission,
    pub mode: GameMode,
    pub skill: Skill,
    pub netgame: bool,
    pub deathmatch: bool,
    /// Index of the local player in frag tables.
    pub console_player: usize,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            mission: GameMission::Doom,
            mode: GameMode::Registered,
            skill: Skill::Medium,
            netgame: false,
            deathmatch: false,
            console_player: 0,
        }
    }
}

/// `(mission, mode, episodes, maps per episode)`.
const VALID_MODES: [(GameMission, GameMode, u8, u8); 9] = [
    (GameMission::Doom, GameMode::Shareware, 1, 9),
    (GameMission::Doom, GameMode::Registered, 3, 9),
    (GameMission::Doom, GameMode::Retail, 4, 9),
    (GameMission::Doom2, GameMode::Commercial, 1, 32),
    (GameMission::Heretic, GameMode::Shareware, 1, 9),
    (GameMission::Heretic, GameMode::Registered, 3, 9),
    (GameMission::Heretic, GameMode::Retail, 5, 9),
    (GameMission::Hexen, GameMode::Commercial, 1, 60),
    (GameMission::Strife, GameMode::Commercial, 1, 34),
];

fn bounds(mission: GameMission, mode: GameMode) -> Option<(u8, u8)> {
    VALID_MODES
        .iter()
        .find(|(m, md, _, _)| *m == mission && *md == mode)
        .map(|&(_, _, episodes, maps)| (episodes, maps))
}

pub fn valid_game_mode(mission: GameMission, mode: GameMode) -> bool {
    bounds(mission, mode).is_some()
}

pub fn valid_episode_map(mission: GameMission, mode: GameMode, episode: u8, map: u8) -> bool {
    match bounds(mission, mode) {
        Some((episodes, maps)) => (1..=episodes).contains(&episode) && (1..=maps).contains(&map),
        None => false,
    }
}

/// Music lump number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MusicTrack(pub u8);

/// Highest episodic track (E1M1..E4M9 map onto `0..=31`).
pub const LAST_EPISODE_TRACK: u8 = 31;
/// Commercial tracks run `1..=35`.
pub const LAST_COMMERCIAL_TRACK: u8 = 35;

fn digits(params: &[char]) -> Option<(u8, u8)> {
    match params {
        [a, b] => Some((a.to_digit(10)? as u8, b.to_digit(10)? as u8)),
        _ => None,
    }
}

/// Track selected by the two `idmus` digits, if playable in `mode`.
pub fn music_for_params(mode: GameMode, params: &[char]) -> Option<MusicTrack> {
    let (d0, d1) = digits(params)?;
    if mode == GameMode::Commercial {
        let track = d0 * 10 + d1;
        (1..=LAST_COMMERCIAL_TRACK)
            .contains(&track)
            .then_some(MusicTrack(track))
    } else {
        if d0 == 0 || d1 == 0 {
            return None;
        }
        let track = (d0 - 1) * 9 + (d1 - 1);
        (track <= LAST_EPISODE_TRACK).then_some(MusicTrack(track))
    }
}

/// Destination selected by the two `idclev` digits, if it exists in the
/// running game.
pub fn warp_for_params(mission: GameMission, mode: GameMode, params: &[char]) -> Option<(u8, u8)> {
    let (d0, d1) = digits(params)?;
    let (episode, map) = if mode == GameMode::Commercial {
        (1, d0 * 10 + d1)
    } else {
        (d0, d1)
    };
    valid_episode_map(mission, mode, episode, map).then_some((episode, map))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn mode_table() {
        assert!(valid_game_mode(GameMission::Doom, GameMode::Registered));
        assert!(!valid_game_mode(GameMission::Doom, GameMode::Commercial));
        assert!(valid_game_mode(GameMission::Hexen, GameMode::Commercial));
    }

    #[test]
    fn episode_map_bounds() {
        assert!(valid_episode_map(GameMission::Doom, GameMode::Retail, 4, 9));
        assert!(!valid_episode_map(GameMission::Doom, GameMode::Retail, 5, 1));
        assert!(!valid_episode_map(GameMission::Doom, GameMode::Retail, 1, 0));
        assert!(valid_episode_map(GameMission::Heretic, GameMode::Retail, 5, 9));
        assert!(valid_episode_map(GameMission::Strife, GameMode::Commercial, 1, 34));
        assert!(!valid_episode_map(GameMission::Strife, GameMode::Commercial, 1, 35));
    }

    // ── idclev ──

    #[test]
    fn warp_rejects_missing_episode() {
        assert_eq!(warp_for_params(GameMission::Doom, GameMode::Registered, &p("99")), None);
        assert_eq!(
            warp_for_params(GameMission::Doom, GameMode::Registered, &p("11")),
            Some((1, 1))
        );
    }

    #[test]
    fn commercial_warp_reads_two_digit_map() {
        assert_eq!(
            warp_for_params(GameMission::Doom2, GameMode::Commercial, &p("32")),
            Some((1, 32))
        );
        assert_eq!(warp_for_params(GameMission::Doom2, GameMode::Commercial, &p("33")), None);
        assert_eq!(warp_for_params(GameMission::Doom2, GameMode::Commercial, &p("00")), None);
    }

    #[test]
    fn warp_rejects_letters() {
        assert_eq!(warp_for_params(GameMission::Doom, GameMode::Retail, &p("1x")), None);
    }

    // ── idmus ──

    #[test]
    fn episodic_music_tracks() {
        assert_eq!(music_for_params(GameMode::Retail, &p("11")), Some(MusicTrack(0)));
        assert_eq!(music_for_params(GameMode::Retail, &p("45")), Some(MusicTrack(31)));
        assert_eq!(music_for_params(GameMode::Retail, &p("46")), None);
        assert_eq!(music_for_params(GameMode::Retail, &p("51")), None);
        assert_eq!(music_for_params(GameMode::Retail, &p("10")), None);
    }

    #[test]
    fn commercial_music_tracks() {
        assert_eq!(music_for_params(GameMode::Commercial, &p("01")), Some(MusicTrack(1)));
        assert_eq!(music_for_params(GameMode::Commercial, &p("35")), Some(MusicTrack(35)));
        assert_eq!(music_for_params(GameMode::Commercial, &p("36")), None);
        assert_eq!(music_for_params(GameMode::Commercial, &p("00")), None);
    }
}

//! What flows into the status bar from the host, and what flows back out.

use crate::domain::mission::{MusicTrack, Skill};

/// High half of every automap notification.
pub const AM_MSG_HEADER: u32 = ((b'a' as u32) << 24) | ((b'm' as u32) << 16);
pub const AM_MSG_ENTERED: u32 = AM_MSG_HEADER | ((b'e' as u32) << 8);
pub const AM_MSG_EXITED: u32 = AM_MSG_HEADER | ((b'x' as u32) << 8);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HudEvent {
    /// A key went down. Non-text keys use their control character.
    KeyDown(char),
    /// Automap notification code.
    Automap(u32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AutomapSignal {
    Entered,
    Exited,
}

impl AutomapSignal {
    /// `None` for codes without the header or with an unknown selector.
    pub fn decode(code: u32) -> Option<Self> {
        match code {
            AM_MSG_ENTERED => Some(AutomapSignal::Entered),
            AM_MSG_EXITED => Some(AutomapSignal::Exited),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        match self {
            AutomapSignal::Entered => AM_MSG_ENTERED,
            AutomapSignal::Exited => AM_MSG_EXITED,
        }
    }
}

/// Requests the status bar cannot carry out itself.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HudEffect {
    ChangeMusic(MusicTrack),
    WarpLevel { skill: Skill, episode: u8, map: u8 },
}

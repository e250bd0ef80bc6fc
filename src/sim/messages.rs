//! Player-facing cheat messages.

pub const STSTR_DQDON: &str = "Degreelessness Mode On";
pub const STSTR_DQDOFF: &str = "Degreelessness Mode Off";
pub const STSTR_KFAADDED: &str = "Very Happy Ammo Added";
pub const STSTR_FAADDED: &str = "Ammo (no keys) Added";
pub const STSTR_NCON: &str = "No Clipping Mode ON";
pub const STSTR_NCOFF: &str = "No Clipping Mode OFF";
pub const STSTR_BEHOLD: &str = "inVuln, Str, Inviso, Rad, Allmap, or Lite-amp";
pub const STSTR_BEHOLDX: &str = "Power-up Toggled";
pub const STSTR_CHOPPERS: &str = "... doesn't suck - GM";
pub const STSTR_CLEV: &str = "Changing Level...";
pub const STSTR_MUS: &str = "Music Change";
pub const STSTR_NOMUS: &str = "IMPOSSIBLE SELECTION";

/// `idmypos` readout: BAM angle and fixed-point position in hex.
pub fn my_pos(angle: u32, x: i32, y: i32) -> String {
    format!("ang=0x{angle:x};x,y=(0x{:x},0x{:x})", x as u32, y as u32)
}

//! Player snapshot: the slice of player state the status bar reads, plus
//! the handful of fields cheats are allowed to write back.

use crate::domain::angle::Angle;

pub const TICRATE: i32 = 35;
pub const MAX_PLAYERS: usize = 4;
pub const NUM_WEAPONS: usize = 9;
pub const NUM_AMMO: usize = 4;
pub const NUM_CARDS: usize = 6;
pub const NUM_POWERS: usize = 6;

pub const FRACBITS: u32 = 16;
pub const FRACUNIT: i32 = 1 << FRACBITS;

pub const INVULN_TICS: i32 = 30 * TICRATE;
pub const INVIS_TICS: i32 = 60 * TICRATE;
pub const IRON_TICS: i32 = 60 * TICRATE;
pub const INFRA_TICS: i32 = 120 * TICRATE;

pub const GOD_MODE_HEALTH: i32 = 200;
pub const CHEAT_ARMOR: i32 = 200;
pub const CHEAT_ARMOR_CLASS: i32 = 2;

// ── Inventory kinds ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AmmoType {
    Clip,
    Shell,
    Cell,
    Missile,
}

impl AmmoType {
    pub const ALL: [AmmoType; NUM_AMMO] =
        [AmmoType::Clip, AmmoType::Shell, AmmoType::Cell, AmmoType::Missile];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum WeaponType {
    Fist,
    Pistol,
    Shotgun,
    Chaingun,
    Missile,
    Plasma,
    Bfg,
    Chainsaw,
    SuperShotgun,
}

impl WeaponType {
    pub const ALL: [WeaponType; NUM_WEAPONS] = [
        WeaponType::Fist,
        WeaponType::Pistol,
        WeaponType::Shotgun,
        WeaponType::Chaingun,
        WeaponType::Missile,
        WeaponType::Plasma,
        WeaponType::Bfg,
        WeaponType::Chainsaw,
        WeaponType::SuperShotgun,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Ammo consumed, `None` for melee weapons.
    pub fn ammo(self) -> Option<AmmoType> {
        match self {
            WeaponType::Fist | WeaponType::Chainsaw => None,
            WeaponType::Pistol | WeaponType::Chaingun => Some(AmmoType::Clip),
            WeaponType::Shotgun | WeaponType::SuperShotgun => Some(AmmoType::Shell),
            WeaponType::Missile => Some(AmmoType::Missile),
            WeaponType::Plasma | WeaponType::Bfg => Some(AmmoType::Cell),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Card {
    BlueCard,
    YellowCard,
    RedCard,
    BlueSkull,
    YellowSkull,
    RedSkull,
}

impl Card {
    pub const ALL: [Card; NUM_CARDS] = [
        Card::BlueCard,
        Card::YellowCard,
        Card::RedCard,
        Card::BlueSkull,
        Card::YellowSkull,
        Card::RedSkull,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PowerType {
    Invulnerability,
    Strength,
    Invisibility,
    IronFeet,
    AllMap,
    Infrared,
}

impl PowerType {
    pub fn index(self) -> usize {
        self as usize
    }
}

bitflags::bitflags! {
    /// Cheat toggles stored on the player.
    #[derive(Default)]
    pub struct Cheats: u32 {
        const NO_CLIP = 1 << 0;
        const GOD_MODE = 1 << 1;
    }
}

/// Who last hurt the player.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Attacker {
    /// The player's own action (rocket splash, slime...).
    Player,
    /// Another actor, at a fixed-point map position.
    Other { x: i32, y: i32 },
}

// ── Snapshot ──

#[derive(Clone, Debug)]
pub struct PlayerSnapshot {
    pub health: i32,
    pub armor_points: i32,
    pub armor_type: i32,

    pub ammo: [i32; NUM_AMMO],
    pub max_ammo: [i32; NUM_AMMO],
    pub weapon_owned: [bool; NUM_WEAPONS],
    pub ready_weapon: WeaponType,
    pub cards: [bool; NUM_CARDS],
    pub powers: [i32; NUM_POWERS],
    pub backpack: bool,
    pub cheats: Cheats,

    /// Red-flash intensity; decays once per tick in the host.
    pub damage_count: i32,
    /// Gold-flash intensity; decays once per tick in the host.
    pub bonus_count: i32,
    pub attacker: Option<Attacker>,
    pub attack_down: bool,

    pub x: i32,
    pub y: i32,
    pub angle: Angle,

    /// `frags[i]` = times this player fragged player `i`.
    pub frags: [i32; MAX_PLAYERS],
    pub message: Option<String>,
}

impl PlayerSnapshot {
    /// A freshly spawned player: fist, pistol and 50 bullets.
    pub fn new() -> Self {
        let mut weapon_owned = [false; NUM_WEAPONS];
        weapon_owned[WeaponType::Fist.index()] = true;
        weapon_owned[WeaponType::Pistol.index()] = true;
        let mut ammo = [0; NUM_AMMO];
        ammo[AmmoType::Clip.index()] = 50;
        PlayerSnapshot {
            health: 100,
            armor_points: 0,
            armor_type: 0,
            ammo,
            max_ammo: [200, 50, 300, 50],
            weapon_owned,
            ready_weapon: WeaponType::Pistol,
            cards: [false; NUM_CARDS],
            powers: [0; NUM_POWERS],
            backpack: false,
            cheats: Cheats::empty(),
            damage_count: 0,
            bonus_count: 0,
            attacker: None,
            attack_down: false,
            x: 0,
            y: 0,
            angle: Angle(0),
            frags: [0; MAX_PLAYERS],
            message: None,
        }
    }

    pub fn power(&self, power: PowerType) -> i32 {
        self.powers[power.index()]
    }

    pub fn has_power(&self, power: PowerType) -> bool {
        self.powers[power.index()] != 0
    }

    pub fn owns(&self, weapon: WeaponType) -> bool {
        self.weapon_owned[weapon.index()]
    }

    pub fn is_invulnerable(&self) -> bool {
        self.cheats.contains(Cheats::GOD_MODE) || self.has_power(PowerType::Invulnerability)
    }

    /// Grant a power with its standard duration. Returns `false` if the
    /// power was already active and cannot stack.
    pub fn give_power(&mut self, power: PowerType) -> bool {
        let duration = match power {
            PowerType::Invulnerability => INVULN_TICS,
            PowerType::Invisibility => INVIS_TICS,
            PowerType::IronFeet => IRON_TICS,
            PowerType::Infrared => INFRA_TICS,
            PowerType::Strength => {
                self.give_body(100);
                1
            }
            PowerType::AllMap => {
                if self.has_power(PowerType::AllMap) {
                    return false;
                }
                1
            }
        };
        self.powers[power.index()] = duration;
        true
    }

    /// Heal up to `num`, never above 100.
    pub fn give_body(&mut self, num: i32) -> bool {
        if self.health >= 100 {
            return false;
        }
        self.health = (self.health + num).min(100);
        true
    }

    /// Advance power timers one tick. Berserk counts up (the palette fade
    /// reads it); the rest count down.
    pub fn tick_powers(&mut self) {
        for power in [
            PowerType::Invulnerability,
            PowerType::Invisibility,
            PowerType::IronFeet,
            PowerType::Infrared,
        ] {
            let slot = &mut self.powers[power.index()];
            if *slot > 0 {
                *slot -= 1;
            }
        }
        let strength = &mut self.powers[PowerType::Strength.index()];
        if *strength > 0 {
            *strength += 1;
        }
    }

    /// Decay the flash counters one tick.
    pub fn tick_counters(&mut self) {
        if self.damage_count > 0 {
            self.damage_count -= 1;
        }
        if self.bonus_count > 0 {
            self.bonus_count -= 1;
        }
    }
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

//! The face in the middle of the bar.
//!
//! Each tick an ordered rule table is walked top-down. A rule may only fire
//! while the live priority is below its gate, so a high-priority face that
//! is still holding cannot be replaced by a lesser one. When the hold
//! counter runs out the face falls back to looking around idly at priority
//! zero, which re-opens every rule.

use log::trace;

use crate::domain::angle::{turn_toward, Angle, Turn, ANG45};
use crate::domain::player::{Attacker, PlayerSnapshot, NUM_WEAPONS, TICRATE};

pub const NUM_PAIN_LEVELS: u8 = 5;
pub const NUM_STRAIGHT_FACES: u8 = 3;
pub const FACE_STRIDE: usize = 8;
pub const GOD_FACE: usize = NUM_PAIN_LEVELS as usize * FACE_STRIDE;
pub const DEAD_FACE: usize = GOD_FACE + 1;
pub const NUM_FACES: usize = DEAD_FACE + 1;

pub const EVIL_GRIN_TICS: i32 = 2 * TICRATE;
pub const STRAIGHT_TICS: i32 = TICRATE / 2;
pub const TURN_TICS: i32 = TICRATE;
pub const OUCH_TICS: i32 = TICRATE;
pub const RAMPAGE_DELAY: i32 = 2 * TICRATE;
pub const MUCH_PAIN: i32 = 20;

// ── Face identity ──

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Expression {
    /// Looking ahead; `0..3` picks left, centre, right glance.
    Straight(u8),
    TurnRight,
    TurnLeft,
    Ouch,
    EvilGrin,
    Rampage,
}

impl Expression {
    pub fn offset(self) -> usize {
        match self {
            Expression::Straight(n) => (n % NUM_STRAIGHT_FACES) as usize,
            Expression::TurnRight => 3,
            Expression::TurnLeft => 4,
            Expression::Ouch => 5,
            Expression::EvilGrin => 6,
            Expression::Rampage => 7,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Face {
    Pain { level: u8, expression: Expression },
    God,
    Dead,
}

impl Face {
    /// Position in the face glyph set.
    pub fn index(self) -> usize {
        match self {
            Face::Pain { level, expression } => {
                (level.min(NUM_PAIN_LEVELS - 1) as usize) * FACE_STRIDE + expression.offset()
            }
            Face::God => GOD_FACE,
            Face::Dead => DEAD_FACE,
        }
    }

    /// Every face in glyph-set order.
    pub fn all() -> impl Iterator<Item = Face> {
        let pain = (0..NUM_PAIN_LEVELS).flat_map(|level| {
            [
                Expression::Straight(0),
                Expression::Straight(1),
                Expression::Straight(2),
                Expression::TurnRight,
                Expression::TurnLeft,
                Expression::Ouch,
                Expression::EvilGrin,
                Expression::Rampage,
            ]
            .into_iter()
            .map(move |expression| Face::Pain { level, expression })
        });
        pain.chain([Face::God, Face::Dead])
    }

    /// Glyph name for this face.
    pub fn glyph_name(self) -> String {
        match self {
            Face::Pain { level, expression } => match expression {
                Expression::Straight(n) => format!("STFST{level}{}", n % NUM_STRAIGHT_FACES),
                Expression::TurnRight => format!("STFTR{level}0"),
                Expression::TurnLeft => format!("STFTL{level}0"),
                Expression::Ouch => format!("STFOUCH{level}"),
                Expression::EvilGrin => format!("STFEVL{level}"),
                Expression::Rampage => format!("STFKILL{level}"),
            },
            Face::God => "STFGOD0".to_string(),
            Face::Dead => "STFDEAD0".to_string(),
        }
    }
}

/// Pain band for a health value; 0 is healthy, 4 is nearly dead.
pub fn pain_level(health: i32) -> u8 {
    let h = health.clamp(0, 100);
    ((100 - h) * NUM_PAIN_LEVELS as i32 / 101) as u8
}

// ── Per-tick input ──

/// What the face reacts to this tick.
#[derive(Clone, Copy, Debug)]
pub struct FaceInput<'a> {
    pub health: i32,
    pub damage_count: i32,
    pub bonus_count: i32,
    pub attacker: Option<Attacker>,
    pub x: i32,
    pub y: i32,
    pub angle: Angle,
    pub weapon_owned: &'a [bool; NUM_WEAPONS],
    pub attack_down: bool,
    pub invulnerable: bool,
    pub random: u8,
}

impl<'a> FaceInput<'a> {
    pub fn from_player(player: &'a PlayerSnapshot, random: u8) -> Self {
        FaceInput {
            health: player.health,
            damage_count: player.damage_count,
            bonus_count: player.bonus_count,
            attacker: player.attacker,
            x: player.x,
            y: player.y,
            angle: player.angle,
            weapon_owned: &player.weapon_owned,
            attack_down: player.attack_down,
            invulnerable: player.is_invulnerable(),
            random,
        }
    }
}

// ── Rule table ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Decision {
    priority: u8,
    face: Face,
    hold: i32,
}

type RuleFn = fn(&mut FaceMachine, &FaceInput) -> Option<Decision>;

struct FaceRule {
    name: &'static str,
    /// Fires only while the live priority is strictly below this.
    gate: u8,
    fire: RuleFn,
}

const RULES: [FaceRule; 6] = [
    FaceRule { name: "dead", gate: 10, fire: rule_dead },
    FaceRule { name: "evil_grin", gate: 9, fire: rule_evil_grin },
    FaceRule { name: "attacked", gate: 8, fire: rule_attacked },
    FaceRule { name: "self_damage", gate: 7, fire: rule_self_damage },
    FaceRule { name: "rapid_fire", gate: 6, fire: rule_rapid_fire },
    FaceRule { name: "invulnerable", gate: 5, fire: rule_invulnerable },
];

fn rule_dead(_m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    (input.health <= 0).then_some(Decision {
        priority: 9,
        face: Face::Dead,
        hold: 1,
    })
}

fn rule_evil_grin(m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    if input.bonus_count <= 0 {
        return None;
    }
    let changed = m.old_weapons != *input.weapon_owned;
    m.old_weapons = *input.weapon_owned;
    changed.then(|| Decision {
        priority: 8,
        face: m.pain_face(input.health, Expression::EvilGrin),
        hold: EVIL_GRIN_TICS,
    })
}

fn rule_attacked(m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    if input.damage_count <= 0 {
        return None;
    }
    let Some(Attacker::Other { x, y }) = input.attacker else {
        return None;
    };
    let expression = if m.health_drop(input.health) > MUCH_PAIN {
        Expression::Ouch
    } else {
        let bearing = Angle::bearing(input.x, input.y, x, y);
        match turn_toward(input.angle, bearing) {
            t if t.magnitude() < ANG45 => Expression::Rampage,
            Turn::Right(_) => Expression::TurnRight,
            Turn::Left(_) => Expression::TurnLeft,
        }
    };
    Some(Decision {
        priority: 7,
        face: m.pain_face(input.health, expression),
        hold: TURN_TICS,
    })
}

fn rule_self_damage(m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    if input.damage_count <= 0 {
        return None;
    }
    let (priority, expression) = if m.health_drop(input.health) > MUCH_PAIN {
        (7, Expression::Ouch)
    } else {
        (6, Expression::Rampage)
    };
    Some(Decision {
        priority,
        face: m.pain_face(input.health, expression),
        hold: OUCH_TICS,
    })
}

fn rule_rapid_fire(m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    if !input.attack_down {
        m.last_attack_down = None;
        return None;
    }
    let Some(left) = m.last_attack_down.as_mut() else {
        m.last_attack_down = Some(RAMPAGE_DELAY);
        return None;
    };
    *left -= 1;
    if *left > 0 {
        return None;
    }
    // Re-arm so it keeps firing each tick while the trigger is held.
    *left = 1;
    Some(Decision {
        priority: 5,
        face: m.pain_face(input.health, Expression::Rampage),
        hold: 1,
    })
}

fn rule_invulnerable(_m: &mut FaceMachine, input: &FaceInput) -> Option<Decision> {
    input.invulnerable.then_some(Decision {
        priority: 4,
        face: Face::God,
        hold: 1,
    })
}

// ── Machine ──

pub struct FaceMachine {
    priority: u8,
    face: Face,
    hold: i32,
    /// Health at the end of the previous tick; -1 before the first.
    old_health: i32,
    old_weapons: [bool; NUM_WEAPONS],
    /// Ticks left before held fire shows the rampage face.
    last_attack_down: Option<i32>,
    pain_memo: (i32, u8),
}

impl FaceMachine {
    pub fn new(weapons: &[bool; NUM_WEAPONS]) -> Self {
        FaceMachine {
            priority: 0,
            face: Face::Pain {
                level: 0,
                expression: Expression::Straight(0),
            },
            hold: 0,
            old_health: -1,
            old_weapons: *weapons,
            last_attack_down: None,
            pain_memo: (-1, 0),
        }
    }

    /// Back to the level-start state.
    pub fn reset(&mut self, weapons: &[bool; NUM_WEAPONS]) {
        *self = Self::new(weapons);
    }

    pub fn face(&self) -> Face {
        self.face
    }

    pub fn index(&self) -> usize {
        self.face.index()
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn hold(&self) -> i32 {
        self.hold
    }

    /// Advance one tick.
    pub fn tick(&mut self, input: &FaceInput) {
        for rule in RULES.iter() {
            if self.priority >= rule.gate {
                continue;
            }
            if let Some(d) = (rule.fire)(self, input) {
                trace!(
                    "face: {} -> {:?} (priority {}, hold {})",
                    rule.name,
                    d.face,
                    d.priority,
                    d.hold
                );
                self.priority = d.priority;
                self.face = d.face;
                self.hold = d.hold;
            }
        }

        if self.hold == 0 {
            self.face = self.pain_face(input.health, Expression::Straight(input.random % 3));
            self.hold = STRAIGHT_TICS;
            self.priority = 0;
        }
        self.hold -= 1;
        self.old_health = input.health;
    }

    fn pain_face(&mut self, health: i32, expression: Expression) -> Face {
        Face::Pain {
            level: self.pain_level(health),
            expression,
        }
    }

    /// `pain_level` memoised on the last health seen.
    fn pain_level(&mut self, health: i32) -> u8 {
        if self.pain_memo.0 != health {
            self.pain_memo = (health, pain_level(health));
        }
        self.pain_memo.1
    }

    fn health_drop(&self, health: i32) -> i32 {
        if self.old_health < 0 {
            return 0;
        }
        self.old_health - health
    }
}

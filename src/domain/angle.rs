//! Binary angle measurement: a full turn is the whole `u32` range, so
//! angle arithmetic wraps for free.

pub const ANG45: u32 = 0x2000_0000;
pub const ANG90: u32 = 0x4000_0000;
pub const ANG180: u32 = 0x8000_0000;
pub const ANG270: u32 = 0xc000_0000;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Angle(pub u32);

impl Angle {
    pub fn from_degrees(deg: f64) -> Self {
        let turns = (deg / 360.0).rem_euclid(1.0);
        Angle((turns * 4_294_967_296.0) as u64 as u32)
    }

    pub fn to_degrees(self) -> f64 {
        self.0 as f64 * 360.0 / 4_294_967_296.0
    }

    /// Bearing from `(from_x, from_y)` to `(to_x, to_y)`, x east, y north.
    /// Coincident points give angle zero.
    pub fn bearing(from_x: i32, from_y: i32, to_x: i32, to_y: i32) -> Self {
        let dx = to_x as f64 - from_x as f64;
        let dy = to_y as f64 - from_y as f64;
        if dx == 0.0 && dy == 0.0 {
            return Angle(0);
        }
        Self::from_degrees(dy.atan2(dx).to_degrees())
    }

    pub fn wrapping_add(self, other: Angle) -> Self {
        Angle(self.0.wrapping_add(other.0))
    }

    pub fn wrapping_sub(self, other: Angle) -> Self {
        Angle(self.0.wrapping_sub(other.0))
    }
}

/// Which way the player must turn to face something at `target`, and by
/// how much (always `<= ANG180`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Turn {
    Right(u32),
    Left(u32),
}

impl Turn {
    pub fn magnitude(self) -> u32 {
        match self {
            Turn::Right(d) | Turn::Left(d) => d,
        }
    }
}

/// Side of `facing` that `target` lies on.
///
/// Counter-clockwise is positive, so a target that is a small positive
/// angle past the facing lies to the left.
pub fn turn_toward(facing: Angle, target: Angle) -> Turn {
    let (diff, right) = if target.0 > facing.0 {
        let diff = target.0.wrapping_sub(facing.0);
        (diff, diff > ANG180)
    } else {
        let diff = facing.0.wrapping_sub(target.0);
        (diff, diff <= ANG180)
    };
    // Fold reflex differences back to the short way round.
    let mag = if diff > ANG180 { diff.wrapping_neg() } else { diff };
    if right {
        Turn::Right(mag)
    } else {
        Turn::Left(mag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Angle, b: u32) -> bool {
        let d = a.0.wrapping_sub(b);
        d < 0x10000 || d.wrapping_neg() < 0x10000
    }

    #[test]
    fn bearing_cardinal_directions() {
        assert!(close(Angle::bearing(0, 0, 100, 0), 0));
        assert!(close(Angle::bearing(0, 0, 0, 100), ANG90));
        assert!(close(Angle::bearing(0, 0, -100, 0), ANG180));
        assert!(close(Angle::bearing(0, 0, 0, -100), ANG270));
        assert_eq!(Angle::bearing(5, 5, 5, 5), Angle(0));
    }

    #[test]
    fn degrees_round_trip_wraps() {
        assert!(close(Angle::from_degrees(450.0), ANG90));
        assert!(close(Angle::from_degrees(-90.0), ANG270));
        assert!((Angle(ANG180).to_degrees() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn turn_toward_picks_side() {
        let facing = Angle(0);
        assert_eq!(turn_toward(facing, Angle(ANG90)), Turn::Left(ANG90));
        assert_eq!(turn_toward(facing, Angle(ANG270)), Turn::Right(ANG90));
        assert_eq!(turn_toward(Angle(ANG90), Angle(0)), Turn::Right(ANG90));
    }

    #[test]
    fn turn_toward_straight_ahead_is_small() {
        let t = turn_toward(Angle(ANG90), Angle(ANG90 + 10));
        assert!(t.magnitude() < ANG45);
    }
}

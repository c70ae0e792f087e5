use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// 2D vector in arena coordinates (pixels for positions, pixels per frame for velocities)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Vec2 { x, y }
    }

    /// Unit vector pointing along `angle` (radians)
    pub fn from_angle(angle: f64) -> Self {
        Vec2 {
            x: angle.cos(),
            y: angle.sin(),
        }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(&self, other: &Vec2) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Returns None for (near) zero-length vectors instead of producing NaN
    pub fn normalized(&self) -> Option<Vec2> {
        let len = self.length();
        if len < 1e-9 || !len.is_finite() {
            return None;
        }
        Some(Vec2 {
            x: self.x / len,
            y: self.y / len,
        })
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f64) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Timing for one simulation step. `time_scale` is the effective scale,
/// already reduced while slow motion is running.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickContext {
    pub tick: u64,
    pub dt: f64,
    pub time_scale: f64,
}

impl TickContext {
    pub fn new(tick: u64, dt: f64, time_scale: f64) -> Self {
        TickContext {
            tick,
            dt,
            time_scale,
        }
    }

    pub fn scaled_dt(&self) -> f64 {
        self.dt * self.time_scale
    }
}

/// Index of a unit inside `BattleState::units`. Units are never removed, so ids stay valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId(pub usize);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProjectileId(pub u64);

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Physical,
    Magic,
    True,
}

/// Result of a single damage application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Blocked,
    Damaged,
    Killed,
}

/// Side effects of a tick, consumed by rendering and telemetry
#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    WallImpact {
        unit: UnitId,
        position: Vec2,
        normal: Vec2,
        speed: f64,
    },
    MeleeSwing {
        attacker: UnitId,
        position: Vec2,
        angle: f64,
        range: f64,
        hit: Option<UnitId>,
    },
    ProjectileSpawned {
        projectile: ProjectileId,
        owner: UnitId,
        position: Vec2,
        velocity: Vec2,
    },
    DamageApplied {
        target: UnitId,
        source: Option<UnitId>,
        position: Vec2,
        amount: f64,
        kind: DamageKind,
        hp_after: f64,
        big_hit: bool,
    },
    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
        position: Vec2,
    },
    ExplosionTriggered {
        projectile: ProjectileId,
        owner: UnitId,
        position: Vec2,
        radius: f64,
        damage: f64,
    },
}

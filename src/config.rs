//! Configuration constants for the combat simulation.

use clap::ValueEnum;

// Arena
pub const DEFAULT_ARENA_WIDTH: f64 = 800.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 800.0;
pub const MAX_UNITS: usize = 100;
pub const MAX_PROJECTILES: usize = 200;

// Physics
pub const WALL_BOUNCE_DAMPING: f64 = 0.8; // Velocity kept after hitting a wall
pub const DEFAULT_FRICTION: f64 = 0.98; // Per-tick velocity multiplier
pub const MIN_VELOCITY: f64 = 0.1; // Components below this snap to 0
pub const WALL_IMPACT_MIN_SPEED: f64 = 2.0; // |vx| + |vy| needed to emit a wall impact
pub const ROTATION_SPEED: f64 = 0.05; // Radians per tick of idle spin

// Timing (ticks at dt = 1.0)
pub const DEFAULT_DT: f64 = 1.0;
pub const IFRAME_DURATION: f64 = 12.0;
pub const CONTACT_DAMAGE_INTERVAL: f64 = IFRAME_DURATION; // Body units hit at most once per window
pub const CONTACT_KNOCKBACK: f64 = 3.0; // Push applied to units hit by body contact
pub const SLOW_MO_DURATION: f64 = 20.0;
pub const SLOW_MO_FACTOR: f64 = 0.1;
pub const BIG_HIT_FRACTION: f64 = 0.2; // Fraction of max hp that triggers slow motion
pub const WANDER_INTERVAL_MIN: f64 = 1.0;
pub const WANDER_INTERVAL_MAX: f64 = 3.0;

// AI
pub const DEFAULT_AGGRO_RANGE: f64 = 200.0;
pub const MELEE_ACCEL: f64 = 0.05;
pub const RANGED_ACCEL: f64 = 0.05;
pub const BODY_ACCEL: f64 = 0.10;
pub const MAGIC_ORBIT_ACCEL: f64 = 0.03;
pub const WANDER_ACCEL: f64 = 0.02;
pub const RANGED_BAND_FACTOR: f64 = 0.8; // Preferred distance = range * factor
pub const RANGED_BAND_SLACK: f64 = 20.0; // +/- around the preferred distance
pub const MAX_SPEED_FACTOR: f64 = 2.0; // Speed cap = base speed * factor

// Weapons
pub const DEFAULT_WEAPON_DAMAGE: f64 = 10.0;
pub const DEFAULT_ATTACK_RANGE: f64 = 50.0; // AI attack range when the weapon has none
pub const DEFAULT_MELEE_RANGE: f64 = 25.0; // Melee hit-test reach when the weapon has none
pub const MELEE_COOLDOWN: f64 = 20.0;
pub const PROJECTILE_COOLDOWN: f64 = 30.0;
pub const MELEE_HIT_MARGIN: f64 = 5.0;
pub const MELEE_KNOCKBACK: f64 = 5.0;
pub const MUZZLE_OFFSET: f64 = 10.0; // Projectiles spawn at radius + offset

// Projectiles
pub const DEFAULT_PROJECTILE_SPEED: f64 = 8.0;
pub const DEFAULT_PROJECTILE_LIFE: u32 = 60;
pub const DEFAULT_PROJECTILE_SIZE: f64 = 4.0;

// Unit template defaults
pub const DEFAULT_UNIT_HP: f64 = 100.0;
pub const DEFAULT_UNIT_SPEED: f64 = 2.0;
pub const DEFAULT_UNIT_RADIUS: f64 = 12.0;

// Battle
pub const DEFAULT_MAX_TICKS: u64 = 3600; // One minute at 60 ticks per second

/// Global physics presets selectable for a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PhysicsMode {
    Normal,
    LowFriction,
    Bouncy,
    Sticky,
}

impl PhysicsMode {
    pub fn friction(&self) -> f64 {
        match self {
            PhysicsMode::Normal => 0.98,
            PhysicsMode::LowFriction => 0.99,
            PhysicsMode::Bouncy => 0.95,
            PhysicsMode::Sticky => 0.9,
        }
    }

    pub fn bounce(&self) -> f64 {
        match self {
            PhysicsMode::Normal => 0.5,
            PhysicsMode::LowFriction => 0.7,
            PhysicsMode::Bouncy => 0.9,
            PhysicsMode::Sticky => 0.2,
        }
    }
}

/// Arena floors; each carries its own friction and wall bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Void,
    Grass,
    Desert,
    Ice,
}

impl Environment {
    pub fn name(&self) -> &'static str {
        match self {
            Environment::Void => "Void Arena",
            Environment::Grass => "Grass Field",
            Environment::Desert => "Desert",
            Environment::Ice => "Ice Rink",
        }
    }

    pub fn friction(&self) -> f64 {
        match self {
            Environment::Void => 0.98,
            Environment::Grass => 0.95,
            Environment::Desert => 0.9,
            Environment::Ice => 0.99,
        }
    }

    pub fn bounce(&self) -> f64 {
        match self {
            Environment::Void => 0.5,
            Environment::Grass => 0.3,
            Environment::Desert => 0.4,
            Environment::Ice => 0.8,
        }
    }
}

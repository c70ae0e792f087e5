//! Per-unit target acquisition and movement intent.
//!
//! `decide` only reads the world and returns a `Steering`; `apply` writes it
//! back. Movement is expressed as a velocity delta so several influences can
//! stack, with friction in the integrator providing the damping.

use crate::config;
use crate::physics;
use crate::template::Archetype;
use crate::types::{TickContext, UnitId, Vec2};
use crate::unit::{AiState, Unit};
use rand::Rng;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Movement intent computed for one unit for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    pub target: Option<UnitId>,
    pub state: AiState,
    pub velocity_delta: Vec2,
    pub facing: Option<f64>,
    pub wander_timer: f64,
}

/// Looks a unit up by id. Ids normally equal indices; sub-slices fall back to a scan.
pub fn find_unit(units: &[Unit], id: UnitId) -> Option<&Unit> {
    units
        .get(id.0)
        .filter(|u| u.id == id)
        .or_else(|| units.iter().find(|u| u.id == id))
}

/// Resolves a weak target reference. Missing, dead or self references read as None.
pub fn resolve_target(unit: &Unit, units: &[Unit]) -> Option<UnitId> {
    let id = unit.target?;
    match find_unit(units, id) {
        Some(other) if other.id != unit.id && other.is_alive() => Some(id),
        _ => None,
    }
}

/// Nearest live unit other than `unit`. Ties keep the first one encountered.
pub fn nearest_enemy(unit: &Unit, units: &[Unit]) -> Option<(UnitId, f64)> {
    let mut nearest: Option<(UnitId, f64)> = None;
    for other in units {
        if other.id == unit.id || !other.is_alive() {
            continue;
        }
        let dist = unit.position.distance(&other.position);
        if nearest.is_none_or(|(_, best)| dist < best) {
            nearest = Some((other.id, dist));
        }
    }
    nearest
}

/// Computes target and velocity delta for `unit` from the current world state
pub fn decide<R: Rng>(unit: &Unit, units: &[Unit], ctx: &TickContext, rng: &mut R) -> Steering {
    let mut target = resolve_target(unit, units);
    if target.is_none() {
        if let Some((candidate, dist)) = nearest_enemy(unit, units) {
            if dist < unit.aggro_range {
                crate::debug_ai!(unit.id, ctx.tick, "Acquired target U{} at {:.1}", candidate, dist);
                target = Some(candidate);
            }
        }
    }

    let accel = unit.speed * ctx.time_scale;

    let Some(target_pos) = target.and_then(|id| find_unit(units, id)).map(|u| u.position) else {
        return wander(unit, ctx, rng, accel);
    };
    let offset = target_pos - unit.position;
    let dist = offset.length();
    let angle = offset.angle();

    let state = if dist <= unit.attack_range {
        AiState::InRange
    } else {
        AiState::Seeking
    };

    // Perfect overlap has no direction; skip steering this tick
    let Some(toward) = offset.normalized() else {
        return Steering {
            target,
            state,
            velocity_delta: Vec2::ZERO,
            facing: None,
            wander_timer: unit.wander_timer,
        };
    };

    let velocity_delta = match unit.archetype {
        Archetype::Melee => {
            if dist > unit.attack_range {
                toward * (accel * config::MELEE_ACCEL)
            } else {
                Vec2::ZERO
            }
        }
        Archetype::Ranged => {
            let desired = unit.attack_range * config::RANGED_BAND_FACTOR;
            if dist < desired - config::RANGED_BAND_SLACK {
                -toward * (accel * config::RANGED_ACCEL)
            } else if dist > desired + config::RANGED_BAND_SLACK {
                toward * (accel * config::RANGED_ACCEL)
            } else {
                Vec2::ZERO
            }
        }
        Archetype::Body => toward * (accel * config::BODY_ACCEL),
        Archetype::Magic => Vec2::from_angle(angle + FRAC_PI_2) * (accel * config::MAGIC_ORBIT_ACCEL),
    };

    Steering {
        target,
        state,
        velocity_delta,
        facing: Some(angle),
        wander_timer: unit.wander_timer,
    }
}

fn wander<R: Rng>(unit: &Unit, ctx: &TickContext, rng: &mut R, accel: f64) -> Steering {
    let mut wander_timer = unit.wander_timer - ctx.scaled_dt();
    let mut velocity_delta = Vec2::ZERO;
    if wander_timer <= 0.0 {
        wander_timer = rng.gen_range(config::WANDER_INTERVAL_MIN..config::WANDER_INTERVAL_MAX);
        let heading = rng.r#gen::<f64>() * TAU;
        velocity_delta = Vec2::from_angle(heading) * (accel * config::WANDER_ACCEL);
        crate::debug_ai!(
            unit.id,
            ctx.tick,
            "Wandering towards {:.2} rad, next turn in {:.2}",
            heading,
            wander_timer
        );
    }
    Steering {
        target: None,
        state: AiState::Wandering,
        velocity_delta,
        facing: None,
        wander_timer,
    }
}

/// Writes a steering decision back into the unit and enforces the speed cap
pub fn apply(unit: &mut Unit, steering: Steering) {
    unit.target = steering.target;
    unit.ai_state = steering.state;
    unit.wander_timer = steering.wander_timer;
    if let Some(facing) = steering.facing {
        unit.rotation = facing;
    }
    unit.velocity += steering.velocity_delta;
    let max_speed = unit.max_speed();
    physics::clamp_speed(&mut unit.velocity, max_speed);
}

/// Runs decide + apply for the unit at `index`
pub fn update<R: Rng>(units: &mut [Unit], index: usize, ctx: &TickContext, rng: &mut R) {
    let steering = decide(&units[index], units, ctx, rng);
    apply(&mut units[index], steering);
}

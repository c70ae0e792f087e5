use crate::ai;
use crate::arena::Arena;
use crate::combat;
use crate::config;
use crate::error::SetupError;
use crate::physics;
use crate::projectile::ProjectileSystem;
use crate::template::{self, UnitTemplate};
use crate::types::{BattleEvent, TickContext, UnitId, Vec2};
use crate::unit::Unit;
use crate::weapon;
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fmt;
use std::str::FromStr;

/// `count` copies of `template`, parsed from `name[:count]` on the command line
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnRequest {
    pub template: UnitTemplate,
    pub count: usize,
}

impl FromStr for SpawnRequest {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, count) = match s.split_once(':') {
            Some((name, count)) => {
                let count = count
                    .trim()
                    .parse::<usize>()
                    .ok()
                    .filter(|c| *c > 0)
                    .ok_or_else(|| SetupError::InvalidSpawnRequest(s.to_string()))?;
                (name, count)
            }
            None => (s, 1),
        };
        if name.trim().is_empty() {
            return Err(SetupError::InvalidSpawnRequest(s.to_string()));
        }
        let template = template::builtin(name).ok_or_else(|| SetupError::UnknownTemplate(name.trim().to_string()))?;
        Ok(SpawnRequest { template, count })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Ongoing,
    Victory(UnitId),
    Draw,
}

/// Everything one tick produced
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<BattleEvent>,
    pub outcome: BattleOutcome,
}

/// One scoreboard row
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLine {
    pub id: UnitId,
    pub name: String,
    pub alive: bool,
    pub hp: f64,
    pub kills: u32,
    pub hits: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
}

impl fmt::Display for ScoreLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "U{:02} {:<12} {:>5} hp {:>7.1}  kills {:>2}  hits {:>3}  dealt {:>7.1}  taken {:>7.1}",
            self.id,
            self.name,
            if self.alive { "alive" } else { "dead" },
            self.hp.max(0.0),
            self.kills,
            self.hits,
            self.damage_dealt,
            self.damage_taken
        )
    }
}

/// The whole simulation. Owned by the caller and advanced one tick at a time.
pub struct BattleState {
    pub arena: Arena,
    pub units: Vec<Unit>,
    pub projectiles: ProjectileSystem,
    pub tick: u64,
    /// Remaining slow-motion window, counted in unscaled ticks
    pub slow_motion: f64,
    rng: StdRng,
}

impl BattleState {
    pub fn new(arena: Arena) -> Self {
        Self::with_rng(arena, StdRng::from_entropy())
    }

    /// Same as `new` but with a reproducible random stream
    pub fn with_seed(arena: Arena, seed: u64) -> Self {
        Self::with_rng(arena, StdRng::seed_from_u64(seed))
    }

    fn with_rng(arena: Arena, rng: StdRng) -> Self {
        info!(
            target: "battle",
            "Arena created: {}x{} (friction {:.2}, bounce {:.2})",
            arena.width, arena.height, arena.friction, arena.bounce
        );
        BattleState {
            arena,
            units: Vec::new(),
            projectiles: ProjectileSystem::new(),
            tick: 0,
            slow_motion: 0.0,
            rng,
        }
    }

    /// Places a unit at rest at `position`
    pub fn add_unit(&mut self, template: &UnitTemplate, position: Vec2) -> Result<UnitId, SetupError> {
        if self.units.len() >= config::MAX_UNITS {
            return Err(SetupError::UnitCapReached(config::MAX_UNITS));
        }
        let template = template.clone().normalize()?;
        let id = UnitId(self.units.len());
        self.units.push(Unit::new(id, &template, position));
        Ok(id)
    }

    /// Spawns every request at random positions with random drift and facing.
    /// Units beyond `MAX_UNITS` are dropped with a warning.
    pub fn spawn(&mut self, requests: &[SpawnRequest]) -> Result<Vec<UnitId>, SetupError> {
        if requests.iter().all(|r| r.count == 0) {
            return Err(SetupError::EmptyBattle);
        }

        let mut spawned = Vec::new();
        for request in requests {
            let template = request.template.clone().normalize()?;
            for _ in 0..request.count {
                if self.units.len() >= config::MAX_UNITS {
                    warn!(
                        target: "battle",
                        "Unit cap of {} reached; remaining spawns dropped",
                        config::MAX_UNITS
                    );
                    return Ok(spawned);
                }
                let id = UnitId(self.units.len());
                let position = self.arena.random_spawn_point(template.radius, &mut self.rng);
                let unit = Unit::spawn(id, &template, position, &mut self.rng);
                info!(
                    target: "battle",
                    "Spawned {} (U{}) at ({:.0}, {:.0})",
                    unit.name, id, position.x, position.y
                );
                self.units.push(unit);
                spawned.push(id);
            }
        }
        Ok(spawned)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub fn alive_count(&self) -> usize {
        self.units.iter().filter(|u| u.is_alive()).count()
    }

    pub fn is_slow_motion(&self) -> bool {
        self.slow_motion > 0.0
    }

    /// One survivor wins, none is a draw
    pub fn outcome(&self) -> BattleOutcome {
        let mut alive = self.units.iter().filter(|u| u.is_alive());
        match (alive.next(), alive.next()) {
            (None, _) => BattleOutcome::Draw,
            (Some(unit), None) => BattleOutcome::Victory(unit.id),
            _ => BattleOutcome::Ongoing,
        }
    }

    /// Advances the battle by one tick.
    ///
    /// Every live unit runs timers, AI, movement and firing in id order. Body
    /// contacts and projectiles are resolved after all units have acted, and
    /// destroyed projectiles are swept only once the tick is done.
    ///
    /// A step rejected by `validate_time_step` only advances the tick counter.
    pub fn simulate_tick(&mut self, dt: f64, time_scale: f64) -> TickReport {
        if let Err(e) = validate_time_step(dt, time_scale) {
            warn!(target: "battle", "[T{:05}] Skipping tick: {}", self.tick, e);
            let tick = self.tick;
            self.tick += 1;
            return TickReport {
                tick,
                events: Vec::new(),
                outcome: self.outcome(),
            };
        }

        let effective_scale = if self.is_slow_motion() {
            time_scale * config::SLOW_MO_FACTOR
        } else {
            time_scale
        };
        let ctx = TickContext::new(self.tick, dt, effective_scale);
        let mut events = Vec::new();

        for i in 0..self.units.len() {
            if !self.units[i].is_alive() {
                continue;
            }
            self.units[i].tick_timers(ctx.scaled_dt());
            ai::update(&mut self.units, i, &ctx, &mut self.rng);
            physics::integrate(&mut self.units[i], &self.arena, &ctx, &mut events);
            weapon::try_fire(&mut self.units, i, &mut self.projectiles, &ctx, &mut events);
        }

        combat::resolve_body_contacts(&mut self.units, &ctx, &mut events);
        self.projectiles.step(&mut self.units, &self.arena, &ctx, &mut events);
        self.projectiles.sweep();

        if self.slow_motion > 0.0 {
            self.slow_motion = (self.slow_motion - dt).max(0.0);
        }
        let big_hit = events
            .iter()
            .any(|e| matches!(e, BattleEvent::DamageApplied { big_hit: true, .. }));
        if big_hit {
            if !self.is_slow_motion() {
                info!(target: "battle", "[T{:05}] Big hit, slow motion", ctx.tick);
            }
            self.slow_motion = config::SLOW_MO_DURATION;
        }

        self.tick += 1;
        let outcome = self.outcome();
        TickReport {
            tick: ctx.tick,
            events,
            outcome,
        }
    }

    /// Units ranked by kills, then damage dealt
    pub fn scoreboard(&self) -> Vec<ScoreLine> {
        let mut lines: Vec<ScoreLine> = self
            .units
            .iter()
            .map(|u| ScoreLine {
                id: u.id,
                name: u.name.clone(),
                alive: u.is_alive(),
                hp: u.hp,
                kills: u.kills,
                hits: u.hits,
                damage_dealt: u.damage_dealt,
                damage_taken: u.damage_taken,
            })
            .collect();
        lines.sort_by(|a, b| {
            b.kills
                .cmp(&a.kills)
                .then(b.damage_dealt.total_cmp(&a.damage_dealt))
                .then(a.id.cmp(&b.id))
        });
        lines
    }
}

/// Checks a step size and time scale before they reach the simulation.
/// `dt` must be finite and positive; `time_scale` finite and non-negative.
pub fn validate_time_step(dt: f64, time_scale: f64) -> Result<(), SetupError> {
    if dt.is_finite() && dt > 0.0 && time_scale.is_finite() && time_scale >= 0.0 {
        Ok(())
    } else {
        Err(SetupError::InvalidTimeStep { dt, time_scale })
    }
}

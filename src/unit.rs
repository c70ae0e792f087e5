use crate::config;
use crate::template::{Archetype, UnitTemplate, WeaponTemplate};
use crate::types::{DamageKind, UnitId, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

/// What a live unit's AI is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Wandering, // No target
    Seeking,   // Target acquired, out of attack range
    InRange,   // Target within attack range
}

/// Simulation-relevant lifecycle. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    Alive(AiState),
    Dead,
}

/// A combatant on the battlefield
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub archetype: Archetype,

    // Physical state
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f64, // Facing in radians
    pub radius: f64,
    pub speed: f64, // Base speed; the velocity cap is twice this

    // Combat state
    pub hp: f64,
    pub max_hp: f64,
    pub body_damage: f64,
    pub has_iframes: bool,
    pub iframe_timer: f64,
    pub cooldown: f64,
    pub contact_timer: f64,
    alive: bool,

    // Targeting
    pub ai_state: AiState,
    pub target: Option<UnitId>, // Weak: resolved through BattleState every tick
    pub aggro_range: f64,
    pub attack_range: f64,
    pub wander_timer: f64,

    /// Per-unit copy so overrides never leak between units
    pub weapon: WeaponTemplate,

    // Telemetry
    pub kills: u32,
    pub hits: u32,
    pub damage_dealt: f64,
    pub damage_taken: f64,
}

impl Unit {
    /// Creates a unit at rest, facing east. The template should already be normalized.
    pub fn new(id: UnitId, template: &UnitTemplate, position: Vec2) -> Self {
        let max_hp = template.max_hp.unwrap_or(template.hp).max(template.hp);
        Unit {
            id,
            name: template.name.clone(),
            archetype: template.archetype,
            position,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            radius: template.radius,
            speed: template.speed,
            hp: template.hp,
            max_hp,
            body_damage: template.body_damage,
            has_iframes: template.has_iframes,
            iframe_timer: 0.0,
            cooldown: 0.0,
            contact_timer: 0.0,
            alive: true,
            ai_state: AiState::Wandering,
            target: None,
            aggro_range: template.aggro_range,
            attack_range: template.weapon.attack_range(),
            wander_timer: 0.0,
            weapon: template.weapon.clone(),
            kills: 0,
            hits: 0,
            damage_dealt: 0.0,
            damage_taken: 0.0,
        }
    }

    /// Creates a unit with a random facing and a random initial drift of up to
    /// `speed` on each axis.
    pub fn spawn<R: Rng>(id: UnitId, template: &UnitTemplate, position: Vec2, rng: &mut R) -> Self {
        let mut unit = Unit::new(id, template, position);
        unit.velocity = Vec2::new(
            (rng.r#gen::<f64>() - 0.5) * unit.speed * 2.0,
            (rng.r#gen::<f64>() - 0.5) * unit.speed * 2.0,
        );
        unit.rotation = rng.r#gen::<f64>() * TAU;
        unit
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn status(&self) -> UnitStatus {
        if self.alive {
            UnitStatus::Alive(self.ai_state)
        } else {
            UnitStatus::Dead
        }
    }

    /// Flips the unit to dead. Only the combat resolver calls this, and only once.
    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
        self.target = None;
        self.velocity = Vec2::ZERO;
    }

    pub fn max_speed(&self) -> f64 {
        self.speed * config::MAX_SPEED_FACTOR
    }

    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.rotation)
    }

    pub fn is_invulnerable(&self) -> bool {
        self.iframe_timer > 0.0
    }

    /// Damage type dealt by this unit's weapon
    pub fn damage_kind(&self) -> DamageKind {
        match self.archetype {
            Archetype::Magic => DamageKind::Magic,
            _ => DamageKind::Physical,
        }
    }

    /// Counts down invulnerability, weapon cooldown and contact timers
    pub fn tick_timers(&mut self, scaled_dt: f64) {
        if self.iframe_timer > 0.0 {
            self.iframe_timer -= scaled_dt;
        }
        if self.cooldown > 0.0 {
            self.cooldown -= scaled_dt;
        }
        if self.contact_timer > 0.0 {
            self.contact_timer -= scaled_dt;
        }
    }

    pub fn overlaps(&self, other: &Unit) -> bool {
        self.position.distance(&other.position) < self.radius + other.radius
    }
}

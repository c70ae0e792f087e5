use crate::arena::Arena;
use crate::combat;
use crate::config;
use crate::template::{ExplosionConfig, HomingConfig, ProjectileTemplate, WallBehavior};
use crate::types::{BattleEvent, DamageKind, ProjectileId, TickContext, UnitId, Vec2};
use crate::unit::Unit;
use crate::utils::angle_lerp;
use std::collections::HashSet;

/// A projectile in flight. Removal is deferred: `destroyed` marks it and
/// `ProjectileSystem::sweep` drops it after the tick.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: ProjectileId,
    pub owner: UnitId, // Weak: used for kill credit, ignored by collision
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity: f64,
    pub life: u32,
    pub initial_life: u32,
    pub destroyed: bool,
    pub damage: f64,
    pub kind: DamageKind,
    pub size: f64,
    pub pierce: bool,
    pub on_wall_hit: WallBehavior,
    pub remaining_bounces: u32,
    pub homing: Option<HomingConfig>,
    pub explosion: Option<ExplosionConfig>,
    exploded: bool,
    hit_set: HashSet<UnitId>,
}

impl Projectile {
    /// Fraction of the original lifetime still remaining
    pub fn life_fraction(&self) -> f64 {
        if self.initial_life == 0 {
            return 0.0;
        }
        self.life as f64 / self.initial_life as f64
    }

    pub fn has_hit(&self, unit: UnitId) -> bool {
        self.hit_set.contains(&unit)
    }

    fn steer_towards_nearest(&mut self, units: &[Unit], ctx: &TickContext) {
        let Some(homing) = self.homing else {
            return;
        };
        let target = units
            .iter()
            .filter(|u| u.is_alive() && u.id != self.owner)
            .map(|u| (u, self.position.distance(&u.position)))
            .filter(|(_, d)| *d < homing.radius)
            .min_by(|a, b| a.1.total_cmp(&b.1));
        let Some((target, _)) = target else {
            return;
        };

        // Overlapping or stalled projectiles have no direction to rotate
        let speed = self.velocity.length();
        let Some(desired) = (target.position - self.position).normalized() else {
            return;
        };
        if speed < 1e-9 {
            return;
        }
        let heading = angle_lerp(self.velocity.angle(), desired.angle(), homing.strength);
        let steered = Vec2::from_angle(heading) * speed;
        if steered.is_finite() {
            self.velocity = steered;
            crate::debug_projectile!(self.id, ctx.tick, "Homing on U{}", target.id);
        }
    }

    /// Applies the wall policy once the projectile leaves the arena.
    /// A corner exit counts as a single contact.
    fn resolve_walls(&mut self, arena: &Arena, ctx: &TickContext) {
        let out_x = self.position.x < 0.0 || self.position.x > arena.width;
        let out_y = self.position.y < 0.0 || self.position.y > arena.height;
        if !out_x && !out_y {
            return;
        }

        if self.on_wall_hit == WallBehavior::Destroy || self.remaining_bounces == 0 {
            crate::debug_projectile!(
                self.id,
                ctx.tick,
                "Hit wall at ({:.1}, {:.1})",
                self.position.x,
                self.position.y
            );
            self.destroyed = true;
            return;
        }

        if out_x {
            self.velocity.x = -self.velocity.x;
            self.position.x = self.position.x.clamp(0.0, arena.width);
        }
        if out_y {
            self.velocity.y = -self.velocity.y;
            self.position.y = self.position.y.clamp(0.0, arena.height);
        }
        self.remaining_bounces -= 1;
        crate::debug_projectile!(
            self.id,
            ctx.tick,
            "Bounced, {} bounces left",
            self.remaining_bounces
        );
    }

    fn collide_units(&mut self, units: &mut [Unit], ctx: &TickContext, events: &mut Vec<BattleEvent>) {
        for i in 0..units.len() {
            let unit = &units[i];
            if !unit.is_alive() || unit.id == self.owner || self.hit_set.contains(&unit.id) {
                continue;
            }
            if self.position.distance(&unit.position) >= unit.radius + self.size {
                continue;
            }

            let target = unit.id;
            self.hit_set.insert(target);
            crate::debug_projectile!(self.id, ctx.tick, "Hit U{} for {:.1}", target, self.damage);
            combat::apply_damage(units, target, self.damage, Some(self.owner), self.kind, ctx, events);
            if !self.pierce {
                self.destroyed = true;
                return;
            }
        }
    }

    fn detonate(&mut self, units: &mut [Unit], ctx: &TickContext, events: &mut Vec<BattleEvent>) {
        if self.exploded {
            return;
        }
        let Some(explosion) = self.explosion else {
            return;
        };
        self.exploded = true;

        crate::debug_projectile!(
            self.id,
            ctx.tick,
            "Exploded at ({:.1}, {:.1})",
            self.position.x,
            self.position.y
        );
        events.push(BattleEvent::ExplosionTriggered {
            projectile: self.id,
            owner: self.owner,
            position: self.position,
            radius: explosion.radius,
            damage: explosion.damage,
        });
        combat::apply_area_damage(
            units,
            self.position,
            explosion.radius,
            explosion.damage,
            Some(self.owner),
            self.kind,
            ctx,
            events,
        );
    }
}

/// Parameters chosen by the firing unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub owner: UnitId,
    pub position: Vec2,
    pub direction: Vec2,
    pub damage: f64,
    pub kind: DamageKind,
}

/// Owns every live projectile and advances them once per tick
#[derive(Debug, Default)]
pub struct ProjectileSystem {
    projectiles: Vec<Projectile>,
    next_id: u64,
}

impl ProjectileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a projectile from `template`. Returns None once the arena
    /// already holds `MAX_PROJECTILES`.
    pub fn spawn(&mut self, launch: ProjectileLaunch, template: &ProjectileTemplate) -> Option<ProjectileId> {
        if self.projectiles.len() >= config::MAX_PROJECTILES {
            return None;
        }
        let id = ProjectileId(self.next_id);
        self.next_id += 1;

        let direction = launch.direction.normalized().unwrap_or(Vec2::new(1.0, 0.0));
        self.projectiles.push(Projectile {
            id,
            owner: launch.owner,
            position: launch.position,
            velocity: direction * template.speed,
            gravity: template.gravity,
            life: template.life,
            initial_life: template.life,
            destroyed: false,
            damage: launch.damage,
            kind: launch.kind,
            size: template.size,
            pierce: template.pierce,
            on_wall_hit: template.on_wall_hit,
            remaining_bounces: template.bounce_count,
            homing: template.active_homing(),
            explosion: template.active_explosion(),
            exploded: false,
            hit_set: HashSet::new(),
        });
        Some(id)
    }

    pub fn get(&self, id: ProjectileId) -> Option<&Projectile> {
        self.projectiles.iter().find(|p| p.id == id)
    }

    pub fn get_mut(&mut self, id: ProjectileId) -> Option<&mut Projectile> {
        self.projectiles.iter_mut().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Advances every projectile that is not already destroyed:
    /// homing, gravity, movement, walls, unit hits, lifetime, then the
    /// explosion of anything destroyed along the way.
    pub fn step(&mut self, units: &mut [Unit], arena: &Arena, ctx: &TickContext, events: &mut Vec<BattleEvent>) {
        let scaled_dt = ctx.scaled_dt();
        for projectile in self.projectiles.iter_mut().filter(|p| !p.destroyed) {
            projectile.steer_towards_nearest(units, ctx);
            projectile.velocity.y += projectile.gravity * scaled_dt;
            projectile.position += projectile.velocity * scaled_dt;

            projectile.resolve_walls(arena, ctx);
            if !projectile.destroyed {
                projectile.collide_units(units, ctx, events);
            }

            projectile.life = projectile.life.saturating_sub(1);
            if projectile.life == 0 && !projectile.destroyed {
                crate::debug_projectile!(projectile.id, ctx.tick, "Expired");
                projectile.destroyed = true;
            }

            if projectile.destroyed {
                projectile.detonate(units, ctx, events);
            }
        }
    }

    /// Drops destroyed projectiles. Returns how many were removed.
    pub fn sweep(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| !p.destroyed);
        before - self.projectiles.len()
    }
}

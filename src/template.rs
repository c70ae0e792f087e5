//! Unit, weapon and projectile templates plus the built-in roster.
//!
//! Templates are plain configuration. Fields that are often left out by
//! hand-written templates are `Option`s and resolve to documented defaults
//! through accessor methods, so a sparse template never fails a tick.

use crate::config;
use crate::error::SetupError;
use std::str::FromStr;

/// Combat archetype; selects the AI movement policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Melee,
    Ranged,
    Body,
    Magic,
}

impl FromStr for Archetype {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "melee" | "warrior" | "assassin" | "knight" => Ok(Archetype::Melee),
            "ranged" | "ranger" | "archer" | "gunner" => Ok(Archetype::Ranged),
            "body" | "berserker" | "brute" | "tank" => Ok(Archetype::Body),
            "magic" | "mage" | "wizard" | "caster" => Ok(Archetype::Magic),
            other => Err(SetupError::UnknownArchetype(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    None,
    Melee,
    Projectile,
    /// Contact damage only; never fires
    Body,
}

/// What a projectile does when it leaves the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WallBehavior {
    #[default]
    Destroy,
    Bounce,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomingConfig {
    pub enabled: bool,
    pub strength: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExplosionConfig {
    pub enabled: bool,
    pub radius: f64,
    pub damage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileTemplate {
    /// Falls back to the weapon's damage when absent
    pub damage: Option<f64>,
    pub speed: f64,
    pub life: u32,
    pub size: f64,
    pub on_wall_hit: WallBehavior,
    pub bounce_count: u32,
    pub pierce: bool,
    pub gravity: f64,
    pub homing: Option<HomingConfig>,
    pub explosion: Option<ExplosionConfig>,
}

impl Default for ProjectileTemplate {
    fn default() -> Self {
        ProjectileTemplate {
            damage: None,
            speed: config::DEFAULT_PROJECTILE_SPEED,
            life: config::DEFAULT_PROJECTILE_LIFE,
            size: config::DEFAULT_PROJECTILE_SIZE,
            on_wall_hit: WallBehavior::Destroy,
            bounce_count: 0,
            pierce: false,
            gravity: 0.0,
            homing: None,
            explosion: None,
        }
    }
}

impl ProjectileTemplate {
    fn normalized(mut self) -> Self {
        if !(self.speed.is_finite() && self.speed > 0.0) {
            self.speed = config::DEFAULT_PROJECTILE_SPEED;
        }
        if self.life == 0 {
            self.life = config::DEFAULT_PROJECTILE_LIFE;
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            self.size = config::DEFAULT_PROJECTILE_SIZE;
        }
        if !self.gravity.is_finite() {
            self.gravity = 0.0;
        }
        self
    }

    /// Homing settings when enabled and usable
    pub fn active_homing(&self) -> Option<HomingConfig> {
        self.homing
            .filter(|h| h.enabled && h.radius > 0.0 && h.strength > 0.0)
    }

    pub fn active_explosion(&self) -> Option<ExplosionConfig> {
        self.explosion.filter(|e| e.enabled && e.radius > 0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponTemplate {
    pub kind: WeaponKind,
    pub damage: Option<f64>,
    pub cooldown: Option<f64>,
    pub range: Option<f64>,
    pub projectile: Option<ProjectileTemplate>,
}

impl WeaponTemplate {
    pub fn none() -> Self {
        WeaponTemplate {
            kind: WeaponKind::None,
            damage: None,
            cooldown: None,
            range: None,
            projectile: None,
        }
    }

    pub fn melee(damage: f64, cooldown: f64, range: f64) -> Self {
        WeaponTemplate {
            kind: WeaponKind::Melee,
            damage: Some(damage),
            cooldown: Some(cooldown),
            range: Some(range),
            projectile: None,
        }
    }

    pub fn projectile(damage: f64, cooldown: f64, range: f64, projectile: ProjectileTemplate) -> Self {
        WeaponTemplate {
            kind: WeaponKind::Projectile,
            damage: Some(damage),
            cooldown: Some(cooldown),
            range: Some(range),
            projectile: Some(projectile),
        }
    }

    pub fn damage(&self) -> f64 {
        positive_or(self.damage, config::DEFAULT_WEAPON_DAMAGE)
    }

    /// Cooldown in ticks applied after each attack
    pub fn cooldown(&self) -> f64 {
        let fallback = match self.kind {
            WeaponKind::Melee => config::MELEE_COOLDOWN,
            _ => config::PROJECTILE_COOLDOWN,
        };
        positive_or(self.cooldown, fallback)
    }

    /// Range the AI tries to keep to its target
    pub fn attack_range(&self) -> f64 {
        positive_or(self.range, config::DEFAULT_ATTACK_RANGE)
    }

    /// Reach of a melee swing beyond the attacker's radius
    pub fn melee_reach(&self) -> f64 {
        positive_or(self.range, config::DEFAULT_MELEE_RANGE)
    }

    /// Projectile template, or the defaults when a projectile weapon has none
    pub fn projectile_template(&self) -> ProjectileTemplate {
        self.projectile.clone().unwrap_or_default()
    }

    /// Damage per projectile hit: projectile damage, then weapon damage, then the default
    pub fn projectile_damage(&self) -> f64 {
        let from_projectile = self.projectile.as_ref().and_then(|p| p.damage);
        positive_or(from_projectile.or(self.damage), config::DEFAULT_WEAPON_DAMAGE)
    }

    pub fn fires(&self) -> bool {
        matches!(self.kind, WeaponKind::Melee | WeaponKind::Projectile)
    }
}

fn positive_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => fallback,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnitTemplate {
    pub name: String,
    pub archetype: Archetype,
    pub hp: f64,
    pub max_hp: Option<f64>,
    pub speed: f64,
    pub radius: f64,
    pub has_iframes: bool,
    pub body_damage: f64,
    pub aggro_range: f64,
    pub weapon: WeaponTemplate,
}

impl UnitTemplate {
    /// A template with every optional stat at its default
    pub fn new(name: &str, archetype: Archetype) -> Self {
        UnitTemplate {
            name: name.to_string(),
            archetype,
            hp: config::DEFAULT_UNIT_HP,
            max_hp: None,
            speed: config::DEFAULT_UNIT_SPEED,
            radius: config::DEFAULT_UNIT_RADIUS,
            has_iframes: false,
            body_damage: 0.0,
            aggro_range: config::DEFAULT_AGGRO_RANGE,
            weapon: WeaponTemplate::none(),
        }
    }

    /// Rejects structurally invalid templates and fills defaults for
    /// missing or nonsensical numeric fields.
    pub fn normalize(mut self) -> Result<Self, SetupError> {
        if self.name.trim().is_empty() {
            return Err(SetupError::MissingName);
        }
        self.hp = positive_or(Some(self.hp), config::DEFAULT_UNIT_HP);
        self.max_hp = Some(positive_or(self.max_hp, self.hp).max(self.hp));
        self.speed = positive_or(Some(self.speed), config::DEFAULT_UNIT_SPEED);
        self.radius = positive_or(Some(self.radius), config::DEFAULT_UNIT_RADIUS);
        self.aggro_range = positive_or(Some(self.aggro_range), config::DEFAULT_AGGRO_RANGE);
        if !(self.body_damage.is_finite() && self.body_damage >= 0.0) {
            self.body_damage = 0.0;
        }
        self.weapon.projectile = self.weapon.projectile.take().map(ProjectileTemplate::normalized);
        Ok(self)
    }
}

/// Keys accepted by `builtin`
pub const BUILTIN_NAMES: [&str; 5] = ["swordsman", "archer", "berserker", "mage", "assassin"];

/// Looks up one of the built-in unit templates by key (case-insensitive)
pub fn builtin(key: &str) -> Option<UnitTemplate> {
    let template = match key.trim().to_lowercase().as_str() {
        "swordsman" => UnitTemplate {
            has_iframes: true,
            body_damage: 15.0,
            weapon: WeaponTemplate::melee(25.0, 20.0, 35.0),
            ..stats("Swordsman", Archetype::Melee, 300.0, 2.0, 16.0)
        },
        "archer" => UnitTemplate {
            body_damage: 5.0,
            weapon: WeaponTemplate::projectile(
                15.0,
                25.0,
                300.0,
                ProjectileTemplate {
                    damage: Some(15.0),
                    speed: 12.0,
                    life: 80,
                    size: 4.0,
                    ..ProjectileTemplate::default()
                },
            ),
            ..stats("Archer", Archetype::Ranged, 150.0, 2.8, 12.0)
        },
        "berserker" => UnitTemplate {
            body_damage: 30.0,
            weapon: WeaponTemplate {
                kind: WeaponKind::Body,
                damage: Some(0.0),
                cooldown: Some(0.0),
                range: None,
                projectile: None,
            },
            ..stats("Berserker", Archetype::Body, 400.0, 3.5, 20.0)
        },
        "mage" => UnitTemplate {
            weapon: WeaponTemplate::projectile(
                25.0,
                60.0,
                400.0,
                ProjectileTemplate {
                    damage: Some(25.0),
                    speed: 6.0,
                    life: 120,
                    size: 10.0,
                    on_wall_hit: WallBehavior::Bounce,
                    bounce_count: 2,
                    homing: Some(HomingConfig {
                        enabled: true,
                        strength: 0.05,
                        radius: 150.0,
                    }),
                    explosion: Some(ExplosionConfig {
                        enabled: true,
                        radius: 40.0,
                        damage: 15.0,
                    }),
                    ..ProjectileTemplate::default()
                },
            ),
            ..stats("Battle Mage", Archetype::Magic, 180.0, 1.8, 14.0)
        },
        "assassin" => UnitTemplate {
            has_iframes: true,
            body_damage: 20.0,
            weapon: WeaponTemplate::melee(40.0, 15.0, 25.0),
            ..stats("Shadow Assassin", Archetype::Melee, 200.0, 4.0, 10.0)
        },
        _ => return None,
    };
    Some(template)
}

fn stats(name: &str, archetype: Archetype, hp: f64, speed: f64, radius: f64) -> UnitTemplate {
    UnitTemplate {
        hp,
        max_hp: Some(hp),
        speed,
        radius,
        ..UnitTemplate::new(name, archetype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_builtin_roster_is_complete() {
        for key in BUILTIN_NAMES {
            let template = builtin(key).unwrap_or_else(|| panic!("missing builtin {}", key));
            assert!(template.clone().normalize().is_ok(), "{} should normalize", key);
        }
        assert!(builtin("dragon").is_none());
        assert_eq!(builtin("MAGE").map(|t| t.archetype), Some(Archetype::Magic));
    }

    #[test]
    fn test_weapon_defaults_by_kind() {
        let mut melee = WeaponTemplate::melee(25.0, 20.0, 35.0);
        melee.cooldown = None;
        melee.range = None;
        assert_approx_eq!(melee.cooldown(), config::MELEE_COOLDOWN);
        assert_approx_eq!(melee.melee_reach(), config::DEFAULT_MELEE_RANGE);
        assert_approx_eq!(melee.attack_range(), config::DEFAULT_ATTACK_RANGE);

        let ranged = WeaponTemplate {
            kind: WeaponKind::Projectile,
            damage: None,
            cooldown: None,
            range: None,
            projectile: None,
        };
        assert_approx_eq!(ranged.cooldown(), config::PROJECTILE_COOLDOWN);
        assert_approx_eq!(ranged.projectile_damage(), config::DEFAULT_WEAPON_DAMAGE);
        assert_eq!(ranged.projectile_template(), ProjectileTemplate::default());
    }

    #[test]
    fn test_projectile_damage_fallback_chain() {
        let mut weapon = WeaponTemplate::projectile(
            18.0,
            25.0,
            300.0,
            ProjectileTemplate {
                damage: Some(12.0),
                ..ProjectileTemplate::default()
            },
        );
        assert_approx_eq!(weapon.projectile_damage(), 12.0);
        weapon.projectile.as_mut().unwrap().damage = None;
        assert_approx_eq!(weapon.projectile_damage(), 18.0);
    }

    #[test]
    fn test_normalize_rejects_missing_name_and_fills_defaults() {
        let nameless = UnitTemplate::new("  ", Archetype::Melee);
        assert_eq!(nameless.normalize(), Err(SetupError::MissingName));

        let mut sparse = UnitTemplate::new("Blob", Archetype::Body);
        sparse.hp = 0.0;
        sparse.speed = f64::NAN;
        sparse.radius = -3.0;
        sparse.weapon.projectile = Some(ProjectileTemplate {
            speed: 0.0,
            life: 0,
            ..ProjectileTemplate::default()
        });
        let normalized = sparse.normalize().unwrap();
        assert_approx_eq!(normalized.hp, config::DEFAULT_UNIT_HP);
        assert_eq!(normalized.max_hp, Some(config::DEFAULT_UNIT_HP));
        assert_approx_eq!(normalized.speed, config::DEFAULT_UNIT_SPEED);
        assert_approx_eq!(normalized.radius, config::DEFAULT_UNIT_RADIUS);
        let projectile = normalized.weapon.projectile.unwrap();
        assert_approx_eq!(projectile.speed, config::DEFAULT_PROJECTILE_SPEED);
        assert_eq!(projectile.life, config::DEFAULT_PROJECTILE_LIFE);
    }

    #[test]
    fn test_archetype_aliases() {
        assert_eq!("Warrior".parse::<Archetype>(), Ok(Archetype::Melee));
        assert_eq!("ranger".parse::<Archetype>(), Ok(Archetype::Ranged));
        assert_eq!("BRUTE".parse::<Archetype>(), Ok(Archetype::Body));
        assert_eq!("wizard".parse::<Archetype>(), Ok(Archetype::Magic));
        assert!("spectator".parse::<Archetype>().is_err());
    }
}

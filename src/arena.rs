use crate::config::{self, Environment, PhysicsMode};
use crate::error::SetupError;
use crate::types::Vec2;
use rand::Rng;

/// The rectangular battlefield. Obstacle-free apart from its four walls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f64,
    pub height: f64,
    pub friction: f64, // Velocity multiplier applied every tick
    pub bounce: f64,   // Velocity kept on the reflected axis after a wall hit
}

impl Arena {
    /// Creates an arena with default friction and wall damping.
    /// Non-positive or non-finite dimensions are rejected before any tick runs.
    pub fn new(width: f64, height: f64) -> Result<Self, SetupError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(SetupError::InvalidArena { width, height });
        }
        Ok(Arena {
            width,
            height,
            friction: config::DEFAULT_FRICTION,
            bounce: config::WALL_BOUNCE_DAMPING,
        })
    }

    /// Overrides friction and bounce, validating that both lie in [0, 1]
    pub fn with_coefficients(mut self, friction: f64, bounce: f64) -> Result<Self, SetupError> {
        for (name, value) in [("friction", friction), ("bounce", bounce)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SetupError::InvalidCoefficient { name, value });
            }
        }
        self.friction = friction;
        self.bounce = bounce;
        Ok(self)
    }

    pub fn with_physics_mode(mut self, mode: PhysicsMode) -> Self {
        self.friction = mode.friction();
        self.bounce = mode.bounce();
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.friction = environment.friction();
        self.bounce = environment.bounce();
        self
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// True when the point lies inside the arena, walls included
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }

    /// Picks a uniformly random point at least `radius` away from every wall.
    /// Bodies larger than the arena are placed at the center.
    pub fn random_spawn_point<R: Rng>(&self, radius: f64, rng: &mut R) -> Vec2 {
        let x = if self.width > 2.0 * radius {
            rng.gen_range(radius..self.width - radius)
        } else {
            self.width / 2.0
        };
        let y = if self.height > 2.0 * radius {
            rng.gen_range(radius..self.height - radius)
        } else {
            self.height / 2.0
        };
        Vec2::new(x, y)
    }
}

impl Default for Arena {
    fn default() -> Self {
        Arena {
            width: config::DEFAULT_ARENA_WIDTH,
            height: config::DEFAULT_ARENA_HEIGHT,
            friction: config::DEFAULT_FRICTION,
            bounce: config::WALL_BOUNCE_DAMPING,
        }
    }
}

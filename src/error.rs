// Setup-time errors: invalid arenas, malformed templates, bad spawn requests

use thiserror::Error;

/// Errors raised while preparing a battle. Ticks themselves never fail.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SetupError {
    #[error("Arena dimensions must be positive and finite (got {width} x {height})")]
    InvalidArena { width: f64, height: f64 },
    #[error("Arena coefficient `{name}` must lie in [0, 1] (got {value})")]
    InvalidCoefficient { name: &'static str, value: f64 },
    #[error("Unit template is missing required field: name")]
    MissingName,
    #[error("Unknown unit template `{0}`")]
    UnknownTemplate(String),
    #[error("Unknown archetype `{0}`")]
    UnknownArchetype(String),
    #[error("Invalid spawn request `{0}` (expected name[:count])")]
    InvalidSpawnRequest(String),
    #[error("Battle has no units to spawn")]
    EmptyBattle,
    #[error("Unit cap of {0} reached")]
    UnitCapReached(usize),
    #[error("Step size must be positive and time scale non-negative, both finite (got dt {dt}, time scale {time_scale})")]
    InvalidTimeStep { dt: f64, time_scale: f64 },
}

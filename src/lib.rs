pub mod ai;
pub mod arena;
pub mod battle;
pub mod combat;
pub mod config;
pub mod error;
pub mod logging;
pub mod physics;
pub mod projectile;
pub mod template;
pub mod types;
pub mod unit;
pub mod utils;
pub mod weapon;

pub use arena::Arena;
pub use battle::{BattleOutcome, BattleState, SpawnRequest, TickReport, validate_time_step};
pub use error::SetupError;

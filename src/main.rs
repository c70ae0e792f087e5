use arena_brawl::config::{self, Environment, PhysicsMode};
use arena_brawl::logging;
use arena_brawl::{Arena, BattleOutcome, BattleState, SetupError, SpawnRequest, validate_time_step};
use clap::Parser;
use log::{LevelFilter, error, info, warn};
use std::process;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Units to spawn as name[:count] (swordsman, archer, berserker, mage, assassin)
    #[arg(required = true, num_args = 1..)]
    units: Vec<String>,

    /// Arena width
    #[arg(long, default_value_t = config::DEFAULT_ARENA_WIDTH)]
    width: f64,

    /// Arena height
    #[arg(long, default_value_t = config::DEFAULT_ARENA_HEIGHT)]
    height: f64,

    /// Global physics preset (overrides the default friction and wall bounce)
    #[arg(long, value_enum)]
    physics_mode: Option<PhysicsMode>,

    /// Arena floor; applied after the physics preset
    #[arg(long, value_enum)]
    environment: Option<Environment>,

    /// Global time scale
    #[arg(long, default_value_t = 1.0)]
    time_scale: f64,

    /// Step size per tick
    #[arg(long, default_value_t = config::DEFAULT_DT)]
    dt: f64,

    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = config::DEFAULT_MAX_TICKS)]
    max_ticks: u64,

    /// Seed for spawn positions and wandering
    #[arg(long)]
    seed: Option<u64>,

    /// Debug filter to specify log topics (e.g., "ai,combat"); unknown topics are reported
    /// Available topics: ai, physics, weapon, projectile, combat, battle
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn setup(args: &Args) -> Result<BattleState, SetupError> {
    validate_time_step(args.dt, args.time_scale)?;
    let mut arena = Arena::new(args.width, args.height)?;
    if let Some(mode) = args.physics_mode {
        arena = arena.with_physics_mode(mode);
    }
    if let Some(environment) = args.environment {
        info!("Environment: {}", environment.name());
        arena = arena.with_environment(environment);
    }

    let requests = args
        .units
        .iter()
        .map(|s| s.parse::<SpawnRequest>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut battle = match args.seed {
        Some(seed) => BattleState::with_seed(arena, seed),
        None => BattleState::new(arena),
    };
    battle.spawn(&requests)?;
    Ok(battle)
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize the logger
    let log_level = match args.log_level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    // Setup logger with debug filters if provided
    if let Err(e) = logging::init_logger(log_level, args.debug_filter.clone()) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    if let Some(filter) = &args.debug_filter {
        let unknown = logging::unknown_topics(filter);
        if !unknown.is_empty() {
            warn!(
                "Unknown debug topics: {} (available: {})",
                unknown.join(", "),
                logging::TOPICS.join(", ")
            );
        }
    }

    info!("Initializing Arena Brawl...");

    let mut battle = match setup(&args) {
        Ok(battle) => battle,
        Err(e) => {
            error!("Setup failed: {}", e);
            process::exit(1);
        }
    };
    info!(
        "Simulating {} units for at most {} ticks.",
        battle.units.len(),
        args.max_ticks
    );

    let mut outcome = battle.outcome();
    while outcome == BattleOutcome::Ongoing && battle.tick < args.max_ticks {
        outcome = battle.simulate_tick(args.dt, args.time_scale).outcome;
    }

    match outcome {
        BattleOutcome::Victory(id) => {
            let name = battle.unit(id).map(|u| u.name.as_str()).unwrap_or("?");
            info!("{} (U{}) wins after {} ticks!", name, id, battle.tick);
        }
        BattleOutcome::Draw => info!("Draw after {} ticks!", battle.tick),
        BattleOutcome::Ongoing => info!("Time limit reached after {} ticks.", battle.tick),
    }

    info!("Scoreboard ({} of {} alive):", battle.alive_count(), battle.units.len());
    for line in battle.scoreboard() {
        info!("  {}", line);
    }
}

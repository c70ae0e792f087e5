use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log topics accepted by `--debug-filter`
pub const TOPICS: [&str; 6] = ["ai", "physics", "weapon", "projectile", "combat", "battle"];

#[derive(Debug)]
struct ArenaLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl ArenaLogger {
    fn topic_enabled(&self, target: &str) -> bool {
        match &self.debug_filters {
            Some(filters) => {
                filters.contains(target) || filters.iter().any(|f| target.starts_with(f.as_str()))
            }
            None => true,
        }
    }
}

impl log::Log for ArenaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Filters only narrow the chatty levels
        if metadata.level() >= log::Level::Debug {
            return self.topic_enabled(metadata.target());
        }
        true
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {target}: {message}",
            level = record.level(),
            target = record.target(),
            message = record.args()
        );

        if let Some(module_path) = record.module_path() {
            if module_path != record.target() && record.level() >= log::Level::Debug {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // Logging must never take the simulation down
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<ArenaLogger> = OnceLock::new();

/// Parses a comma separated topic list such as "ai,combat"
pub fn parse_debug_filter(filter: &str) -> HashSet<String> {
    filter
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Entries of `filter` that name no known topic, in the order given
pub fn unknown_topics(filter: &str) -> Vec<String> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !TOPICS.iter().any(|t| t.starts_with(s)))
        .map(str::to_string)
        .collect()
}

/// Installs the arena logger. Debug and trace records are limited to the
/// topics in `debug_filter` when one is given.
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(|| ArenaLogger {
        level,
        debug_filters: debug_filter.as_deref().map(parse_debug_filter),
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

// Topic macros: `debug_ai!(unit_id, tick, "...")` prints a [U##][T#####] prefix
#[macro_export]
macro_rules! debug_ai {
    ($unit_id:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "ai", "[U{:02}][T{:05}] {}", $unit_id, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_physics {
    ($unit_id:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "physics", "[U{:02}][T{:05}] {}", $unit_id, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_weapon {
    ($unit_id:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "weapon", "[U{:02}][T{:05}] {}", $unit_id, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_projectile {
    ($projectile_id:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "projectile", "[{}][T{:05}] {}", $projectile_id, $tick, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! debug_combat {
    ($unit_id:expr, $tick:expr, $($arg:tt)*) => {
        log::debug!(target: "combat", "[U{:02}][T{:05}] {}", $unit_id, $tick, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_debug_filter() {
        let filters = parse_debug_filter("ai, combat,,projectile ");
        assert_eq!(filters.len(), 3);
        assert!(filters.contains("ai"));
        assert!(filters.contains("combat"));
        assert!(filters.contains("projectile"));
    }

    #[test]
    fn test_unknown_topics() {
        assert!(unknown_topics("ai,combat, battle").is_empty());
        assert_eq!(unknown_topics("ai,combta,,render"), vec!["combta", "render"]);
        assert!(unknown_topics("").is_empty());
    }

    #[test]
    fn test_topic_filtering() {
        let logger = ArenaLogger {
            level: LevelFilter::Debug,
            debug_filters: Some(parse_debug_filter("combat")),
        };
        assert!(logger.topic_enabled("combat"));
        assert!(!logger.topic_enabled("ai"));

        let unfiltered = ArenaLogger {
            level: LevelFilter::Debug,
            debug_filters: None,
        };
        assert!(unfiltered.topic_enabled("physics"));
        assert!(TOPICS.iter().all(|t| unfiltered.topic_enabled(t)));
    }
}

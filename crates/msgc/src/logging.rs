//! Collector Logging and Tracing
//!
//! Structured events for collector operations, useful for:
//! - Performance analysis
//! - Leak hunting
//! - Debugging
//!
//! Events are forwarded to the `log` facade at the event's level and kept in
//! a bounded in-memory history.
//!
//! Log Levels:
//! - ERROR: invariant violations
//! - WARN: unusual conditions (purged roots, unreachable cycles)
//! - INFO: collection cycles
//! - DEBUG: phases, compaction
//! - TRACE: per-phase statistics

use crate::marker::MarkStats;
use crate::object::ObjectHandle;
use crate::relocate::CompactionStats;
use crate::sweep::SweepStats;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Log level for collector events
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// Collector event types
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GcEvent {
    /// Collection cycle started
    CycleStart {
        cycle: u64,
        objects: usize,
        roots: usize,
    },

    /// Phase completed
    PhaseEnd {
        cycle: u64,
        phase: String,
        duration_ms: f64,
    },

    /// Mark phase statistics
    Mark { cycle: u64, stats: MarkStats },

    /// Sweep phase statistics
    Sweep { cycle: u64, stats: SweepStats },

    /// Compaction statistics
    Compaction { stats: CompactionStats },

    /// Cycle diagnosis result
    Cycles {
        cycles: usize,
        cyclic_objects: usize,
        unreachable: Vec<ObjectHandle>,
    },

    /// Sweep removed roots whose objects it destroyed
    RootsPurged { cycle: u64, count: usize },

    /// Collection cycle completed
    CycleEnd {
        cycle: u64,
        duration_ms: f64,
        collected: usize,
        survivors: usize,
    },
}

impl GcEvent {
    /// Log level for event
    pub fn level(&self) -> LogLevel {
        match self {
            GcEvent::RootsPurged { .. } => LogLevel::Warn,
            GcEvent::Cycles { unreachable, .. } if !unreachable.is_empty() => LogLevel::Warn,
            GcEvent::CycleStart { .. } | GcEvent::CycleEnd { .. } => LogLevel::Info,
            GcEvent::PhaseEnd { .. } | GcEvent::Compaction { .. } | GcEvent::Cycles { .. } => {
                LogLevel::Debug
            },
            GcEvent::Mark { .. } | GcEvent::Sweep { .. } => LogLevel::Trace,
        }
    }

    /// Human-readable rendering
    pub fn to_human(&self) -> String {
        match self {
            GcEvent::CycleStart {
                cycle,
                objects,
                roots,
            } => format!(
                "[GC] Cycle {} started ({} objects, {} roots)",
                cycle, objects, roots
            ),
            GcEvent::PhaseEnd {
                cycle,
                phase,
                duration_ms,
            } => format!(
                "[GC] Cycle {}: {} phase completed ({:.3}ms)",
                cycle, phase, duration_ms
            ),
            GcEvent::Mark { cycle, stats } => format!(
                "[GC] Cycle {}: marked {} objects from {} roots, {} edges traced, {} dangling",
                cycle,
                stats.objects_marked,
                stats.roots_scanned,
                stats.edges_traced,
                stats.dangling_edges
            ),
            GcEvent::Sweep { cycle, stats } => format!(
                "[GC] Cycle {}: swept {} objects, collected {}, {} survivors",
                cycle, stats.objects_swept, stats.objects_collected, stats.survivors
            ),
            GcEvent::Compaction { stats } => format!(
                "[GC] Compaction: moved {} objects, reclaimed {} slots ({} -> {})",
                stats.objects_moved, stats.slots_reclaimed, stats.slots_before, stats.slots_after
            ),
            GcEvent::Cycles {
                cycles,
                cyclic_objects,
                unreachable,
            } => format!(
                "[GC] Cycles: {} cycles over {} objects, {} unreachable",
                cycles,
                cyclic_objects,
                unreachable.len()
            ),
            GcEvent::RootsPurged { cycle, count } => {
                format!("[GC] Cycle {}: purged {} dangling roots", cycle, count)
            },
            GcEvent::CycleEnd {
                cycle,
                duration_ms,
                collected,
                survivors,
            } => format!(
                "[GC] Cycle {} completed ({:.3}ms, collected {}, {} survivors)",
                cycle, duration_ms, collected, survivors
            ),
        }
    }

    /// JSON rendering with timestamp
    pub fn to_json(&self, timestamp: &DateTime<Local>) -> String {
        let mut value = serde_json::to_value(self).unwrap_or(serde_json::Value::Null);
        if let serde_json::Value::Object(ref mut map) = value {
            map.insert(
                "timestamp".to_string(),
                serde_json::Value::String(timestamp.to_rfc3339()),
            );
        }
        value.to_string()
    }
}

/// Logger configuration
#[derive(Debug, Clone)]
pub struct GcLoggerConfig {
    /// Minimum log level
    pub level: LogLevel,

    /// Forward events to the `log` facade
    pub forward: bool,

    /// Forward events as JSON instead of human-readable text
    pub json: bool,

    /// Number of events kept in memory
    pub max_events: usize,
}

impl Default for GcLoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            forward: true,
            json: false,
            max_events: 256,
        }
    }
}

/// GcLogger - centralized logging for collector operations
#[derive(Debug)]
pub struct GcLogger {
    config: GcLoggerConfig,
    events: Mutex<VecDeque<(DateTime<Local>, GcEvent)>>,
    enabled: AtomicBool,
}

impl GcLogger {
    /// Create new logger
    pub fn new(config: GcLoggerConfig) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(config.max_events.min(1024))),
            config,
            enabled: AtomicBool::new(true),
        }
    }

    /// Enable logging
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disable logging
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Log an event
    pub fn log(&self, event: GcEvent) {
        if !self.is_enabled() {
            return;
        }

        let level = event.level();
        if level > self.config.level {
            return;
        }

        let timestamp = Local::now();

        if self.config.forward {
            let line = if self.config.json {
                event.to_json(&timestamp)
            } else {
                event.to_human()
            };
            let level: log::Level = level.into();
            log::log!(target: "msgc", level, "{}", line);
        }

        let mut events = self.events.lock();
        if events.len() >= self.config.max_events {
            events.pop_front();
        }
        events.push_back((timestamp, event));
    }

    /// Recorded events, oldest first
    pub fn get_events(&self) -> Vec<(DateTime<Local>, GcEvent)> {
        self.events.lock().iter().cloned().collect()
    }

    /// Clear recorded events
    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }
}

impl Default for GcLogger {
    fn default() -> Self {
        Self::new(GcLoggerConfig::default())
    }
}

lazy_static::lazy_static! {
    /// Process-wide history fed by every verbose collector
    ///
    /// Does not forward to the `log` facade; the per-collector logger
    /// already did.
    static ref GLOBAL_LOGGER: Mutex<GcLogger> = Mutex::new(GcLogger::new(GcLoggerConfig {
        forward: false,
        ..Default::default()
    }));
}

/// Log an event to the global logger
pub fn log_event(event: GcEvent) {
    GLOBAL_LOGGER.lock().log(event);
}

/// Configure global logger
pub fn configure_logger(config: GcLoggerConfig) {
    *GLOBAL_LOGGER.lock() = GcLogger::new(config);
}

/// Get global logger event count
pub fn get_event_count() -> usize {
    GLOBAL_LOGGER.lock().event_count()
}

/// Events recorded by the global logger, oldest first
pub fn global_events() -> Vec<(DateTime<Local>, GcEvent)> {
    GLOBAL_LOGGER.lock().get_events()
}

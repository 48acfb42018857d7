//! Configuration Module - Collector Tuning Parameters
//!
//! Manages all configuration parameters for msgc.

/// Main configuration for the collector
///
/// Most parameters have sensible defaults.
///
/// # Examples
///
/// ```rust
/// use msgc::GcConfig;
///
/// // Use default configuration
/// let config = GcConfig::default();
///
/// // Compact aggressively after every collection
/// let config = GcConfig {
///     compact_after_collect: true,
///     compaction_threshold: 0.0,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GcConfig {
    /// Number of arena slots reserved up front
    ///
    /// The arena grows past this as needed.
    /// Default: 1024
    pub initial_capacity: usize,

    /// Run compaction at the end of `collect()`
    ///
    /// Compaction only runs when the arena's fragmentation reaches
    /// `compaction_threshold`.
    ///
    /// Default: false
    pub compact_after_collect: bool,

    /// Fragmentation ratio (free slots / arena slots) that triggers
    /// automatic compaction
    ///
    /// Must be within 0.0 - 1.0.
    /// Default: 0.5
    pub compaction_threshold: f32,

    /// Produce a cycle report before each sweep
    ///
    /// Diagnostic only, the report never changes what gets collected.
    /// Unreachable cycles are logged at warn level.
    ///
    /// Default: false
    pub report_cycles_before_sweep: bool,

    /// Enable verbose collector logging
    ///
    /// Emits cycle start/end, phase timings and per-phase statistics.
    /// Default: false
    pub verbose: bool,

    /// Enable statistics collection
    ///
    /// Default: true
    pub stats_enabled: bool,

    /// Number of events kept by the collector's event log
    ///
    /// Default: 256
    pub max_event_history: usize,
}

impl Default for GcConfig {
    fn default() -> Self {
        GcConfig {
            initial_capacity: 1024,
            compact_after_collect: false,
            compaction_threshold: 0.5,
            report_cycles_before_sweep: false,
            verbose: false,
            stats_enabled: true,
            max_event_history: 256,
        }
    }
}

impl GcConfig {
    /// Validate configuration
    ///
    /// Checks if all values are in valid ranges.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use msgc::GcConfig;
    ///
    /// let config = GcConfig {
    ///     compaction_threshold: 1.5,  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.compaction_threshold) {
            return Err(ConfigError::InvalidCompactionThreshold(format!(
                "compaction_threshold must be between 0.0 and 1.0, got {}",
                self.compaction_threshold
            )));
        }

        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(ConfigError::InvalidCapacity(format!(
                "initial_capacity must be <= {}",
                MAX_INITIAL_CAPACITY
            )));
        }

        if self.max_event_history == 0 {
            return Err(ConfigError::InvalidEventHistory(
                "max_event_history must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables:
    /// - MSGC_INITIAL_CAPACITY
    /// - MSGC_COMPACT_AFTER_COLLECT
    /// - MSGC_COMPACTION_THRESHOLD
    /// - MSGC_VERBOSE
    /// - MSGC_STATS
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MSGC_INITIAL_CAPACITY") {
            if let Ok(capacity) = val.parse::<usize>() {
                config.initial_capacity = capacity;
            }
        }

        if let Ok(val) = std::env::var("MSGC_COMPACT_AFTER_COLLECT") {
            config.compact_after_collect = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("MSGC_COMPACTION_THRESHOLD") {
            if let Ok(ratio) = val.parse::<f32>() {
                config.compaction_threshold = ratio;
            }
        }

        if let Ok(val) = std::env::var("MSGC_VERBOSE") {
            config.verbose = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("MSGC_STATS") {
            config.stats_enabled = parse_flag(&val);
        }

        config
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid compaction threshold: {0}")]
    InvalidCompactionThreshold(String),

    #[error("Invalid initial capacity: {0}")]
    InvalidCapacity(String),

    #[error("Invalid event history: {0}")]
    InvalidEventHistory(String),
}

// ============================================================================
// CONSTANTS & HELPERS
// ============================================================================

/// Upper bound on pre-reserved slots, keeps a typo from reserving gigabytes
const MAX_INITIAL_CAPACITY: usize = 1 << 24;

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

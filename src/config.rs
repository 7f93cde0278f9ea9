//! Configuration management with environment variable support.
//!
//! Centralized configuration for StepScript: every knob has an environment
//! variable and a default matching the values scripts were written against.
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `STEPSCRIPT_LOG_ENABLED` | Write run logs as JSON | `true` |
//! | `STEPSCRIPT_LOG_DIR` | Directory for run logs | `./test-results/logs` |
//! | `STEPSCRIPT_SCREENSHOT_ENABLED` | Capture screenshots on failure | `true` |
//! | `STEPSCRIPT_SCREENSHOT_DIR` | Directory for screenshots | `./test-results/screenshots` |
//! | `STEPSCRIPT_VIDEO_ENABLED` | Record videos of test cases | `false` |
//! | `STEPSCRIPT_VIDEO_DIR` | Directory for videos | `./test-results/videos` |
//! | `STEPSCRIPT_VIDEO_RECORD_ON` | Keep videos for `all`, `failed` or `off` | `failed` |
//!
//! # Example
//!
//! ```bash
//! # Keep every video, in a custom location
//! export STEPSCRIPT_VIDEO_ENABLED=true
//! export STEPSCRIPT_VIDEO_RECORD_ON=all
//! export STEPSCRIPT_VIDEO_DIR=/var/tmp/stepscript-videos
//! ```

use std::env;
use std::sync::OnceLock;

// ============================================================================
// Default Values
// ============================================================================

/// Default for result-log writing
pub const DEFAULT_LOG_ENABLED: bool = true;

/// Default run-log directory
pub const DEFAULT_LOG_DIR: &str = "./test-results/logs";

/// Default for failure screenshots
pub const DEFAULT_SCREENSHOT_ENABLED: bool = true;

/// Default screenshot directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "./test-results/screenshots";

/// Default for video recording
pub const DEFAULT_VIDEO_ENABLED: bool = false;

/// Default video directory
pub const DEFAULT_VIDEO_DIR: &str = "./test-results/videos";

/// Default video retention policy
pub const DEFAULT_VIDEO_RECORD_ON: RecordOn = RecordOn::Failed;

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for result-log writing
pub const ENV_LOG_ENABLED: &str = "STEPSCRIPT_LOG_ENABLED";

/// Environment variable for the run-log directory
pub const ENV_LOG_DIR: &str = "STEPSCRIPT_LOG_DIR";

/// Environment variable for failure screenshots
pub const ENV_SCREENSHOT_ENABLED: &str = "STEPSCRIPT_SCREENSHOT_ENABLED";

/// Environment variable for the screenshot directory
pub const ENV_SCREENSHOT_DIR: &str = "STEPSCRIPT_SCREENSHOT_DIR";

/// Environment variable for video recording
pub const ENV_VIDEO_ENABLED: &str = "STEPSCRIPT_VIDEO_ENABLED";

/// Environment variable for the video directory
pub const ENV_VIDEO_DIR: &str = "STEPSCRIPT_VIDEO_DIR";

/// Environment variable for the video retention policy
pub const ENV_VIDEO_RECORD_ON: &str = "STEPSCRIPT_VIDEO_RECORD_ON";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized configuration for StepScript
#[derive(Debug, Clone)]
pub struct Config {
    /// Run-log configuration
    pub logging: LoggingSettings,
    /// Screenshot configuration
    pub screenshots: ScreenshotSettings,
    /// Video configuration
    pub videos: VideoSettings,
}

/// Run-log settings
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Whether run logs are written at all
    pub enabled: bool,
    /// Directory the timestamped JSON log lands in
    pub output_dir: String,
}

/// Failure-screenshot settings
#[derive(Debug, Clone)]
pub struct ScreenshotSettings {
    /// Whether failing steps capture a screenshot
    pub enabled: bool,
    /// Directory screenshots land in
    pub dir: String,
}

/// Video-recording settings
#[derive(Debug, Clone)]
pub struct VideoSettings {
    /// Whether cases are recorded at all
    pub enabled: bool,
    /// Directory recordings land in
    pub dir: String,
    /// Which recordings are kept after the case finishes
    pub record_on: RecordOn,
}

/// Video retention policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOn {
    /// Keep every recording
    All,
    /// Keep recordings of failed cases only
    Failed,
    /// Discard all recordings
    Off,
}

impl RecordOn {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordOn::All => "all",
            RecordOn::Failed => "failed",
            RecordOn::Off => "off",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "all" => Some(RecordOn::All),
            "failed" => Some(RecordOn::Failed),
            "off" => Some(RecordOn::Off),
            _ => None,
        }
    }
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            logging: LoggingSettings::from_env(),
            screenshots: ScreenshotSettings::from_env(),
            videos: VideoSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            logging: LoggingSettings::defaults(),
            screenshots: ScreenshotSettings::defaults(),
            videos: VideoSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl LoggingSettings {
    /// Create logging settings from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_bool(ENV_LOG_ENABLED, DEFAULT_LOG_ENABLED),
            output_dir: env::var(ENV_LOG_DIR).unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string()),
        }
    }

    /// Create logging settings with defaults
    pub fn defaults() -> Self {
        Self {
            enabled: DEFAULT_LOG_ENABLED,
            output_dir: DEFAULT_LOG_DIR.to_string(),
        }
    }
}

impl ScreenshotSettings {
    /// Create screenshot settings from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_bool(ENV_SCREENSHOT_ENABLED, DEFAULT_SCREENSHOT_ENABLED),
            dir: env::var(ENV_SCREENSHOT_DIR)
                .unwrap_or_else(|_| DEFAULT_SCREENSHOT_DIR.to_string()),
        }
    }

    /// Create screenshot settings with defaults
    pub fn defaults() -> Self {
        Self {
            enabled: DEFAULT_SCREENSHOT_ENABLED,
            dir: DEFAULT_SCREENSHOT_DIR.to_string(),
        }
    }
}

impl VideoSettings {
    /// Create video settings from environment variables
    pub fn from_env() -> Self {
        Self {
            enabled: env_bool(ENV_VIDEO_ENABLED, DEFAULT_VIDEO_ENABLED),
            dir: env::var(ENV_VIDEO_DIR).unwrap_or_else(|_| DEFAULT_VIDEO_DIR.to_string()),
            record_on: env::var(ENV_VIDEO_RECORD_ON)
                .ok()
                .and_then(|s| RecordOn::parse(&s))
                .unwrap_or(DEFAULT_VIDEO_RECORD_ON),
        }
    }

    /// Create video settings with defaults
    pub fn defaults() -> Self {
        Self {
            enabled: DEFAULT_VIDEO_ENABLED,
            dir: DEFAULT_VIDEO_DIR.to_string(),
            record_on: DEFAULT_VIDEO_RECORD_ON,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a boolean environment variable; `1`/`true`/`yes` (any case) are true,
/// `0`/`false`/`no` are false, anything else falls back to the default.
fn env_bool(name: &str, default: bool) -> bool {
    match env::var(name) {
        Ok(value) => match value.to_lowercase().as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Whether run logs are written (convenience function)
pub fn logging_enabled() -> bool {
    get().logging.enabled
}

/// Get the run-log directory (convenience function)
pub fn log_output_dir() -> String {
    get().logging.output_dir.clone()
}

/// Get the screenshot directory (convenience function)
pub fn screenshot_dir() -> String {
    get().screenshots.dir.clone()
}

/// Get the video retention policy (convenience function)
pub fn video_record_on() -> RecordOn {
    get().videos.record_on
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_on_parsing() {
        assert_eq!(RecordOn::parse("all"), Some(RecordOn::All));
        assert_eq!(RecordOn::parse("FAILED"), Some(RecordOn::Failed));
        assert_eq!(RecordOn::parse("off"), Some(RecordOn::Off));
        assert_eq!(RecordOn::parse("sometimes"), None);
    }

    #[test]
    fn test_record_on_round_trips_through_as_str() {
        for policy in [RecordOn::All, RecordOn::Failed, RecordOn::Off] {
            assert_eq!(RecordOn::parse(policy.as_str()), Some(policy));
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.logging.enabled);
        assert_eq!(config.logging.output_dir, DEFAULT_LOG_DIR);
        assert!(config.screenshots.enabled);
        assert!(!config.videos.enabled);
        assert_eq!(config.videos.record_on, RecordOn::Failed);
    }

    #[test]
    fn test_env_bool_fallback_on_unset() {
        assert!(env_bool("STEPSCRIPT_TEST_UNSET_BOOL", true));
        assert!(!env_bool("STEPSCRIPT_TEST_UNSET_BOOL", false));
    }
}

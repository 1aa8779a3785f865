use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Joint-angle thresholds driving the rep counters, in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Knee angle above which the athlete is standing
    pub squat_up_angle: f64,
    /// Knee angle below which the squat is deep enough
    pub squat_down_angle: f64,
    /// Shoulder drop (normalized y) required to confirm a squat descent
    pub squat_shoulder_drop: f64,
    /// Elbow angle above which the arm is locked out
    pub pushup_up_angle: f64,
    /// Elbow angle below which the push-up reached the bottom
    pub pushup_down_angle: f64,
    /// Exclusive elbow-angle band that counts as good push-up form
    pub pushup_form_min_angle: f64,
    pub pushup_form_max_angle: f64,
    /// Both elbows above this angle means arms are extended
    pub curl_extended_angle: f64,
    /// Both elbows below this angle means the curl is complete
    pub curl_curled_angle: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            squat_up_angle: 160.0,
            squat_down_angle: 90.0,
            squat_shoulder_drop: 0.02,
            pushup_up_angle: 160.0,
            pushup_down_angle: 90.0,
            pushup_form_min_angle: 80.0,
            pushup_form_max_angle: 160.0,
            curl_extended_angle: 140.0,
            curl_curled_angle: 50.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> ConfigResult<()> {
        let angles = [
            ("squat_up_angle", self.squat_up_angle),
            ("squat_down_angle", self.squat_down_angle),
            ("pushup_up_angle", self.pushup_up_angle),
            ("pushup_down_angle", self.pushup_down_angle),
            ("pushup_form_min_angle", self.pushup_form_min_angle),
            ("pushup_form_max_angle", self.pushup_form_max_angle),
            ("curl_extended_angle", self.curl_extended_angle),
            ("curl_curled_angle", self.curl_curled_angle),
        ];
        for (name, value) in angles {
            if !(0.0..=180.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{}: {}. Must be between 0 and 180 degrees",
                    name, value
                )));
            }
        }

        let ordered = [
            ("squat_down_angle", self.squat_down_angle, "squat_up_angle", self.squat_up_angle),
            ("pushup_down_angle", self.pushup_down_angle, "pushup_up_angle", self.pushup_up_angle),
            (
                "pushup_form_min_angle",
                self.pushup_form_min_angle,
                "pushup_form_max_angle",
                self.pushup_form_max_angle,
            ),
            (
                "curl_curled_angle",
                self.curl_curled_angle,
                "curl_extended_angle",
                self.curl_extended_angle,
            ),
        ];
        for (low_name, low, high_name, high) in ordered {
            if low >= high {
                return Err(ConfigError::Invalid(format!(
                    "{} ({}) must be below {} ({})",
                    low_name, low, high_name, high
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.squat_shoulder_drop) {
            return Err(ConfigError::Invalid(format!(
                "squat_shoulder_drop: {}. Must be between 0.0 and 1.0",
                self.squat_shoulder_drop
            )));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub idle_timeout_minutes: u32,   // Default: 30
    pub prune_interval_seconds: u64, // Default: 60
    pub max_sessions: usize,         // Default: 64
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 30,
            prune_interval_seconds: 60,
            max_sessions: 64,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub thresholds: Thresholds,
    /// Landmarks reported below this visibility are treated as occluded (0.0-1.0)
    pub min_landmark_visibility: f64,
    pub server: ServerConfig,
    pub sessions: SessionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            min_landmark_visibility: 0.5,
            server: ServerConfig::default(),
            sessions: SessionConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating it with defaults if it doesn't exist
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let config: Config = serde_json::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from the default location
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds.validate()?;

        if !(0.0..=1.0).contains(&self.min_landmark_visibility) {
            return Err(ConfigError::Invalid(format!(
                "min_landmark_visibility: {}. Must be between 0.0 and 1.0",
                self.min_landmark_visibility
            )));
        }

        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server port cannot be 0".to_string()));
        }

        if self.server.host.trim().is_empty() {
            return Err(ConfigError::Invalid("server host cannot be empty".to_string()));
        }

        if self.sessions.max_sessions == 0 {
            return Err(ConfigError::Invalid(
                "max_sessions must be at least 1".to_string(),
            ));
        }

        if self.sessions.idle_timeout_minutes == 0 {
            return Err(ConfigError::Invalid(
                "idle_timeout_minutes must be at least 1".to_string(),
            ));
        }

        if self.sessions.prune_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "prune_interval_seconds must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> ConfigResult<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| ConfigError::NoHomeDir)?;

        let mut path = PathBuf::from(home);
        path.push(".protofit");
        path.push("config.json");

        Ok(path)
    }
}

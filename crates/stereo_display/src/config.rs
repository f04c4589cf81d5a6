//! Configuration system

pub use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// File format is chosen by extension; TOML and RON are supported.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// On-disk settings for the stereo display subsystem
///
/// Seeds [`crate::settings::DisplaySettings`] at startup; runtime changes
/// go through the settings context, never back into this struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Build deterministic stereo layouts without a device attached
    pub test_mode: bool,

    /// MSAA sample count requested for device-allocated targets
    pub msaa_samples: u32,

    /// Resolution scale applied to device-allocated targets
    pub render_scale: f32,

    /// Start with vertical sync on (turned off while a device paces frames)
    pub vsync: bool,

    /// Composite mirror output with sRGB encoding
    pub srgb_output: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            test_mode: false,
            msaa_samples: 1,
            render_scale: 1.0,
            vsync: true,
            srgb_output: true,
        }
    }
}

impl Config for DisplayConfig {}

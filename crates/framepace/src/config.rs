use crate::error::ConfigError;

pub const ENV_REFRESH_HZ: &str = "FRAMEPACE_REFRESH_HZ";
pub const ENV_VSYNC: &str = "FRAMEPACE_VSYNC";

/// Highest refresh rate a host config may request.
pub const MAX_REFRESH_HZ: u32 = 1000;

/// What the host display offers to the frame scheduler.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HostConfig {
    /// Display refresh rate driving the vsync source.
    pub refresh_hz: u32,

    /// Whether a vsync-aligned callback primitive exists on this host.
    pub vsync: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            vsync: true,
        }
    }
}

impl HostConfig {
    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; unset keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REFRESH_HZ) {
            config.refresh_hz = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|hz| (1..=MAX_REFRESH_HZ).contains(hz))
                .ok_or_else(|| {
                    ConfigError::invalid(ENV_REFRESH_HZ, raw.as_str(), "expected 1..=1000")
                })?;
        }

        if let Some(raw) = lookup(ENV_VSYNC) {
            config.vsync = parse_flag(&raw)
                .ok_or_else(|| ConfigError::invalid(ENV_VSYNC, raw.as_str(), "expected on/off"))?;
        }

        Ok(config)
    }
}

/// Parses the usual boolean spellings (`1/true/yes/on`, `0/false/no/off`).
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

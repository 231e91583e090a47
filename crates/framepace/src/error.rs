/// Misuse of a `DroppedFrameRecorder` surfaced by its strict API.
#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum RecorderError {
    #[error("dropped-frame recorder is not recording")]
    NotRecording,
}

/// Invalid host configuration value.
#[derive(thiserror::Error, Debug, Clone, Eq, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn invalid(key: &'static str, value: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidValue {
            key,
            value: value.into(),
            reason,
        }
    }
}

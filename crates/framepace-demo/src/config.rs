use anyhow::{Context, Result};

/// Demo run parameters, read from `FRAMEPACE_DEMO_*` variables.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DemoConfig {
    /// How long the animation runs.
    pub seconds: u64,

    /// Every n-th frame overruns its budget; 0 disables injected jank.
    pub jank_every: u64,

    /// Frame budgets a janky frame overruns by.
    pub jank_frames: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            seconds: 3,
            jank_every: 45,
            jank_frames: 3,
        }
    }
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup("FRAMEPACE_DEMO_SECONDS") {
            config.seconds = raw
                .trim()
                .parse()
                .with_context(|| format!("FRAMEPACE_DEMO_SECONDS={raw:?}"))?;
        }
        if let Some(raw) = lookup("FRAMEPACE_DEMO_JANK_EVERY") {
            config.jank_every = raw
                .trim()
                .parse()
                .with_context(|| format!("FRAMEPACE_DEMO_JANK_EVERY={raw:?}"))?;
        }
        if let Some(raw) = lookup("FRAMEPACE_DEMO_JANK_FRAMES") {
            config.jank_frames = raw
                .trim()
                .parse()
                .with_context(|| format!("FRAMEPACE_DEMO_JANK_FRAMES={raw:?}"))?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(DemoConfig::from_lookup(|_| None).unwrap(), DemoConfig::default());
    }

    #[test]
    fn parses_overrides() {
        let config = DemoConfig::from_lookup(|key| match key {
            "FRAMEPACE_DEMO_SECONDS" => Some("10".into()),
            "FRAMEPACE_DEMO_JANK_EVERY" => Some(" 0 ".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.seconds, 10);
        assert_eq!(config.jank_every, 0);
    }

    #[test]
    fn error_names_the_variable() {
        let err = DemoConfig::from_lookup(|key| {
            (key == "FRAMEPACE_DEMO_SECONDS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("FRAMEPACE_DEMO_SECONDS"));
    }
}

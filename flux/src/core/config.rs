use serde::{Deserialize, Serialize};

/// Size limits for the main window. Values outside are clamped, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowLimits {
    pub min_width: u32,
    pub min_height: u32,
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for WindowLimits {
    fn default() -> Self {
        Self {
            min_width: 300,
            min_height: 200,
            max_width: 4000,
            max_height: 3000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpacityLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for OpacityLimits {
    fn default() -> Self {
        Self {
            min: 0.2,
            max: 1.0,
            step: 0.1,
        }
    }
}

/// Application configuration settings.
/// Persisted as `app-config.json`; missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub debug_mode: bool,
    pub title_bar_height: u32,
    pub default_width: u32,
    pub default_height: u32,
    pub limits: WindowLimits,
    pub opacity: OpacityLimits,
    /// Shrink the window by the title bar when entering immersion mode.
    /// When false, immersion only toggles click-through and stacking.
    pub immersion_adjusts_bounds: bool,
    pub gesture_poll_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug_mode: false,
            title_bar_height: 40,
            default_width: 800,
            default_height: 600,
            limits: WindowLimits::default(),
            opacity: OpacityLimits::default(),
            immersion_adjusts_bounds: true,
            gesture_poll_ms: 10,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits in effect while immersive: the title bar has been removed from
    /// the window, so the height floor drops by the same amount.
    pub fn immersive_limits(&self) -> WindowLimits {
        if !self.immersion_adjusts_bounds {
            return self.limits;
        }
        WindowLimits {
            min_height: self.limits.min_height.saturating_sub(self.title_bar_height),
            ..self.limits
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"debug_mode":true}"#).unwrap();
        assert!(config.debug_mode);
        assert_eq!(config.title_bar_height, 40);
        assert_eq!(config.limits.min_width, 300);
        assert_eq!(config.opacity.step, 0.1);
    }

    #[test]
    fn test_immersive_limits() {
        let config = Config::new();
        let limits = config.immersive_limits();
        assert_eq!(limits.min_height, 160);
        assert_eq!(limits.min_width, 300);

        let config = Config {
            immersion_adjusts_bounds: false,
            ..Config::new()
        };
        assert_eq!(config.immersive_limits().min_height, 200);
    }
}

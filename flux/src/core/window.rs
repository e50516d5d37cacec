use flux_ipc::{BoundsInfo, StateInfo};
use serde::{Deserialize, Serialize};

use super::{Config, WindowLimits};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Clamp width/height into `limits`. Position is left alone.
    pub fn clamped(self, limits: &WindowLimits) -> Self {
        Self {
            width: self.width.clamp(limits.min_width, limits.max_width.max(limits.min_width)),
            height: self
                .height
                .clamp(limits.min_height, limits.max_height.max(limits.min_height)),
            ..self
        }
    }

    pub fn to_info(&self) -> BoundsInfo {
        BoundsInfo {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
        }
    }
}

/// Persisted window record: `window-bounds.json`.
/// Missing x/y lets the platform choose the initial position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_opacity")]
    pub opacity: f64,
}

fn default_opacity() -> f64 {
    1.0
}

impl BoundsRecord {
    pub fn defaults(config: &Config) -> Self {
        Self {
            x: None,
            y: None,
            width: config.default_width,
            height: config.default_height,
            opacity: default_opacity(),
        }
    }
}

/// Single source of truth for the main window. Only the controller mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRuntimeState {
    pub bounds: Rect,
    pub opacity: f64,
    pub is_immersive: bool,
    pub is_always_on_top: bool,
    pub is_ignoring_mouse: bool,
    pub is_visible: bool,
}

impl WindowRuntimeState {
    pub fn new(bounds: Rect, opacity: f64) -> Self {
        Self {
            bounds,
            opacity,
            is_immersive: false,
            is_always_on_top: false,
            is_ignoring_mouse: false,
            is_visible: true,
        }
    }

    pub fn to_info(&self, shortcuts_state: &str) -> StateInfo {
        StateInfo {
            bounds: self.bounds.to_info(),
            opacity: self.opacity,
            is_immersive: self.is_immersive,
            is_always_on_top: self.is_always_on_top,
            is_ignoring_mouse: self.is_ignoring_mouse,
            is_visible: self.is_visible,
            shortcuts_state: shortcuts_state.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_clamped_to_minimums() {
        let limits = WindowLimits::default();
        let rect = Rect::new(10, 20, 100, 50).clamped(&limits);
        assert_eq!(rect, Rect::new(10, 20, 300, 200));
    }

    #[test]
    fn test_rect_clamped_to_maximums() {
        let limits = WindowLimits::default();
        let rect = Rect::new(0, 0, 9000, 9000).clamped(&limits);
        assert_eq!((rect.width, rect.height), (4000, 3000));
    }

    #[test]
    fn test_bounds_record_without_position() {
        let record: BoundsRecord =
            serde_json::from_str(r#"{"width":800,"height":600}"#).unwrap();
        assert_eq!(record.x, None);
        assert_eq!(record.y, None);
        assert_eq!(record.opacity, 1.0);

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("\"x\""));
    }
}

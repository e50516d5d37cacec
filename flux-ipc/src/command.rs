use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ActionId, KeyBindings};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Shortcut operations
    GetKeyBindings,
    SaveKeyBindings { bindings: KeyBindings },
    SuspendShortcuts,
    ResumeShortcuts,
    ListShortcuts,
    TriggerHotkey { combo: String },

    // Opacity
    GetOpacity,
    AdjustOpacity { delta: f64 },

    // Window operations
    SetWindowSize { width: u32, height: u32 },
    SetIgnoreMouse { ignore: bool },
    BeginGesture {
        kind: GestureKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        direction: Option<ResizeDirection>,
    },
    EndGesture { kind: GestureKind },
    PointerMoved { x: i32, y: i32 },
    WindowClosed,

    // Settings
    GetResolutionPresets,
    SaveResolutionPresets { presets: Vec<ResolutionPreset> },
    GetDebugMode,
    SetDebugMode { enabled: bool },
    ResetConfig {
        #[serde(default)]
        options: ResetOptions,
    },

    // Queries
    GetState,
    GetVersion,

    // Control
    RequestExit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    Move,
    Resize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    Right,
    Bottom,
    Both,
}

impl ResizeDirection {
    /// Parses a renderer-supplied direction. Anything unrecognised maps to
    /// `None`, which resizes neither axis.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "right" => Some(ResizeDirection::Right),
            "bottom" => Some(ResizeDirection::Bottom),
            "both" => Some(ResizeDirection::Both),
            _ => None,
        }
    }

    pub fn affects_width(&self) -> bool {
        matches!(self, ResizeDirection::Right | ResizeDirection::Both)
    }

    pub fn affects_height(&self) -> bool {
        matches!(self, ResizeDirection::Bottom | ResizeDirection::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryDirection {
    Back,
    Forward,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPreset {
    pub width: u32,
    pub height: u32,
    pub name: String,
}

impl ResolutionPreset {
    pub fn new(width: u32, height: u32, name: impl Into<String>) -> Self {
        Self {
            width,
            height,
            name: name.into(),
        }
    }

    pub fn defaults() -> Vec<ResolutionPreset> {
        vec![
            ResolutionPreset::new(480, 270, "480 × 270"),
            ResolutionPreset::new(640, 360, "640 × 360"),
            ResolutionPreset::new(800, 450, "800 × 450"),
            ResolutionPreset::new(960, 540, "960 × 540"),
            ResolutionPreset::new(1024, 576, "1024 × 576"),
            ResolutionPreset::new(1280, 720, "1280 × 720 (HD)"),
        ]
    }
}

/// Which persisted records `ResetConfig` restores to their defaults
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetOptions {
    #[serde(default)]
    pub key_config: bool,
    #[serde(default)]
    pub window_config: bool,
    #[serde(default)]
    pub app_config: bool,
    #[serde(default)]
    pub resolution_presets: bool,
}

impl ResetOptions {
    pub fn all() -> Self {
        Self {
            key_config: true,
            window_config: true,
            app_config: true,
            resolution_presets: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    KeyBindings { bindings: KeyBindings },
    Shortcuts { shortcuts: ShortcutInfo },
    Opacity { opacity: f64 },
    State { state: StateInfo },
    ResolutionPresets { presets: Vec<ResolutionPreset> },
    DebugMode { enabled: bool },
    Version { version: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundsInfo {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub bounds: BoundsInfo,
    pub opacity: f64,
    pub is_immersive: bool,
    pub is_always_on_top: bool,
    pub is_ignoring_mouse: bool,
    pub is_visible: bool,
    pub shortcuts_state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutFailure {
    pub action: ActionId,
    pub combo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutInfo {
    pub state: String,
    pub active: BTreeMap<ActionId, String>,
    pub failed: Vec<ShortcutFailure>,
}

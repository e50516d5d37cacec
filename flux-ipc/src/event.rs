use serde::{Deserialize, Serialize};

use crate::{
    BoundsInfo, HistoryDirection, ResetOptions, ResolutionPreset, ShortcutFailure, StateInfo,
};

/// Event filter for subscribing to specific event types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Subscribe to opacity changes
    #[serde(default)]
    pub opacity: bool,
    /// Subscribe to immersion mode changes
    #[serde(default)]
    pub immersion: bool,
    /// Subscribe to instructions for the embedded view (scripts, history)
    #[serde(default)]
    pub view: bool,
    /// Subscribe to native window changes (bounds, visibility, flags)
    #[serde(default)]
    pub window: bool,
    /// Subscribe to settings changes (shortcut reloads, presets, resets)
    #[serde(default)]
    pub settings: bool,
}

impl EventFilter {
    /// Create a filter that subscribes to all events
    pub fn all() -> Self {
        Self {
            opacity: true,
            immersion: true,
            view: true,
            window: true,
            settings: true,
        }
    }

    /// Check if the filter matches a given event
    pub fn matches(&self, event: &StateEvent) -> bool {
        match event {
            StateEvent::OpacityChanged { .. } => self.opacity,
            StateEvent::ImmersionChanged { .. } => self.immersion,
            StateEvent::ExecuteOnView { .. } | StateEvent::NavigateHistory { .. } => self.view,
            StateEvent::WindowUpdated { .. } => self.window,
            StateEvent::ShortcutsReloaded { .. }
            | StateEvent::ResolutionPresetsUpdated { .. }
            | StateEvent::ConfigReset { .. } => self.settings,
            StateEvent::Snapshot { .. } => true,
        }
    }

    /// Check if any filter is set
    pub fn any(&self) -> bool {
        self.opacity || self.immersion || self.view || self.window || self.settings
    }
}

/// Request to subscribe to state events
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Whether to send a snapshot on connection
    #[serde(default)]
    pub snapshot: bool,
    /// Event filter (if not set or all false, subscribes to all events)
    #[serde(default)]
    pub filter: EventFilter,
}

impl SubscribeRequest {
    pub fn with_snapshot() -> Self {
        Self {
            snapshot: true,
            filter: EventFilter::default(),
        }
    }

    /// Get the effective filter (all if none specified)
    pub fn effective_filter(&self) -> EventFilter {
        if self.filter.any() {
            self.filter.clone()
        } else {
            EventFilter::all()
        }
    }
}

/// Stacking level requested for the native window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowLevel {
    #[default]
    Normal,
    /// Above ordinary always-on-top windows
    ScreenSaver,
}

/// Native window properties the shell is expected to mirror
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowInfo {
    pub bounds: BoundsInfo,
    pub is_visible: bool,
    pub ignore_mouse: bool,
    pub forward_mouse: bool,
    pub level: WindowLevel,
    pub opacity: f64,
}

/// State change events sent to subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StateEvent {
    OpacityChanged {
        opacity: f64,
    },
    ImmersionChanged {
        immersive: bool,
    },

    // Embedded view instructions
    ExecuteOnView {
        script: String,
    },
    NavigateHistory {
        direction: HistoryDirection,
    },

    WindowUpdated {
        window: WindowInfo,
    },

    // Settings
    ShortcutsReloaded {
        failed: Vec<ShortcutFailure>,
    },
    ResolutionPresetsUpdated {
        presets: Vec<ResolutionPreset>,
    },
    ConfigReset {
        options: ResetOptions,
    },

    // Full snapshot
    Snapshot {
        state: StateInfo,
    },
}

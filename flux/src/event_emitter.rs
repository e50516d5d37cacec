use flux_ipc::{HistoryDirection, ShortcutFailure, StateEvent, StateInfo, WindowInfo, WindowLevel};
use tokio::sync::mpsc;

use crate::core::WindowRuntimeState;

/// Event emitter for sending state change events from the event loop to the
/// event server's broadcaster.
#[derive(Clone)]
pub struct EventEmitter {
    tx: mpsc::UnboundedSender<StateEvent>,
}

impl EventEmitter {
    pub fn new(tx: mpsc::UnboundedSender<StateEvent>) -> Self {
        Self { tx }
    }

    /// Send an event to subscribers
    pub fn emit(&self, event: StateEvent) {
        if let Err(e) = self.tx.send(event) {
            tracing::debug!("Failed to emit event (no receivers?): {}", e);
        }
    }

    pub fn emit_execute_on_view(&self, script: &str) {
        self.emit(StateEvent::ExecuteOnView {
            script: script.to_string(),
        });
    }

    pub fn emit_navigate_history(&self, direction: HistoryDirection) {
        self.emit(StateEvent::NavigateHistory { direction });
    }

    pub fn emit_window_updated(&self, state: &WindowRuntimeState) {
        self.emit(StateEvent::WindowUpdated {
            window: window_to_info(state),
        });
    }

    pub fn emit_shortcuts_reloaded(&self, failed: Vec<ShortcutFailure>) {
        self.emit(StateEvent::ShortcutsReloaded { failed });
    }
}

/// Create a snapshot event from current state
pub fn create_snapshot(state: StateInfo) -> StateEvent {
    StateEvent::Snapshot { state }
}

/// What the shell must mirror onto the native window
pub fn window_to_info(state: &WindowRuntimeState) -> WindowInfo {
    WindowInfo {
        bounds: state.bounds.to_info(),
        is_visible: state.is_visible,
        ignore_mouse: state.is_ignoring_mouse,
        forward_mouse: state.is_ignoring_mouse,
        level: if state.is_always_on_top {
            WindowLevel::ScreenSaver
        } else {
            WindowLevel::Normal
        },
        opacity: state.opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Rect;

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let emitter = EventEmitter::new(tx);
        // Must not panic
        emitter.emit(StateEvent::OpacityChanged { opacity: 0.5 });
    }

    #[test]
    fn test_window_to_info() {
        let mut state = WindowRuntimeState::new(Rect::new(1, 2, 300, 400), 0.8);
        state.is_always_on_top = true;
        state.is_ignoring_mouse = true;

        let info = window_to_info(&state);
        assert_eq!(info.level, WindowLevel::ScreenSaver);
        assert!(info.ignore_mouse && info.forward_mouse);
        assert_eq!(info.bounds.height, 400);
        assert_eq!(info.opacity, 0.8);
    }
}

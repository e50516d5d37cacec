//! Capabilities backed by the shell process that hosts the native window and
//! the page view. The daemon mirrors state here and the shell follows the
//! `window_updated` / `execute_on_view` / `navigate_history` events.

use std::cell::Cell;
use std::collections::BTreeSet;

use flux_ipc::{HistoryDirection, WindowLevel};

use crate::core::{Point, Rect};
use crate::event_emitter::EventEmitter;
use crate::hotkey::is_valid_combo;
use crate::platform::{HotkeyBackend, PointerSource, WebView, WindowHandle};

/// Last window state requested of the shell
pub struct ShellWindow {
    bounds: Rect,
    visible: bool,
}

impl ShellWindow {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            visible: true,
        }
    }
}

impl WindowHandle for ShellWindow {
    fn is_destroyed(&self) -> bool {
        false
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn show(&mut self) {
        self.visible = true;
    }

    fn hide(&mut self) {
        self.visible = false;
    }

    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool) {
        tracing::debug!("Ignore mouse: {} (forward={})", ignore, forward);
    }

    fn set_always_on_top(&mut self, flag: bool, level: WindowLevel) {
        tracing::debug!("Always on top: {} ({:?})", flag, level);
    }

    fn set_opacity(&mut self, opacity: f64) {
        tracing::debug!("Opacity: {}", opacity);
    }
}

/// Page view driven through broadcast events
pub struct ShellView {
    emitter: EventEmitter,
}

impl ShellView {
    pub fn new(emitter: EventEmitter) -> Self {
        Self { emitter }
    }
}

impl WebView for ShellView {
    fn execute_script(&self, script: &str) -> Result<(), String> {
        self.emitter.emit_execute_on_view(script);
        Ok(())
    }

    /// History is only known to the shell; delivery is reported as success.
    fn navigate(&self, direction: HistoryDirection) -> Result<bool, String> {
        self.emitter.emit_navigate_history(direction);
        Ok(true)
    }
}

/// Pointer position as last reported by the shell
#[derive(Default)]
pub struct ReportedPointer {
    position: Cell<Point>,
}

impl PointerSource for ReportedPointer {
    fn cursor_position(&self) -> Point {
        self.position.get()
    }

    fn report(&self, position: Point) {
        self.position.set(position);
    }
}

/// Hotkeys captured by the shell and forwarded as `trigger_hotkey`.
/// Registration only tracks which combos the daemon claims.
#[derive(Default)]
pub struct ShellHotkeys {
    registered: BTreeSet<String>,
}

impl ShellHotkeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HotkeyBackend for ShellHotkeys {
    fn register(&mut self, combo: &str) -> bool {
        if !is_valid_combo(combo) {
            return false;
        }
        self.registered.insert(combo.to_string())
    }

    fn unregister(&mut self, combo: &str) {
        self.registered.remove(combo);
    }

    fn unregister_all(&mut self) {
        self.registered.clear();
    }
}

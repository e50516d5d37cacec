use crate::core::{Point, Rect};
use flux_ipc::{HistoryDirection, WindowLevel};

/// The live native window hosting the web view.
/// This abstraction allows mocking in tests.
pub trait WindowHandle {
    fn is_destroyed(&self) -> bool;
    fn bounds(&self) -> Rect;
    fn set_bounds(&mut self, bounds: Rect);
    fn is_visible(&self) -> bool;
    fn show(&mut self);
    fn hide(&mut self);
    /// With `forward`, ignored pointer events reach whatever is behind the window.
    fn set_ignore_mouse_events(&mut self, ignore: bool, forward: bool);
    fn set_always_on_top(&mut self, flag: bool, level: WindowLevel);
    fn set_opacity(&mut self, opacity: f64);
}

/// Absolute pointer position in screen coordinates
pub trait PointerSource {
    fn cursor_position(&self) -> Point;

    /// Position reported by the shell. Sources that can query the OS ignore it.
    fn report(&self, _position: Point) {}
}

/// OS-global hotkey registration by combo string.
/// Fired combos are delivered out of band (see `app::channels`).
pub trait HotkeyBackend {
    /// Returns false when the combo is unavailable or cannot be parsed.
    fn register(&mut self, combo: &str) -> bool;
    fn unregister(&mut self, combo: &str);
    fn unregister_all(&mut self);
}

/// The embedded page view. Commands are fire-and-forget; errors mean the
/// instruction could not be delivered.
pub trait WebView {
    fn execute_script(&self, script: &str) -> Result<(), String>;
    /// Returns whether there was history in that direction, when known.
    fn navigate(&self, direction: HistoryDirection) -> Result<bool, String>;
}

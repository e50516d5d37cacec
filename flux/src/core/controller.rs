use std::time::Duration;

use flux_ipc::{GestureKind, ResizeDirection, WindowLevel};
use tokio::sync::mpsc;

use super::geometry::{clamp_rect, compute_move_bounds, compute_resize_bounds};
use super::gesture::{GestureSession, GestureTick, Ticker};
use super::opacity;
use super::{BoundsRecord, Config, Point, Rect, WindowLimits, WindowRuntimeState};
use crate::error::CoreError;
use crate::platform::WindowHandle;
use crate::store::RecordStore;

/// Owns the main window and its runtime state. Every mutation of geometry,
/// opacity, visibility or stacking goes through here.
///
/// Once the window is closed (or reports itself destroyed) every operation is
/// a logged no-op.
pub struct WindowStateController<W: WindowHandle> {
    window: W,
    state: WindowRuntimeState,
    config: Config,
    bounds_store: Box<dyn RecordStore<BoundsRecord>>,
    move_session: Option<GestureSession>,
    resize_session: Option<GestureSession>,
    next_session_id: u64,
    tick_tx: Option<mpsc::UnboundedSender<GestureTick>>,
    closed: bool,
}

impl<W: WindowHandle> WindowStateController<W> {
    /// Restore the window from the bounds record, falling back to defaults.
    pub fn new(
        window: W,
        config: Config,
        bounds_store: Box<dyn RecordStore<BoundsRecord>>,
    ) -> Self {
        let record = bounds_store
            .load()
            .unwrap_or_else(|| BoundsRecord::defaults(&config));
        let mut controller = Self {
            state: WindowRuntimeState::new(window.bounds(), 1.0),
            window,
            config,
            bounds_store,
            move_session: None,
            resize_session: None,
            next_session_id: 1,
            tick_tx: None,
            closed: false,
        };
        controller.apply_record(&record);
        tracing::info!(
            "Window restored at {:?} (opacity {})",
            controller.state.bounds,
            controller.state.opacity
        );
        controller
    }

    /// Gestures started after this call tick themselves through `tx`.
    pub fn install_ticker(&mut self, tx: mpsc::UnboundedSender<GestureTick>) {
        self.tick_tx = Some(tx);
    }

    pub fn state(&self) -> &WindowRuntimeState {
        &self.state
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn is_destroyed(&self) -> bool {
        self.closed || self.window.is_destroyed()
    }

    fn live_window(&mut self, op: &str) -> Result<&mut W, CoreError> {
        if self.is_destroyed() {
            tracing::debug!("Ignoring {} on destroyed window", op);
            return Err(CoreError::WindowDestroyed);
        }
        Ok(&mut self.window)
    }

    fn current_limits(&self) -> WindowLimits {
        if self.state.is_immersive {
            self.config.immersive_limits()
        } else {
            self.config.limits
        }
    }

    /// Clamp and apply. Not persisted.
    pub fn set_bounds(&mut self, bounds: Rect) {
        let bounds = clamp_rect(bounds, &self.current_limits());
        let Ok(window) = self.live_window("set_bounds") else {
            return;
        };
        window.set_bounds(bounds);
        self.state.bounds = bounds;
    }

    /// Bounds as they are stored: immersion's title-bar adjustment is undone
    /// so a restart never inherits the shrunken geometry.
    pub fn persisted_bounds(&self) -> Rect {
        let mut bounds = self.state.bounds;
        if self.state.is_immersive && self.config.immersion_adjusts_bounds {
            let title_bar = self.config.title_bar_height;
            bounds.y = bounds.y.saturating_sub(title_bar as i32);
            bounds.height = bounds.height.saturating_add(title_bar);
        }
        bounds
    }

    /// Snapshot bounds and opacity into the bounds record. Failures are logged.
    pub fn save_bounds(&mut self) {
        if self.live_window("save_bounds").is_err() {
            return;
        }
        self.write_bounds_record();
    }

    fn write_bounds_record(&self) {
        let bounds = self.persisted_bounds();
        let record = BoundsRecord {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: bounds.width,
            height: bounds.height,
            opacity: self.state.opacity,
        };
        if let Err(e) = self.bounds_store.save(&record) {
            let err = CoreError::PersistenceWriteFailed {
                record: self.bounds_store.name().to_string(),
                reason: format!("{:#}", e),
            };
            tracing::warn!("{}", err);
        }
    }

    /// Clamp, apply and persist. Returns the value now in effect.
    pub fn set_opacity(&mut self, value: f64) -> Option<f64> {
        let value = opacity::clamp(value, &self.config.opacity);
        let window = self.live_window("set_opacity").ok()?;
        window.set_opacity(value);
        self.state.opacity = value;
        self.write_bounds_record();
        Some(value)
    }

    /// Click-through. Ignored events are forwarded to whatever is underneath.
    pub fn set_ignore_mouse(&mut self, ignore: bool) {
        let Ok(window) = self.live_window("set_ignore_mouse") else {
            return;
        };
        window.set_ignore_mouse_events(ignore, ignore);
        self.state.is_ignoring_mouse = ignore;
    }

    pub fn set_always_on_top(&mut self, flag: bool) {
        let level = if flag {
            WindowLevel::ScreenSaver
        } else {
            WindowLevel::Normal
        };
        let Ok(window) = self.live_window("set_always_on_top") else {
            return;
        };
        window.set_always_on_top(flag, level);
        self.state.is_always_on_top = flag;
    }

    pub fn toggle_visibility(&mut self) {
        let Ok(window) = self.live_window("toggle_visibility") else {
            return;
        };
        if window.is_visible() {
            window.hide();
        } else {
            window.show();
        }
        self.state.is_visible = window.is_visible();
        tracing::debug!("Window visible: {}", self.state.is_visible);
    }

    fn session_slot(&mut self, kind: GestureKind) -> &mut Option<GestureSession> {
        match kind {
            GestureKind::Move => &mut self.move_session,
            GestureKind::Resize => &mut self.resize_session,
        }
    }

    pub fn gesture(&self, kind: GestureKind) -> Option<&GestureSession> {
        match kind {
            GestureKind::Move => self.move_session.as_ref(),
            GestureKind::Resize => self.resize_session.as_ref(),
        }
    }

    /// Start a gesture anchored at `pointer`. A running session of the same
    /// kind is replaced and its ticker stopped. Returns the new session id.
    pub fn begin_gesture(
        &mut self,
        kind: GestureKind,
        direction: Option<ResizeDirection>,
        pointer: Point,
    ) -> Option<u64> {
        self.live_window("begin_gesture").ok()?;

        let id = self.next_session_id;
        self.next_session_id += 1;

        let mut session = GestureSession::new(id, kind, direction, pointer, self.state.bounds);
        if let Some(tx) = &self.tick_tx {
            let period = Duration::from_millis(self.config.gesture_poll_ms.max(1));
            session.ticker = Ticker::spawn(GestureTick { kind, session: id }, period, tx.clone());
        }

        if let Some(previous) = self.session_slot(kind).replace(session) {
            tracing::debug!("Replacing {:?} gesture session {}", kind, previous.id);
            if previous.changed {
                self.save_bounds();
            }
        }
        tracing::debug!("Gesture {:?} started (session {}, {:?})", kind, id, direction);
        Some(id)
    }

    /// Advance a gesture to the current pointer position. Stale session ids
    /// are ignored. Returns true when the window bounds changed.
    pub fn tick_gesture(&mut self, kind: GestureKind, session_id: u64, pointer: Point) -> bool {
        if self.is_destroyed() {
            return false;
        }
        let limits = self.current_limits();
        let Some(session) = self.session_slot(kind).as_mut() else {
            return false;
        };
        if session.id != session_id {
            tracing::debug!(
                "Ignoring stale {:?} tick (session {}, current {})",
                kind,
                session_id,
                session.id
            );
            return false;
        }

        let target = match kind {
            GestureKind::Move => {
                compute_move_bounds(session.start_bounds, session.start_point, pointer)
            }
            GestureKind::Resize => compute_resize_bounds(
                session.start_bounds,
                session.start_point,
                pointer,
                session.direction,
                &limits,
            ),
        };
        if target != session.start_bounds {
            session.changed = true;
        }

        if target == self.state.bounds {
            return false;
        }
        self.window.set_bounds(target);
        self.state.bounds = target;
        true
    }

    /// Stop a gesture. Bounds are saved once if the session moved the window.
    pub fn end_gesture(&mut self, kind: GestureKind) -> bool {
        let Some(session) = self.session_slot(kind).take() else {
            return false;
        };
        tracing::debug!(
            "Gesture {:?} ended (session {}, changed={})",
            kind,
            session.id,
            session.changed
        );
        if session.changed {
            self.save_bounds();
        }
        session.changed
    }

    /// The native window is going away: stop gestures, flush, then refuse
    /// further operations.
    pub fn window_closed(&mut self) {
        if self.is_destroyed() {
            return;
        }
        self.move_session = None;
        self.resize_session = None;
        self.write_bounds_record();
        self.closed = true;
        tracing::info!("Main window closed");
    }

    /// Resize to a content area of `width` x `height`. Outside immersion the
    /// title bar is added on top. Not persisted.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        let height = if self.state.is_immersive {
            height
        } else {
            height.saturating_add(self.config.title_bar_height)
        };
        let bounds = Rect {
            width,
            height,
            ..self.state.bounds
        };
        self.set_bounds(bounds);
    }

    /// Enter or leave immersion. Returns false when already in that mode.
    pub fn set_immersive(&mut self, immersive: bool) -> bool {
        if self.live_window("set_immersive").is_err() || self.state.is_immersive == immersive {
            return false;
        }
        self.state.is_immersive = immersive;

        if self.config.immersion_adjusts_bounds {
            let title_bar = self.config.title_bar_height;
            // Open gestures keep computing from their start bounds, so those
            // move with the window or the next tick undoes the shift.
            for session in [&mut self.move_session, &mut self.resize_session]
                .into_iter()
                .flatten()
            {
                session.start_bounds =
                    shift_for_immersion(session.start_bounds, immersive, title_bar);
            }
            let bounds = shift_for_immersion(self.state.bounds, immersive, title_bar);
            self.set_bounds(bounds);
        }

        self.set_ignore_mouse(immersive);
        self.set_always_on_top(immersive);
        tracing::info!("Immersion mode {}", if immersive { "on" } else { "off" });
        true
    }

    /// Reapply a bounds record, e.g. after a reset to defaults.
    pub fn apply_record(&mut self, record: &BoundsRecord) {
        let current = self.state.bounds;
        let bounds = Rect {
            x: record.x.unwrap_or(current.x),
            y: record.y.unwrap_or(current.y),
            width: record.width,
            height: record.height,
        };
        self.set_bounds(bounds);
        let opacity = opacity::clamp(record.opacity, &self.config.opacity);
        if let Ok(window) = self.live_window("apply_record") {
            window.set_opacity(opacity);
            self.state.opacity = opacity;
        }
    }
}

/// Entering immersion hides the title bar: the content keeps its screen
/// position and the frame loses `title_bar` rows. Leaving reverses it.
fn shift_for_immersion(rect: Rect, immersive: bool, title_bar: u32) -> Rect {
    if immersive {
        Rect {
            y: rect.y.saturating_add(title_bar as i32),
            height: rect.height.saturating_sub(title_bar),
            ..rect
        }
    } else {
        Rect {
            y: rect.y.saturating_sub(title_bar as i32),
            height: rect.height.saturating_add(title_bar),
            ..rect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::{MockWindow, WindowCall};
    use crate::store::mock::MemoryStore;

    fn setup() -> (WindowStateController<MockWindow>, MemoryStore<BoundsRecord>) {
        let store = MemoryStore::with_value(BoundsRecord {
            x: Some(100),
            y: Some(100),
            width: 800,
            height: 600,
            opacity: 1.0,
        });
        let window = MockWindow::new(Rect::new(0, 0, 800, 600));
        let controller =
            WindowStateController::new(window, Config::new(), Box::new(store.clone()));
        (controller, store)
    }

    #[test]
    fn test_restore_from_record() {
        let (controller, store) = setup();
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 800, 600));
        assert_eq!(controller.window().bounds, Rect::new(100, 100, 800, 600));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_restore_defaults_without_record() {
        let store: MemoryStore<BoundsRecord> = MemoryStore::new();
        let window = MockWindow::new(Rect::new(40, 50, 1, 1));
        let controller = WindowStateController::new(window, Config::new(), Box::new(store));
        // Platform-chosen position is kept, size comes from the defaults
        assert_eq!(controller.state().bounds, Rect::new(40, 50, 800, 600));
        assert_eq!(controller.state().opacity, 1.0);
    }

    #[test]
    fn test_restore_clamps_undersized_record() {
        let store = MemoryStore::with_value(BoundsRecord {
            x: Some(0),
            y: Some(0),
            width: 40,
            height: 80,
            opacity: 0.05,
        });
        let window = MockWindow::new(Rect::default());
        let controller = WindowStateController::new(window, Config::new(), Box::new(store));
        assert_eq!(controller.state().bounds, Rect::new(0, 0, 300, 200));
        assert_eq!(controller.state().opacity, 0.2);
    }

    #[test]
    fn test_set_bounds_clamps_without_persisting() {
        let (mut controller, store) = setup();
        controller.set_bounds(Rect::new(5, 6, 10, 10));
        assert_eq!(controller.state().bounds, Rect::new(5, 6, 300, 200));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_move_gesture_scenario() {
        let (mut controller, store) = setup();
        let session = controller
            .begin_gesture(GestureKind::Move, None, Point::new(50, 50))
            .unwrap();

        assert!(controller.tick_gesture(GestureKind::Move, session, Point::new(80, 70)));
        assert_eq!(controller.state().bounds, Rect::new(130, 120, 800, 600));

        assert!(controller.end_gesture(GestureKind::Move));
        assert_eq!(store.writes(), 1);
        let saved = store.get().unwrap();
        assert_eq!((saved.x, saved.y), (Some(130), Some(120)));
    }

    #[test]
    fn test_replacing_moved_session_saves_once() {
        let (mut controller, store) = setup();
        let first = controller
            .begin_gesture(GestureKind::Move, None, Point::new(50, 50))
            .unwrap();
        assert!(controller.tick_gesture(GestureKind::Move, first, Point::new(90, 50)));

        let second = controller
            .begin_gesture(GestureKind::Move, None, Point::new(0, 0))
            .unwrap();
        assert_eq!(store.writes(), 1);
        assert_eq!(store.get().unwrap().x, Some(140));

        // The fresh session starts clean: ending it without movement adds nothing.
        assert!(!controller.tick_gesture(GestureKind::Move, second, Point::new(0, 0)));
        assert!(!controller.end_gesture(GestureKind::Move));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_replacing_unmoved_session_does_not_save() {
        let (mut controller, store) = setup();
        controller.begin_gesture(GestureKind::Move, None, Point::new(50, 50));
        controller.begin_gesture(GestureKind::Move, None, Point::new(60, 60));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_immersion_toggle_during_move_gesture() {
        let (mut controller, store) = setup();
        let session = controller
            .begin_gesture(GestureKind::Move, None, Point::new(50, 50))
            .unwrap();
        assert!(controller.tick_gesture(GestureKind::Move, session, Point::new(60, 60)));
        assert_eq!(controller.state().bounds, Rect::new(110, 110, 800, 600));

        assert!(controller.set_immersive(true));
        assert_eq!(controller.state().bounds, Rect::new(110, 150, 800, 560));

        assert!(controller.tick_gesture(GestureKind::Move, session, Point::new(70, 70)));
        assert_eq!(controller.state().bounds, Rect::new(120, 160, 800, 560));

        assert!(controller.end_gesture(GestureKind::Move));
        let saved = store.get().unwrap();
        assert_eq!((saved.x, saved.y), (Some(120), Some(120)));
        assert_eq!((saved.width, saved.height), (800, 600));

        assert!(controller.set_immersive(false));
        assert_eq!(controller.state().bounds, Rect::new(120, 120, 800, 600));
    }

    #[test]
    fn test_immersion_toggle_during_resize_gesture() {
        let (mut controller, _store) = setup();
        let session = controller
            .begin_gesture(
                GestureKind::Resize,
                Some(ResizeDirection::Both),
                Point::new(0, 0),
            )
            .unwrap();
        assert!(controller.tick_gesture(GestureKind::Resize, session, Point::new(10, 10)));
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 810, 610));

        assert!(controller.set_immersive(true));
        assert!(controller.tick_gesture(GestureKind::Resize, session, Point::new(20, 20)));
        assert_eq!(controller.state().bounds, Rect::new(100, 140, 820, 580));

        controller.end_gesture(GestureKind::Resize);
        assert!(controller.set_immersive(false));
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 820, 620));
    }

    #[test]
    fn test_unchanged_gesture_does_not_save() {
        let (mut controller, store) = setup();
        let session = controller
            .begin_gesture(GestureKind::Move, None, Point::new(50, 50))
            .unwrap();
        assert!(!controller.tick_gesture(GestureKind::Move, session, Point::new(50, 50)));
        assert!(!controller.end_gesture(GestureKind::Move));
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_stale_tick_ignored() {
        let (mut controller, _store) = setup();
        let first = controller
            .begin_gesture(GestureKind::Move, None, Point::new(0, 0))
            .unwrap();
        let second = controller
            .begin_gesture(GestureKind::Move, None, Point::new(0, 0))
            .unwrap();
        assert_ne!(first, second);

        assert!(!controller.tick_gesture(GestureKind::Move, first, Point::new(30, 30)));
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 800, 600));
        assert!(controller.tick_gesture(GestureKind::Move, second, Point::new(30, 30)));
        assert_eq!(controller.state().bounds, Rect::new(130, 130, 800, 600));
    }

    #[test]
    fn test_resize_gesture_respects_minimum() {
        let (mut controller, _store) = setup();
        let session = controller
            .begin_gesture(
                GestureKind::Resize,
                Some(ResizeDirection::Both),
                Point::new(900, 700),
            )
            .unwrap();
        controller.tick_gesture(GestureKind::Resize, session, Point::new(0, 0));
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 300, 200));
    }

    #[test]
    fn test_move_and_resize_sessions_are_independent() {
        let (mut controller, _store) = setup();
        controller.begin_gesture(GestureKind::Move, None, Point::new(0, 0));
        controller.begin_gesture(
            GestureKind::Resize,
            Some(ResizeDirection::Right),
            Point::new(0, 0),
        );
        assert!(controller.gesture(GestureKind::Move).is_some());
        assert!(controller.gesture(GestureKind::Resize).is_some());

        controller.end_gesture(GestureKind::Move);
        assert!(controller.gesture(GestureKind::Move).is_none());
        assert!(controller.gesture(GestureKind::Resize).is_some());
    }

    #[test]
    fn test_set_opacity_applies_and_persists() {
        let (mut controller, store) = setup();
        assert_eq!(controller.set_opacity(0.44), Some(0.4));
        assert_eq!(controller.window().last_call(), Some(&WindowCall::Opacity(0.4)));
        assert_eq!(store.get().unwrap().opacity, 0.4);
    }

    #[test]
    fn test_persistence_failure_is_not_fatal() {
        let (mut controller, store) = setup();
        store.set_failing(true);
        assert_eq!(controller.set_opacity(0.5), Some(0.5));
        assert_eq!(controller.state().opacity, 0.5);
        assert_eq!(store.get().unwrap().opacity, 1.0);
    }

    #[test]
    fn test_ignore_mouse_forwards() {
        let (mut controller, _store) = setup();
        controller.set_ignore_mouse(true);
        assert_eq!(
            controller.window().last_call(),
            Some(&WindowCall::IgnoreMouse {
                ignore: true,
                forward: true
            })
        );
        assert!(controller.state().is_ignoring_mouse);
    }

    #[test]
    fn test_always_on_top_uses_screen_saver_level() {
        let (mut controller, _store) = setup();
        controller.set_always_on_top(true);
        assert_eq!(
            controller.window().last_call(),
            Some(&WindowCall::AlwaysOnTop {
                flag: true,
                level: WindowLevel::ScreenSaver
            })
        );
        controller.set_always_on_top(false);
        assert_eq!(
            controller.window().last_call(),
            Some(&WindowCall::AlwaysOnTop {
                flag: false,
                level: WindowLevel::Normal
            })
        );
    }

    #[test]
    fn test_toggle_visibility() {
        let (mut controller, _store) = setup();
        controller.toggle_visibility();
        assert!(!controller.state().is_visible);
        assert!(!controller.window().visible);
        controller.toggle_visibility();
        assert!(controller.state().is_visible);
    }

    #[test]
    fn test_set_window_size_adds_title_bar() {
        let (mut controller, store) = setup();
        controller.set_window_size(640, 360);
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 640, 400));

        controller.set_immersive(true);
        controller.set_window_size(640, 360);
        assert_eq!(controller.state().bounds.height, 360);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_immersion_round_trip_is_identical() {
        let starts = [
            Rect::new(100, 100, 800, 600),
            Rect::new(0, 0, 300, 200),
            Rect::new(-30, 5, 4000, 3000),
        ];
        for start in starts {
            let (mut controller, _store) = setup();
            controller.set_bounds(start);

            assert!(controller.set_immersive(true));
            let immersive = controller.state().bounds;
            assert_eq!(immersive.y, start.y + 40);
            assert_eq!(immersive.height, start.height - 40);
            assert!(controller.state().is_ignoring_mouse);
            assert!(controller.state().is_always_on_top);

            assert!(controller.set_immersive(false));
            assert_eq!(controller.state().bounds, start);
            assert!(!controller.state().is_ignoring_mouse);
            assert!(!controller.state().is_always_on_top);
        }
    }

    #[test]
    fn test_immersion_without_bounds_adjustment() {
        let store = MemoryStore::with_value(BoundsRecord {
            x: Some(100),
            y: Some(100),
            width: 800,
            height: 600,
            opacity: 1.0,
        });
        let config = Config {
            immersion_adjusts_bounds: false,
            ..Config::new()
        };
        let window = MockWindow::new(Rect::default());
        let mut controller = WindowStateController::new(window, config, Box::new(store));

        controller.set_immersive(true);
        assert_eq!(controller.state().bounds, Rect::new(100, 100, 800, 600));
        assert!(controller.state().is_immersive);
    }

    #[test]
    fn test_immersive_save_stores_full_bounds() {
        let (mut controller, store) = setup();
        controller.set_immersive(true);
        controller.save_bounds();
        let saved = store.get().unwrap();
        assert_eq!((saved.y, saved.height), (Some(100), 600));
    }

    #[test]
    fn test_window_closed_saves_and_disables() {
        let (mut controller, store) = setup();
        controller.begin_gesture(GestureKind::Move, None, Point::new(0, 0));
        controller.window_closed();

        assert_eq!(store.writes(), 1);
        assert!(controller.is_destroyed());
        assert!(controller.gesture(GestureKind::Move).is_none());

        let calls = controller.window().calls.len();
        controller.set_bounds(Rect::new(0, 0, 500, 500));
        controller.toggle_visibility();
        assert_eq!(controller.set_opacity(0.5), None);
        assert!(controller
            .begin_gesture(GestureKind::Move, None, Point::new(0, 0))
            .is_none());
        assert!(!controller.set_immersive(true));
        controller.save_bounds();

        assert_eq!(controller.window().calls.len(), calls);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_installed_ticker_drives_session() {
        let (mut controller, _store) = setup();
        let (tx, mut rx) = mpsc::unbounded_channel();
        controller.install_ticker(tx);

        let session = controller
            .begin_gesture(GestureKind::Move, None, Point::new(0, 0))
            .unwrap();
        let tick = rx.recv().await.unwrap();
        assert_eq!(
            tick,
            GestureTick {
                kind: GestureKind::Move,
                session
            }
        );

        controller.end_gesture(GestureKind::Move);
        while rx.try_recv().is_ok() {}
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(rx.try_recv().is_err());
    }
}

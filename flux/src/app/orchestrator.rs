use flux_ipc::{KeyBindings, ResolutionPreset, StateEvent, StateInfo};

use crate::core::{Config, GestureTick, WindowStateController};
use crate::event_emitter::{create_snapshot, EventEmitter};
use crate::platform::{HotkeyBackend, PointerSource, WebView, WindowHandle};
use crate::shortcut::{ReloadReport, ShortcutRegistry};
use crate::store::{RecordStore, Stores};

/// The collaborators the orchestrator drives
pub struct Platform<W, V, P, B> {
    pub window: W,
    pub view: V,
    pub pointer: P,
    pub hotkeys: B,
}

/// Owns everything mutable in the daemon. Only the event loop touches it, one
/// input at a time.
pub struct Orchestrator<W, V, P, B>
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    pub(super) controller: WindowStateController<W>,
    pub(super) registry: ShortcutRegistry<B>,
    pub(super) view: V,
    pub(super) pointer: P,
    pub(super) key_store: Box<dyn RecordStore<KeyBindings>>,
    pub(super) app_store: Box<dyn RecordStore<Config>>,
    pub(super) preset_store: Box<dyn RecordStore<Vec<ResolutionPreset>>>,
    pub(super) bindings: KeyBindings,
    pub(super) presets: Vec<ResolutionPreset>,
    pub(super) emitter: EventEmitter,
    pub(super) exit_requested: bool,
}

/// Saved bindings overlaid on the defaults, so actions added since the file
/// was written still get a combo.
pub fn load_key_bindings(store: &dyn RecordStore<KeyBindings>) -> KeyBindings {
    let mut bindings = KeyBindings::defaults();
    if let Some(saved) = store.load() {
        bindings.merge(&saved);
    }
    bindings
}

pub fn load_presets(store: &dyn RecordStore<Vec<ResolutionPreset>>) -> Vec<ResolutionPreset> {
    store
        .load()
        .filter(|presets| !presets.is_empty())
        .unwrap_or_else(ResolutionPreset::defaults)
}

impl<W, V, P, B> Orchestrator<W, V, P, B>
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    pub fn new(platform: Platform<W, V, P, B>, stores: Stores, emitter: EventEmitter) -> Self {
        let Stores {
            bounds,
            keys,
            app,
            presets,
        } = stores;

        let config = app.load().unwrap_or_default();
        let bindings = load_key_bindings(keys.as_ref());
        let preset_list = load_presets(presets.as_ref());

        Self {
            controller: WindowStateController::new(platform.window, config, bounds),
            registry: ShortcutRegistry::new(platform.hotkeys),
            view: platform.view,
            pointer: platform.pointer,
            key_store: keys,
            app_store: app,
            preset_store: presets,
            bindings,
            presets: preset_list,
            emitter,
            exit_requested: false,
        }
    }

    /// Register the loaded bindings. Called once the event loop is ready to
    /// receive hotkeys.
    pub fn start(&mut self) -> ReloadReport {
        let report = self.registry.reload(&self.bindings);
        self.emitter.emit_shortcuts_reloaded(report.failed());
        self.emitter.emit_window_updated(self.controller.state());
        report
    }

    pub fn install_ticker(&mut self, tx: tokio::sync::mpsc::UnboundedSender<GestureTick>) {
        self.controller.install_ticker(tx);
    }

    /// Flush state and release every OS registration.
    pub fn shutdown(&mut self) {
        self.controller.save_bounds();
        self.registry.shutdown();
        tracing::info!("Orchestrator shut down");
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    pub fn state_info(&self) -> StateInfo {
        self.controller
            .state()
            .to_info(self.registry.state().as_str())
    }

    pub fn snapshot(&self) -> StateEvent {
        create_snapshot(self.state_info())
    }

    pub fn controller(&self) -> &WindowStateController<W> {
        &self.controller
    }

    pub fn registry(&self) -> &ShortcutRegistry<B> {
        &self.registry
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn pointer(&self) -> &P {
        &self.pointer
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn presets(&self) -> &[ResolutionPreset] {
        &self.presets
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use crate::core::{BoundsRecord, Rect};
    use crate::platform::mock::{MockHotkeyBackend, MockPointer, MockWebView, MockWindow};
    use crate::store::mock::MemoryStore;
    use tokio::sync::mpsc;

    pub type TestOrchestrator =
        Orchestrator<MockWindow, MockWebView, MockPointer, MockHotkeyBackend>;

    pub struct Harness {
        pub orchestrator: TestOrchestrator,
        pub events: mpsc::UnboundedReceiver<StateEvent>,
        pub bounds: MemoryStore<BoundsRecord>,
        pub keys: MemoryStore<KeyBindings>,
        pub app: MemoryStore<Config>,
        pub presets: MemoryStore<Vec<ResolutionPreset>>,
    }

    impl Harness {
        pub fn new() -> Self {
            Self::with_backend(MockHotkeyBackend::new())
        }

        pub fn with_backend(hotkeys: MockHotkeyBackend) -> Self {
            let bounds = MemoryStore::with_value(BoundsRecord {
                x: Some(100),
                y: Some(100),
                width: 800,
                height: 600,
                opacity: 1.0,
            });
            let keys = MemoryStore::new();
            let app = MemoryStore::new();
            let presets = MemoryStore::new();
            let stores = Stores {
                bounds: Box::new(bounds.clone()),
                keys: Box::new(keys.clone()),
                app: Box::new(app.clone()),
                presets: Box::new(presets.clone()),
            };
            let platform = Platform {
                window: MockWindow::new(Rect::new(0, 0, 800, 600)),
                view: MockWebView::new(),
                pointer: MockPointer::at(0, 0),
                hotkeys,
            };
            let (tx, rx) = mpsc::unbounded_channel();
            let mut orchestrator = Orchestrator::new(platform, stores, EventEmitter::new(tx));
            orchestrator.start();

            let mut harness = Self {
                orchestrator,
                events: rx,
                bounds,
                keys,
                app,
                presets,
            };
            harness.drain_events();
            harness
        }

        pub fn drain_events(&mut self) -> Vec<StateEvent> {
            let mut events = Vec::new();
            while let Ok(event) = self.events.try_recv() {
                events.push(event);
            }
            events
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::Harness;
    use super::*;
    use crate::shortcut::RegistryState;
    use crate::store::mock::MemoryStore;
    use flux_ipc::ActionId;

    #[test]
    fn test_start_registers_defaults() {
        let harness = Harness::new();
        let orchestrator = &harness.orchestrator;
        assert_eq!(orchestrator.registry().state(), RegistryState::Active);
        assert_eq!(orchestrator.registry().active().len(), 9);
        assert_eq!(orchestrator.bindings(), &KeyBindings::defaults());
        assert_eq!(orchestrator.presets(), ResolutionPreset::defaults().as_slice());
    }

    #[test]
    fn test_saved_bindings_merge_over_defaults() {
        let mut saved = KeyBindings::new();
        saved.set(ActionId::BossKey, "Alt+Q");
        let store = MemoryStore::with_value(saved);

        let bindings = load_key_bindings(&store);
        assert_eq!(bindings.get(ActionId::BossKey), Some("Alt+Q"));
        assert_eq!(bindings.get(ActionId::ImmersionMode), Some("Home"));
        assert_eq!(bindings.len(), 9);
    }

    #[test]
    fn test_empty_saved_presets_fall_back() {
        let store: MemoryStore<Vec<ResolutionPreset>> = MemoryStore::with_value(vec![]);
        assert_eq!(load_presets(&store), ResolutionPreset::defaults());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let harness = Harness::new();
        match harness.orchestrator.snapshot() {
            StateEvent::Snapshot { state } => {
                assert_eq!(state.bounds.x, 100);
                assert_eq!(state.opacity, 1.0);
                assert_eq!(state.shortcuts_state, "active");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_shutdown_flushes_and_unregisters() {
        let mut harness = Harness::new();
        harness.orchestrator.shutdown();
        assert_eq!(harness.bounds.writes(), 1);
        assert_eq!(
            harness.orchestrator.registry().state(),
            RegistryState::Unregistered
        );
        assert!(harness.orchestrator.registry().backend().registered.is_empty());
    }
}

use crate::action::run_action;
use crate::effect::Effect;
use crate::error::CoreError;
use crate::platform::{HotkeyBackend, PointerSource, WebView, WindowHandle};
use crate::store::RecordStore;

use super::orchestrator::Orchestrator;

fn persist<T>(store: &dyn RecordStore<T>, value: &T) {
    if let Err(e) = store.save(value) {
        let err = CoreError::PersistenceWriteFailed {
            record: store.name().to_string(),
            reason: format!("{:#}", e),
        };
        tracing::warn!("{}", err);
    }
}

/// Execute side effects.
/// Persistence failures are logged; view failures abort the remaining effects.
pub fn execute_effects<W, V, P, B>(
    effects: Vec<Effect>,
    orch: &mut Orchestrator<W, V, P, B>,
) -> Result<(), String>
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    for effect in effects {
        match effect {
            Effect::RunAction(action) => {
                let config = orch.controller.config().clone();
                let result = run_action(action, &mut orch.controller, &config)
                    .map_err(|e| e.to_string())
                    .and_then(|effects| execute_effects(effects, orch));
                if let Err(reason) = result {
                    tracing::error!("{}", CoreError::ActionExecutionFailed { action, reason });
                }
            }
            Effect::Broadcast(event) => {
                orch.emitter.emit(event);
            }
            Effect::ExecuteScript(script) => {
                orch.view.execute_script(&script)?;
            }
            Effect::NavigateHistory(direction) => {
                if !orch.view.navigate(direction)? {
                    tracing::debug!("No history to go {:?}", direction);
                }
            }
            Effect::ReloadShortcuts => {
                let report = orch.registry.reload(&orch.bindings);
                orch.emitter.emit_shortcuts_reloaded(report.failed());
            }
            Effect::PersistKeyBindings => {
                persist(orch.key_store.as_ref(), &orch.bindings);
            }
            Effect::PersistAppConfig => {
                persist(orch.app_store.as_ref(), orch.controller.config());
            }
            Effect::PersistResolutionPresets => {
                persist(orch.preset_store.as_ref(), &orch.presets);
            }
            Effect::PersistBounds => {
                orch.controller.save_bounds();
            }
            Effect::Exit => {
                orch.exit_requested = true;
            }
        }
    }
    Ok(())
}

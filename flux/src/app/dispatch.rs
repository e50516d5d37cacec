use flux_ipc::{Command, Response};

use crate::core::GestureTick;
use crate::effect::Effect;
use crate::platform::{HotkeyBackend, PointerSource, WebView, WindowHandle};

use super::command::process_command;
use super::effects::execute_effects;
use super::orchestrator::Orchestrator;
use super::state_events::{capture_event_state, emit_state_change_events};

/// Unified command dispatcher for IPC commands.
/// Handles the common pattern: capture state -> process command -> execute effects -> emit events.
pub fn dispatch_command<W, V, P, B>(cmd: &Command, orch: &mut Orchestrator<W, V, P, B>) -> Response
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    let pre_state = capture_event_state(&orch.controller);

    let result = process_command(orch, cmd);
    let response = match execute_effects(result.effects, orch) {
        Ok(()) => result.response,
        Err(message) => Response::Error { message },
    };

    emit_state_change_events(&orch.emitter, &orch.controller, &pre_state);
    response
}

/// A combo fired by the hotkey backend. Unknown combos and combos fired while
/// suspended are dropped; action failures are logged.
pub fn dispatch_hotkey<W, V, P, B>(combo: &str, orch: &mut Orchestrator<W, V, P, B>)
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    let Some(action) = orch.registry.lookup(combo) else {
        return;
    };
    tracing::debug!("Hotkey {} -> {}", combo, action);

    let pre_state = capture_event_state(&orch.controller);
    // RunAction contains its own failures
    let _ = execute_effects(vec![Effect::RunAction(action)], orch);
    emit_state_change_events(&orch.emitter, &orch.controller, &pre_state);
}

pub fn dispatch_gesture_tick<W, V, P, B>(tick: GestureTick, orch: &mut Orchestrator<W, V, P, B>)
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    let pointer = orch.pointer.cursor_position();
    let pre_state = capture_event_state(&orch.controller);
    if orch.controller.tick_gesture(tick.kind, tick.session, pointer) {
        emit_state_change_events(&orch.emitter, &orch.controller, &pre_state);
    }
}

use flux_ipc::WindowInfo;

use crate::core::WindowStateController;
use crate::event_emitter::{window_to_info, EventEmitter};
use crate::platform::WindowHandle;

/// State captured before command execution for event comparison
pub struct PreEventState {
    window: Option<WindowInfo>,
}

/// Capture relevant state for event emission comparison
pub fn capture_event_state<W: WindowHandle>(
    controller: &WindowStateController<W>,
) -> PreEventState {
    PreEventState {
        window: live_window_info(controller),
    }
}

fn live_window_info<W: WindowHandle>(controller: &WindowStateController<W>) -> Option<WindowInfo> {
    if controller.is_destroyed() {
        return None;
    }
    Some(window_to_info(controller.state()))
}

/// Emit `window_updated` when anything the shell mirrors has changed
pub fn emit_state_change_events<W: WindowHandle>(
    emitter: &EventEmitter,
    controller: &WindowStateController<W>,
    pre: &PreEventState,
) {
    let Some(post) = live_window_info(controller) else {
        return;
    };
    if pre.window.as_ref() != Some(&post) {
        emitter.emit_window_updated(controller.state());
    }
}

use flux_ipc::{ActionId, HistoryDirection, Response, StateEvent};

/// Side effects requested by command processing and actions. They run after
/// the state mutation that produced them, in order.
#[derive(Debug, Clone)]
pub enum Effect {
    /// Run a bound action; its failures are logged, never returned
    RunAction(ActionId),
    Broadcast(StateEvent),
    ExecuteScript(String),
    NavigateHistory(HistoryDirection),
    /// Rebuild all shortcut registrations from the current bindings
    ReloadShortcuts,
    PersistKeyBindings,
    PersistAppConfig,
    PersistResolutionPresets,
    PersistBounds,
    Exit,
}

pub struct CommandResult {
    pub response: Response,
    pub effects: Vec<Effect>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            response: Response::Ok,
            effects: vec![],
        }
    }

    pub fn ok_with_effects(effects: Vec<Effect>) -> Self {
        Self {
            response: Response::Ok,
            effects,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            response: Response::Error {
                message: message.into(),
            },
            effects: vec![],
        }
    }

    pub fn with_response(response: Response) -> Self {
        Self {
            response,
            effects: vec![],
        }
    }

    pub fn with_response_and_effects(response: Response, effects: Vec<Effect>) -> Self {
        Self { response, effects }
    }
}

use flux_ipc::ActionId;
use thiserror::Error;

/// Failures the core reports. None of them is fatal to the process.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoreError {
    #[error("invalid opacity adjustment: {delta}")]
    InvalidAdjustment { delta: f64 },

    #[error("failed to register {combo} for {action}")]
    RegistrationFailed { action: ActionId, combo: String },

    #[error("action {action} failed: {reason}")]
    ActionExecutionFailed { action: ActionId, reason: String },

    #[error("failed to persist {record}: {reason}")]
    PersistenceWriteFailed { record: String, reason: String },

    #[error("window has been destroyed")]
    WindowDestroyed,
}

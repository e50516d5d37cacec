pub mod action;
pub mod command;
pub mod event;

pub use action::{ActionId, KeyBindings};
pub use command::{
    BoundsInfo, Command, GestureKind, HistoryDirection, ResetOptions, ResizeDirection,
    ResolutionPreset, Response, ShortcutFailure, ShortcutInfo, StateInfo,
};
pub use event::{EventFilter, StateEvent, SubscribeRequest, WindowInfo, WindowLevel};

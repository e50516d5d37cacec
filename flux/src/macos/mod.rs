mod hotkey;
mod pointer;

pub use hotkey::MacHotkeys;
pub use pointer::SystemPointer;

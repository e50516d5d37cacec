mod client;
mod event_server;
mod server;

use std::path::PathBuf;

pub use client::{subscribe_and_print, IpcClient};
pub use event_server::{EventBroadcaster, EventServer};
pub use server::IpcServer;

/// Request/response socket
pub fn socket_path() -> PathBuf {
    std::env::temp_dir().join("flux.sock")
}

/// Event stream socket
pub fn event_socket_path() -> PathBuf {
    std::env::temp_dir().join("flux-events.sock")
}

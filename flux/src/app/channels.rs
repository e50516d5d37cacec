use tokio::sync::{broadcast, mpsc, oneshot};

use crate::core::GestureTick;
use crate::ipc::EventBroadcaster;
use flux_ipc::{Command, Response, StateEvent};

pub type IpcCommandWithResponse = (Command, mpsc::Sender<Response>);

pub type SnapshotRequest = oneshot::Sender<StateEvent>;

pub struct IpcRelay {
    pub server_tx: mpsc::Sender<IpcCommandWithResponse>,
    pub cmd_rx: mpsc::Receiver<IpcCommandWithResponse>,
}

pub struct EventStreaming {
    pub broadcaster: EventBroadcaster,
    pub event_server_rx: broadcast::Receiver<StateEvent>,
    pub state_event_tx: mpsc::UnboundedSender<StateEvent>,
    pub state_event_rx: mpsc::UnboundedReceiver<StateEvent>,
}

pub struct SnapshotRelay {
    pub request_tx: mpsc::Sender<SnapshotRequest>,
    pub request_rx: mpsc::Receiver<SnapshotRequest>,
}

/// Inputs produced outside the event loop
pub struct InputChannels {
    /// Combos fired by the OS hotkey backend
    pub hotkey_tx: mpsc::UnboundedSender<String>,
    pub hotkey_rx: mpsc::UnboundedReceiver<String>,
    pub tick_tx: mpsc::UnboundedSender<GestureTick>,
    pub tick_rx: mpsc::UnboundedReceiver<GestureTick>,
}

pub struct DaemonChannels {
    pub ipc: IpcRelay,
    pub events: EventStreaming,
    pub snapshots: SnapshotRelay,
    pub inputs: InputChannels,
}

pub fn create_channels() -> DaemonChannels {
    // Channel: IPC server -> event loop
    let (server_tx, cmd_rx) = mpsc::channel::<IpcCommandWithResponse>(256);

    // Event broadcasting for state streaming
    let broadcaster = EventBroadcaster::new(256);
    let event_server_rx = broadcaster.subscribe();

    // Channel: state events (event loop -> broadcaster)
    let (state_event_tx, state_event_rx) = mpsc::unbounded_channel::<StateEvent>();

    // Channel: snapshot requests (event server -> event loop)
    let (request_tx, request_rx) = mpsc::channel::<SnapshotRequest>(16);

    let (hotkey_tx, hotkey_rx) = mpsc::unbounded_channel::<String>();
    let (tick_tx, tick_rx) = mpsc::unbounded_channel::<GestureTick>();

    DaemonChannels {
        ipc: IpcRelay { server_tx, cmd_rx },
        events: EventStreaming {
            broadcaster,
            event_server_rx,
            state_event_tx,
            state_event_rx,
        },
        snapshots: SnapshotRelay {
            request_tx,
            request_rx,
        },
        inputs: InputChannels {
            hotkey_tx,
            hotkey_rx,
            tick_tx,
            tick_rx,
        },
    }
}

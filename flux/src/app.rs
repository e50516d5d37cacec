mod channels;
mod command;
mod dispatch;
mod effects;
mod orchestrator;
mod state_events;

use anyhow::{Context, Result};

use crate::core::Rect;
use crate::event_emitter::EventEmitter;
use crate::ipc::{EventServer, IpcServer};
use crate::shell::{ShellView, ShellWindow};
use crate::store::{self, Stores};

use channels::{
    create_channels, DaemonChannels, EventStreaming, InputChannels, IpcRelay, SnapshotRelay,
};
use dispatch::{dispatch_command, dispatch_gesture_tick, dispatch_hotkey};
use orchestrator::{Orchestrator, Platform};

#[cfg(target_os = "macos")]
type DaemonHotkeys = crate::macos::MacHotkeys;
#[cfg(target_os = "macos")]
type DaemonPointer = crate::macos::SystemPointer;

#[cfg(not(target_os = "macos"))]
type DaemonHotkeys = crate::shell::ShellHotkeys;
#[cfg(not(target_os = "macos"))]
type DaemonPointer = crate::shell::ReportedPointer;

#[cfg(target_os = "macos")]
fn create_platform_inputs(
    hotkey_tx: tokio::sync::mpsc::UnboundedSender<String>,
) -> (DaemonHotkeys, DaemonPointer) {
    (
        crate::macos::MacHotkeys::new(hotkey_tx),
        crate::macos::SystemPointer,
    )
}

#[cfg(not(target_os = "macos"))]
fn create_platform_inputs(
    _hotkey_tx: tokio::sync::mpsc::UnboundedSender<String>,
) -> (DaemonHotkeys, DaemonPointer) {
    (
        crate::shell::ShellHotkeys::new(),
        crate::shell::ReportedPointer::default(),
    )
}

pub struct App {}

impl App {
    pub fn run() -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Failed to build tokio runtime")?;
        runtime.block_on(Self::run_async())
    }

    async fn run_async() -> Result<()> {
        let DaemonChannels {
            ipc,
            events,
            snapshots,
            inputs,
        } = create_channels();
        let IpcRelay {
            server_tx: ipc_server_tx,
            cmd_rx: mut ipc_rx,
        } = ipc;
        let EventStreaming {
            broadcaster,
            event_server_rx,
            state_event_tx,
            mut state_event_rx,
        } = events;
        let SnapshotRelay {
            request_tx: snapshot_request_tx,
            request_rx: mut snapshot_request_rx,
        } = snapshots;
        let InputChannels {
            hotkey_tx,
            mut hotkey_rx,
            tick_tx,
            mut tick_rx,
        } = inputs;

        tracing::info!("Event loop starting");

        // Start IPC server
        let ipc_server = IpcServer::new(ipc_server_tx);
        tokio::spawn(async move {
            if let Err(e) = ipc_server.run().await {
                tracing::error!("IPC server error: {}", e);
            }
        });

        // Start Event server
        let event_server = EventServer::new(event_server_rx, snapshot_request_tx);
        tokio::spawn(async move {
            if let Err(e) = event_server.run().await {
                tracing::error!("Event server error: {}", e);
            }
        });

        // Forward state events to the broadcast channel
        tokio::spawn(async move {
            while let Some(event) = state_event_rx.recv().await {
                broadcaster.send(event);
            }
        });

        let config_dir = store::config_dir();
        tracing::info!("Config directory: {}", config_dir.display());
        let emitter = EventEmitter::new(state_event_tx);
        let (hotkeys, pointer) = create_platform_inputs(hotkey_tx);
        let platform = Platform {
            window: ShellWindow::new(Rect::default()),
            view: ShellView::new(emitter.clone()),
            pointer,
            hotkeys,
        };
        let mut orchestrator = Orchestrator::new(platform, Stores::in_dir(&config_dir), emitter);
        orchestrator.install_ticker(tick_tx);

        let report = orchestrator.start();
        for failure in &report.failures {
            tracing::warn!("{}", failure);
        }

        loop {
            tokio::select! {
                Some((cmd, resp_tx)) = ipc_rx.recv() => {
                    tracing::debug!("Received IPC command: {:?}", cmd);
                    let response = dispatch_command(&cmd, &mut orchestrator);
                    if resp_tx.send(response).await.is_err() {
                        tracing::debug!("IPC client went away before the response");
                    }
                    if orchestrator.exit_requested() {
                        break;
                    }
                }
                Some(combo) = hotkey_rx.recv() => {
                    dispatch_hotkey(&combo, &mut orchestrator);
                }
                Some(tick) = tick_rx.recv() => {
                    dispatch_gesture_tick(tick, &mut orchestrator);
                }
                Some(snapshot_req) = snapshot_request_rx.recv() => {
                    let _ = snapshot_req.send(orchestrator.snapshot());
                }
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!("Failed to listen for ctrl-c: {}", e);
                    }
                    tracing::info!("Interrupted");
                    break;
                }
                else => break,
            }
        }

        orchestrator.shutdown();
        tracing::info!("Event loop exiting");
        Ok(())
    }
}

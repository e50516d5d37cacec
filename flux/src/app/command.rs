use flux_ipc::{Command, KeyBindings, ResetOptions, ResolutionPreset, Response, StateEvent};

use crate::action::adjust_opacity;
use crate::core::{BoundsRecord, Config, Point};
use crate::effect::{CommandResult, Effect};
use crate::platform::{HotkeyBackend, PointerSource, WebView, WindowHandle};

use super::orchestrator::Orchestrator;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Processes a command and returns a response with effects.
/// State is mutated here; IO, broadcasts and registry rebuilds are left to
/// the returned effects.
pub fn process_command<W, V, P, B>(
    orch: &mut Orchestrator<W, V, P, B>,
    cmd: &Command,
) -> CommandResult
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    match cmd {
        // Shortcuts
        Command::GetKeyBindings => CommandResult::with_response(Response::KeyBindings {
            bindings: orch.bindings.clone(),
        }),
        Command::SaveKeyBindings { bindings } => {
            orch.bindings.merge(bindings);
            tracing::info!("Key bindings updated ({} entries)", bindings.len());
            CommandResult::ok_with_effects(vec![
                Effect::PersistKeyBindings,
                Effect::ReloadShortcuts,
            ])
        }
        Command::SuspendShortcuts => {
            orch.registry.suspend();
            CommandResult::ok()
        }
        Command::ResumeShortcuts => {
            let report = orch.registry.resume();
            CommandResult::ok_with_effects(vec![Effect::Broadcast(
                StateEvent::ShortcutsReloaded {
                    failed: report.failed(),
                },
            )])
        }
        Command::ListShortcuts => CommandResult::with_response(Response::Shortcuts {
            shortcuts: orch.registry.info(),
        }),
        Command::TriggerHotkey { combo } => match orch.registry.lookup(combo) {
            Some(action) => CommandResult::ok_with_effects(vec![Effect::RunAction(action)]),
            None => CommandResult::ok(),
        },

        // Opacity
        Command::GetOpacity => CommandResult::with_response(Response::Opacity {
            opacity: orch.controller.state().opacity,
        }),
        Command::AdjustOpacity { delta } => {
            let config = orch.controller.config().clone();
            match adjust_opacity(&mut orch.controller, *delta, &config) {
                Ok(effects) => CommandResult::with_response_and_effects(
                    Response::Opacity {
                        opacity: orch.controller.state().opacity,
                    },
                    effects,
                ),
                Err(e) => CommandResult::error(e.to_string()),
            }
        }

        // Window
        Command::SetWindowSize { width, height } => {
            orch.controller.set_window_size(*width, *height);
            CommandResult::ok()
        }
        Command::SetIgnoreMouse { ignore } => {
            orch.controller.set_ignore_mouse(*ignore);
            CommandResult::ok()
        }
        Command::BeginGesture { kind, direction } => {
            let pointer = orch.pointer.cursor_position();
            orch.controller.begin_gesture(*kind, *direction, pointer);
            CommandResult::ok()
        }
        Command::EndGesture { kind } => {
            orch.controller.end_gesture(*kind);
            CommandResult::ok()
        }
        Command::PointerMoved { x, y } => {
            orch.pointer.report(Point::new(*x, *y));
            CommandResult::ok()
        }
        Command::WindowClosed => {
            orch.controller.window_closed();
            CommandResult::ok()
        }

        // Settings
        Command::GetResolutionPresets => CommandResult::with_response(Response::ResolutionPresets {
            presets: orch.presets.clone(),
        }),
        Command::SaveResolutionPresets { presets } => {
            if let Some(bad) = presets.iter().find(|p| p.width == 0 || p.height == 0) {
                return CommandResult::error(format!("Invalid preset: {}", bad.name));
            }
            orch.presets = presets.clone();
            CommandResult::ok_with_effects(vec![
                Effect::PersistResolutionPresets,
                Effect::Broadcast(StateEvent::ResolutionPresetsUpdated {
                    presets: presets.clone(),
                }),
            ])
        }
        Command::GetDebugMode => CommandResult::with_response(Response::DebugMode {
            enabled: orch.controller.config().debug_mode,
        }),
        Command::SetDebugMode { enabled } => {
            let config = Config {
                debug_mode: *enabled,
                ..orch.controller.config().clone()
            };
            orch.controller.set_config(config);
            tracing::info!("Debug mode {} (log level applies on restart)", enabled);
            CommandResult::ok_with_effects(vec![Effect::PersistAppConfig])
        }
        Command::ResetConfig { options } => reset_config(orch, *options),

        // Queries
        Command::GetState => CommandResult::with_response(Response::State {
            state: orch.state_info(),
        }),
        Command::GetVersion => CommandResult::with_response(Response::Version {
            version: VERSION.to_string(),
        }),

        Command::RequestExit => {
            tracing::info!("Exit requested");
            CommandResult::ok_with_effects(vec![Effect::Exit])
        }
    }
}

fn reset_config<W, V, P, B>(
    orch: &mut Orchestrator<W, V, P, B>,
    options: ResetOptions,
) -> CommandResult
where
    W: WindowHandle,
    V: WebView,
    P: PointerSource,
    B: HotkeyBackend,
{
    let mut effects = Vec::new();

    if options.app_config {
        orch.controller.set_config(Config::default());
        effects.push(Effect::PersistAppConfig);
    }
    if options.window_config {
        let defaults = BoundsRecord::defaults(orch.controller.config());
        orch.controller.apply_record(&defaults);
        effects.push(Effect::PersistBounds);
    }
    if options.key_config {
        orch.bindings = KeyBindings::defaults();
        effects.push(Effect::PersistKeyBindings);
        effects.push(Effect::ReloadShortcuts);
    }
    if options.resolution_presets {
        orch.presets = ResolutionPreset::defaults();
        effects.push(Effect::PersistResolutionPresets);
        effects.push(Effect::Broadcast(StateEvent::ResolutionPresetsUpdated {
            presets: orch.presets.clone(),
        }));
    }

    tracing::info!("Configuration reset: {:?}", options);
    effects.push(Effect::Broadcast(StateEvent::ConfigReset { options }));
    CommandResult::ok_with_effects(effects)
}

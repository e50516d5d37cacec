mod action;
mod app;
mod core;
mod effect;
mod error;
mod event_emitter;
mod hotkey;
mod ipc;
#[cfg(target_os = "macos")]
mod macos;
mod platform;
mod shell;
mod shortcut;
mod store;

use anyhow::{bail, Context, Result};
use argh::FromArgs;
use ipc::IpcClient;
use tracing_subscriber::EnvFilter;

use flux_ipc::{
    ActionId, Command, EventFilter, GestureKind, KeyBindings, ResetOptions, ResizeDirection,
    ResolutionPreset, Response,
};

use crate::core::Config;
use crate::store::{JsonFileStore, RecordStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flux - window state and global shortcuts for an overlay browser
#[derive(FromArgs)]
struct Cli {
    #[argh(subcommand)]
    command: Option<SubCommand>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum SubCommand {
    Start(StartCmd),
    Version(VersionCmd),
    Subscribe(SubscribeCmd),
    GetKeyBindings(GetKeyBindingsCmd),
    Bind(BindCmd),
    Unbind(UnbindCmd),
    SuspendShortcuts(SuspendShortcutsCmd),
    ResumeShortcuts(ResumeShortcutsCmd),
    ListShortcuts(ListShortcutsCmd),
    TriggerHotkey(TriggerHotkeyCmd),
    GetOpacity(GetOpacityCmd),
    AdjustOpacity(AdjustOpacityCmd),
    SetWindowSize(SetWindowSizeCmd),
    SetIgnoreMouse(SetIgnoreMouseCmd),
    BeginGesture(BeginGestureCmd),
    EndGesture(EndGestureCmd),
    PointerMoved(PointerMovedCmd),
    WindowClosed(WindowClosedCmd),
    GetPresets(GetPresetsCmd),
    SavePresets(SavePresetsCmd),
    GetDebugMode(GetDebugModeCmd),
    SetDebugMode(SetDebugModeCmd),
    ResetConfig(ResetConfigCmd),
    GetState(GetStateCmd),
    DaemonVersion(DaemonVersionCmd),
    Quit(QuitCmd),
}

/// Start the flux daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "start")]
struct StartCmd {}

/// Show version information
#[derive(FromArgs)]
#[argh(subcommand, name = "version")]
struct VersionCmd {}

/// Stream state events as JSON lines
#[derive(FromArgs)]
#[argh(subcommand, name = "subscribe")]
struct SubscribeCmd {
    /// send the current state first
    #[argh(switch)]
    snapshot: bool,
    /// comma separated event groups: opacity, immersion, view, window, settings
    #[argh(option)]
    filter: Option<String>,
}

/// Show the saved key bindings
#[derive(FromArgs)]
#[argh(subcommand, name = "get-key-bindings")]
struct GetKeyBindingsCmd {}

/// Bind a combo to an action and re-register shortcuts
#[derive(FromArgs)]
#[argh(subcommand, name = "bind")]
struct BindCmd {
    /// action (e.g., BossKey, Opacity-Up)
    #[argh(positional)]
    action: String,
    /// combo (e.g., Alt+Up, Ctrl+Shift+F5)
    #[argh(positional)]
    combo: String,
}

/// Leave an action without a combo
#[derive(FromArgs)]
#[argh(subcommand, name = "unbind")]
struct UnbindCmd {
    /// action to unbind
    #[argh(positional)]
    action: String,
}

/// Release all global shortcuts (e.g., while a settings field records keys)
#[derive(FromArgs)]
#[argh(subcommand, name = "suspend-shortcuts")]
struct SuspendShortcutsCmd {}

/// Register the saved shortcuts again
#[derive(FromArgs)]
#[argh(subcommand, name = "resume-shortcuts")]
struct ResumeShortcutsCmd {}

/// List active shortcuts and the last registration failures
#[derive(FromArgs)]
#[argh(subcommand, name = "list-shortcuts")]
struct ListShortcutsCmd {}

/// Fire a combo as if it had been pressed
#[derive(FromArgs)]
#[argh(subcommand, name = "trigger-hotkey")]
struct TriggerHotkeyCmd {
    /// combo
    #[argh(positional)]
    combo: String,
}

/// Print the window opacity
#[derive(FromArgs)]
#[argh(subcommand, name = "get-opacity")]
struct GetOpacityCmd {}

/// Change the window opacity by a delta
#[derive(FromArgs)]
#[argh(subcommand, name = "adjust-opacity")]
struct AdjustOpacityCmd {
    /// delta (e.g., 0.1, -0.1)
    #[argh(positional)]
    delta: f64,
}

/// Resize the window content area
#[derive(FromArgs)]
#[argh(subcommand, name = "set-window-size")]
struct SetWindowSizeCmd {
    /// content width
    #[argh(positional)]
    width: u32,
    /// content height
    #[argh(positional)]
    height: u32,
}

/// Make the window click-through or not
#[derive(FromArgs)]
#[argh(subcommand, name = "set-ignore-mouse")]
struct SetIgnoreMouseCmd {
    /// on or off
    #[argh(positional)]
    state: String,
}

/// Start a move or resize gesture at the current pointer
#[derive(FromArgs)]
#[argh(subcommand, name = "begin-gesture")]
struct BeginGestureCmd {
    /// move or resize
    #[argh(positional)]
    kind: String,
    /// resize edge: right, bottom, both
    #[argh(option)]
    direction: Option<String>,
}

/// Finish a move or resize gesture
#[derive(FromArgs)]
#[argh(subcommand, name = "end-gesture")]
struct EndGestureCmd {
    /// move or resize
    #[argh(positional)]
    kind: String,
}

/// Report the pointer position in screen coordinates
#[derive(FromArgs)]
#[argh(subcommand, name = "pointer-moved")]
struct PointerMovedCmd {
    /// x
    #[argh(positional)]
    x: i32,
    /// y
    #[argh(positional)]
    y: i32,
}

/// Tell the daemon the native window is gone
#[derive(FromArgs)]
#[argh(subcommand, name = "window-closed")]
struct WindowClosedCmd {}

/// List resolution presets
#[derive(FromArgs)]
#[argh(subcommand, name = "get-presets")]
struct GetPresetsCmd {}

/// Replace resolution presets
#[derive(FromArgs)]
#[argh(subcommand, name = "save-presets")]
struct SavePresetsCmd {
    /// sizes as WIDTHxHEIGHT (e.g., 640x360 1280x720)
    #[argh(positional, greedy)]
    sizes: Vec<String>,
}

/// Print whether debug mode is enabled
#[derive(FromArgs)]
#[argh(subcommand, name = "get-debug-mode")]
struct GetDebugModeCmd {}

/// Enable or disable debug mode (applies on next start)
#[derive(FromArgs)]
#[argh(subcommand, name = "set-debug-mode")]
struct SetDebugModeCmd {
    /// on or off
    #[argh(positional)]
    state: String,
}

/// Restore saved records to their defaults
#[derive(FromArgs)]
#[argh(subcommand, name = "reset-config")]
struct ResetConfigCmd {
    /// reset key bindings
    #[argh(switch)]
    keys: bool,
    /// reset window bounds and opacity
    #[argh(switch)]
    window: bool,
    /// reset app settings
    #[argh(switch)]
    app: bool,
    /// reset resolution presets
    #[argh(switch)]
    presets: bool,
}

/// Print the current window state
#[derive(FromArgs)]
#[argh(subcommand, name = "get-state")]
struct GetStateCmd {}

/// Print the running daemon's version
#[derive(FromArgs)]
#[argh(subcommand, name = "daemon-version")]
struct DaemonVersionCmd {}

/// Quit the flux daemon
#[derive(FromArgs)]
#[argh(subcommand, name = "quit")]
struct QuitCmd {}

fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    match cli.command {
        None => {
            // No subcommand - show help (simulate --help)
            let args: Vec<&str> = vec!["flux", "--help"];
            if let Err(e) = Cli::from_args(&args[..1], &args[1..]) {
                println!("{}", e.output);
            }
            Ok(())
        }
        Some(SubCommand::Start(_)) => {
            init_logging();
            tracing::info!("flux {} starting", VERSION);
            app::App::run()
        }
        Some(SubCommand::Version(_)) => {
            println!("flux {}", VERSION);
            Ok(())
        }
        Some(SubCommand::Subscribe(cmd)) => {
            let filter = cmd.filter.as_deref().map(parse_filter).transpose()?;
            ipc::subscribe_and_print(cmd.snapshot, filter)
        }
        Some(subcmd) => run_cli(subcmd),
    }
}

/// `RUST_LOG` wins; otherwise the saved debug mode picks the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let app_config = store::record_path(&store::config_dir(), store::APP_CONFIG);
        let debug = JsonFileStore::<Config>::new(app_config)
            .load()
            .is_some_and(|config| config.debug_mode);
        EnvFilter::new(if debug { "debug" } else { "info" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run_cli(subcmd: SubCommand) -> Result<()> {
    let cmd = to_command(subcmd)?;
    let mut client = IpcClient::connect()?;
    let response = client.send(&cmd)?;

    match response {
        Response::Ok => {}
        Response::Error { message } => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
        Response::KeyBindings { bindings } => {
            for (action, combo) in bindings.iter() {
                println!("{} -> {}", action, display_combo(combo));
            }
        }
        Response::Shortcuts { shortcuts } => {
            println!("State: {}", shortcuts.state);
            for (action, combo) in &shortcuts.active {
                println!("{} -> {}", action, combo);
            }
            for failure in &shortcuts.failed {
                println!("{} -> {} (failed)", failure.action, failure.combo);
            }
        }
        Response::Opacity { opacity } => println!("{:.1}", opacity),
        Response::State { state } => {
            let b = state.bounds;
            println!("Bounds: {}x{} @ ({},{})", b.width, b.height, b.x, b.y);
            println!("Opacity: {:.1}", state.opacity);
            println!("Visible: {}", state.is_visible);
            println!("Immersive: {}", state.is_immersive);
            println!("Always on top: {}", state.is_always_on_top);
            println!("Ignoring mouse: {}", state.is_ignoring_mouse);
            println!("Shortcuts: {}", state.shortcuts_state);
        }
        Response::ResolutionPresets { presets } => {
            for preset in presets {
                println!("{}x{}\t{}", preset.width, preset.height, preset.name);
            }
        }
        Response::DebugMode { enabled } => println!("{}", on_off(enabled)),
        Response::Version { version } => println!("flux daemon {}", version),
    }

    Ok(())
}

fn to_command(subcmd: SubCommand) -> Result<Command> {
    let cmd = match subcmd {
        SubCommand::Start(_) | SubCommand::Version(_) | SubCommand::Subscribe(_) => {
            unreachable!("handled in main")
        }
        SubCommand::GetKeyBindings(_) => Command::GetKeyBindings,
        SubCommand::Bind(cmd) => single_binding(&cmd.action, cmd.combo)?,
        SubCommand::Unbind(cmd) => single_binding(&cmd.action, String::new())?,
        SubCommand::SuspendShortcuts(_) => Command::SuspendShortcuts,
        SubCommand::ResumeShortcuts(_) => Command::ResumeShortcuts,
        SubCommand::ListShortcuts(_) => Command::ListShortcuts,
        SubCommand::TriggerHotkey(cmd) => Command::TriggerHotkey { combo: cmd.combo },
        SubCommand::GetOpacity(_) => Command::GetOpacity,
        SubCommand::AdjustOpacity(cmd) => Command::AdjustOpacity { delta: cmd.delta },
        SubCommand::SetWindowSize(cmd) => Command::SetWindowSize {
            width: cmd.width,
            height: cmd.height,
        },
        SubCommand::SetIgnoreMouse(cmd) => Command::SetIgnoreMouse {
            ignore: parse_switch(&cmd.state)?,
        },
        SubCommand::BeginGesture(cmd) => {
            let direction = cmd
                .direction
                .as_deref()
                .map(parse_resize_direction)
                .transpose()?;
            Command::BeginGesture {
                kind: parse_gesture_kind(&cmd.kind)?,
                direction,
            }
        }
        SubCommand::EndGesture(cmd) => Command::EndGesture {
            kind: parse_gesture_kind(&cmd.kind)?,
        },
        SubCommand::PointerMoved(cmd) => Command::PointerMoved { x: cmd.x, y: cmd.y },
        SubCommand::WindowClosed(_) => Command::WindowClosed,
        SubCommand::GetPresets(_) => Command::GetResolutionPresets,
        SubCommand::SavePresets(cmd) => Command::SaveResolutionPresets {
            presets: cmd
                .sizes
                .iter()
                .map(|s| parse_preset(s))
                .collect::<Result<_>>()?,
        },
        SubCommand::GetDebugMode(_) => Command::GetDebugMode,
        SubCommand::SetDebugMode(cmd) => Command::SetDebugMode {
            enabled: parse_switch(&cmd.state)?,
        },
        SubCommand::ResetConfig(cmd) => {
            let options = ResetOptions {
                key_config: cmd.keys,
                window_config: cmd.window,
                app_config: cmd.app,
                resolution_presets: cmd.presets,
            };
            Command::ResetConfig {
                options: if options == ResetOptions::default() {
                    ResetOptions::all()
                } else {
                    options
                },
            }
        }
        SubCommand::GetState(_) => Command::GetState,
        SubCommand::DaemonVersion(_) => Command::GetVersion,
        SubCommand::Quit(_) => Command::RequestExit,
    };
    Ok(cmd)
}

fn single_binding(action: &str, combo: String) -> Result<Command> {
    let action: ActionId = action.parse().map_err(anyhow::Error::msg)?;
    let mut bindings = KeyBindings::new();
    bindings.set(action, combo);
    Ok(Command::SaveKeyBindings { bindings })
}

fn parse_switch(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => bail!("Expected on or off, got: {}", s),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn display_combo(combo: &str) -> &str {
    if combo.is_empty() {
        "(unbound)"
    } else {
        combo
    }
}

fn parse_gesture_kind(s: &str) -> Result<GestureKind> {
    match s.to_lowercase().as_str() {
        "move" => Ok(GestureKind::Move),
        "resize" => Ok(GestureKind::Resize),
        _ => bail!("Unknown gesture: {} (use move or resize)", s),
    }
}

fn parse_resize_direction(s: &str) -> Result<ResizeDirection> {
    ResizeDirection::parse(s)
        .with_context(|| format!("Unknown direction: {} (use right, bottom, both)", s))
}

fn parse_preset(s: &str) -> Result<ResolutionPreset> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .with_context(|| format!("Expected WIDTHxHEIGHT, got: {}", s))?;
    let width: u32 = w.trim().parse().context("Invalid width")?;
    let height: u32 = h.trim().parse().context("Invalid height")?;
    Ok(ResolutionPreset::new(
        width,
        height,
        format!("{} × {}", width, height),
    ))
}

fn parse_filter(s: &str) -> Result<EventFilter> {
    let mut filter = EventFilter::default();
    for group in s.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        match group.to_lowercase().as_str() {
            "opacity" => filter.opacity = true,
            "immersion" => filter.immersion = true,
            "view" => filter.view = true,
            "window" => filter.window = true,
            "settings" => filter.settings = true,
            _ => bail!("Unknown event group: {}", group),
        }
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset() {
        let preset = parse_preset("640x360").unwrap();
        assert_eq!(preset, ResolutionPreset::new(640, 360, "640 × 360"));
        assert!(parse_preset("640").is_err());
        assert!(parse_preset("wide x 360").is_err());
    }

    #[test]
    fn test_parse_filter() {
        let filter = parse_filter("opacity, window").unwrap();
        assert!(filter.opacity);
        assert!(filter.window);
        assert!(!filter.view);
        assert!(parse_filter("layout").is_err());
    }

    #[test]
    fn test_unbind_sends_empty_combo() {
        let cmd = to_command(SubCommand::Unbind(UnbindCmd {
            action: "bosskey".to_string(),
        }))
        .unwrap();
        match cmd {
            Command::SaveKeyBindings { bindings } => {
                assert_eq!(bindings.get(ActionId::BossKey), Some(""));
                assert_eq!(bindings.len(), 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_reset_without_flags_resets_everything() {
        let cmd = to_command(SubCommand::ResetConfig(ResetConfigCmd {
            keys: false,
            window: false,
            app: false,
            presets: false,
        }))
        .unwrap();
        assert!(matches!(
            cmd,
            Command::ResetConfig { options } if options == ResetOptions::all()
        ));
    }

    #[test]
    fn test_parse_switch() {
        assert!(parse_switch("ON").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(parse_switch("maybe").is_err());
    }
}

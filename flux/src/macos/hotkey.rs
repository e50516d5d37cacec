use std::collections::HashMap;
use std::sync::{mpsc as std_mpsc, Arc, Mutex};
use std::thread;

use core_foundation::runloop::{kCFRunLoopCommonModes, CFRunLoop};
use core_graphics::event::{
    CGEventFlags, CGEventTap, CGEventTapLocation, CGEventTapOptions, CGEventTapPlacement,
    CGEventType, CallbackResult, EventField,
};
use tokio::sync::mpsc;

use crate::hotkey::{format_hotkey, parse_hotkey, Hotkey, Key, Modifiers};
use crate::platform::HotkeyBackend;

type BindingTable = Arc<Mutex<HashMap<(u16, Modifiers), String>>>;

/// Global hotkeys through a session-wide CGEventTap.
///
/// The tap runs on its own thread with its own run loop. Matching key downs
/// are swallowed and their canonical combo is sent to the event loop.
pub struct MacHotkeys {
    bindings: BindingTable,
    combo_tx: mpsc::UnboundedSender<String>,
    tap_ready: Option<bool>,
}

impl MacHotkeys {
    pub fn new(combo_tx: mpsc::UnboundedSender<String>) -> Self {
        Self {
            bindings: Arc::new(Mutex::new(HashMap::new())),
            combo_tx,
            tap_ready: None,
        }
    }

    /// Starts the tap thread on first use. The tap needs Accessibility
    /// permission; without it every registration fails.
    fn ensure_tap(&mut self) -> bool {
        if let Some(ready) = self.tap_ready {
            return ready;
        }
        let ready = match spawn_tap_thread(Arc::clone(&self.bindings), self.combo_tx.clone()) {
            Ok(()) => {
                tracing::info!("Hotkey tap started");
                true
            }
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        };
        self.tap_ready = Some(ready);
        ready
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<(u16, Modifiers), String>> {
        // A panic in the tap callback must not disable registration
        self.bindings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl HotkeyBackend for MacHotkeys {
    fn register(&mut self, combo: &str) -> bool {
        let hotkey = match parse_hotkey(combo) {
            Ok(hotkey) => hotkey,
            Err(e) => {
                tracing::warn!("{}", e);
                return false;
            }
        };
        let Some(key_code) = key_code(hotkey.key) else {
            tracing::warn!("No key code for {}", combo);
            return false;
        };
        if !self.ensure_tap() {
            return false;
        }

        let mut table = self.table();
        let slot = (key_code, hotkey.modifiers);
        if table.contains_key(&slot) {
            return false;
        }
        table.insert(slot, format_hotkey(&hotkey));
        tracing::debug!("Registered {}", combo);
        true
    }

    fn unregister(&mut self, combo: &str) {
        let Ok(hotkey) = parse_hotkey(combo) else {
            return;
        };
        if let Some(key_code) = key_code(hotkey.key) {
            self.table().remove(&(key_code, hotkey.modifiers));
        }
    }

    fn unregister_all(&mut self) {
        self.table().clear();
    }
}

fn spawn_tap_thread(
    bindings: BindingTable,
    combo_tx: mpsc::UnboundedSender<String>,
) -> Result<(), String> {
    let (ready_tx, ready_rx) = std_mpsc::channel::<Result<(), String>>();

    thread::Builder::new()
        .name("flux-hotkeys".to_string())
        .spawn(move || run_tap(bindings, combo_tx, ready_tx))
        .map_err(|e| format!("Failed to spawn hotkey thread: {}", e))?;

    ready_rx
        .recv()
        .map_err(|_| "Hotkey thread exited during startup".to_string())?
}

fn run_tap(
    bindings: BindingTable,
    combo_tx: mpsc::UnboundedSender<String>,
    ready_tx: std_mpsc::Sender<Result<(), String>>,
) {
    let tap = CGEventTap::new(
        CGEventTapLocation::Session,
        CGEventTapPlacement::HeadInsertEventTap,
        CGEventTapOptions::Default,
        vec![CGEventType::KeyDown],
        move |_proxy, _event_type, event| {
            let key_code = event.get_integer_value_field(EventField::KEYBOARD_EVENT_KEYCODE) as u16;
            let modifiers = modifiers_from_flags(event.get_flags());

            let combo = match bindings.lock() {
                Ok(table) => table.get(&(key_code, modifiers)).cloned(),
                Err(_) => None,
            };
            let Some(combo) = combo else {
                return CallbackResult::Keep;
            };

            tracing::debug!("Hotkey matched: {}", combo);
            if combo_tx.send(combo).is_err() {
                tracing::error!("Failed to send combo from hotkey tap");
            }
            CallbackResult::Drop
        },
    );
    let tap = match tap {
        Ok(tap) => tap,
        Err(_) => {
            let _ = ready_tx.send(Err(
                "Failed to create event tap. Make sure Accessibility permission is granted."
                    .to_string(),
            ));
            return;
        }
    };

    let source = match tap.mach_port().create_runloop_source(0) {
        Ok(source) => source,
        Err(_) => {
            let _ = ready_tx.send(Err("Failed to create run loop source".to_string()));
            return;
        }
    };
    CFRunLoop::get_current().add_source(&source, unsafe { kCFRunLoopCommonModes });
    tap.enable();

    let _ = ready_tx.send(Ok(()));
    CFRunLoop::run_current();
}

fn modifiers_from_flags(flags: CGEventFlags) -> Modifiers {
    Modifiers {
        cmd: flags.contains(CGEventFlags::CGEventFlagCommand),
        alt: flags.contains(CGEventFlags::CGEventFlagAlternate),
        ctrl: flags.contains(CGEventFlags::CGEventFlagControl),
        shift: flags.contains(CGEventFlags::CGEventFlagShift),
    }
}

/// ANSI virtual key code for `key`
pub fn key_code(key: Key) -> Option<u16> {
    let code = match key {
        Key::Char(c) => return char_key_code(c),
        Key::F(n) => return function_key_code(n),
        Key::Up => 0x7E,
        Key::Down => 0x7D,
        Key::Left => 0x7B,
        Key::Right => 0x7C,
        Key::Home => 0x73,
        Key::End => 0x77,
        Key::PageUp => 0x74,
        Key::PageDown => 0x79,
        Key::Delete => 0x75,
        Key::Backspace => 0x33,
        Key::Insert => 0x72,
        Key::Space => 0x31,
        Key::Tab => 0x30,
        Key::Enter => 0x24,
        Key::Escape => 0x35,
    };
    Some(code)
}

fn char_key_code(c: char) -> Option<u16> {
    let code = match c {
        'a' => 0x00,
        'b' => 0x0B,
        'c' => 0x08,
        'd' => 0x02,
        'e' => 0x0E,
        'f' => 0x03,
        'g' => 0x05,
        'h' => 0x04,
        'i' => 0x22,
        'j' => 0x26,
        'k' => 0x28,
        'l' => 0x25,
        'm' => 0x2E,
        'n' => 0x2D,
        'o' => 0x1F,
        'p' => 0x23,
        'q' => 0x0C,
        'r' => 0x0F,
        's' => 0x01,
        't' => 0x11,
        'u' => 0x20,
        'v' => 0x09,
        'w' => 0x0D,
        'x' => 0x07,
        'y' => 0x10,
        'z' => 0x06,
        '1' => 0x12,
        '2' => 0x13,
        '3' => 0x14,
        '4' => 0x15,
        '5' => 0x17,
        '6' => 0x16,
        '7' => 0x1A,
        '8' => 0x1C,
        '9' => 0x19,
        '0' => 0x1D,
        '-' => 0x1B,
        '=' => 0x18,
        '[' => 0x21,
        ']' => 0x1E,
        '\\' => 0x2A,
        ';' => 0x29,
        '\'' => 0x27,
        ',' => 0x2B,
        '.' => 0x2F,
        '/' => 0x2C,
        '`' => 0x32,
        _ => return None,
    };
    Some(code)
}

fn function_key_code(n: u8) -> Option<u16> {
    let code = match n {
        1 => 0x7A,
        2 => 0x78,
        3 => 0x63,
        4 => 0x76,
        5 => 0x60,
        6 => 0x61,
        7 => 0x62,
        8 => 0x64,
        9 => 0x65,
        10 => 0x6D,
        11 => 0x67,
        12 => 0x6F,
        13 => 0x69,
        14 => 0x6B,
        15 => 0x71,
        16 => 0x6A,
        17 => 0x40,
        18 => 0x4F,
        19 => 0x50,
        20 => 0x5A,
        // No F21-F24 on Apple keyboards
        _ => return None,
    };
    Some(code)
}

//! Combo strings such as `Alt+Up` or `Ctrl+Shift+F5`.
//!
//! Modifiers and the key are joined by `+`. Matching is case-insensitive and
//! modifier order does not matter; `format_hotkey` produces the canonical
//! spelling used as the registration key.

use std::fmt;

/// Characters that can never appear in a combo
const INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub cmd: bool,
    pub alt: bool,
    pub ctrl: bool,
    pub shift: bool,
}

impl Modifiers {
    pub fn is_empty(&self) -> bool {
        !(self.cmd || self.alt || self.ctrl || self.shift)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Letter, digit or punctuation, stored lowercase
    Char(char),
    F(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Backspace,
    Insert,
    Space,
    Tab,
    Enter,
    Escape,
}

impl Key {
    pub fn parse(name: &str) -> Result<Key, String> {
        let lower = name.to_lowercase();
        let key = match lower.as_str() {
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" => Key::PageUp,
            "pagedown" => Key::PageDown,
            "delete" | "del" => Key::Delete,
            "backspace" => Key::Backspace,
            "insert" => Key::Insert,
            "space" => Key::Space,
            "tab" => Key::Tab,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "plus" => Key::Char('+'),
            "minus" => Key::Char('-'),
            _ => {
                if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                    if (1..=24).contains(&n) {
                        return Ok(Key::F(n));
                    }
                }
                let mut chars = lower.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_graphic() && !INVALID_CHARS.contains(&c) => {
                        Key::Char(c)
                    }
                    _ => return Err(format!("Unknown key: {}", name)),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char('+') => f.write_str("Plus"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Key::F(n) => write!(f, "F{}", n),
            Key::Up => f.write_str("Up"),
            Key::Down => f.write_str("Down"),
            Key::Left => f.write_str("Left"),
            Key::Right => f.write_str("Right"),
            Key::Home => f.write_str("Home"),
            Key::End => f.write_str("End"),
            Key::PageUp => f.write_str("PageUp"),
            Key::PageDown => f.write_str("PageDown"),
            Key::Delete => f.write_str("Delete"),
            Key::Backspace => f.write_str("Backspace"),
            Key::Insert => f.write_str("Insert"),
            Key::Space => f.write_str("Space"),
            Key::Tab => f.write_str("Tab"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hotkey {
    pub key: Key,
    pub modifiers: Modifiers,
}

fn apply_modifier(modifiers: &mut Modifiers, part: &str) -> bool {
    match part.to_lowercase().as_str() {
        "cmd" | "command" | "super" | "meta" => modifiers.cmd = true,
        "alt" | "opt" | "option" => modifiers.alt = true,
        "ctrl" | "control" => modifiers.ctrl = true,
        "shift" => modifiers.shift = true,
        "cmdorctrl" | "commandorcontrol" => {
            if cfg!(target_os = "macos") {
                modifiers.cmd = true;
            } else {
                modifiers.ctrl = true;
            }
        }
        _ => return false,
    }
    true
}

pub fn parse_hotkey(combo: &str) -> Result<Hotkey, String> {
    if combo.trim().is_empty() {
        return Err("Empty combo".to_string());
    }
    if let Some(c) = combo.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(format!("Invalid character '{}' in combo: {}", c, combo));
    }

    let mut modifiers = Modifiers::default();
    let mut key = None;
    for part in combo.split('+').map(str::trim) {
        if part.is_empty() {
            return Err(format!("Empty segment in combo: {}", combo));
        }
        if apply_modifier(&mut modifiers, part) {
            continue;
        }
        if key.is_some() {
            return Err(format!("More than one key in combo: {}", combo));
        }
        key = Some(Key::parse(part)?);
    }

    let key = key.ok_or_else(|| format!("Combo has no non-modifier key: {}", combo))?;
    Ok(Hotkey { key, modifiers })
}

pub fn format_hotkey(hotkey: &Hotkey) -> String {
    let mut parts = Vec::new();
    if hotkey.modifiers.cmd {
        parts.push("Cmd".to_string());
    }
    if hotkey.modifiers.ctrl {
        parts.push("Ctrl".to_string());
    }
    if hotkey.modifiers.alt {
        parts.push("Alt".to_string());
    }
    if hotkey.modifiers.shift {
        parts.push("Shift".to_string());
    }
    parts.push(hotkey.key.to_string());
    parts.join("+")
}

/// Canonical spelling of `combo`, or the reason it cannot be registered.
pub fn normalize_combo(combo: &str) -> Result<String, String> {
    parse_hotkey(combo).map(|h| format_hotkey(&h))
}

pub fn is_valid_combo(combo: &str) -> bool {
    parse_hotkey(combo).is_ok()
}

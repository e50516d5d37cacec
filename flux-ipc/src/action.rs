use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bindable behavior, decoupled from the key combination that triggers it.
///
/// Declaration order is catalogue order: shortcut registration walks
/// `ActionId::ALL` front to back, and the first action to claim a combo keeps it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionId {
    BossKey,
    ImmersionMode,
    #[serde(rename = "Video-Pause")]
    VideoPause,
    #[serde(rename = "Video-Forward")]
    VideoForward,
    #[serde(rename = "Video-Backward")]
    VideoBackward,
    #[serde(rename = "Opacity-Up")]
    OpacityUp,
    #[serde(rename = "Opacity-Down")]
    OpacityDown,
    GoBack,
    GoForward,
}

impl ActionId {
    pub const ALL: [ActionId; 9] = [
        ActionId::BossKey,
        ActionId::ImmersionMode,
        ActionId::VideoPause,
        ActionId::VideoForward,
        ActionId::VideoBackward,
        ActionId::OpacityUp,
        ActionId::OpacityDown,
        ActionId::GoBack,
        ActionId::GoForward,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::BossKey => "BossKey",
            ActionId::ImmersionMode => "ImmersionMode",
            ActionId::VideoPause => "Video-Pause",
            ActionId::VideoForward => "Video-Forward",
            ActionId::VideoBackward => "Video-Backward",
            ActionId::OpacityUp => "Opacity-Up",
            ActionId::OpacityDown => "Opacity-Down",
            ActionId::GoBack => "GoBack",
            ActionId::GoForward => "GoForward",
        }
    }

    /// Human readable label shown by the settings UI
    pub fn label(&self) -> &'static str {
        match self {
            ActionId::BossKey => "Boss key (hide window)",
            ActionId::ImmersionMode => "Immersion mode",
            ActionId::VideoPause => "Video play/pause",
            ActionId::VideoForward => "Video forward 10s",
            ActionId::VideoBackward => "Video backward 10s",
            ActionId::OpacityUp => "Opacity +",
            ActionId::OpacityDown => "Opacity -",
            ActionId::GoBack => "Go back",
            ActionId::GoForward => "Go forward",
        }
    }

    fn default_combo(&self) -> &'static str {
        match self {
            ActionId::BossKey => "Delete",
            ActionId::ImmersionMode => "Home",
            ActionId::VideoPause => "Down",
            ActionId::VideoForward => "Right",
            ActionId::VideoBackward => "Left",
            ActionId::OpacityUp => "Alt+Up",
            ActionId::OpacityDown => "Alt+Down",
            ActionId::GoBack => "Alt+Left",
            ActionId::GoForward => "Alt+Right",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown action: {}", s))
    }
}

/// ActionId -> combo string. Combos need not be unique across actions.
///
/// Deserialization is lenient: names are matched case-insensitively and
/// entries for unknown actions are dropped, so a client that knows more
/// actions than this build can still save the ones both sides understand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<ActionId, String>);

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = HashMap::<String, String>::deserialize(deserializer)?;
        let (bindings, _unknown) = Self::from_raw(raw);
        Ok(bindings)
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self(
            ActionId::ALL
                .into_iter()
                .map(|a| (a, a.default_combo().to_string()))
                .collect(),
        )
    }

    /// Build from a loosely typed map, e.g. a config file written by an older
    /// build. Returns the keys that do not name a known action.
    pub fn from_raw(raw: HashMap<String, String>) -> (Self, Vec<String>) {
        let mut bindings = BTreeMap::new();
        let mut unknown = Vec::new();
        for (key, combo) in raw {
            match key.parse::<ActionId>() {
                Ok(action) => {
                    bindings.insert(action, combo);
                }
                Err(_) => unknown.push(key),
            }
        }
        unknown.sort();
        (Self(bindings), unknown)
    }

    pub fn get(&self, action: ActionId) -> Option<&str> {
        self.0.get(&action).map(String::as_str)
    }

    pub fn set(&mut self, action: ActionId, combo: impl Into<String>) {
        self.0.insert(action, combo.into());
    }

    pub fn remove(&mut self, action: ActionId) -> Option<String> {
        self.0.remove(&action)
    }

    /// Overlay `other` on top of `self`; actions missing from `other` keep
    /// their current combo.
    pub fn merge(&mut self, other: &KeyBindings) {
        for (action, combo) in &other.0 {
            self.0.insert(*action, combo.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &str)> {
        self.0.iter().map(|(a, c)| (*a, c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ActionId, String)> for KeyBindings {
    fn from_iter<I: IntoIterator<Item = (ActionId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_names() {
        let json = serde_json::to_string(&ActionId::VideoPause).unwrap();
        assert_eq!(json, "\"Video-Pause\"");
        let json = serde_json::to_string(&ActionId::BossKey).unwrap();
        assert_eq!(json, "\"BossKey\"");

        for action in ActionId::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
        }
    }

    #[test]
    fn test_action_from_str() {
        assert_eq!("Opacity-Up".parse::<ActionId>().unwrap(), ActionId::OpacityUp);
        assert_eq!("goback".parse::<ActionId>().unwrap(), ActionId::GoBack);
        assert!("Plugin-Foo".parse::<ActionId>().is_err());
    }

    #[test]
    fn test_catalogue_order_matches_ord() {
        let mut sorted = ActionId::ALL;
        sorted.sort();
        assert_eq!(sorted, ActionId::ALL);
    }

    #[test]
    fn test_default_bindings() {
        let defaults = KeyBindings::defaults();
        assert_eq!(defaults.len(), 9);
        assert_eq!(defaults.get(ActionId::BossKey), Some("Delete"));
        assert_eq!(defaults.get(ActionId::ImmersionMode), Some("Home"));
        assert_eq!(defaults.get(ActionId::OpacityDown), Some("Alt+Down"));
        assert_eq!(defaults.get(ActionId::GoForward), Some("Alt+Right"));
    }

    #[test]
    fn test_bindings_serialize_as_object() {
        let mut bindings = KeyBindings::new();
        bindings.set(ActionId::VideoForward, "Alt+Right");
        let json = serde_json::to_string(&bindings).unwrap();
        assert_eq!(json, r#"{"Video-Forward":"Alt+Right"}"#);

        let parsed: KeyBindings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, bindings);
    }

    #[test]
    fn test_from_raw_drops_unknown_keys() {
        let raw = HashMap::from([
            ("BossKey".to_string(), "Alt+Q".to_string()),
            ("Screenshot".to_string(), "Alt+S".to_string()),
        ]);
        let (bindings, unknown) = KeyBindings::from_raw(raw);
        assert_eq!(bindings.get(ActionId::BossKey), Some("Alt+Q"));
        assert_eq!(bindings.len(), 1);
        assert_eq!(unknown, vec!["Screenshot".to_string()]);
    }

    #[test]
    fn test_bindings_deserialize_skips_unknown_actions() {
        let json = r#"{"BossKey":"Alt+Q","Plugin-Foo":"Alt+F","opacity-up":"Alt+PageUp"}"#;
        let bindings: KeyBindings = serde_json::from_str(json).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings.get(ActionId::BossKey), Some("Alt+Q"));
        assert_eq!(bindings.get(ActionId::OpacityUp), Some("Alt+PageUp"));
    }

    #[test]
    fn test_bindings_reject_non_string_combo() {
        assert!(serde_json::from_str::<KeyBindings>(r#"{"BossKey":5}"#).is_err());
    }

    #[test]
    fn test_merge_overlays() {
        let mut bindings = KeyBindings::defaults();
        let mut update = KeyBindings::new();
        update.set(ActionId::BossKey, "Alt+Q");
        bindings.merge(&update);

        assert_eq!(bindings.get(ActionId::BossKey), Some("Alt+Q"));
        assert_eq!(bindings.get(ActionId::ImmersionMode), Some("Home"));
    }
}

//! Persisted records. Each record is one JSON document; writes serialize to a
//! sibling temp file and rename it over the old one, so a failed write leaves
//! the previous content intact.

use std::collections::HashMap;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flux_ipc::{KeyBindings, ResolutionPreset};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::{BoundsRecord, Config};

pub const KEY_CONFIG: &str = "key-config.json";
pub const BOUNDS_CONFIG: &str = "window-bounds.json";
pub const APP_CONFIG: &str = "app-config.json";
pub const RESOLUTION_PRESETS: &str = "resolution-presets.json";

const DEV_PREFIX: &str = "dev-";

pub trait RecordStore<T> {
    /// Name used in logs and errors
    fn name(&self) -> &str;
    /// `None` when the record is missing or unreadable
    fn load(&self) -> Option<T>;
    fn save(&self, value: &T) -> Result<()>;
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("flux")
}

/// Debug builds keep their records apart from an installed release.
pub fn record_path(dir: &Path, name: &str) -> PathBuf {
    if cfg!(debug_assertions) {
        dir.join(format!("{}{}", DEV_PREFIX, name))
    } else {
        dir.join(name)
    }
}

pub struct JsonFileStore<T> {
    path: PathBuf,
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            _marker: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> RecordStore<T> for JsonFileStore<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> Option<T> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed {} ({}), using defaults",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn save(&self, value: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(value)
            .with_context(|| format!("Failed to serialize {}", self.name))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;
        tracing::debug!("Saved {}", self.path.display());
        Ok(())
    }
}

/// Key bindings are read leniently: entries naming actions this build does
/// not know are dropped instead of discarding the whole file.
pub struct KeyConfigStore {
    inner: JsonFileStore<HashMap<String, String>>,
}

impl KeyConfigStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            inner: JsonFileStore::new(path),
        }
    }
}

impl RecordStore<KeyBindings> for KeyConfigStore {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn load(&self) -> Option<KeyBindings> {
        let raw = self.inner.load()?;
        let (bindings, unknown) = KeyBindings::from_raw(raw);
        if !unknown.is_empty() {
            tracing::warn!("Ignoring unknown actions in {}: {:?}", self.name(), unknown);
        }
        Some(bindings)
    }

    fn save(&self, value: &KeyBindings) -> Result<()> {
        let raw: HashMap<String, String> = value
            .iter()
            .map(|(action, combo)| (action.to_string(), combo.to_string()))
            .collect();
        self.inner.save(&raw)
    }
}

/// All persisted records used by the orchestrator
pub struct Stores {
    pub bounds: Box<dyn RecordStore<BoundsRecord>>,
    pub keys: Box<dyn RecordStore<KeyBindings>>,
    pub app: Box<dyn RecordStore<Config>>,
    pub presets: Box<dyn RecordStore<Vec<ResolutionPreset>>>,
}

impl Stores {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            bounds: Box::new(JsonFileStore::<BoundsRecord>::new(record_path(dir, BOUNDS_CONFIG))),
            keys: Box::new(KeyConfigStore::new(record_path(dir, KEY_CONFIG))),
            app: Box::new(JsonFileStore::<Config>::new(record_path(dir, APP_CONFIG))),
            presets: Box::new(JsonFileStore::<Vec<ResolutionPreset>>::new(record_path(
                dir,
                RESOLUTION_PRESETS,
            ))),
        }
    }
}

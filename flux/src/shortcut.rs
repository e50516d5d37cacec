use std::collections::{BTreeMap, HashMap};
use std::fmt;

use flux_ipc::{ActionId, KeyBindings, ShortcutFailure, ShortcutInfo};

use crate::error::CoreError;
use crate::hotkey::normalize_combo;
use crate::platform::HotkeyBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Unregistered,
    Registering,
    Active,
    Suspended,
}

impl RegistryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryState::Unregistered => "unregistered",
            RegistryState::Registering => "registering",
            RegistryState::Active => "active",
            RegistryState::Suspended => "suspended",
        }
    }
}

impl fmt::Display for RegistryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a reload. Failures never abort the rest of the reload.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReloadReport {
    pub registered: usize,
    pub failures: Vec<CoreError>,
}

impl ReloadReport {
    pub fn failed(&self) -> Vec<ShortcutFailure> {
        self.failures
            .iter()
            .filter_map(|e| match e {
                CoreError::RegistrationFailed { action, combo } => Some(ShortcutFailure {
                    action: *action,
                    combo: combo.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Binds combos to actions through an OS hotkey backend.
///
/// The registration table is rebuilt from scratch on every reload: everything
/// is unregistered first, then actions register in catalogue order, so when
/// two actions share a combo the earlier one keeps it.
pub struct ShortcutRegistry<B: HotkeyBackend> {
    backend: B,
    state: RegistryState,
    /// canonical combo -> action
    table: HashMap<String, ActionId>,
    /// action -> combo as written in the bindings
    active: BTreeMap<ActionId, String>,
    last_known: KeyBindings,
    last_report: ReloadReport,
}

impl<B: HotkeyBackend> ShortcutRegistry<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: RegistryState::Unregistered,
            table: HashMap::new(),
            active: BTreeMap::new(),
            last_known: KeyBindings::new(),
            last_report: ReloadReport::default(),
        }
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn last_known(&self) -> &KeyBindings {
        &self.last_known
    }

    pub fn last_report(&self) -> &ReloadReport {
        &self.last_report
    }

    fn clear(&mut self) {
        self.backend.unregister_all();
        self.table.clear();
        self.active.clear();
    }

    pub fn reload(&mut self, bindings: &KeyBindings) -> ReloadReport {
        self.clear();
        self.state = RegistryState::Registering;
        self.last_known = bindings.clone();

        let mut report = ReloadReport::default();
        for action in ActionId::ALL {
            let Some(combo) = bindings.get(action) else {
                continue;
            };
            if combo.trim().is_empty() {
                continue;
            }

            let registered = match normalize_combo(combo) {
                Ok(canonical) => {
                    if let Some(owner) = self.table.get(&canonical) {
                        tracing::warn!(
                            "{} is already bound to {}, skipping {}",
                            combo,
                            owner,
                            action
                        );
                        false
                    } else if self.backend.register(&canonical) {
                        self.table.insert(canonical, action);
                        true
                    } else {
                        false
                    }
                }
                Err(e) => {
                    tracing::warn!("Cannot register {} for {}: {}", combo, action, e);
                    false
                }
            };

            if registered {
                self.active.insert(action, combo.to_string());
                report.registered += 1;
            } else {
                let err = CoreError::RegistrationFailed {
                    action,
                    combo: combo.to_string(),
                };
                tracing::warn!("{}", err);
                report.failures.push(err);
            }
        }

        self.state = RegistryState::Active;
        tracing::info!(
            "Shortcuts reloaded: {} registered, {} failed",
            report.registered,
            report.failures.len()
        );
        self.last_report = report.clone();
        report
    }

    /// Unregister everything but remember the bindings for `resume`.
    pub fn suspend(&mut self) {
        self.clear();
        self.state = RegistryState::Suspended;
        tracing::info!("Shortcuts suspended");
    }

    pub fn resume(&mut self) -> ReloadReport {
        let bindings = self.last_known.clone();
        tracing::info!("Resuming shortcuts");
        self.reload(&bindings)
    }

    pub fn shutdown(&mut self) {
        self.clear();
        self.state = RegistryState::Unregistered;
        tracing::info!("Shortcuts unregistered");
    }

    /// Action bound to a fired combo. Nothing fires unless Active.
    pub fn lookup(&self, combo: &str) -> Option<ActionId> {
        if self.state != RegistryState::Active {
            tracing::debug!("Ignoring {} while shortcuts are {}", combo, self.state);
            return None;
        }
        let canonical = normalize_combo(combo).ok()?;
        let action = self.table.get(&canonical).copied();
        if action.is_none() {
            tracing::debug!("No action bound to {}", combo);
        }
        action
    }

    pub fn active(&self) -> BTreeMap<ActionId, String> {
        self.active.clone()
    }

    pub fn info(&self) -> ShortcutInfo {
        ShortcutInfo {
            state: self.state.to_string(),
            active: self.active(),
            failed: self.last_report.failed(),
        }
    }
}

//! Integration settings as immutable snapshots.
//!
//! `connect` and `disconnect` never mutate a snapshot; they return a new one. The store keeps
//! the previous snapshots so the last change can be undone.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{Integration, IntegrationKey, IntegrationKind, SettingsError};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationSettings {
    connected: Arc<BTreeMap<IntegrationKey, Integration>>,
}

fn key_for(kind: IntegrationKind, name: &str) -> Result<IntegrationKey, SettingsError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(SettingsError::EmptyName);
    }
    Ok(IntegrationKey::new(kind, name))
}

impl IntegrationSettings {
    pub fn is_connected(&self, kind: IntegrationKind, name: &str) -> bool {
        self.connected
            .contains_key(&IntegrationKey::new(kind, name.trim()))
    }

    /// Connected integrations ordered by kind, then name.
    pub fn connected(&self) -> impl Iterator<Item = &Integration> {
        self.connected.values()
    }

    pub fn connected_of(&self, kind: IntegrationKind) -> impl Iterator<Item = &Integration> {
        self.connected.values().filter(move |i| i.key.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.connected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connected.is_empty()
    }

    pub fn connect(&self, kind: IntegrationKind, name: &str) -> Result<Self, SettingsError> {
        self.connect_at(kind, name, Utc::now())
    }

    pub fn connect_at(
        &self,
        kind: IntegrationKind,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, SettingsError> {
        let key = key_for(kind, name)?;
        if self.connected.contains_key(&key) {
            return Err(SettingsError::AlreadyConnected(key.to_string()));
        }

        let mut connected = (*self.connected).clone();
        connected.insert(
            key.clone(),
            Integration {
                key,
                connected_at: now,
            },
        );
        Ok(Self {
            connected: Arc::new(connected),
        })
    }

    pub fn disconnect(&self, kind: IntegrationKind, name: &str) -> Result<Self, SettingsError> {
        let key = key_for(kind, name)?;
        if !self.connected.contains_key(&key) {
            return Err(SettingsError::NotConnected(key.to_string()));
        }

        let mut connected = (*self.connected).clone();
        connected.remove(&key);
        Ok(Self {
            connected: Arc::new(connected),
        })
    }
}

/// A change to the integration settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsCommand {
    Connect { kind: IntegrationKind, name: String },
    Disconnect { kind: IntegrationKind, name: String },
}

/// Current snapshot plus undo history.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    current: IntegrationSettings,
    history: Vec<IntegrationSettings>,
}

impl SettingsStore {
    pub fn new(initial: IntegrationSettings) -> Self {
        Self {
            current: initial,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &IntegrationSettings {
        &self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn apply(
        &mut self,
        command: &SettingsCommand,
    ) -> Result<&IntegrationSettings, SettingsError> {
        let next = match command {
            SettingsCommand::Connect { kind, name } => self.current.connect(*kind, name)?,
            SettingsCommand::Disconnect { kind, name } => self.current.disconnect(*kind, name)?,
        };
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        Ok(&self.current)
    }

    pub fn undo(&mut self) -> Result<&IntegrationSettings, SettingsError> {
        let previous = self.history.pop().ok_or(SettingsError::NothingToUndo)?;
        self.current = previous;
        Ok(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_returns_new_snapshot() {
        let empty = IntegrationSettings::default();
        let next = empty.connect(IntegrationKind::Repository, "GitHub").unwrap();

        assert!(!empty.is_connected(IntegrationKind::Repository, "GitHub"));
        assert!(next.is_connected(IntegrationKind::Repository, "GitHub"));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn connect_and_disconnect_reject_no_ops() {
        let settings = IntegrationSettings::default()
            .connect(IntegrationKind::AiProvider, "OpenAI")
            .unwrap();

        assert!(matches!(
            settings.connect(IntegrationKind::AiProvider, " OpenAI "),
            Err(SettingsError::AlreadyConnected(_))
        ));
        assert!(matches!(
            settings.disconnect(IntegrationKind::Repository, "GitLab"),
            Err(SettingsError::NotConnected(_))
        ));
        assert_eq!(
            settings.connect(IntegrationKind::Notification, "  "),
            Err(SettingsError::EmptyName)
        );

        let cleared = settings
            .disconnect(IntegrationKind::AiProvider, "OpenAI")
            .unwrap();
        assert!(cleared.is_empty());
    }

    #[test]
    fn same_name_different_kind_are_distinct() {
        let settings = IntegrationSettings::default()
            .connect(IntegrationKind::Repository, "Slack")
            .unwrap()
            .connect(IntegrationKind::Notification, "Slack")
            .unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings.connected_of(IntegrationKind::Notification).count(), 1);
    }

    #[test]
    fn store_undo_restores_previous_snapshot() {
        let mut store = SettingsStore::default();
        assert_eq!(store.undo().unwrap_err(), SettingsError::NothingToUndo);

        store
            .apply(&SettingsCommand::Connect {
                kind: IntegrationKind::Repository,
                name: "GitHub".into(),
            })
            .unwrap();
        let after_connect = store.current().clone();
        store
            .apply(&SettingsCommand::Disconnect {
                kind: IntegrationKind::Repository,
                name: "GitHub".into(),
            })
            .unwrap();
        assert!(store.current().is_empty());

        store.undo().unwrap();
        assert_eq!(*store.current(), after_connect);
        store.undo().unwrap();
        assert!(store.current().is_empty());
        assert!(!store.can_undo());
    }

    #[test]
    fn failed_command_leaves_history_untouched() {
        let mut store = SettingsStore::default();
        assert!(
            store
                .apply(&SettingsCommand::Disconnect {
                    kind: IntegrationKind::Repository,
                    name: "GitHub".into(),
                })
                .is_err()
        );
        assert!(!store.can_undo());
    }
}

//! # Language Selection
//!
//! The user's content language, persisted to `~/.tulcea/settings.json`:
//!
//! ```json
//! { "language": "ro" }
//! ```
//!
//! A missing, unreadable or corrupt file falls back to the configured default.
//! Writes use atomic rename (write `.tmp`, then `rename()`).
//!
//! The store is an ordinary owned value; callers read [`LanguageStore::current`]
//! and pass the language into each directory call. Views that need to reload
//! on change hold a [`watch::Receiver`] from [`LanguageStore::subscribe`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::core::models::Language;

#[derive(Serialize, Deserialize, Debug, Default)]
struct Settings {
    language: Option<Language>,
}

pub struct LanguageStore {
    path: PathBuf,
    sender: watch::Sender<Language>,
}

impl LanguageStore {
    /// Loads the persisted language from `path`, or `default` if unset.
    pub fn load(path: impl Into<PathBuf>, default: Language) -> Self {
        let path = path.into();
        let language = read_settings(&path)
            .and_then(|s| s.language)
            .unwrap_or(default);
        info!("Current language: {} (from {})", language, path.display());
        let (sender, _) = watch::channel(language);
        Self { path, sender }
    }

    pub fn current(&self) -> Language {
        *self.sender.borrow()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists `language` and notifies subscribers.
    ///
    /// The in-memory value only changes once the file write succeeded.
    pub fn set(&self, language: Language) -> io::Result<()> {
        let settings = Settings {
            language: Some(language),
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        atomic_write_json(&self.path, &settings).inspect_err(|e| {
            warn!("Failed to persist language {}: {}", language, e);
        })?;

        let changed = self.sender.send_if_modified(|current| {
            if *current == language {
                false
            } else {
                *current = language;
                true
            }
        });
        debug!("Language set to {} (changed: {})", language, changed);
        Ok(())
    }

    /// Receiver that is notified whenever the language changes.
    pub fn subscribe(&self) -> watch::Receiver<Language> {
        self.sender.subscribe()
    }
}

fn read_settings(path: &Path) -> Option<Settings> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("Failed to read settings {}: {}", path.display(), e);
            return None;
        }
    };
    match serde_json::from_str(&contents) {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring corrupt settings {}: {}", path.display(), e);
            None
        }
    }
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

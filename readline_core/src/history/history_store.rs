// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{StdMutex, lock_or_recover};
use miette::IntoDiagnostic;
use std::{fmt::Debug,
          fs,
          path::{Path, PathBuf},
          sync::Arc};
use strum_macros::Display;

/// Load / save contract for [`crate::History`]. The medium is up to the implementor.
/// Errors are reported, but [`crate::History`] recovers from all of them.
pub trait HistoryStore: Debug + Send {
    /// The full ordered sequence, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium can't be read or holds corrupt data.
    fn load(&self) -> miette::Result<Vec<String>>;

    /// Replace the stored sequence with `entries`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium can't be written.
    fn save(&self, entries: &[String]) -> miette::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ConfigPaths {
    #[strum(serialize = "r3bl-readline")]
    TopLevelFolderName,
    #[strum(serialize = "history.json")]
    HistoryFile,
}

/// Stores history as a JSON array of strings in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileHistoryStore {
    pub path: PathBuf,
}

impl JsonFileHistoryStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// Use `<config_dir>/r3bl-readline/history.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS has no config folder for this user.
    pub fn try_new_in_config_folder() -> miette::Result<Self> {
        let config_folder = try_get_config_folder_path().ok_or_else(|| {
            miette::miette!("Can't find the config folder for the current user.")
        })?;
        Ok(Self::new(config_folder.join(ConfigPaths::HistoryFile.to_string())))
    }

    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

/// This is where the config folder is.
#[must_use]
pub fn try_get_config_folder_path() -> Option<PathBuf> {
    let home_config_folder_path = dirs::config_dir()?;
    Some(home_config_folder_path.join(ConfigPaths::TopLevelFolderName.to_string()))
}

impl HistoryStore for JsonFileHistoryStore {
    fn load(&self) -> miette::Result<Vec<String>> {
        // First run, nothing saved yet.
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let content = fs::read_to_string(&self.path).into_diagnostic()?;
        serde_json::from_str::<Vec<String>>(&content).into_diagnostic()
    }

    fn save(&self, entries: &[String]) -> miette::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
        let content = serde_json::to_string_pretty(entries).into_diagnostic()?;
        fs::write(&self.path, content).into_diagnostic()
    }
}

/// Keeps history in memory. Clones share the same entries, so a test can hand one clone
/// to a [`crate::History`] and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    pub entries: Arc<StdMutex<Vec<String>>>,
}

impl InMemoryHistoryStore {
    #[must_use]
    pub fn new_with_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Arc::new(StdMutex::new(entries)),
        }
    }

    #[must_use]
    pub fn get_copy_of_entries(&self) -> Vec<String> {
        lock_or_recover(&self.entries).clone()
    }
}

impl HistoryStore for InMemoryHistoryStore {
    fn load(&self) -> miette::Result<Vec<String>> { Ok(self.get_copy_of_entries()) }

    fn save(&self, entries: &[String]) -> miette::Result<()> {
        *lock_or_recover(&self.entries) = entries.to_vec();
        Ok(())
    }
}

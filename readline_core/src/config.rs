// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Session settings for [`crate::Readline`], loadable from a JSON file. Every field is
//! optional in the file, missing ones take their defaults.
//!
//! ```json
//! {
//!   "history_capacity": 100,
//!   "high_watermark": 20000,
//!   "low_watermark": 2000,
//!   "history_file": "/home/me/.config/r3bl-readline/history.json"
//! }
//! ```

use crate::{FlowControlWatermark, HIGH_WATERMARK_DEFAULT, HISTORY_CAPACITY_DEFAULT,
            History, HistoryStore, JsonFileHistoryStore, LOW_WATERMARK_DEFAULT,
            TAB_STOP_WIDTH_DEFAULT};
use miette::{IntoDiagnostic, WrapErr, miette};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadlineConfig {
    pub history_capacity: usize,
    pub high_watermark: usize,
    pub low_watermark: usize,
    /// Tab stop width for the host to configure its [`crate::WriterSurface`] with, see
    /// [`crate::WriterSurface::with_tab_stop_width`]. [`crate::Readline`] itself uses
    /// whatever the attached surface reports.
    pub tab_stop_width: u16,
    /// `None` keeps history in memory for the lifetime of the session.
    pub history_file: Option<PathBuf>,
}

impl Default for ReadlineConfig {
    fn default() -> Self {
        Self {
            history_capacity: HISTORY_CAPACITY_DEFAULT,
            high_watermark: HIGH_WATERMARK_DEFAULT,
            low_watermark: LOW_WATERMARK_DEFAULT,
            tab_stop_width: TAB_STOP_WIDTH_DEFAULT,
            history_file: None,
        }
    }
}

impl ReadlineConfig {
    /// # Errors
    ///
    /// Returns an error if the file can't be read, isn't valid JSON, or fails
    /// [`Self::validate`].
    pub fn try_load_from_file(path: impl AsRef<Path>) -> miette::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("could not read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .into_diagnostic()
            .wrap_err_with(|| format!("could not parse config file {}", path.display()))?;
        config.validate()?;

        // % is Display, ? is Debug.
        tracing::debug!(message = "loaded readline config", path = %path.display(), config = ?config);

        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the history capacity is zero or the watermark band is
    /// inverted.
    pub fn validate(&self) -> miette::Result<()> {
        if self.history_capacity == 0 {
            return Err(miette!("history_capacity must be greater than zero"));
        }
        self.try_create_watermark()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`crate::ReadlineError::InvalidWatermark`] unless `low < high`.
    pub fn try_create_watermark(&self) -> miette::Result<FlowControlWatermark> {
        Ok(FlowControlWatermark::try_new(
            self.high_watermark,
            self.low_watermark,
        )?)
    }

    /// History backed by [`Self::history_file`] when one is set, and restored from it.
    #[must_use]
    pub fn create_history(&self) -> History {
        match &self.history_file {
            Some(path) => {
                let store: Box<dyn HistoryStore> =
                    Box::new(JsonFileHistoryStore::new(path.clone()));
                let mut history = History::with_store(self.history_capacity, store);
                history.restore();
                history
            }
            None => History::new(self.history_capacity),
        }
    }
}

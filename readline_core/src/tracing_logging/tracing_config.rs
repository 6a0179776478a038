// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use tracing_core::LevelFilter;

pub const TRACING_LOG_FILE_NAME_DEFAULT: &str = "readline_core_debug.log";

/// Where log lines go, and at which level. Build one with [`Self::new_display`],
/// [`Self::new_file`], or [`Self::new_file_and_display`], then pass it to
/// [`crate::tracing_logging::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    pub writer_config: WriterConfig,
    pub level_filter: LevelFilter,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterConfig {
    None,
    Display(DisplayPreference),
    File(String),
    DisplayAndFile(DisplayPreference, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayPreference {
    Stdout,
    Stderr,
}

impl TracingConfig {
    #[must_use]
    pub fn new_display(preferred_display: DisplayPreference) -> Self {
        Self {
            writer_config: WriterConfig::Display(preferred_display),
            level_filter: LevelFilter::DEBUG,
        }
    }

    /// `filename` defaults to [`TRACING_LOG_FILE_NAME_DEFAULT`].
    #[must_use]
    pub fn new_file(filename: Option<String>) -> Self {
        Self {
            writer_config: WriterConfig::File(
                filename.unwrap_or_else(|| TRACING_LOG_FILE_NAME_DEFAULT.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn new_file_and_display(
        filename: Option<String>,
        preferred_display: DisplayPreference,
    ) -> Self {
        Self {
            writer_config: WriterConfig::DisplayAndFile(
                preferred_display,
                filename.unwrap_or_else(|| TRACING_LOG_FILE_NAME_DEFAULT.to_string()),
            ),
            level_filter: LevelFilter::DEBUG,
        }
    }

    #[must_use]
    pub fn with_level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }
}

impl WriterConfig {
    #[must_use]
    pub fn display_preference(&self) -> Option<DisplayPreference> {
        match self {
            WriterConfig::Display(it) | WriterConfig::DisplayAndFile(it, _) => Some(*it),
            WriterConfig::None | WriterConfig::File(_) => None,
        }
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&str> {
        match self {
            WriterConfig::File(it) | WriterConfig::DisplayAndFile(_, it) => Some(it),
            WriterConfig::None | WriterConfig::Display(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_file_uses_default_name() {
        let config = TracingConfig::new_file(None);
        assert_eq!(
            config.writer_config.file_path(),
            Some(TRACING_LOG_FILE_NAME_DEFAULT)
        );
        assert_eq!(config.writer_config.display_preference(), None);
        assert_eq!(config.level_filter, LevelFilter::DEBUG);
    }

    #[test]
    fn test_file_and_display() {
        let config = TracingConfig::new_file_and_display(
            Some("a.log".to_string()),
            DisplayPreference::Stderr,
        )
        .with_level_filter(LevelFilter::TRACE);
        assert_eq!(config.writer_config.file_path(), Some("a.log"));
        assert_eq!(
            config.writer_config.display_preference(),
            Some(DisplayPreference::Stderr)
        );
        assert_eq!(config.level_filter, LevelFilter::TRACE);
    }
}

// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use std::{fmt::{Display, Formatter},
          ops::Deref,
          path::{Path, PathBuf}};

/// A folder under [`std::env::temp_dir`] that is deleted when this struct is dropped.
#[derive(Debug)]
pub struct TempDir {
    pub path: PathBuf,
}

/// Create a uniquely named temporary directory.
///
/// # Errors
///
/// Returns an error if the directory can't be created.
pub fn try_create_temp_dir() -> miette::Result<TempDir> {
    let root = std::env::temp_dir();
    let new_temp_dir = root.join(format!("r3bl_readline_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir(&new_temp_dir).into_diagnostic()?;
    Ok(TempDir { path: new_temp_dir })
}

impl Deref for TempDir {
    type Target = Path;

    fn deref(&self) -> &Self::Target { &self.path }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path { &self.path }
}

impl Display for TempDir {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path.display())
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if let Err(error) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(message = "could not remove temp dir", path = %self, error = ?error);
        }
    }
}

//! Writing processed workbooks into the download folder.

use std::path::{Path, PathBuf};

use crate::error::UploadError;

/// Destination for processed files.
#[derive(Debug, Clone)]
pub struct Downloads {
    dir: PathBuf,
    default_name: String,
}

impl Downloads {
    pub fn new(dir: impl Into<PathBuf>, default_name: impl Into<String>) -> Self {
        Self { dir: dir.into(), default_name: default_name.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under `suggested` (or the default name) without
    /// overwriting: an existing `name.xlsx` becomes `name (1).xlsx`, etc.
    pub fn save(&self, suggested: Option<&str>, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        std::fs::create_dir_all(&self.dir)?;
        let name = suggested.unwrap_or(&self.default_name);
        let path = unique_path(&self.dir, name);
        std::fs::write(&path, bytes)?;
        log::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };
    (1..)
        .map(|n| dir.join(format!("{} ({}){}", stem, n, ext)))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

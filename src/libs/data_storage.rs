use anyhow::Result;
use std::env::consts::OS;
use std::env::var;
use std::fs;
use std::path::{Path, PathBuf};

pub const VENDOR_NAME: &str = "choreboard";
pub const APP_NAME: &str = "choreboard";

/// Platform data directory holding the database, config and PID files.
///
/// - Windows: `%LOCALAPPDATA%\choreboard\choreboard`
/// - macOS: `~/Library/Application Support/choreboard/choreboard`
/// - elsewhere: `~/.local/share/choreboard/choreboard`
#[derive(Debug, Clone)]
pub struct DataStorage {
    base_path: PathBuf,
}

impl Default for DataStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStorage {
    pub fn new() -> Self {
        let base_path = match OS {
            "windows" => var("LOCALAPPDATA").unwrap_or_else(|_| ".".into()),
            "macos" => var("HOME").unwrap_or_else(|_| ".".into()) + "/Library/Application Support",
            _ => var("HOME").unwrap_or_else(|_| ".".into()) + "/.local/share",
        };
        let base_path = Path::new(&base_path).join(VENDOR_NAME).join(APP_NAME);

        Self { base_path }
    }

    /// Storage rooted at an explicit directory.
    pub fn at(base_path: impl Into<PathBuf>) -> Self {
        Self { base_path: base_path.into() }
    }

    /// Path of `file_name` inside the data directory, creating the directory
    /// on first use.
    pub fn get_path(&self, file_name: &str) -> Result<PathBuf> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path)?;
        }
        Ok(self.base_path.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_path_creates_the_directory() {
        let temp = tempfile::tempdir().unwrap();
        let storage = DataStorage::at(temp.path().join("nested"));
        let path = storage.get_path("choreboard.db").unwrap();
        assert_eq!(path, temp.path().join("nested").join("choreboard.db"));
        assert!(temp.path().join("nested").is_dir());
    }
}

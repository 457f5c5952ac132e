//! Scan scope configuration.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::Error;

/// Name of the optional per-tree configuration file.
const CONFIG_FILE: &str = ".mdlinks.toml";

/// Which parts of the tree are in scope. Both lists hold path prefixes
/// compared against root-relative paths; an empty include list means the
/// whole tree, and an exclusion always wins over an inclusion.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Config {
    /// Read `.mdlinks.toml` from the tree root.
    ///
    /// No file at all is fine and yields the permissive default, but a file
    /// that exists and fails to parse is reported, never papered over.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` for read failures other than not-found, and
    /// `Error::TomlDe` when the file is present but malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        match std::fs::read_to_string(root.join(CONFIG_FILE)) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Decide whether a root-relative path is in scope for scanning.
    pub fn should_scan(&self, relative_path: &str) -> bool {
        if matches_any(&self.exclude, relative_path) {
            return false;
        }
        self.include.is_empty() || matches_any(&self.include, relative_path)
    }
}

fn matches_any(prefixes: &[String], path: &str) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

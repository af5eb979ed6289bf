//! Centralized path configuration for surfswitch.
//!
//! Goals:
//! - Single place that resolves OS-specific locations (APPDATA/HOME) instead
//!   of scattering env lookups across the engines.
//! - Built once at process start and passed into every component; no
//!   module-level mutable globals.
//! - Both platform constructors are always compiled so either layout can be
//!   exercised in tests on any host.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

/// Default directory (under the current working directory) for saved profiles.
pub const DEFAULT_PROFILES_DIR: &str = "windsurf_profiles";

/// Resolved filesystem locations of one Windsurf installation.
#[derive(Clone, Debug)]
pub struct AppPaths {
    /// Application data root (…/Windsurf).
    pub data_dir: PathBuf,

    /// User/globalStorage under the data root.
    pub global_storage: PathBuf,

    /// The embedded key-value store (state.vscdb) inside global storage.
    pub state_db: PathBuf,

    /// Auxiliary installation directory (~/.codeium/windsurf).
    pub codeium_dir: PathBuf,

    /// Where profiles are stored.
    pub profiles_root: PathBuf,
}

impl AppPaths {
    /// Windows layout: %APPDATA%\Windsurf + %USERPROFILE%\.codeium\windsurf.
    pub fn windows_from_env() -> Result<Self> {
        let appdata = std::env::var("APPDATA").context("APPDATA is not set")?;
        let userprofile =
            std::env::var("USERPROFILE").context("USERPROFILE is not set")?;

        let data_dir = PathBuf::from(appdata).join("Windsurf");
        Ok(Self::from_roots(
            data_dir,
            PathBuf::from(userprofile).join(".codeium").join("windsurf"),
        ))
    }

    /// macOS layout: ~/Library/Application Support/Windsurf + ~/.codeium/windsurf.
    pub fn macos_from_env() -> Result<Self> {
        let home = std::env::var("HOME").context("HOME is not set")?;
        let home = PathBuf::from(home);

        let data_dir = home
            .join("Library")
            .join("Application Support")
            .join("Windsurf");
        Ok(Self::from_roots(
            data_dir,
            home.join(".codeium").join("windsurf"),
        ))
    }

    /// Layout for the host OS.
    pub fn detect() -> Result<Self> {
        #[cfg(windows)]
        {
            Self::windows_from_env()
        }
        #[cfg(not(windows))]
        {
            Self::macos_from_env()
        }
    }

    /// Derive the dependent paths from the two roots.
    pub fn from_roots(data_dir: PathBuf, codeium_dir: PathBuf) -> Self {
        let global_storage = data_dir.join("User").join("globalStorage");
        let state_db = global_storage.join("state.vscdb");
        let profiles_root = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_PROFILES_DIR);
        Self {
            data_dir,
            global_storage,
            state_db,
            codeium_dir,
            profiles_root,
        }
    }

    /// Override the profiles root (CLI --profiles-dir).
    pub fn with_profiles_root(mut self, root: PathBuf) -> Self {
        self.profiles_root = root;
        self
    }
}

impl fmt::Display for AppPaths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AppPaths {{ data_dir: {}, state_db: {}, codeium_dir: {}, profiles_root: {} }}",
            self.data_dir.display(),
            self.state_db.display(),
            self.codeium_dir.display(),
            self.profiles_root.display(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_roots_derives_state_db() {
        let p = AppPaths::from_roots(PathBuf::from("/tmp/Windsurf"), PathBuf::from("/tmp/cd"));
        assert_eq!(
            p.state_db,
            PathBuf::from("/tmp/Windsurf/User/globalStorage/state.vscdb")
        );
        assert!(p.profiles_root.ends_with(DEFAULT_PROFILES_DIR));
    }
}

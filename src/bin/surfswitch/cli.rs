use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI переключателя профилей Windsurf
#[derive(Parser, Debug)]
#[command(name = "surfswitch", version, about = "Windsurf account profile switcher")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Show the currently logged-in identity
    Current {
        /// JSON output (single object)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List saved profiles (name, email, saved_at)
    List {
        /// Profiles directory (default: ./windsurf_profiles)
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
        /// JSON output (array)
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Save the current account state as a profile
    ///
    /// Имя по умолчанию — локальная часть email текущего аккаунта.
    Save {
        /// Profile name (sanitized to letters, digits, '_', '-', '.')
        name: Option<String>,
        /// Replace an existing profile with the same name (destructive)
        #[arg(long, default_value_t = false)]
        overwrite: bool,
        /// Force-quit a running Windsurf before capturing
        #[arg(long, default_value_t = false)]
        kill: bool,
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
        /// JSON report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Switch the live state to a saved profile
    ///
    /// Exit code: 0 — switched and verified, 2 — restore ran but identity
    /// mismatched, 3 — aborted (nothing touched).
    Switch {
        name: String,
        /// Force-quit a running Windsurf before restoring
        #[arg(long, default_value_t = false)]
        kill: bool,
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
        /// JSON report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Delete a saved profile (irreversible)
    Delete {
        name: String,
        #[arg(long)]
        profiles_dir: Option<PathBuf>,
    },
}

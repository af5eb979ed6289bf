use anyhow::Result;
use std::path::PathBuf;

use surfswitch::{AppPaths, Switcher};

/// Собрать Switcher для текущей ОС с опциональным переопределением корня
/// профилей.
pub fn open_switcher(profiles_dir: Option<PathBuf>) -> Result<Switcher> {
    let mut paths = AppPaths::detect()?;
    if let Some(dir) = profiles_dir {
        paths = paths.with_profiles_root(dir);
    }
    Ok(Switcher::for_host(paths))
}

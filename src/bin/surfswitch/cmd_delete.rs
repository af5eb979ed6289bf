use anyhow::Result;
use std::path::PathBuf;

use crate::util::open_switcher;

pub fn exec(name: String, profiles_dir: Option<PathBuf>) -> Result<()> {
    let switcher = open_switcher(profiles_dir)?;
    switcher.delete_profile(&name)?;
    println!("deleted profile '{}'", name);
    Ok(())
}

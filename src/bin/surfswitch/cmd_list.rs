use anyhow::Result;
use std::path::PathBuf;

use crate::util::open_switcher;

pub fn exec(profiles_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let switcher = open_switcher(profiles_dir)?;
    let entries = switcher.list_profiles()?;

    if json {
        let arr: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| match &e.meta {
                Some(m) => serde_json::json!({
                    "profile": e.name,
                    "name": m.name,
                    "email": m.email,
                    "saved_at": m.saved_at,
                }),
                None => serde_json::json!({
                    "profile": e.name,
                    "unreadable": true,
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&arr)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("(no profiles)");
        return Ok(());
    }
    for e in entries {
        match e.meta {
            Some(m) => println!("{:<20} {:<30} {}", e.name, m.email, m.saved_at),
            None => println!("{:<20} (unreadable)", e.name),
        }
    }
    Ok(())
}

use anyhow::Result;
use std::path::PathBuf;

use surfswitch::{SaveOptions, SwitchError};

use crate::util::open_switcher;

pub fn exec(
    name: Option<String>,
    overwrite: bool,
    kill: bool,
    profiles_dir: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let switcher = open_switcher(profiles_dir)?;

    // Имя по умолчанию — локальная часть email текущего аккаунта.
    let name = match name {
        Some(n) => n,
        None => {
            let id = switcher
                .current_identity()
                .ok_or(SwitchError::IdentityUnavailable)?;
            id.email
                .split('@')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or("profile")
                .to_string()
        }
    };

    let report = switcher.save_profile(&name, &SaveOptions { overwrite, kill_running: kill })?;

    if json {
        let v = serde_json::json!({
            "profile": report.profile.name,
            "email": report.profile.meta.email,
            "saved_at": report.profile.meta.saved_at,
            "copied": report.copied,
            "skipped": report.skipped,
            "failed": report.failed.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
    } else {
        println!(
            "saved profile '{}' ({} <{}>)",
            report.profile.name, report.profile.meta.name, report.profile.meta.email
        );
        if !report.skipped.is_empty() {
            println!("skipped (absent): {}", report.skipped.join(", "));
        }
        for f in &report.failed {
            println!("failed: {}", f);
        }
    }

    if !report.is_complete() {
        // Частичный снапшот: профиль записан, но часть ресурсов сорвалась.
        std::process::exit(2);
    }
    Ok(())
}

use anyhow::Result;
use std::path::PathBuf;

use surfswitch::{AbortReason, RestoreOutcome, SwitchOptions, SwitchOutcome};

use crate::util::open_switcher;

pub fn exec(name: String, kill: bool, profiles_dir: Option<PathBuf>, json: bool) -> Result<()> {
    let switcher = open_switcher(profiles_dir)?;
    let outcome = switcher.switch_profile(&name, &SwitchOptions { kill_running: kill })?;

    let code = match &outcome {
        SwitchOutcome::Done(o) => {
            print_outcome("done", o, json)?;
            0
        }
        SwitchOutcome::PartialMismatch(o) => {
            print_outcome("partial-mismatch", o, json)?;
            2
        }
        SwitchOutcome::Aborted(reason) => {
            let why = match reason {
                AbortReason::Declined => {
                    "application is running; re-run with --kill to force-quit it"
                }
                AbortReason::TerminationFailed => {
                    "could not terminate the application; close it manually and retry"
                }
            };
            if json {
                let v = serde_json::json!({ "status": "aborted", "reason": why });
                println!("{}", serde_json::to_string_pretty(&v)?);
            } else {
                println!("aborted: {}", why);
            }
            3
        }
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn print_outcome(status: &str, o: &RestoreOutcome, json: bool) -> Result<()> {
    if json {
        let v = serde_json::json!({
            "status": status,
            "verified": o.verified,
            "observed_email": o.observed.as_ref().map(|id| id.email.clone()),
            "restored": o.restored,
            "skipped": o.skipped,
            "failed": o.failed.iter().map(|f| f.to_string()).collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&v)?);
        return Ok(());
    }

    match o.observed.as_ref() {
        Some(id) => println!("{}: now {} <{}>", status, id.name, id.email),
        None => println!("{}: identity unreadable after restore", status),
    }
    if !o.restored.is_empty() {
        println!("restored: {}", o.restored.join(", "));
    }
    if !o.skipped.is_empty() {
        println!("skipped (no snapshot): {}", o.skipped.join(", "));
    }
    for f in &o.failed {
        println!("failed: {}", f);
    }
    if !o.restored.is_empty() {
        // Перезапуск нужен, чтобы приложение перечитало состояние.
        println!("restart Windsurf to pick up the restored state");
    }
    Ok(())
}

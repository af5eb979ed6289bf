// tests/switch_flow.rs
//
// Запуск только этого файла:
//   cargo test --test switch_flow -- --nocapture
//
// Покрываем:
// 1) Сценарий: save bob -> switch alice -> identity читается как alice,
//    итог Done, содержимое хранилищ соответствует профилю alice.
// 2) Переключение на уже активный профиль — no-op успех, ресурсы не тронуты.
// 3) Переключение на несуществующий профиль — NotFound.
// 4) Работающее приложение + подтверждённый kill — переключение проходит.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use rusqlite::Connection;

use surfswitch::{
    macos_manifest, read_identity, AppPaths, LivenessGuard, SaveOptions, SwitchError,
    SwitchOptions, SwitchOutcome, Switcher,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("surfswitch-switch-{prefix}-{pid}-{t}-{id}"))
}

struct StoppedApp;
impl LivenessGuard for StoppedApp {
    fn is_running(&self) -> bool {
        false
    }
    fn request_termination(&self) -> bool {
        true
    }
}

/// Работает, но корректно завершается по запросу.
struct KillableApp;
impl LivenessGuard for KillableApp {
    fn is_running(&self) -> bool {
        true
    }
    fn request_termination(&self) -> bool {
        true
    }
}

fn test_paths(root: &Path) -> AppPaths {
    AppPaths::from_roots(
        root.join("live").join("Windsurf"),
        root.join("live").join("codeium"),
    )
    .with_profiles_root(root.join("profiles"))
}

fn write_state_db(state_db: &Path, name: &str, email: &str) -> Result<()> {
    fs::create_dir_all(state_db.parent().expect("state db has a parent"))?;
    let conn = Connection::open(state_db)?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ItemTable (key TEXT PRIMARY KEY, value BLOB)",
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO ItemTable (key, value) VALUES ('windsurfAuthStatus', ?1)",
        [format!(r#"{{"name":"{name}","email":"{email}"}}"#)],
    )?;
    Ok(())
}

fn seed_live(paths: &AppPaths, name: &str, email: &str) -> Result<()> {
    write_state_db(&paths.state_db, name, email)?;
    let ss = paths.data_dir.join("Session Storage");
    fs::create_dir_all(&ss)?;
    fs::write(ss.join("000001.log"), format!("session-{email}"))?;
    fs::write(paths.data_dir.join("Cookies"), format!("cookies-{email}"))?;
    Ok(())
}

fn switcher(paths: &AppPaths, guard: Box<dyn LivenessGuard>) -> Switcher {
    Switcher::new(paths.clone(), macos_manifest(paths), guard)
}

#[test]
fn save_bob_switch_alice_reports_done() -> Result<()> {
    let root = unique_root("scenario");
    let paths = test_paths(&root);

    // Живое состояние alice -> профиль "alice".
    seed_live(&paths, "Alice", "alice@x.com")?;
    let sw = switcher(&paths, Box::new(StoppedApp));
    sw.save_profile("alice", &SaveOptions::default())?;

    // Теперь живое состояние bob -> профиль "bob".
    seed_live(&paths, "Bob", "bob@x.com")?;
    sw.save_profile("bob", &SaveOptions::default())?;
    assert_eq!(
        read_identity(&paths.state_db).unwrap().email,
        "bob@x.com"
    );

    // Переключение обратно на alice.
    let outcome = sw.switch_profile("alice", &SwitchOptions::default())?;
    let restore = match outcome {
        SwitchOutcome::Done(o) => o,
        other => panic!("expected Done, got {:?}", other),
    };
    assert!(restore.verified);
    assert_eq!(restore.observed.unwrap().email, "alice@x.com");
    assert!(restore.restored.contains(&"globalStorage".to_string()));

    // IdentityReader видит alice, хранилища вернулись к её содержимому.
    assert_eq!(
        read_identity(&paths.state_db).unwrap().email,
        "alice@x.com"
    );
    let session = fs::read_to_string(
        paths.data_dir.join("Session Storage").join("000001.log"),
    )?;
    assert_eq!(session, "session-alice@x.com");
    let cookies = fs::read_to_string(paths.data_dir.join("Cookies"))?;
    assert_eq!(cookies, "cookies-alice@x.com");

    // Оба профиля остались на месте.
    assert_eq!(sw.list_profiles()?.len(), 2);
    Ok(())
}

#[test]
fn switch_to_active_profile_is_noop() -> Result<()> {
    let root = unique_root("noop");
    let paths = test_paths(&root);
    seed_live(&paths, "Alice", "alice@x.com")?;

    let sw = switcher(&paths, Box::new(StoppedApp));
    sw.save_profile("alice", &SaveOptions::default())?;

    // Маркер, появившийся после save: no-op не должен его затереть.
    let marker = paths.data_dir.join("Session Storage").join("marker.txt");
    fs::write(&marker, "fresh")?;

    let outcome = sw.switch_profile("alice", &SwitchOptions::default())?;
    match outcome {
        SwitchOutcome::Done(o) => {
            assert!(o.verified);
            assert!(o.restored.is_empty(), "no-op must not touch resources");
            assert!(o.failed.is_empty());
        }
        other => panic!("expected Done, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&marker)?, "fresh");
    Ok(())
}

#[test]
fn switch_unknown_profile_not_found() -> Result<()> {
    let root = unique_root("unknown");
    let paths = test_paths(&root);
    seed_live(&paths, "Alice", "alice@x.com")?;

    let sw = switcher(&paths, Box::new(StoppedApp));
    let err = sw
        .switch_profile("nonexistent", &SwitchOptions::default())
        .expect_err("switch to a missing profile must fail");
    assert!(matches!(
        err.downcast_ref::<SwitchError>(),
        Some(SwitchError::NotFound(_))
    ));
    Ok(())
}

#[test]
fn switch_with_confirmed_kill_proceeds() -> Result<()> {
    let root = unique_root("kill");
    let paths = test_paths(&root);

    seed_live(&paths, "Alice", "alice@x.com")?;
    let sw = switcher(&paths, Box::new(KillableApp));
    sw.save_profile(
        "alice",
        &SaveOptions {
            overwrite: false,
            kill_running: true,
        },
    )?;

    seed_live(&paths, "Bob", "bob@x.com")?;
    sw.save_profile(
        "bob",
        &SaveOptions {
            overwrite: false,
            kill_running: true,
        },
    )?;

    let outcome = sw.switch_profile("alice", &SwitchOptions { kill_running: true })?;
    assert!(matches!(outcome, SwitchOutcome::Done(_)));
    assert_eq!(
        read_identity(&paths.state_db).unwrap().email,
        "alice@x.com"
    );
    Ok(())
}

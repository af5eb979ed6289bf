// tests/best_effort_restore.rs
//
// Запуск только этого файла:
//   cargo test --test best_effort_restore -- --nocapture
//
// Покрываем best-effort-семантику restore:
// 1) Профиль без снапшота одного из ресурсов: живой ресурс не трогается,
//    остальные заменяются.
// 2) Сбой замены одного ресурса фиксируется в failed, остальные ресурсы
//    заменяются, операция завершается (не прерывается).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use rusqlite::Connection;

use surfswitch::{
    macos_manifest, read_identity, AppPaths, LivenessGuard, SaveOptions, SwitchOptions,
    SwitchOutcome, Switcher,
};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("surfswitch-besteffort-{prefix}-{pid}-{t}-{id}"))
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

fn switcher(paths: &AppPaths) -> Switcher {
    Switcher::new(paths.clone(), macos_manifest(paths), Box::new(StoppedApp))
}

#[test]
fn missing_snapshot_leaves_live_resource_untouched() -> Result<()> {
    let root = unique_root("missing");
    let paths = test_paths(&root);

    seed_live(&paths, "Alice", "alice@x.com")?;
    let sw = switcher(&paths);
    sw.save_profile("alice", &SaveOptions::default())?;

    // Снапшот Session Storage пропадает (как если бы ресурса не было при
    // capture).
    fs::remove_dir_all(paths.profiles_root.join("alice").join("Session Storage"))?;

    seed_live(&paths, "Bob", "bob@x.com")?;

    let outcome = sw.switch_profile("alice", &SwitchOptions::default())?;
    let restore = match outcome {
        SwitchOutcome::Done(o) => o,
        other => panic!("expected Done, got {:?}", other),
    };

    assert!(restore.skipped.contains(&"Session Storage".to_string()));
    assert!(restore.restored.contains(&"globalStorage".to_string()));
    assert!(restore.restored.contains(&"Cookies".to_string()));
    assert!(restore.failed.is_empty());

    // Живой Session Storage остался бобовским, остальное — алисино.
    let session = fs::read_to_string(
        paths.data_dir.join("Session Storage").join("000001.log"),
    )?;
    assert_eq!(session, "session-bob@x.com");
    assert_eq!(
        fs::read_to_string(paths.data_dir.join("Cookies"))?,
        "cookies-alice@x.com"
    );
    assert_eq!(
        read_identity(&paths.state_db).unwrap().email,
        "alice@x.com"
    );
    Ok(())
}

#[test]
fn failed_resource_is_recorded_and_rest_is_restored() -> Result<()> {
    let root = unique_root("partial");
    let paths = test_paths(&root);

    seed_live(&paths, "Alice", "alice@x.com")?;
    let sw = switcher(&paths);
    sw.save_profile("alice", &SaveOptions::default())?;

    // Порча снапшота: на месте файлового снапшота Cookies — каталог;
    // файловая копия на restore обязана сорваться.
    let cookie_snap = paths.profiles_root.join("alice").join("Cookies");
    fs::remove_file(&cookie_snap)?;
    fs::create_dir_all(cookie_snap.join("oops"))?;

    seed_live(&paths, "Bob", "bob@x.com")?;

    let outcome = sw.switch_profile("alice", &SwitchOptions::default())?;
    let restore = match outcome {
        SwitchOutcome::Done(o) => o,
        other => panic!("expected Done (identity store restored), got {:?}", other),
    };

    assert_eq!(restore.failed.len(), 1);
    assert_eq!(restore.failed[0].name, "Cookies");
    // Остальные ресурсы заменились несмотря на сбой.
    assert!(restore.restored.contains(&"globalStorage".to_string()));
    assert!(restore.restored.contains(&"Session Storage".to_string()));
    assert_eq!(
        read_identity(&paths.state_db).unwrap().email,
        "alice@x.com"
    );
    Ok(())
}

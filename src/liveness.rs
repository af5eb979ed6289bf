//! Liveness gate: обнаружение и завершение работающего приложения.
//!
//! Замена ресурсов под живым процессом (открытые дескрипторы SQLite/кук)
//! даёт неопределённое состояние, поэтому обе мутирующие операции проходят
//! через этот шлюз. request_termination() делает ровно одну силовую попытку
//! и ограниченно ждёт; false для вызывающей стороны фатален — ресурсы
//! трогать нельзя.

use log::{debug, warn};
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Интервал и число попыток опроса после kill (суммарно ~1 секунда).
const TERM_POLL_INTERVAL: Duration = Duration::from_millis(100);
const TERM_POLL_ATTEMPTS: u32 = 10;

#[cfg(windows)]
const PROCESS_IMAGE: &str = "Windsurf.exe";
#[cfg(not(windows))]
const PROCESS_PATTERNS: &[&str] = &["Windsurf", "Windsurf Helper"];

/// Процессная часть платформы. Инжектится в Switcher; тесты подставляют
/// скриптованные реализации.
pub trait LivenessGuard {
    fn is_running(&self) -> bool;

    /// Одна силовая попытка завершения + ограниченное ожидание.
    /// true — подтверждено, что процессов не осталось.
    fn request_termination(&self) -> bool;
}

/// Реальная реализация поверх системных утилит:
/// tasklist/taskkill (Windows), pgrep/pkill (macOS и прочие unix).
#[derive(Debug, Default)]
pub struct ProcessProbe;

impl ProcessProbe {
    pub fn new() -> Self {
        Self
    }

    #[cfg(windows)]
    fn probe(&self) -> bool {
        let filter = format!("IMAGENAME eq {}", PROCESS_IMAGE);
        match Command::new("tasklist")
            .args(["/FI", filter.as_str()])
            .output()
        {
            Ok(out) => String::from_utf8_lossy(&out.stdout).contains(PROCESS_IMAGE),
            Err(e) => {
                warn!("liveness: tasklist failed: {}", e);
                false
            }
        }
    }

    #[cfg(windows)]
    fn kill_all(&self) {
        // /T валит и дочерние процессы (helper-ы).
        match Command::new("taskkill")
            .args(["/F", "/T", "/IM", PROCESS_IMAGE])
            .output()
        {
            Ok(out) => debug!("liveness: taskkill status={}", out.status),
            Err(e) => warn!("liveness: taskkill failed: {}", e),
        }
    }

    #[cfg(not(windows))]
    fn probe(&self) -> bool {
        for pat in PROCESS_PATTERNS {
            match Command::new("pgrep").args(["-f", pat]).output() {
                Ok(out) if out.status.success() => return true,
                Ok(_) => {}
                Err(e) => {
                    warn!("liveness: pgrep failed: {}", e);
                    return false;
                }
            }
        }
        false
    }

    #[cfg(not(windows))]
    fn kill_all(&self) {
        match Command::new("pkill").args(["-9", "-f", "Windsurf"]).output() {
            Ok(out) => debug!("liveness: pkill status={}", out.status),
            Err(e) => warn!("liveness: pkill failed: {}", e),
        }
    }
}

impl LivenessGuard for ProcessProbe {
    fn is_running(&self) -> bool {
        self.probe()
    }

    fn request_termination(&self) -> bool {
        self.kill_all();
        for attempt in 0..TERM_POLL_ATTEMPTS {
            thread::sleep(TERM_POLL_INTERVAL);
            if !self.is_running() {
                debug!("liveness: termination confirmed after {} poll(s)", attempt + 1);
                return true;
            }
        }
        warn!(
            "liveness: process still alive after {} polls, giving up",
            TERM_POLL_ATTEMPTS
        );
        false
    }
}

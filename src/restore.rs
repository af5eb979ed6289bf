//! RestoreEngine — замена живых ресурсов снапшотами профиля + верификация.
//!
//! Для каждого дескриптора манифеста: снапшот есть -> живая цель
//! деструктивно удаляется (каталоги рекурсивно) и на её место копируется
//! снапшот; сбой одного ресурса фиксируется, цикл продолжается — цель
//! максимально полное best-effort восстановление. Отката нет: уже
//! заменённые ресурсы остаются, даже если следующий сорвался.
//!
//! После цикла перечитывается identity и email сравнивается с записанным в
//! профиле: совпадение — Switched, иначе PartialMismatch (предупреждение,
//! не откат).

use log::{debug, info, warn};

use crate::errors::ResourceFailure;
use crate::identity::{read_identity, IdentityRecord};
use crate::manifest::{ResourceDescriptor, ResourceKind};
use crate::store::Profile;
use crate::util::{copy_dir_filtered, copy_file, remove_path};
use std::path::Path;

/// Итог restore: verified + пер-ресурсная раскладка.
#[derive(Debug)]
pub struct RestoreOutcome {
    /// Прочитанная после restore identity совпала с ожидаемой по email.
    pub verified: bool,
    /// Что удалось прочитать после restore (None — состояние нечитаемо).
    pub observed: Option<IdentityRecord>,
    pub restored: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ResourceFailure>,
}

impl RestoreOutcome {
    /// Пустой успешный итог для no-op (ресурсы не тронуты).
    pub fn noop(observed: IdentityRecord) -> Self {
        Self {
            verified: true,
            observed: Some(observed),
            restored: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

pub struct RestoreEngine<'a> {
    state_db: &'a Path,
    manifest: &'a [ResourceDescriptor],
}

impl<'a> RestoreEngine<'a> {
    pub fn new(state_db: &'a Path, manifest: &'a [ResourceDescriptor]) -> Self {
        Self { state_db, manifest }
    }

    pub fn apply(&self, profile: &Profile) -> RestoreOutcome {
        let mut restored = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for d in self.manifest {
            let snap = profile.root.join(d.logical_name);
            if !snap.exists() {
                // Снапшота нет (ресурс отсутствовал при capture) — живой
                // ресурс не трогаем.
                debug!("restore: no snapshot for {}, leaving live as is", d.logical_name);
                skipped.push(d.logical_name.to_string());
                continue;
            }

            match replace_resource(d, &snap) {
                Ok(()) => {
                    debug!("restore: {} replaced", d.logical_name);
                    restored.push(d.logical_name.to_string());
                }
                Err(e) => {
                    warn!("restore: {} failed: {:#}", d.logical_name, e);
                    failed.push(ResourceFailure::new(d.logical_name, &e));
                }
            }
        }

        let observed = read_identity(self.state_db);
        let expected = profile.meta.email.as_str();
        let verified = observed
            .as_ref()
            .map(|id| id.email == expected)
            .unwrap_or(false);

        if verified {
            info!(
                "restore: done profile='{}' restored={} skipped={} failed={}, identity verified",
                profile.name,
                restored.len(),
                skipped.len(),
                failed.len()
            );
        } else {
            warn!(
                "restore: identity mismatch for profile '{}': expected {}, observed {}",
                profile.name,
                expected,
                observed
                    .as_ref()
                    .map(|id| id.email.as_str())
                    .unwrap_or("(unreadable)")
            );
        }

        RestoreOutcome {
            verified,
            observed,
            restored,
            skipped,
            failed,
        }
    }
}

fn replace_resource(d: &ResourceDescriptor, snap: &Path) -> anyhow::Result<()> {
    remove_path(&d.source)?;
    match d.kind {
        ResourceKind::File => copy_file(snap, &d.source),
        // Исключения применены на capture; restore кладёт снапшот как есть.
        ResourceKind::Directory => copy_dir_filtered(snap, &d.source, &[]),
    }
}

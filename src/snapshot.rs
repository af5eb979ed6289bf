//! SnapshotEngine — захват ресурсов манифеста в каталог профиля.
//!
//! Алгоритм (best-effort):
//! - корень профиля: существует и overwrite не подтверждён -> AlreadyExists;
//!   с overwrite старый корень удаляется целиком до начала копий;
//! - ресурсы идут в порядке манифеста: источник есть -> копия под
//!   logical_name (каталоги — с exclude-глобами), нет и optional -> skip,
//!   нет и required -> сбой в списке, цикл продолжается; ошибка копии —
//!   тоже в список, цикл продолжается;
//! - profile_meta.json пишется последним шагом; его сбой (как и сбой
//!   создания корня) — единственные причины вернуть Err без профиля.

use anyhow::{anyhow, Context, Result};
use glob::Pattern;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

use crate::errors::{ResourceFailure, SwitchError};
use crate::identity::IdentityRecord;
use crate::manifest::{ResourceDescriptor, ResourceKind};
use crate::store::{self, Profile, ProfileMeta};
use crate::util::{copy_dir_filtered, copy_file, now_local_string};

/// Итог capture: профиль + пер-ресурсная раскладка успехов/пропусков/сбоев.
#[derive(Debug)]
pub struct CaptureReport {
    pub profile: Profile,
    pub copied: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<ResourceFailure>,
}

impl CaptureReport {
    /// true, если ни один ресурс не сорвался (пропуски допустимы).
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct SnapshotEngine<'a> {
    profiles_root: &'a Path,
    manifest: &'a [ResourceDescriptor],
}

impl<'a> SnapshotEngine<'a> {
    pub fn new(profiles_root: &'a Path, manifest: &'a [ResourceDescriptor]) -> Self {
        Self {
            profiles_root,
            manifest,
        }
    }

    /// Снять снапшот под уже санитизированным именем.
    pub fn capture(
        &self,
        name: &str,
        identity: &IdentityRecord,
        overwrite: bool,
    ) -> Result<CaptureReport> {
        let root = self.profiles_root.join(name);

        if root.exists() {
            if !overwrite {
                return Err(SwitchError::AlreadyExists(name.to_string()).into());
            }
            // Деструктивно: старый снапшот невосстановим с этого момента.
            info!("capture: overwriting profile '{}', removing old root", name);
            fs::remove_dir_all(&root)
                .with_context(|| format!("remove old profile root {}", root.display()))?;
        }
        fs::create_dir_all(&root)
            .with_context(|| format!("create profile root {}", root.display()))?;

        let mut copied = Vec::new();
        let mut skipped = Vec::new();
        let mut failed = Vec::new();

        for d in self.manifest {
            if !d.source.exists() {
                if d.required {
                    let err = anyhow!("required source missing: {}", d.source.display());
                    warn!("capture: {}: {}", d.logical_name, err);
                    failed.push(ResourceFailure::new(d.logical_name, &err));
                } else {
                    debug!(
                        "capture: {} absent at {}, skipping",
                        d.logical_name,
                        d.source.display()
                    );
                    skipped.push(d.logical_name.to_string());
                }
                continue;
            }

            let dst = root.join(d.logical_name);
            match copy_resource(d, &dst) {
                Ok(()) => {
                    debug!("capture: {} copied", d.logical_name);
                    copied.push(d.logical_name.to_string());
                }
                Err(e) => {
                    warn!("capture: {} failed: {:#}", d.logical_name, e);
                    failed.push(ResourceFailure::new(d.logical_name, &e));
                }
            }
        }

        // Мета — последним шагом: её присутствие означает, что все копии
        // были предприняты (но не что все удались).
        let meta = ProfileMeta {
            name: identity.name.clone(),
            email: identity.email.clone(),
            saved_at: now_local_string(),
        };
        store::write_meta(&root, &meta)
            .with_context(|| format!("write metadata for profile '{}'", name))?;

        info!(
            "capture: done profile='{}' copied={} skipped={} failed={}",
            name,
            copied.len(),
            skipped.len(),
            failed.len()
        );

        Ok(CaptureReport {
            profile: Profile {
                name: name.to_string(),
                meta,
                root,
            },
            copied,
            skipped,
            failed,
        })
    }
}

fn copy_resource(d: &ResourceDescriptor, dst: &Path) -> Result<()> {
    match d.kind {
        ResourceKind::File => copy_file(&d.source, dst),
        ResourceKind::Directory => {
            let patterns = compile_excludes(&d.exclude)?;
            copy_dir_filtered(&d.source, dst, &patterns)
        }
    }
}

fn compile_excludes(patterns: &[&str]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("bad exclude pattern '{}'", p)))
        .collect()
}

//! ProfileStore — перечисление/чтение/удаление сохранённых профилей.
//!
//! Формат на диске: <profiles_root>/<name>/ с записями по logical_name
//! плюс profile_meta.json:
//! {
//!   "name": "<display name аккаунта>",
//!   "email": "<email>",
//!   "saved_at": "YYYY-MM-DD HH:MM:SS"
//! }
//!
//! Замечания:
//! - Каталог с нечитаемой метой всё равно попадает в list() (meta: None),
//!   чтобы пользователь мог его удалить.
//! - profile_meta.json пишется атомарно через tmp+rename. Это не усиливает
//!   инвариант «мета есть => снапшот полон»: копии ресурсов по-прежнему
//!   best-effort, мета лишь свидетельство, что все копии были предприняты.

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::SwitchError;
use crate::util::sanitize_name;

pub const META_FILE: &str = "profile_meta.json";

/// Метаданные профиля (содержимое profile_meta.json).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMeta {
    /// Display name аккаунта на момент снятия.
    pub name: String,
    pub email: String,
    pub saved_at: String,
}

/// Загруженный профиль: имя каталога + мета + корень на диске.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub meta: ProfileMeta,
    pub root: PathBuf,
}

/// Строка листинга. meta == None — сигнальное «нечитаемо».
#[derive(Debug, Clone)]
pub struct ProfileEntry {
    pub name: String,
    pub meta: Option<ProfileMeta>,
}

pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Просканировать корень профилей. Отсутствующий корень — пустой список.
    /// Не-каталоги (включая LOCK-файл) игнорируются; сортировка по имени.
    pub fn list(&self) -> Result<Vec<ProfileEntry>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let rd = fs::read_dir(&self.root)
            .with_context(|| format!("read profiles root {}", self.root.display()))?;
        for dent in rd {
            let dent = dent
                .with_context(|| format!("read profiles root {}", self.root.display()))?;
            if !dent.path().is_dir() {
                continue;
            }
            let name = dent.file_name().to_string_lossy().to_string();
            let meta = match read_meta(&dent.path()) {
                Ok(m) => Some(m),
                Err(e) => {
                    warn!("store: unreadable metadata in '{}': {:#}", name, e);
                    None
                }
            };
            entries.push(ProfileEntry { name, meta });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Загрузить профиль по имени. NotFound, если каталога нет; нечитаемая
    /// мета — ошибка с контекстом (переключаться на такой профиль нельзя).
    pub fn load(&self, name: &str) -> Result<Profile> {
        let name = checked_name(name)?;
        let root = self.root.join(&name);
        if !root.is_dir() {
            return Err(SwitchError::NotFound(name).into());
        }
        let meta = read_meta(&root)?;
        Ok(Profile { name, meta, root })
    }

    /// Удалить профиль рекурсивно. Отсутствие — NotFound, не фатальная паника;
    /// корень профилей при этом не модифицируется.
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = checked_name(name)?;
        let dir = self.root.join(&name);
        if !dir.is_dir() {
            return Err(SwitchError::NotFound(name).into());
        }
        fs::remove_dir_all(&dir)
            .with_context(|| format!("remove profile dir {}", dir.display()))?;
        info!("store: deleted profile '{}'", name);
        Ok(())
    }
}

/// Имя, приходящее снаружи, обязано совпадать со своей санитизированной
/// формой — иначе им можно было бы выбраться из корня профилей.
fn checked_name(name: &str) -> Result<String> {
    let clean = sanitize_name(name);
    if clean.is_empty() || clean != name {
        return Err(SwitchError::NotFound(name.to_string()).into());
    }
    Ok(clean)
}

pub fn meta_path(profile_root: &Path) -> PathBuf {
    profile_root.join(META_FILE)
}

pub fn read_meta(profile_root: &Path) -> Result<ProfileMeta> {
    let path = meta_path(profile_root);
    let bytes = fs::read(&path).with_context(|| format!("read {}", path.display()))?;
    let meta: ProfileMeta =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", path.display()))?;
    Ok(meta)
}

/// Записать мету атомарно (tmp+rename, sync best-effort).
pub fn write_meta(profile_root: &Path, meta: &ProfileMeta) -> Result<()> {
    let path = meta_path(profile_root);
    let tmp = profile_root.join(format!("{}.tmp", META_FILE));

    let mut f = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp)
        .with_context(|| format!("open {}", tmp.display()))?;

    let data = serde_json::to_vec_pretty(meta).context("serialize profile meta")?;
    f.write_all(&data)
        .with_context(|| format!("write {}", tmp.display()))?;
    let _ = f.sync_all();

    fs::rename(&tmp, &path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

//! Декларативный список ресурсов для snapshot/restore (per-platform).
//!
//! Манифест — чистые данные: упорядоченный список дескрипторов с путями,
//! видом (файл/каталог), признаком обязательности и исключениями для
//! каталожных копий. Оба движка (SnapshotEngine/RestoreEngine) работают от
//! одного манифеста, поэтому capture и restore симметричны по построению.
//!
//! Инвариант: logical_name уникален внутри манифеста (имя записи в каталоге
//! профиля).

use crate::config::AppPaths;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    File,
    Directory,
}

/// Один ресурс, который движки умеют снимать и восстанавливать.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    /// Имя записи внутри каталога профиля.
    pub logical_name: &'static str,
    /// Живой путь ресурса.
    pub source: PathBuf,
    pub kind: ResourceKind,
    /// required=true: отсутствие источника при capture фиксируется как сбой
    /// (но не прерывает снятие остальных ресурсов).
    pub required: bool,
    /// Glob-шаблоны исключений для каталожных копий (по имени записи,
    /// на любой глубине). Отсекают крупные кэши/бэкапы.
    pub exclude: Vec<&'static str>,
}

impl ResourceDescriptor {
    fn file(logical_name: &'static str, source: PathBuf, required: bool) -> Self {
        Self {
            logical_name,
            source,
            kind: ResourceKind::File,
            required,
            exclude: Vec::new(),
        }
    }

    fn dir(logical_name: &'static str, source: PathBuf, required: bool) -> Self {
        Self {
            logical_name,
            source,
            kind: ResourceKind::Directory,
            required,
            exclude: Vec::new(),
        }
    }

    fn with_exclude(mut self, patterns: &[&'static str]) -> Self {
        self.exclude = patterns.to_vec();
        self
    }
}

/// Windows: state.vscdb копируется как одиночный файл, куки живут в Network/.
pub fn windows_manifest(paths: &AppPaths) -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor::file("state.vscdb", paths.state_db.clone(), true),
        ResourceDescriptor::dir(
            "Session Storage",
            paths.data_dir.join("Session Storage"),
            false,
        ),
        ResourceDescriptor::dir("Local Storage", paths.data_dir.join("Local Storage"), false),
        ResourceDescriptor::dir("Network", paths.data_dir.join("Network"), false),
        ResourceDescriptor::file(
            "installation_id",
            paths.codeium_dir.join("installation_id"),
            false,
        ),
        ResourceDescriptor::file(
            "user_settings.pb",
            paths.codeium_dir.join("user_settings.pb"),
            false,
        ),
    ]
}

/// macOS: globalStorage снимается целиком (state.vscdb внутри), крупные
/// кэши/бэкапы расширений исключаются; куки — пара store/journal плюс
/// Network Persistent State.
pub fn macos_manifest(paths: &AppPaths) -> Vec<ResourceDescriptor> {
    vec![
        ResourceDescriptor::dir("globalStorage", paths.global_storage.clone(), true)
            .with_exclude(&["*.backup.*", "ms-*"]),
        ResourceDescriptor::dir(
            "Session Storage",
            paths.data_dir.join("Session Storage"),
            false,
        ),
        ResourceDescriptor::dir("Local Storage", paths.data_dir.join("Local Storage"), false),
        ResourceDescriptor::file("Cookies", paths.data_dir.join("Cookies"), false),
        ResourceDescriptor::file(
            "Cookies-journal",
            paths.data_dir.join("Cookies-journal"),
            false,
        ),
        ResourceDescriptor::file(
            "Network Persistent State",
            paths.data_dir.join("Network Persistent State"),
            false,
        ),
        ResourceDescriptor::file(
            "installation_id",
            paths.codeium_dir.join("installation_id"),
            false,
        ),
        ResourceDescriptor::file(
            "user_settings.pb",
            paths.codeium_dir.join("user_settings.pb"),
            false,
        ),
    ]
}

/// Манифест для текущей ОС.
pub fn manifest_for_host(paths: &AppPaths) -> Vec<ResourceDescriptor> {
    #[cfg(windows)]
    {
        windows_manifest(paths)
    }
    #[cfg(not(windows))]
    {
        macos_manifest(paths)
    }
}

//! util — общие хелперы (санитизация имён, метка времени, копирование).
//!
//! Содержит:
//! - sanitize_name(): имя профиля -> безопасное имя каталога (идемпотентно).
//! - now_local_string(): локальная метка времени для profile_meta.json.
//! - copy_file()/copy_dir_filtered()/remove_path(): файловые примитивы,
//!   общие для SnapshotEngine и RestoreEngine.

use anyhow::{Context, Result};
use glob::Pattern;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Оставить в имени профиля только буквенно-цифровые символы и '_', '-', '.'.
/// Идемпотентно и тотально: sanitize(sanitize(s)) == sanitize(s) для любого s.
pub fn sanitize_name(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Локальная метка времени в формате "%Y-%m-%d %H:%M:%S" (формат profile_meta.json).
pub fn now_local_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Скопировать один файл, создав родительские каталоги назначения.
pub fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::copy(src, dst)
        .with_context(|| format!("copy {} -> {}", src.display(), dst.display()))?;
    Ok(())
}

/// Рекурсивное копирование каталога с исключениями.
///
/// Исключения сопоставляются с именем записи (не с полным путём) на любой
/// глубине; совпавший каталог отсекается целиком вместе с содержимым.
/// Симлинки не разыменовываются при обходе.
pub fn copy_dir_filtered(src: &Path, dst: &Path, exclude: &[Pattern]) -> Result<()> {
    fs::create_dir_all(dst).with_context(|| format!("create dir {}", dst.display()))?;

    let mut it = WalkDir::new(src).min_depth(1).follow_links(false).into_iter();
    while let Some(entry) = it.next() {
        let entry = entry.with_context(|| format!("walk {}", src.display()))?;
        let name = entry.file_name().to_string_lossy();
        if exclude.iter().any(|p| p.matches(name.as_ref())) {
            if entry.file_type().is_dir() {
                it.skip_current_dir();
            }
            continue;
        }

        let rel = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("strip prefix {}", src.display()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("create dir {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create dir {}", parent.display()))?;
            }
            fs::copy(entry.path(), &target).with_context(|| {
                format!("copy {} -> {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

/// Удалить путь, если он существует (файл или каталог рекурсивно).
pub fn remove_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if path.is_dir() {
        fs::remove_dir_all(path)
            .with_context(|| format!("remove dir {}", path.display()))?;
    } else {
        fs::remove_file(path)
            .with_context(|| format!("remove file {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_keeps_allowed_charset() {
        assert_eq!(sanitize_name("alice"), "alice");
        assert_eq!(sanitize_name("a b/c"), "abc");
        assert_eq!(sanitize_name("work.2024_v-1"), "work.2024_v-1");
        assert_eq!(sanitize_name("../../etc/passwd"), "....etcpasswd");
        assert_eq!(sanitize_name(""), "");
        assert_eq!(sanitize_name("!@#$%^&*()"), "");
    }

    #[test]
    fn sanitize_is_idempotent_and_total() {
        let samples = [
            "alice",
            "bob@x.com",
            "  spaced out  ",
            "../../up",
            "имя-профиля",
            "日本語.txt",
            "mixed !@# 123_ok",
            "",
        ];
        for s in samples {
            let once = sanitize_name(s);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {:?}", s);
            assert!(
                once.chars()
                    .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.')),
                "forbidden char survived for {:?}",
                s
            );
        }
    }

    #[test]
    fn now_local_string_shape() {
        let ts = now_local_string();
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(ts.len(), 19);
        assert_eq!(&ts[4..5], "-");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[13..14], ":");
    }
}

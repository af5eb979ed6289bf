//! Switcher — фасад операций поверх примитивов и машина состояний.
//!
//! switch: Idle -> CheckRunning -> {RequestTermination -> WaitExit} ->
//! RestoreResources -> VerifyIdentity -> {Done | PartialMismatch};
//! Aborted достижим из CheckRunning (вызывающая сторона не подтвердила
//! завершение) и из WaitExit (kill не подтверждён). Aborted гарантирует:
//! ни один ресурс не тронут.
//!
//! Мутирующие операции (save/switch/delete) держат эксклюзивный advisory
//! lock на <profiles_root>/LOCK: два процесса не гоняются за одним корнем.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;

use crate::config::AppPaths;
use crate::errors::SwitchError;
use crate::identity::{read_identity, IdentityRecord};
use crate::liveness::{LivenessGuard, ProcessProbe};
use crate::lock::{self, LockGuard};
use crate::manifest::{manifest_for_host, ResourceDescriptor};
use crate::restore::{RestoreEngine, RestoreOutcome};
use crate::snapshot::{CaptureReport, SnapshotEngine};
use crate::store::{ProfileEntry, ProfileStore};
use crate::util::sanitize_name;

#[derive(Debug, Clone, Copy, Default)]
pub struct SaveOptions {
    /// Подтверждение перезаписи существующего профиля.
    pub overwrite: bool,
    /// Подтверждение силового завершения работающего приложения.
    pub kill_running: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SwitchOptions {
    pub kill_running: bool,
}

/// Почему переключение оборвалось до первой замены ресурса.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// Приложение работает, а вызывающая сторона не подтвердила завершение.
    Declined,
    /// Силовое завершение не подтвердилось за окно ожидания.
    TerminationFailed,
}

/// Терминальные состояния машины переключения.
#[derive(Debug)]
pub enum SwitchOutcome {
    /// Restore выполнен, identity совпала.
    Done(RestoreOutcome),
    /// Restore выполнен, но identity не совпала или нечитаема.
    PartialMismatch(RestoreOutcome),
    /// Ни один ресурс не тронут.
    Aborted(AbortReason),
}

pub struct Switcher {
    paths: AppPaths,
    manifest: Vec<ResourceDescriptor>,
    guard: Box<dyn LivenessGuard>,
    store: ProfileStore,
}

impl Switcher {
    pub fn new(
        paths: AppPaths,
        manifest: Vec<ResourceDescriptor>,
        guard: Box<dyn LivenessGuard>,
    ) -> Self {
        let store = ProfileStore::new(paths.profiles_root.clone());
        Self {
            paths,
            manifest,
            guard,
            store,
        }
    }

    /// Рабочая конфигурация текущей ОС: пути из env, хостовый манифест,
    /// реальный процессный гвард.
    pub fn for_host(paths: AppPaths) -> Self {
        let manifest = manifest_for_host(&paths);
        Self::new(paths, manifest, Box::new(ProcessProbe::new()))
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Текущая identity приложения (None — не залогинен/нечитаемо).
    pub fn current_identity(&self) -> Option<IdentityRecord> {
        read_identity(&self.paths.state_db)
    }

    pub fn list_profiles(&self) -> Result<Vec<ProfileEntry>> {
        self.store.list()
    }

    /// Сохранить текущее состояние как профиль. Возвращает отчёт с
    /// санитизированным именем и пер-ресурсными списками.
    pub fn save_profile(&self, display_name: &str, opts: &SaveOptions) -> Result<CaptureReport> {
        let name = sanitize_name(display_name);
        if name.is_empty() {
            return Err(SwitchError::InvalidName(display_name.to_string()).into());
        }

        let _lock = self.exclusive_lock()?;

        // Liveness gate: под живым процессом state store может быть недописан.
        if let Err(reason) = self.liveness_gate(opts.kill_running) {
            return Err(match reason {
                AbortReason::Declined => SwitchError::AppRunning.into(),
                AbortReason::TerminationFailed => SwitchError::TerminationFailed.into(),
            });
        }

        let identity = self
            .current_identity()
            .ok_or(SwitchError::IdentityUnavailable)?;

        let engine = SnapshotEngine::new(&self.paths.profiles_root, &self.manifest);
        let report = engine.capture(&name, &identity, opts.overwrite)?;
        info!(
            "save: profile '{}' saved for {} <{}>",
            report.profile.name, identity.name, identity.email
        );
        Ok(report)
    }

    /// Переключить живое состояние на сохранённый профиль.
    pub fn switch_profile(&self, name: &str, opts: &SwitchOptions) -> Result<SwitchOutcome> {
        let name = sanitize_name(name);
        let _lock = self.exclusive_lock()?;

        let profile = self.store.load(&name)?;

        // Переключение на уже активный профиль — no-op успех.
        if let Some(current) = self.current_identity() {
            if current.email == profile.meta.email {
                info!("switch: already on '{}' ({}), nothing to do", name, current.email);
                return Ok(SwitchOutcome::Done(RestoreOutcome::noop(current)));
            }
        }

        if let Err(reason) = self.liveness_gate(opts.kill_running) {
            return Ok(SwitchOutcome::Aborted(reason));
        }

        debug!("switch: state=RestoreResources");
        let engine = RestoreEngine::new(&self.paths.state_db, &self.manifest);
        let outcome = engine.apply(&profile);

        debug!("switch: state=VerifyIdentity");
        if outcome.verified {
            info!("switch: done, now '{}' <{}>", profile.meta.name, profile.meta.email);
            Ok(SwitchOutcome::Done(outcome))
        } else {
            Ok(SwitchOutcome::PartialMismatch(outcome))
        }
    }

    /// Удалить сохранённый профиль.
    pub fn delete_profile(&self, name: &str) -> Result<()> {
        let _lock = self.exclusive_lock()?;
        self.store.delete(name)
    }

    /// CheckRunning -> {RequestTermination -> WaitExit}. Err — причина
    /// аборта; Ok — путь к ресурсам свободен.
    fn liveness_gate(&self, kill_running: bool) -> std::result::Result<(), AbortReason> {
        debug!("gate: state=CheckRunning");
        if !self.guard.is_running() {
            return Ok(());
        }
        if !kill_running {
            info!("gate: application is running, termination not confirmed");
            return Err(AbortReason::Declined);
        }

        debug!("gate: state=RequestTermination");
        if self.guard.request_termination() {
            debug!("gate: state=WaitExit -> confirmed");
            Ok(())
        } else {
            Err(AbortReason::TerminationFailed)
        }
    }

    fn exclusive_lock(&self) -> Result<LockGuard> {
        // Корень профилей создаётся лениво — до первого save его ещё нет.
        fs::create_dir_all(&self.paths.profiles_root).with_context(|| {
            format!("create profiles root {}", self.paths.profiles_root.display())
        })?;
        match lock::try_acquire_exclusive(&self.paths.profiles_root)? {
            Some(guard) => Ok(guard),
            None => Err(SwitchError::Busy.into()),
        }
    }
}

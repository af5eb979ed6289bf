// Базовые модули
pub mod config;
pub mod errors;
pub mod util;

// Платформенные примитивы
pub mod identity;
pub mod liveness;
pub mod manifest;

// Движки и хранилище профилей
pub mod lock;
pub mod restore;
pub mod snapshot;
pub mod store;
pub mod switcher;

// Удобные реэкспорты
pub use config::AppPaths;
pub use errors::{ResourceFailure, SwitchError};
pub use identity::{read_identity, IdentityRecord};
pub use liveness::{LivenessGuard, ProcessProbe};
pub use manifest::{
    macos_manifest, manifest_for_host, windows_manifest, ResourceDescriptor, ResourceKind,
};
pub use restore::{RestoreEngine, RestoreOutcome};
pub use snapshot::{CaptureReport, SnapshotEngine};
pub use store::{Profile, ProfileEntry, ProfileMeta, ProfileStore};
pub use switcher::{AbortReason, SaveOptions, SwitchOptions, SwitchOutcome, Switcher};

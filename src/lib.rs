pub mod capability;
pub mod content;
pub mod db;
pub mod engine;
pub mod errors;
pub mod models;
pub mod notifiers;
pub mod store;
pub mod trigger;

pub use capability::{CapabilityFuture, NotificationCapability};
pub use db::SqliteStore;
pub use engine::{spawn_reconcile_loop, ReminderEngine};
pub use errors::{AppError, AppResult};
pub use models::{
    ChannelConfig, EntryPatch, LoanDirection, LoanDue, NewPlannedEntry, NotificationContent,
    NotificationPrefs, NotificationSettings, PermissionStatus, PlannedEntry, ReminderKind,
    TransactionEvent, TransactionKind,
};
pub use store::{SettingsStore, StoreFuture};

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

static LOG_GUARD: std::sync::OnceLock<WorkerGuard> = std::sync::OnceLock::new();

pub fn init_tracing(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir).map_err(|error| error.to_string())?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "reminders.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .json()
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| error.to_string())
}

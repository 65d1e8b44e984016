use crate::errors::AppResult;
use std::future::Future;
use std::pin::Pin;

/// Storage keys, one per independently serialized record.
pub const NOTIF_ENABLED_KEY: &str = "NOTIFICATIONS_ENABLED";
pub const NOTIF_PREFS_KEY: &str = "NOTIFICATION_PREFS";
pub const PLANNED_PAYMENTS_KEY: &str = "PLANNED_PAYMENTS";

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Key-value persistence for the engine's three records. The store is a
/// durable mirror of in-memory state, never a second writer.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: String) -> StoreFuture<'_, Option<String>>;
    fn set(&self, key: String, value: String) -> StoreFuture<'_, ()>;
}

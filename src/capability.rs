use crate::errors::AppResult;
use crate::models::{ChannelConfig, NotificationContent, PermissionStatus};
use chrono::NaiveDateTime;
use std::future::Future;
use std::pin::Pin;

pub type CapabilityFuture<'a, T> = Pin<Box<dyn Future<Output = AppResult<T>> + Send + 'a>>;

/// Platform notification service the engine drives. Implementations wrap
/// whatever the host OS exposes; every call may fail and the engine treats
/// each failure as "no handle" rather than an error it surfaces.
pub trait NotificationCapability: Send + Sync {
    fn permission_status(&self) -> CapabilityFuture<'_, PermissionStatus>;
    fn request_permission(&self) -> CapabilityFuture<'_, PermissionStatus>;
    fn register_channel(&self, config: ChannelConfig) -> CapabilityFuture<'_, ()>;
    /// Schedules a notification for a future instant, returning the opaque
    /// handle used to cancel it.
    fn schedule_at(
        &self,
        at: NaiveDateTime,
        content: NotificationContent,
    ) -> CapabilityFuture<'_, String>;
    /// Delivers a notification immediately.
    fn schedule_now(&self, content: NotificationContent) -> CapabilityFuture<'_, String>;
    fn cancel(&self, handle: String) -> CapabilityFuture<'_, ()>;
    fn cancel_all(&self) -> CapabilityFuture<'_, ()>;
}

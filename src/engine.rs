use crate::capability::NotificationCapability;
use crate::content;
use crate::models::{
    ChannelConfig, EntryPatch, LoanDue, NewPlannedEntry, NotificationContent, NotificationPrefs,
    NotificationSettings, PermissionStatus, PlannedEntry,
};
use crate::store::{SettingsStore, NOTIF_ENABLED_KEY, NOTIF_PREFS_KEY, PLANNED_PAYMENTS_KEY};
use crate::trigger;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug)]
struct EngineState {
    settings: NotificationSettings,
    planned: Vec<PlannedEntry>,
    permission: PermissionStatus,
    channel_ready: bool,
    initialized: bool,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            settings: NotificationSettings::default(),
            planned: Vec::new(),
            permission: PermissionStatus::Undetermined,
            channel_ready: false,
            initialized: false,
        }
    }
}

/// Owns the planned-payment list and the global notification settings, and
/// keeps the platform's scheduled notifications consistent with them. Every
/// public operation serializes on one state mutex, so a reschedule always
/// runs cancel-old, compute, schedule-new, persist before the next
/// operation starts.
#[derive(Clone)]
pub struct ReminderEngine {
    capability: Arc<dyn NotificationCapability>,
    store: Arc<dyn SettingsStore>,
    state: Arc<Mutex<EngineState>>,
}

impl ReminderEngine {
    pub fn new(capability: Arc<dyn NotificationCapability>, store: Arc<dyn SettingsStore>) -> Self {
        Self {
            capability,
            store,
            state: Arc::new(Mutex::new(EngineState::default())),
        }
    }

    /// Loads persisted state, registers the notification channel, and caches
    /// the current permission status without prompting the user. Ends with a
    /// reconcile pass: handles persisted by a previous process are stale, so
    /// every schedule is re-derived from the entry list. Safe to call once
    /// at process start; later calls are no-ops.
    pub async fn initialize(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.initialized {
            return;
        }

        if let Some(raw) = self.load(NOTIF_ENABLED_KEY).await {
            state.settings.is_enabled = raw == "true";
        }
        if let Some(raw) = self.load(NOTIF_PREFS_KEY).await {
            match serde_json::from_str(&raw) {
                Ok(prefs) => state.settings.prefs = prefs,
                Err(err) => tracing::warn!(error = %err, "ignoring malformed prefs record"),
            }
        }
        if let Some(raw) = self.load(PLANNED_PAYMENTS_KEY).await {
            match serde_json::from_str(&raw) {
                Ok(planned) => state.planned = planned,
                Err(err) => tracing::warn!(error = %err, "ignoring malformed planned-payments record"),
            }
        }

        state.permission = match self.capability.permission_status().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "permission query failed");
                PermissionStatus::Undetermined
            }
        };

        state.initialized = true;

        self.reconcile_locked(state).await;
        self.persist_planned(&state.planned).await;
    }

    /// Flips the master switch. Turning it off cancels every scheduled
    /// notification and clears the handles; turning it on re-derives the
    /// schedule for every enabled entry.
    pub async fn set_global_enabled(&self, value: bool) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.settings.is_enabled = value;

        if !value {
            if let Err(err) = self.capability.cancel_all().await {
                tracing::warn!(error = %err, "cancel-all failed");
            }
            for entry in &mut state.planned {
                entry.notification_handle = None;
            }
        } else if state.settings.prefs.planned {
            self.reschedule_all(state).await;
        }

        self.persist_enabled(value).await;
        self.persist_planned(&state.planned).await;
    }

    /// Replaces the per-category preference flags, repairing planned-entry
    /// schedules when the `planned` flag flips.
    pub async fn set_preferences(&self, prefs: NotificationPrefs) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let planned_was = state.settings.prefs.planned;
        state.settings.prefs = prefs;

        if state.settings.is_enabled && planned_was != prefs.planned {
            if prefs.planned {
                self.reschedule_all(state).await;
            } else {
                for entry in &mut state.planned {
                    if let Some(handle) = entry.notification_handle.take() {
                        self.cancel_handle(handle).await;
                    }
                }
            }
            self.persist_planned(&state.planned).await;
        }

        self.persist_prefs(&state.settings.prefs).await;
    }

    /// Adds a planned payment and schedules its reminder when eligible.
    /// Returns the fresh entry id.
    pub async fn add_entry(&self, payload: NewPlannedEntry) -> String {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        let mut entry = PlannedEntry {
            id: Uuid::new_v4().to_string(),
            title: payload.title,
            amount: payload.amount.max(0.0),
            due_date: payload.due_date,
            remind_before_days: payload.remind_before_days,
            enabled: payload.enabled,
            notification_handle: None,
        };
        let snapshot = entry.clone();
        entry.notification_handle = self.schedule_entry(state, &snapshot).await;

        let id = entry.id.clone();
        state.planned.insert(0, entry);
        self.persist_planned(&state.planned).await;
        id
    }

    /// Merges a patch into an entry, cancelling the old schedule first and
    /// recomputing eligibility from the merged state. Unknown ids are
    /// ignored: the UI may race a delete and retry against stale rows.
    pub async fn update_entry(&self, id: &str, patch: EntryPatch) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(index) = state.planned.iter().position(|entry| entry.id == id) else {
            tracing::debug!(entry_id = %id, "update for unknown entry ignored");
            return;
        };

        let mut entry = state.planned[index].clone();
        if let Some(handle) = entry.notification_handle.take() {
            self.cancel_handle(handle).await;
        }

        patch.apply(&mut entry);
        entry.amount = entry.amount.max(0.0);

        let snapshot = entry.clone();
        entry.notification_handle = self.schedule_entry(state, &snapshot).await;
        state.planned[index] = entry;
        self.persist_planned(&state.planned).await;
    }

    pub async fn remove_entry(&self, id: &str) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let Some(index) = state.planned.iter().position(|entry| entry.id == id) else {
            tracing::debug!(entry_id = %id, "remove for unknown entry ignored");
            return;
        };

        let entry = state.planned.remove(index);
        if let Some(handle) = entry.notification_handle {
            self.cancel_handle(handle).await;
        }
        self.persist_planned(&state.planned).await;
    }

    pub async fn toggle_entry(&self, id: &str, enabled: bool) {
        self.update_entry(id, EntryPatch::enabled(enabled)).await;
    }

    /// Fires an immediate notice, gated by the master switch and the
    /// content's category preference. Nothing is persisted and the handle is
    /// not tracked.
    pub async fn notify_immediate(&self, notification: NotificationContent) -> Option<String> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.settings.is_enabled || !state.settings.prefs.allows(notification.kind) {
            return None;
        }
        if !self.ensure_permission(state).await {
            return None;
        }

        match self.capability.schedule_now(notification).await {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(error = %err, "immediate notification failed");
                None
            }
        }
    }

    /// One-shot reminder for a loan repay-by date. Loans are not planned
    /// entries; the returned handle is the caller's to keep or drop.
    pub async fn schedule_loan_due(&self, loan: &LoanDue) -> Option<String> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if !state.settings.is_enabled || !state.settings.prefs.loan_reminders {
            return None;
        }

        let lead = loan.remind_before_days.unwrap_or(1);
        let at = trigger::compute_trigger(loan.repay_by, lead)?;
        if !self.ensure_permission(state).await {
            return None;
        }

        match self.capability.schedule_at(at, content::loan_due(loan)).await {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(loan_id = %loan.id, error = %err, "loan reminder scheduling failed");
                None
            }
        }
    }

    /// Re-derives every schedule from the entry list: cancel everything the
    /// platform holds, then reschedule what is currently eligible. Handles
    /// are never trusted across cold starts or platform updates.
    pub async fn reconcile(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        self.reconcile_locked(state).await;
        self.persist_planned(&state.planned).await;
    }

    pub async fn entries(&self) -> Vec<PlannedEntry> {
        self.state.lock().await.planned.clone()
    }

    pub async fn settings(&self) -> NotificationSettings {
        self.state.lock().await.settings
    }

    pub async fn permission(&self) -> PermissionStatus {
        self.state.lock().await.permission
    }

    async fn reconcile_locked(&self, state: &mut EngineState) {
        self.ensure_channel(state).await;
        if let Err(err) = self.capability.cancel_all().await {
            tracing::warn!(error = %err, "cancel-all failed during reconcile");
        }
        for entry in &mut state.planned {
            entry.notification_handle = None;
        }
        if state.settings.is_enabled && state.settings.prefs.planned {
            self.reschedule_all(state).await;
        }
    }

    async fn reschedule_all(&self, state: &mut EngineState) {
        let mut planned = std::mem::take(&mut state.planned);
        for entry in &mut planned {
            if let Some(handle) = entry.notification_handle.take() {
                self.cancel_handle(handle).await;
            }
            let snapshot = entry.clone();
            entry.notification_handle = self.schedule_entry(state, &snapshot).await;
        }
        state.planned = planned;
    }

    async fn schedule_entry(&self, state: &mut EngineState, entry: &PlannedEntry) -> Option<String> {
        if !state.settings.is_enabled || !state.settings.prefs.planned || !entry.enabled {
            return None;
        }
        let at = trigger::compute_trigger(entry.due_date, entry.remind_before_days)?;
        if !self.ensure_permission(state).await {
            return None;
        }

        match self
            .capability
            .schedule_at(at, content::planned_payment(entry))
            .await
        {
            Ok(handle) => Some(handle),
            Err(err) => {
                tracing::warn!(entry_id = %entry.id, error = %err, "reminder scheduling failed");
                None
            }
        }
    }

    async fn ensure_channel(&self, state: &mut EngineState) {
        if state.channel_ready {
            return;
        }
        match self.capability.register_channel(ChannelConfig::payments()).await {
            Ok(()) => state.channel_ready = true,
            Err(err) => tracing::warn!(error = %err, "notification channel registration failed"),
        }
    }

    async fn ensure_permission(&self, state: &mut EngineState) -> bool {
        let mut status = match self.capability.permission_status().await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(error = %err, "permission query failed");
                PermissionStatus::Undetermined
            }
        };
        if !status.is_granted() {
            status = match self.capability.request_permission().await {
                Ok(requested) => requested,
                Err(err) => {
                    tracing::warn!(error = %err, "permission request failed");
                    status
                }
            };
        }
        state.permission = status;
        status.is_granted()
    }

    async fn cancel_handle(&self, handle: String) {
        if let Err(err) = self.capability.cancel(handle).await {
            tracing::debug!(error = %err, "cancel of scheduled reminder failed");
        }
    }

    async fn load(&self, key: &str) -> Option<String> {
        match self.store.get(key.to_string()).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "settings read failed");
                None
            }
        }
    }

    async fn persist_value(&self, key: &str, value: String) {
        if let Err(err) = self.store.set(key.to_string(), value).await {
            tracing::warn!(key, error = %err, "settings write failed");
        }
    }

    async fn persist_enabled(&self, enabled: bool) {
        self.persist_value(NOTIF_ENABLED_KEY, enabled.to_string()).await;
    }

    async fn persist_prefs(&self, prefs: &NotificationPrefs) {
        match serde_json::to_string(prefs) {
            Ok(raw) => self.persist_value(NOTIF_PREFS_KEY, raw).await,
            Err(err) => tracing::warn!(error = %err, "prefs serialization failed"),
        }
    }

    async fn persist_planned(&self, planned: &[PlannedEntry]) {
        match serde_json::to_string(planned) {
            Ok(raw) => self.persist_value(PLANNED_PAYMENTS_KEY, raw).await,
            Err(err) => tracing::warn!(error = %err, "planned-payments serialization failed"),
        }
    }
}

/// Periodic reconciliation for long-lived processes. The first interval tick
/// fires immediately and is skipped; `initialize` already reconciled.
pub fn spawn_reconcile_loop(engine: ReminderEngine, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            engine.reconcile().await;
        }
    })
}

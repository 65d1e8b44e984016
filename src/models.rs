use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_lead_days() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReminderKind {
    #[serde(rename = "planned")]
    Planned,
    #[serde(rename = "tx")]
    TxAlert,
    #[serde(rename = "loan-reminder")]
    LoanReminder,
}

impl ReminderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::TxAlert => "tx",
            Self::LoanReminder => "loan-reminder",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        }
    }

    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// A user-defined payment obligation with an active-reminder lifecycle.
/// `notification_handle` is present exactly while the platform holds a
/// scheduled trigger for this entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedEntry {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: f64,
    pub due_date: NaiveDateTime,
    #[serde(default = "default_lead_days")]
    pub remind_before_days: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPlannedEntry {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub amount: f64,
    pub due_date: NaiveDateTime,
    #[serde(default = "default_lead_days")]
    pub remind_before_days: u32,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Partial update for a planned entry. Absent fields keep their current
/// value; the merge in `apply` is exhaustive over the mutable field set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind_before_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl EntryPatch {
    pub fn apply(&self, entry: &mut PlannedEntry) {
        let Self {
            title,
            amount,
            due_date,
            remind_before_days,
            enabled,
        } = self;
        if let Some(title) = title {
            entry.title = title.clone();
        }
        if let Some(amount) = amount {
            entry.amount = *amount;
        }
        if let Some(due_date) = due_date {
            entry.due_date = *due_date;
        }
        if let Some(remind_before_days) = remind_before_days {
            entry.remind_before_days = *remind_before_days;
        }
        if let Some(enabled) = enabled {
            entry.enabled = *enabled;
        }
    }

    pub fn enabled(value: bool) -> Self {
        Self {
            enabled: Some(value),
            ..Self::default()
        }
    }
}

/// Per-category reminder switches. Each field deserializes independently so
/// a prefs blob written by an older build merges over the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPrefs {
    #[serde(default = "default_true")]
    pub planned: bool,
    #[serde(default = "default_true")]
    pub tx_alerts: bool,
    #[serde(default = "default_true")]
    pub loan_reminders: bool,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            planned: true,
            tx_alerts: true,
            loan_reminders: true,
        }
    }
}

impl NotificationPrefs {
    pub fn allows(&self, kind: ReminderKind) -> bool {
        match kind {
            ReminderKind::Planned => self.planned,
            ReminderKind::TxAlert => self.tx_alerts,
            ReminderKind::LoanReminder => self.loan_reminders,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub is_enabled: bool,
    pub prefs: NotificationPrefs,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            is_enabled: true,
            prefs: NotificationPrefs::default(),
        }
    }
}

/// Payload handed to the platform for both scheduled and immediate notices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
    pub kind: ReminderKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelImportance {
    Max,
    High,
    Default,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelConfig {
    pub id: String,
    pub name: String,
    pub importance: ChannelImportance,
    pub vibration_pattern: Vec<u64>,
}

impl ChannelConfig {
    /// The single channel all finance reminders are delivered on.
    pub fn payments() -> Self {
        Self {
            id: "payments".to_string(),
            name: "Payments & Finance".to_string(),
            importance: ChannelImportance::High,
            vibration_pattern: vec![0, 250, 250, 250],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Income,
    Expense,
    Loan,
}

/// Domain event raised after a transaction is recorded. `amount` keeps its
/// sign: income positive, expense and loan outflows negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEvent {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub amount: f64,
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoanDirection {
    Given,
    Taken,
}

/// Domain event for a loan recorded with a repay-by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanDue {
    pub id: String,
    pub amount: f64,
    pub direction: LoanDirection,
    pub repay_by: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remind_before_days: Option<u32>,
}

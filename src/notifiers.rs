use crate::content;
use crate::engine::ReminderEngine;
use crate::models::{LoanDue, TransactionEvent};

/// Fires a "transaction added" notice. Delivery is fire-and-forget; the
/// engine drops it when transaction alerts are off.
pub async fn notify_transaction_added(engine: &ReminderEngine, event: &TransactionEvent) {
    engine.notify_immediate(content::transaction_added(event)).await;
}

/// Schedules a one-shot reminder ahead of a loan's repay-by date. Returns
/// the handle when a reminder was actually scheduled.
pub async fn schedule_loan_reminder(engine: &ReminderEngine, loan: &LoanDue) -> Option<String> {
    engine.schedule_loan_due(loan).await
}

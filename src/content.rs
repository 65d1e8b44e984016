use crate::models::{
    LoanDirection, LoanDue, NotificationContent, PlannedEntry, ReminderKind, TransactionEvent,
    TransactionKind,
};

const CURRENCY_LABEL: &str = "LKR";
const SEPARATOR: &str = " \u{2022} ";

/// Renders a magnitude with thousands separators, keeping two decimals only
/// when the amount has a fractional part.
pub fn format_amount(amount: f64) -> String {
    let magnitude = amount.abs();
    let whole = magnitude.trunc() as u64;
    let fraction = magnitude.fract();

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if fraction > f64::EPSILON {
        format!("{}.{:02}", grouped, (fraction * 100.0).round() as u64)
    } else {
        grouped
    }
}

pub fn planned_payment(entry: &PlannedEntry) -> NotificationContent {
    let title = if entry.title.is_empty() {
        "Payment"
    } else {
        entry.title.as_str()
    };
    NotificationContent {
        title: "Upcoming payment".to_string(),
        body: format!(
            "{title}{SEPARATOR}{CURRENCY_LABEL} {}{SEPARATOR}Due {}",
            format_amount(entry.amount),
            entry.due_date.format("%Y-%m-%d"),
        ),
        kind: ReminderKind::Planned,
        reference_id: Some(entry.id.clone()),
    }
}

pub fn transaction_added(event: &TransactionEvent) -> NotificationContent {
    let title = if event.amount >= 0.0 {
        "Income added"
    } else if event.kind == TransactionKind::Loan {
        "Loan recorded"
    } else {
        "Expense added"
    };

    let mut fragments = vec![format!("{CURRENCY_LABEL} {}", format_amount(event.amount))];
    if let Some(category) = event.category.as_deref().filter(|value| !value.is_empty()) {
        fragments.push(category.to_string());
    }
    if let Some(label) = event.title.as_deref().filter(|value| !value.is_empty()) {
        fragments.push(label.to_string());
    }

    NotificationContent {
        title: title.to_string(),
        body: fragments.join(SEPARATOR),
        kind: ReminderKind::TxAlert,
        reference_id: Some(event.id.clone()),
    }
}

pub fn loan_due(loan: &LoanDue) -> NotificationContent {
    let side = match loan.direction {
        LoanDirection::Given => "Receivable",
        LoanDirection::Taken => "Payable",
    };
    NotificationContent {
        title: "Loan due reminder".to_string(),
        body: format!(
            "{side}{SEPARATOR}{CURRENCY_LABEL} {}{SEPARATOR}Due {}",
            format_amount(loan.amount),
            loan.repay_by.format("%Y-%m-%d"),
        ),
        kind: ReminderKind::LoanReminder,
        reference_id: Some(loan.id.clone()),
    }
}

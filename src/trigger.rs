use chrono::{Days, Local, NaiveDateTime, NaiveTime};

const REMINDER_HOUR: u32 = 9;

/// Computes the instant a reminder should fire for an obligation due at
/// `due`: `remind_before_days` whole days earlier, pinned to 09:00 local.
/// Returns `None` when that instant is at or before `now`, or when the date
/// arithmetic underflows.
pub fn reminder_instant(
    due: NaiveDateTime,
    remind_before_days: u32,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let date = due
        .date()
        .checked_sub_days(Days::new(u64::from(remind_before_days)))?;
    let at = date.and_time(NaiveTime::from_hms_opt(REMINDER_HOUR, 0, 0)?);
    if at <= now {
        return None;
    }
    Some(at)
}

/// `reminder_instant` evaluated against the wall clock.
pub fn compute_trigger(due: NaiveDateTime, remind_before_days: u32) -> Option<NaiveDateTime> {
    reminder_instant(due, remind_before_days, Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::reminder_instant;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn fires_lead_days_before_due_at_nine() {
        let trigger = reminder_instant(at(2025, 3, 10, 0), 2, at(2025, 3, 1, 12));
        assert_eq!(trigger, Some(at(2025, 3, 8, 9)));
    }

    #[test]
    fn zero_lead_days_pins_the_due_date_itself() {
        let trigger = reminder_instant(at(2025, 3, 10, 23), 0, at(2025, 3, 1, 0));
        assert_eq!(trigger, Some(at(2025, 3, 10, 9)));
    }

    #[test]
    fn no_trigger_when_instant_already_passed() {
        assert_eq!(reminder_instant(at(2025, 3, 10, 0), 2, at(2025, 3, 9, 0)), None);
    }

    #[test]
    fn no_trigger_at_the_exact_instant() {
        assert_eq!(reminder_instant(at(2025, 3, 10, 0), 2, at(2025, 3, 8, 9)), None);
    }

    #[test]
    fn lead_crosses_month_boundary() {
        let trigger = reminder_instant(at(2025, 3, 2, 0), 5, at(2025, 2, 1, 0));
        assert_eq!(trigger, Some(at(2025, 2, 25, 9)));
    }

    #[test]
    fn fires_later_the_same_day_when_nine_is_still_ahead() {
        let trigger = reminder_instant(at(2025, 3, 10, 0), 2, at(2025, 3, 8, 7));
        assert_eq!(trigger, Some(at(2025, 3, 8, 9)));
    }
}

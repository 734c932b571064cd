use chrono::{Days, Months, NaiveDate};
use crate::models::Recurrence;

/// Computes the due date of the next occurrence of a recurring task.
///
/// - `Daily` / `Weekly`: plus 1 / 7 calendar days.
/// - `Monthly`: plus one calendar month; days past the end of the target
///   month clamp to its last day (2024-01-31 -> 2024-02-29).
/// - `None`: the input date, unchanged.
///
/// Returns `None` when there is no current date, or when the result would fall
/// outside the representable calendar. Callers must not create a successor then.
pub fn next_due_date(current: Option<NaiveDate>, recurrence: Recurrence) -> Option<NaiveDate> {
    let current = current?;
    match recurrence {
        Recurrence::None => Some(current),
        Recurrence::Daily => current.checked_add_days(Days::new(1)),
        Recurrence::Weekly => current.checked_add_days(Days::new(7)),
        Recurrence::Monthly => current.checked_add_months(Months::new(1)),
    }
}

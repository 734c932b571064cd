use tasklane::models::Recurrence;
use tasklane::recurrence::next_due_date;
use chrono::NaiveDate;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_daily_and_weekly() {
    assert_eq!(next_due_date(Some(date(2024, 12, 31)), Recurrence::Daily), Some(date(2025, 1, 1)));
    assert_eq!(next_due_date(Some(date(2024, 2, 26)), Recurrence::Weekly), Some(date(2024, 3, 4)));
}

#[test]
fn test_monthly_clamps_to_month_end() {
    // Leap year: Jan 31 lands on Feb 29, not in March
    assert_eq!(next_due_date(Some(date(2024, 1, 31)), Recurrence::Monthly), Some(date(2024, 2, 29)));
    assert_eq!(next_due_date(Some(date(2023, 1, 31)), Recurrence::Monthly), Some(date(2023, 2, 28)));
    assert_eq!(next_due_date(Some(date(2024, 3, 15)), Recurrence::Monthly), Some(date(2024, 4, 15)));
}

#[test]
fn test_none_keeps_date() {
    let d = date(2024, 5, 5);
    assert_eq!(next_due_date(Some(d), Recurrence::None), Some(d));
}

#[test]
fn test_missing_date_yields_nothing() {
    for r in [Recurrence::None, Recurrence::Daily, Recurrence::Weekly, Recurrence::Monthly] {
        assert_eq!(next_due_date(None, r), None);
    }
}

#[test]
fn test_deterministic() {
    let d = Some(date(2024, 8, 31));
    assert_eq!(next_due_date(d, Recurrence::Monthly), next_due_date(d, Recurrence::Monthly));
}

#[test]
fn test_end_of_calendar() {
    assert_eq!(next_due_date(Some(NaiveDate::MAX), Recurrence::Daily), None);
}

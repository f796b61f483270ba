use chrono::{Days, NaiveDate};

fn yesterday(today: NaiveDate) -> Option<NaiveDate> {
    today.checked_sub_days(Days::new(1))
}

/// Streak after recording activity on `today`.
pub fn next_streak(current: i32, last_active: Option<NaiveDate>, today: NaiveDate) -> i32 {
    match last_active {
        Some(day) if day == today => current.max(1),
        Some(day) if Some(day) == yesterday(today) => current.max(0) + 1,
        _ => 1,
    }
}

/// Streak as it should be displayed on `today`, without recording activity.
///
/// A stored streak is only alive while the last activity was today or
/// yesterday.
pub fn effective_streak(current: i32, last_active: Option<NaiveDate>, today: NaiveDate) -> i32 {
    match last_active {
        Some(day) if day == today || Some(day) == yesterday(today) => current,
        _ => 0,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_activity_starts_streak() {
        assert_eq!(next_streak(0, None, date(2024, 5, 1)), 1);
    }

    #[test]
    fn same_day_keeps_streak() {
        let today = date(2024, 5, 1);
        assert_eq!(next_streak(4, Some(today), today), 4);
        assert_eq!(next_streak(0, Some(today), today), 1);
    }

    #[test]
    fn consecutive_day_increments() {
        assert_eq!(next_streak(4, Some(date(2024, 4, 30)), date(2024, 5, 1)), 5);
        // across a year boundary
        assert_eq!(next_streak(9, Some(date(2023, 12, 31)), date(2024, 1, 1)), 10);
    }

    #[test]
    fn gap_resets() {
        assert_eq!(next_streak(12, Some(date(2024, 4, 28)), date(2024, 5, 1)), 1);
    }

    #[test]
    fn clock_going_backwards_resets() {
        assert_eq!(next_streak(3, Some(date(2024, 5, 2)), date(2024, 5, 1)), 1);
    }

    #[test]
    fn effective_streak_expires_after_missed_day() {
        let today = date(2024, 5, 10);
        assert_eq!(effective_streak(6, Some(today), today), 6);
        assert_eq!(effective_streak(6, Some(date(2024, 5, 9)), today), 6);
        assert_eq!(effective_streak(6, Some(date(2024, 5, 8)), today), 0);
        assert_eq!(effective_streak(6, None, today), 0);
    }
}

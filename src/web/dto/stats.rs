use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::entity::DailyStats;

pub const DEFAULT_HISTORY_DAYS: i64 = 7;
pub const MAX_HISTORY_DAYS: i64 = 90;

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct DailyStatsResponse {
    pub day: NaiveDate,
    pub xp_earned: i32,
    pub lessons_completed: i32,
    pub exercises_answered: i32,
    pub correct_answers: i32,
    pub time_spent: i32,
}

impl From<&DailyStats> for DailyStatsResponse {
    fn from(stats: &DailyStats) -> Self {
        Self {
            day: stats.day(),
            xp_earned: stats.xp_earned(),
            lessons_completed: stats.lessons_completed(),
            exercises_answered: stats.exercises_answered(),
            correct_answers: stats.correct_answers(),
            time_spent: stats.time_spent(),
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Number of days including today, 1 to 90.
    pub days: Option<i64>,
}

impl HistoryQuery {
    pub fn days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_HISTORY_DAYS)
            .clamp(1, MAX_HISTORY_DAYS)
    }
}

/// One entry per day, oldest first, with empty days filled in.
pub fn history_for(stats: &[DailyStats], today: NaiveDate, days: i64) -> Vec<DailyStatsResponse> {
    (0..days)
        .rev()
        .map(|back| today - chrono::Duration::days(back))
        .map(|day| {
            stats
                .iter()
                .find(|s| s.day() == day)
                .map(DailyStatsResponse::from)
                .unwrap_or_else(|| DailyStatsResponse {
                    day,
                    xp_earned: 0,
                    lessons_completed: 0,
                    exercises_answered: 0,
                    correct_answers: 0,
                    time_spent: 0,
                })
        })
        .collect()
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StatsSummaryResponse {
    pub lessons_completed: i64,
    pub exercises_answered: i64,
    pub correct_answers: i64,
    /// Correct answers over answered exercises, 0 when nothing was answered.
    pub accuracy: f64,
}

impl StatsSummaryResponse {
    pub fn new(lessons_completed: i64, exercises_answered: i64, correct_answers: i64) -> Self {
        let accuracy = if exercises_answered > 0 {
            correct_answers as f64 / exercises_answered as f64
        } else {
            0.0
        };
        Self {
            lessons_completed,
            exercises_answered,
            correct_answers,
            accuracy,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn history_days_are_clamped() {
        assert_eq!(HistoryQuery { days: None }.days(), DEFAULT_HISTORY_DAYS);
        assert_eq!(HistoryQuery { days: Some(0) }.days(), 1);
        assert_eq!(HistoryQuery { days: Some(365) }.days(), MAX_HISTORY_DAYS);
    }

    #[test]
    fn history_fills_missing_days() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let history = history_for(&[], today, 3);
        let days: Vec<_> = history.iter().map(|h| h.day).collect();
        assert_eq!(
            days,
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 8).unwrap(),
                NaiveDate::from_ymd_opt(2024, 5, 9).unwrap(),
                today,
            ]
        );
        assert!(history.iter().all(|h| h.xp_earned == 0));
    }

    #[test]
    fn accuracy_without_answers_is_zero() {
        assert_eq!(StatsSummaryResponse::new(0, 0, 0).accuracy, 0.0);
        assert_eq!(StatsSummaryResponse::new(1, 4, 3).accuracy, 0.75);
    }
}

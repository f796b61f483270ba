/// Minimal score (in percent) that counts a lesson as completed.
pub const PASS_SCORE: i32 = 70;

pub fn is_passing(score: i32) -> bool {
    score >= PASS_SCORE
}

/// XP awarded for a lesson result.
///
/// The award is proportional to `score` (a percentage) of the lesson's
/// `xp_reward`. Every earlier completion of the same lesson halves it, but a
/// passing result always earns at least 1 XP.
pub fn lesson_xp(xp_reward: i32, score: i32, previous_completions: i32) -> i32 {
    if !is_passing(score) {
        return 0;
    }

    let score = score.clamp(0, 100) as f64;
    let base = ((xp_reward.max(0) as f64) * score / 100.0).round() as i32;

    // shifting an i32 by 31+ overflows, the award is 1 long before that anyway
    let shift = previous_completions.clamp(0, 30) as u32;
    (base >> shift).max(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn failing_score_awards_nothing() {
        assert_eq!(lesson_xp(50, 0, 0), 0);
        assert_eq!(lesson_xp(50, 69, 0), 0);
    }

    #[test]
    fn award_is_proportional_to_score() {
        assert_eq!(lesson_xp(50, 100, 0), 50);
        assert_eq!(lesson_xp(50, 70, 0), 35);
        assert_eq!(lesson_xp(50, 85, 0), 43);
    }

    #[test]
    fn repeated_completions_decrease_to_floor() {
        assert_eq!(lesson_xp(40, 100, 1), 20);
        assert_eq!(lesson_xp(40, 100, 2), 10);
        assert_eq!(lesson_xp(40, 100, 5), 1);
        assert_eq!(lesson_xp(40, 100, 1000), 1);
    }

    #[test]
    fn zero_reward_still_awards_floor() {
        assert_eq!(lesson_xp(0, 100, 0), 1);
    }

    #[test]
    fn out_of_range_score_is_clamped() {
        assert_eq!(lesson_xp(10, 250, 0), 10);
    }
}

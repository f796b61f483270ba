pub const XP_PER_LEVEL: i32 = 100;

/// Levels start at 1 and grow every `XP_PER_LEVEL` points.
pub fn level_for_xp(xp: i32) -> i32 {
    1 + xp.max(0) / XP_PER_LEVEL
}

pub fn xp_to_next_level(xp: i32) -> i32 {
    XP_PER_LEVEL - xp.max(0) % XP_PER_LEVEL
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(1250), 13);
        assert_eq!(level_for_xp(-5), 1);
    }

    #[test]
    fn remaining_xp() {
        assert_eq!(xp_to_next_level(0), 100);
        assert_eq!(xp_to_next_level(130), 70);
        assert_eq!(xp_to_next_level(200), 100);
    }
}

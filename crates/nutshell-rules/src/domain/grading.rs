//! Outcome grading.

/// Success flag and margin of a graded roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    /// `difference >= 0`.
    pub success: bool,
    /// `total - target_number`.
    pub difference: i32,
}

/// Grades `total` against `target_number`. Meeting the target succeeds.
#[must_use]
pub fn grade(total: i32, target_number: i32) -> Grade {
    let difference = total.saturating_sub(target_number);
    Grade {
        success: difference >= 0,
        difference,
    }
}

/// Strikes dealt for a margin of success.
///
/// | difference | strikes |
/// |---|---|
/// | < 0 | 0 |
/// | 0–1 | 1 |
/// | 2–4 | 2 |
/// | 5–7 | 3 |
/// | ≥ 8 | 4 |
#[must_use]
pub fn strikes_for_difference(difference: i32) -> u32 {
    match difference {
        i32::MIN..=-1 => 0,
        0..=1 => 1,
        2..=4 => 2,
        5..=7 => 3,
        8.. => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strike_table_boundaries() {
        let cases = [
            (0, 1),
            (1, 1),
            (2, 2),
            (4, 2),
            (5, 3),
            (7, 3),
            (8, 4),
            (9, 4),
        ];
        for (difference, strikes) in cases {
            assert_eq!(
                strikes_for_difference(difference),
                strikes,
                "difference {difference}"
            );
        }
    }

    #[test]
    fn test_negative_difference_deals_no_strikes() {
        for difference in [-1, -2, -7, -100, i32::MIN] {
            assert_eq!(strikes_for_difference(difference), 0);
        }
    }

    #[test]
    fn test_strikes_are_monotonic() {
        let mut previous = 0;
        for difference in -20..40 {
            let strikes = strikes_for_difference(difference);
            assert!(strikes >= previous);
            previous = strikes;
        }
        assert_eq!(strikes_for_difference(i32::MAX), 4);
    }

    #[test]
    fn test_grade_success_matches_sign_of_difference() {
        for total in -5..20 {
            for target in -5..20 {
                let graded = grade(total, target);
                assert_eq!(graded.difference, total - target);
                assert_eq!(graded.success, total - target >= 0);
            }
        }
    }

    #[test]
    fn test_meeting_target_exactly_succeeds() {
        let graded = grade(8, 8);
        assert!(graded.success);
        assert_eq!(graded.difference, 0);
    }
}

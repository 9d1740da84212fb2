//! Conversion between the discrete agreement scale shown to voters and the
//! normalized values stored and compared internally.
//!
//! An election configures a scale of N points (N in 2..=5). Decision 1 is
//! full disagreement and decision N is full agreement; the points map to
//! evenly spaced values in [0, 1].

use crate::config::MIN_DECISIONS;

/// Maps a 1-indexed decision on an N-point scale to its normalized value.
///
/// Decision 1 maps to 0.0 and decision N to 1.0, with intermediate
/// decisions evenly spaced. For N = 5: 1 -> 0.0, 2 -> 0.25, 3 -> 0.5,
/// 4 -> 0.75, 5 -> 1.0.
///
/// # Panics
///
/// Panics when `decisions < 2` (a single-point scale carries no
/// information) or when `decision` lies outside `1..=decisions`. Callers
/// validate user input before converting; these are programming errors.
pub fn scale_value_to_normalized(decision: u32, decisions: u32) -> f64 {
    assert!(
        decisions >= MIN_DECISIONS,
        "a scale needs at least {} points, got {}",
        MIN_DECISIONS,
        decisions
    );
    assert!(
        decision >= 1 && decision <= decisions,
        "decision {} outside the scale 1..={}",
        decision,
        decisions
    );
    (decision - 1) as f64 / (decisions - 1) as f64
}

/// Maps a normalized value back to the nearest decision on an N-point
/// scale.
///
/// Exact inverse of [`scale_value_to_normalized`] for values produced by
/// it. Arbitrary values in [0, 1] round to the nearest decision; a value
/// exactly between two decisions rounds half up (toward the higher
/// decision).
///
/// # Panics
///
/// Panics when `decisions < 2` or when `value` lies outside [0, 1].
pub fn normalized_to_scale_value(value: f64, decisions: u32) -> u32 {
    assert!(
        decisions >= MIN_DECISIONS,
        "a scale needs at least {} points, got {}",
        MIN_DECISIONS,
        decisions
    );
    assert!(
        (0.0..=1.0).contains(&value),
        "normalized value {} outside [0, 1]",
        value
    );
    // round() is half-away-from-zero, which is half-up for non-negative
    // operands.
    (value * (decisions - 1) as f64).round() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_all_scales() {
        for decisions in 2..=5 {
            for decision in 1..=decisions {
                let normalized = scale_value_to_normalized(decision, decisions);
                assert!((0.0..=1.0).contains(&normalized));
                assert_eq!(
                    normalized_to_scale_value(normalized, decisions),
                    decision,
                    "round trip failed for {}/{}",
                    decision,
                    decisions
                );
            }
        }
    }

    #[test]
    fn five_point_spacing() {
        assert_eq!(scale_value_to_normalized(1, 5), 0.0);
        assert_eq!(scale_value_to_normalized(2, 5), 0.25);
        assert_eq!(scale_value_to_normalized(3, 5), 0.5);
        assert_eq!(scale_value_to_normalized(4, 5), 0.75);
        assert_eq!(scale_value_to_normalized(5, 5), 1.0);
    }

    #[test]
    fn two_point_spacing() {
        assert_eq!(scale_value_to_normalized(1, 2), 0.0);
        assert_eq!(scale_value_to_normalized(2, 2), 1.0);
    }

    #[test]
    fn arbitrary_values_round_to_nearest() {
        assert_eq!(normalized_to_scale_value(0.1, 5), 1);
        assert_eq!(normalized_to_scale_value(0.2, 5), 2);
        assert_eq!(normalized_to_scale_value(0.6, 5), 3);
        assert_eq!(normalized_to_scale_value(0.8, 5), 4);
        assert_eq!(normalized_to_scale_value(0.95, 5), 5);
        assert_eq!(normalized_to_scale_value(0.4, 2), 1);
        assert_eq!(normalized_to_scale_value(0.7, 2), 2);
    }

    #[test]
    fn ties_round_half_up() {
        // 0.5 on a two-point scale sits exactly between the decisions.
        assert_eq!(normalized_to_scale_value(0.5, 2), 2);
        // 0.375 and 0.625 sit exactly between decisions on a five-point
        // scale.
        assert_eq!(normalized_to_scale_value(0.375, 5), 3);
        assert_eq!(normalized_to_scale_value(0.625, 5), 4);
        // 0.25 sits between decisions 1 and 2 on a three-point scale.
        assert_eq!(normalized_to_scale_value(0.25, 3), 2);
    }

    #[test]
    #[should_panic(expected = "at least 2 points")]
    fn single_point_scale_rejected() {
        scale_value_to_normalized(1, 1);
    }

    #[test]
    #[should_panic(expected = "at least 2 points")]
    fn single_point_scale_rejected_on_inverse() {
        normalized_to_scale_value(0.0, 1);
    }

    #[test]
    #[should_panic(expected = "outside the scale")]
    fn decision_zero_rejected() {
        scale_value_to_normalized(0, 5);
    }

    #[test]
    #[should_panic(expected = "outside the scale")]
    fn decision_above_scale_rejected() {
        scale_value_to_normalized(6, 5);
    }

    #[test]
    #[should_panic(expected = "outside [0, 1]")]
    fn value_above_one_rejected() {
        normalized_to_scale_value(1.01, 5);
    }

    #[test]
    #[should_panic(expected = "outside [0, 1]")]
    fn negative_value_rejected() {
        normalized_to_scale_value(-0.01, 5);
    }
}

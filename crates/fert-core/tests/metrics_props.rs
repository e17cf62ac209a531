use fert_core::{compute_metrics, validate_token, FertError, TokenRecord};
use proptest::prelude::*;

fn token(start: u64, end: u64) -> TokenRecord {
    TokenRecord {
        id: end,
        supply: 1,
        humidity: 5.0,
        start_progress: start,
        end_progress: end,
        season: 6074,
    }
}

#[test]
fn reference_token_metrics() {
    let metrics = compute_metrics(&token(0, 6_000_000), 3_013_244).expect("metrics");
    assert_eq!(metrics.remaining, 2_986_756);
    assert!((metrics.completion - 0.502207).abs() < 1e-6);
    assert!(metrics.observed_at.is_none());
}

#[test]
fn degenerate_token_is_rejected() {
    let err = compute_metrics(&token(6_000_000, 6_000_000), 1).expect_err("degenerate");
    assert!(matches!(err, FertError::Token(_)));
    assert_eq!(err.code(), "fert_core.token_degenerate");
}

#[test]
fn ceiling_mismatch_is_rejected() {
    let mut record = token(0, 100);
    record.id = 99;
    assert_eq!(
        validate_token(&record).expect_err("mismatch").code(),
        "fert_core.token_ceiling"
    );
}

#[test]
fn inverted_range_is_rejected() {
    let mut record = token(200, 100);
    record.id = 100;
    assert_eq!(
        validate_token(&record).expect_err("inverted").code(),
        "fert_core.token_range"
    );
}

#[test]
fn negative_humidity_is_rejected() {
    let mut record = token(0, 100);
    record.humidity = -1.0;
    assert_eq!(
        validate_token(&record).expect_err("humidity").code(),
        "fert_core.token_humidity"
    );
}

proptest! {
    #[test]
    fn remaining_is_non_increasing(start in 0u64..1_000_000_000, span in 1u64..1_000_000_000, a in 0u64..3_000_000_000, b in 0u64..3_000_000_000) {
        let record = token(start, start + span);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo.max(start);
        let hi = hi.max(lo);
        let at_lo = compute_metrics(&record, lo).unwrap();
        let at_hi = compute_metrics(&record, hi).unwrap();
        prop_assert!(at_hi.remaining <= at_lo.remaining);
        prop_assert_eq!(at_lo.remaining, (start + span).saturating_sub(lo));
    }

    #[test]
    fn completion_endpoints_are_exact(start in 0u64..(1u64 << 52), span in 1u64..(1u64 << 40)) {
        let record = token(start, start + span);
        let at_start = compute_metrics(&record, start).unwrap();
        let at_end = compute_metrics(&record, start + span).unwrap();
        prop_assert_eq!(at_start.completion, 0.0);
        prop_assert_eq!(at_end.completion, 1.0);
        prop_assert_eq!(at_end.remaining, 0);
    }
}

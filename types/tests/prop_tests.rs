use proptest::prelude::*;

use assize_types::{AdjudicationParams, Amount, BasisPoints, ContentHash, Timestamp};

proptest! {
    /// Scaling by any valid fraction never exceeds the original amount.
    #[test]
    fn mul_bps_never_exceeds_amount(raw in 0u128..u128::MAX, bps in 0u16..=10_000) {
        let amount = Amount::new(raw);
        let scaled = amount.mul_bps_floor(BasisPoints::new(bps).unwrap());
        prop_assert!(scaled <= amount);
    }

    /// mul_bps_floor agrees with naive arithmetic where naive arithmetic cannot overflow.
    #[test]
    fn mul_bps_matches_naive(raw in 0u128..1_000_000_000_000, bps in 0u16..=10_000) {
        let scaled = Amount::new(raw).mul_bps_floor(BasisPoints::new(bps).unwrap());
        prop_assert_eq!(scaled.raw(), raw * bps as u128 / 10_000);
    }

    /// BasisPoints::new accepts exactly 0..=10_000.
    #[test]
    fn bps_range(raw in any::<u16>()) {
        prop_assert_eq!(BasisPoints::new(raw).is_some(), raw <= 10_000);
    }

    /// ContentHash::is_zero is true only for all-zero bytes.
    #[test]
    fn content_hash_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        let hash = ContentHash::new(bytes);
        prop_assert_eq!(hash.is_zero(), bytes == [0u8; 32]);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        prop_assert_eq!(Timestamp::new(a) <= Timestamp::new(b), a <= b);
    }

    /// window_passed is false up to and including the boundary instant.
    #[test]
    fn window_boundary_inclusive(start in 0u64..1_000_000, window in 0u64..1_000_000) {
        let t = Timestamp::new(start);
        prop_assert!(!t.window_passed(window, Timestamp::new(start + window)));
        prop_assert!(t.window_passed(window, Timestamp::new(start + window + 1)));
    }

    /// Required votes always lie within 1..=jury_size.
    #[test]
    fn required_votes_bounded(size in 1u32..100, quorum in 1u32..=10_000) {
        let params = AdjudicationParams { consensus_quorum_bps: quorum, ..AdjudicationParams::default() };
        let required = params.required_votes(size);
        prop_assert!(required >= 1 && required <= size);
    }

    /// Appeal juries are never smaller than the original jury.
    #[test]
    fn appeal_jury_not_smaller(original in 1u32..40, requested in proptest::option::of(0u32..40)) {
        let params = AdjudicationParams::default();
        prop_assert!(params.appeal_jury_size(original, requested) >= original);
    }
}

//! Per-block rate annualization.
//!
//! `apy = ((rate_per_block / 1e18 + 1) ^ blocks_per_year - 1) * 100`
//!
//! This is the compounding formula Compound documents for its v2 markets.
//! It is evaluated in `f64`: the result is a display figure, not a
//! settlement amount, and very large rates overflow to `+inf`.

/// Fixed-point scale of cToken rate mantissas.
pub const RATE_MANTISSA_SCALE: f64 = 1e18;

/// Blocks per minute assumed when no cadence is configured.
pub const DEFAULT_BLOCKS_PER_MINUTE: u32 = 4;

const MINUTES_PER_YEAR: u64 = 60 * 24 * 365;

/// Block production cadence used to compound a per-block rate over a year.
///
/// The cadence is an assumption about the target chain. If the chain's real
/// block time drifts from it, the APY figures drift with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCadence {
    blocks_per_minute: u32,
}

impl BlockCadence {
    /// Create a cadence from a blocks-per-minute figure.
    #[must_use]
    pub const fn new(blocks_per_minute: u32) -> Self {
        Self { blocks_per_minute }
    }

    /// Blocks produced per minute.
    #[must_use]
    pub const fn blocks_per_minute(&self) -> u32 {
        self.blocks_per_minute
    }

    /// Blocks produced per 365-day year.
    #[must_use]
    pub const fn blocks_per_year(&self) -> u64 {
        self.blocks_per_minute as u64 * MINUTES_PER_YEAR
    }
}

impl Default for BlockCadence {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKS_PER_MINUTE)
    }
}

/// Annualize a per-block rate mantissa into an APY percentage.
///
/// `rate_per_block_scaled` is the raw `supplyRatePerBlock` /
/// `borrowRatePerBlock` value (rate × 1e18).
#[must_use]
pub fn annualize(rate_per_block_scaled: u128, cadence: BlockCadence) -> f64 {
    let rate_per_block = rate_per_block_scaled as f64 / RATE_MANTISSA_SCALE;
    let blocks_per_year = cadence.blocks_per_year() as f64;

    ((rate_per_block + 1.0).powf(blocks_per_year) - 1.0) * 100.0
}

/// Render a percentage with two decimals.
///
/// Overflowed values render as `Infinity`.
#[must_use]
pub fn format_percent(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else if value.is_sign_negative() {
        "-Infinity".to_string()
    } else {
        "Infinity".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_cadence_is_four_blocks_per_minute() {
        let cadence = BlockCadence::default();
        assert_eq!(cadence.blocks_per_minute(), 4);
        assert_eq!(cadence.blocks_per_year(), 2_102_400);
    }

    #[test]
    fn zero_rate_yields_zero_apy() {
        let apy = annualize(0, BlockCadence::default());
        assert_eq!(apy, 0.0);
        assert_eq!(format_percent(apy), "0.00");
    }

    /// Largest per-block mantissa whose APY is still finite at 4 blocks/minute.
    const LAST_FINITE_RATE: u128 = 335_471_755_931_071;

    #[test]
    fn matches_direct_formula() {
        let rate: u128 = 100_000_000_000; // 1e11
        let expected = ((1e11_f64 / 1e18 + 1.0).powf(2_102_400.0) - 1.0) * 100.0;

        let apy = annualize(rate, BlockCadence::default());
        assert!(apy.is_finite());
        assert_eq!(apy, expected);
        // e^0.21024 - 1
        assert!((apy - 23.397).abs() < 0.01, "apy = {apy}");
    }

    #[test]
    fn one_tenth_percent_per_block_overflows() {
        let apy = annualize(1_000_000_000_000_000, BlockCadence::default()); // 1e15
        assert!(apy.is_infinite());
        assert_eq!(format_percent(apy), "Infinity");
    }

    #[test]
    fn finite_up_to_overflow_boundary() {
        let cadence = BlockCadence::default();
        assert!(annualize(LAST_FINITE_RATE, cadence).is_finite());
        assert!(annualize(LAST_FINITE_RATE + 1, cadence).is_infinite());
    }

    #[test]
    fn realistic_usdc_rate() {
        // ~0.0000000095 per block, which compounds to roughly 2% a year
        let apy = annualize(9_500_000_000, BlockCadence::default());
        assert!(apy > 1.9 && apy < 2.1, "apy = {apy}");
        assert_eq!(format_percent(apy).len(), 4);
    }

    #[test]
    fn huge_rate_overflows_to_infinity() {
        let apy = annualize(u128::MAX, BlockCadence::default());
        assert!(apy.is_infinite());
        assert_eq!(format_percent(apy), "Infinity");
    }

    #[test]
    fn cadence_changes_result() {
        let rate = 10_000_000_000;
        let slow = annualize(rate, BlockCadence::new(4));
        let fast = annualize(rate, BlockCadence::new(5));
        assert!(fast > slow);
    }

    #[test]
    fn format_percent_rounds_to_two_decimals() {
        assert_eq!(format_percent(3.14159), "3.14");
        assert_eq!(format_percent(2.0), "2.00");
        assert_eq!(format_percent(f64::NEG_INFINITY), "-Infinity");
    }

    proptest! {
        #[test]
        fn apy_is_never_negative(rate in any::<u128>()) {
            prop_assert!(annualize(rate, BlockCadence::default()) >= 0.0);
        }

        #[test]
        fn apy_is_monotonic(a in 0u128..=LAST_FINITE_RATE, b in 0u128..=LAST_FINITE_RATE) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let cadence = BlockCadence::default();
            let (low_apy, high_apy) = (annualize(low, cadence), annualize(high, cadence));
            prop_assert!(low_apy.is_finite() && high_apy.is_finite());
            prop_assert!(low_apy <= high_apy);
        }

        #[test]
        fn apy_stays_infinite_past_overflow(rate in (LAST_FINITE_RATE + 1)..u128::MAX) {
            prop_assert!(annualize(rate, BlockCadence::default()).is_infinite());
        }

        #[test]
        fn annualize_is_pure(rate in any::<u64>(), blocks_per_minute in 1u32..60) {
            let cadence = BlockCadence::new(blocks_per_minute);
            let first = annualize(u128::from(rate), cadence);
            let second = annualize(u128::from(rate), cadence);
            prop_assert_eq!(first.to_bits(), second.to_bits());
        }
    }
}

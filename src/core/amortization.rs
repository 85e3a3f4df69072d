//! Level-payment loan maths with monthly compounding.

const RATE_EPSILON: f64 = 1e-12;

fn periods(years: u32) -> u32 {
    years.saturating_mul(12)
}

/// Monthly payment on a fixed-rate loan of `principal` over `years`.
///
/// Falls back to straight-line repayment when the rate is zero and returns 0
/// for a zero-length term.
pub fn monthly_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let n = periods(years);
    if n == 0 {
        return 0.0;
    }
    let r = annual_rate / 12.0;
    if r.abs() < RATE_EPSILON {
        return principal / n as f64;
    }

    let growth = (1.0 + r).powf(n as f64);
    if !growth.is_finite() {
        // Very long terms: the payment tends to pure interest.
        return principal * r;
    }
    let denom = growth - 1.0;
    if denom.abs() < RATE_EPSILON {
        return principal / n as f64;
    }
    principal * r * growth / denom
}

/// Largest principal a monthly budget of `max_payment` can service.
/// Inverse of [`monthly_payment`].
pub fn max_principal_from_payment(max_payment: f64, annual_rate: f64, years: u32) -> f64 {
    let n = periods(years);
    if n == 0 || max_payment <= 0.0 {
        return 0.0;
    }
    let r = annual_rate / 12.0;
    if r.abs() < RATE_EPSILON {
        return max_payment * n as f64;
    }

    let growth = (1.0 + r).powf(n as f64);
    if !growth.is_finite() {
        return max_payment / r;
    }
    let denom = r * growth;
    if denom.abs() < RATE_EPSILON {
        return max_payment * n as f64;
    }
    max_payment * (growth - 1.0) / denom
}

/// Interest paid over the full term, never negative.
pub fn total_interest(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let n = periods(years) as f64;
    (monthly_payment(principal, annual_rate, years) * n - principal).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    #[test]
    fn monthly_payment_matches_standard_thirty_year_mortgage() {
        assert_approx_tol(monthly_payment(210_000.0, 0.03, 30), 885.368, 0.01);
        assert_approx_tol(monthly_payment(200_000.0, 0.03, 30), 843.208, 0.01);
    }

    #[test]
    fn zero_rate_is_straight_line() {
        assert_approx_tol(monthly_payment(120_000.0, 0.0, 10), 1_000.0, 1e-9);
        assert_approx_tol(max_principal_from_payment(1_000.0, 0.0, 10), 120_000.0, 1e-9);
    }

    #[test]
    fn zero_term_pays_nothing() {
        assert_eq!(monthly_payment(100_000.0, 0.05, 0), 0.0);
        assert_eq!(max_principal_from_payment(1_000.0, 0.05, 0), 0.0);
    }

    #[test]
    fn overflowing_term_tends_to_interest_only() {
        let payment = monthly_payment(100_000.0, 0.05, 1_000_000);
        assert!(payment.is_finite());
        assert_approx_tol(payment, 100_000.0 * 0.05 / 12.0, 1e-9);

        let principal = max_principal_from_payment(1_000.0, 0.05, 1_000_000);
        assert!(principal.is_finite());
        assert_approx_tol(principal, 1_000.0 / (0.05 / 12.0), 1e-6);

        // Continuous with the closed form just below the overflow point.
        assert_approx_tol(monthly_payment(100_000.0, 0.05, 5_000), 100_000.0 * 0.05 / 12.0, 1e-6);
        assert_approx_tol(
            max_principal_from_payment(1_000.0, 0.05, 5_000),
            1_000.0 / (0.05 / 12.0),
            1e-3,
        );
    }

    #[test]
    fn non_positive_budget_buys_no_principal() {
        assert_eq!(max_principal_from_payment(0.0, 0.03, 30), 0.0);
        assert_eq!(max_principal_from_payment(-50.0, 0.03, 30), 0.0);
    }

    #[test]
    fn total_interest_is_zero_without_rate() {
        assert_approx_tol(total_interest(90_000.0, 0.0, 15), 0.0, 1e-6);
        let interest = total_interest(210_000.0, 0.03, 30);
        assert_approx_tol(interest, 885.368_470_8 * 360.0 - 210_000.0, 0.05);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_max_principal_inverts_monthly_payment(
            principal in 0u32..3_000_000,
            rate_bp in 0u32..1_500,
            years in 1u32..=40
        ) {
            let principal = principal as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let payment = monthly_payment(principal, rate, years);
            prop_assert!(payment.is_finite() && payment >= 0.0);

            let back = max_principal_from_payment(payment, rate, years);
            prop_assert!((back - principal).abs() <= 1e-6 * principal.max(1.0));
        }

        #[test]
        fn prop_monthly_payment_is_monotone(
            principal in 0u32..2_000_000,
            extra_principal in 0u32..500_000,
            rate_bp in 0u32..1_500,
            extra_rate_bp in 0u32..500,
            years in 1u32..=40
        ) {
            let p_lo = principal as f64;
            let p_hi = p_lo + extra_principal as f64;
            let r_lo = rate_bp as f64 / 10_000.0;
            let r_hi = r_lo + extra_rate_bp as f64 / 10_000.0;

            prop_assert!(monthly_payment(p_lo, r_lo, years) <= monthly_payment(p_hi, r_lo, years) + 1e-9);
            prop_assert!(monthly_payment(p_lo, r_lo, years) <= monthly_payment(p_lo, r_hi, years) + 1e-9);
        }
    }
}

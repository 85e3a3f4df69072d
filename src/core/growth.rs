//! Annuity future value and its two inversions: for the number of periods
//! and for the periodic contribution.

use super::types::TimeToTarget;

const RATE_EPSILON: f64 = 1e-12;

/// Value after `months` periods of compounding `present_value` at
/// `monthly_rate` while adding `monthly_contribution` at each period end.
pub fn future_value(
    present_value: f64,
    monthly_contribution: f64,
    monthly_rate: f64,
    months: f64,
) -> f64 {
    let months = months.max(0.0);
    if monthly_rate.abs() < RATE_EPSILON {
        return present_value + monthly_contribution * months;
    }
    let growth = (1.0 + monthly_rate).powf(months);
    present_value * growth + monthly_contribution * (growth - 1.0) / monthly_rate
}

/// Number of months until `present_value` plus contributions reaches
/// `target_value`.
///
/// Returns `reached: true` with zero months when the target is already met,
/// and `Months::Unreachable` when the contribution is non-positive or the
/// closed form has no finite, non-negative solution.
pub fn months_to_reach(
    present_value: f64,
    monthly_contribution: f64,
    target_value: f64,
    monthly_rate: f64,
) -> TimeToTarget {
    if present_value >= target_value {
        return TimeToTarget::already_reached();
    }
    if ![present_value, monthly_contribution, target_value, monthly_rate]
        .iter()
        .all(|v| v.is_finite())
    {
        return TimeToTarget::unreachable();
    }
    if monthly_contribution <= 0.0 {
        return TimeToTarget::unreachable();
    }

    if monthly_rate.abs() < RATE_EPSILON {
        return finite_or_unreachable((target_value - present_value) / monthly_contribution);
    }
    if monthly_rate <= -1.0 {
        return TimeToTarget::unreachable();
    }

    // Shift both sides by the perpetuity value c/r so the equation becomes a
    // pure geometric growth problem.
    let anchor = monthly_contribution / monthly_rate;
    let ratio = (target_value + anchor) / (present_value + anchor);
    if !ratio.is_finite() || ratio <= 0.0 {
        return TimeToTarget::unreachable();
    }
    finite_or_unreachable(ratio.ln() / monthly_rate.ln_1p())
}

fn finite_or_unreachable(months: f64) -> TimeToTarget {
    if months.is_finite() && months >= 0.0 {
        TimeToTarget::after(months)
    } else {
        TimeToTarget::unreachable()
    }
}

/// Level monthly contribution that grows `present_value` to `target_value` in
/// exactly `months` periods. Floored at zero when growth alone gets there.
///
/// With no months left the whole outstanding gap is due immediately.
pub fn required_monthly_contribution(
    present_value: f64,
    target_value: f64,
    monthly_rate: f64,
    months: u32,
) -> f64 {
    if months == 0 {
        return (target_value - present_value).max(0.0);
    }
    let n = months as f64;
    if monthly_rate.abs() < RATE_EPSILON {
        return ((target_value - present_value) / n).max(0.0);
    }

    let growth = (1.0 + monthly_rate).powf(n);
    let denom = growth - 1.0;
    if denom.abs() < RATE_EPSILON {
        return ((target_value - present_value) / n).max(0.0);
    }
    let contribution = (target_value - present_value * growth) * monthly_rate / denom;
    if contribution.is_finite() {
        contribution.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Months;
    use proptest::prelude::{prop_assert, prop_assert_eq, prop_assume, proptest};

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn finite(t: TimeToTarget) -> f64 {
        t.months.value().expect("finite months expected")
    }

    #[test]
    fn zero_rate_solves_linearly() {
        assert_eq!(
            months_to_reach(0.0, 1_000.0, 12_000.0, 0.0),
            TimeToTarget {
                months: Months::Finite(12.0),
                reached: false,
            }
        );
    }

    #[test]
    fn zero_contribution_is_unreachable() {
        let t = months_to_reach(0.0, 0.0, 1_000.0, 0.01);
        assert_eq!(t.months, Months::Unreachable);
        assert!(!t.reached);
    }

    #[test]
    fn deficit_is_unreachable_even_with_growth() {
        let t = months_to_reach(5_000.0, -200.0, 10_000.0, 0.004);
        assert_eq!(t, TimeToTarget::unreachable());
    }

    #[test]
    fn already_at_target_returns_zero_and_reached() {
        assert_eq!(
            months_to_reach(10_000.0, -500.0, 10_000.0, -0.5),
            TimeToTarget::already_reached()
        );
    }

    #[test]
    fn compounding_shortens_the_horizon() {
        let linear = finite(months_to_reach(0.0, 500.0, 60_000.0, 0.0));
        let compounded = finite(months_to_reach(0.0, 500.0, 60_000.0, 0.05 / 12.0));
        assert_approx_tol(linear, 120.0, 1e-9);
        assert!(compounded < linear);
        assert_approx_tol(
            future_value(0.0, 500.0, 0.05 / 12.0, compounded),
            60_000.0,
            1e-6,
        );
    }

    #[test]
    fn negative_rate_below_steady_state_is_unreachable() {
        // Balance converges to c / |r| = 10_000, never 20_000.
        let t = months_to_reach(0.0, 100.0, 20_000.0, -0.01);
        assert_eq!(t.months, Months::Unreachable);

        let reachable = months_to_reach(0.0, 100.0, 5_000.0, -0.01);
        assert!(reachable.months.is_reachable());
    }

    #[test]
    fn non_finite_inputs_are_unreachable() {
        assert_eq!(
            months_to_reach(0.0, f64::NAN, 1_000.0, 0.01),
            TimeToTarget::unreachable()
        );
        assert_eq!(
            months_to_reach(0.0, 100.0, f64::INFINITY, 0.01),
            TimeToTarget::unreachable()
        );
    }

    #[test]
    fn required_contribution_handles_degenerate_terms() {
        assert_approx_tol(required_monthly_contribution(1_000.0, 4_000.0, 0.01, 0), 3_000.0, 1e-9);
        assert_approx_tol(required_monthly_contribution(0.0, 12_000.0, 0.0, 12), 1_000.0, 1e-9);
        assert_eq!(required_monthly_contribution(50_000.0, 40_000.0, 0.004, 24), 0.0);
    }

    #[test]
    fn required_contribution_is_zero_when_growth_alone_suffices() {
        // 10_000 at 1%/month for 120 months is about 33_000.
        assert_eq!(required_monthly_contribution(10_000.0, 30_000.0, 0.01, 120), 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_already_there_ignores_contribution_and_rate(
            target in 0u32..1_000_000,
            surplus in 0u32..100_000,
            contribution in -50_000i32..50_000,
            rate_bp in -500i32..500
        ) {
            let t = months_to_reach(
                target as f64 + surplus as f64,
                contribution as f64,
                target as f64,
                rate_bp as f64 / 10_000.0,
            );
            prop_assert_eq!(t, TimeToTarget::already_reached());
        }

        #[test]
        fn prop_solved_months_reproduce_target(
            present in 0u32..500_000,
            gap in 1u32..1_000_000,
            contribution in 1u32..10_000,
            rate_bp in 0u32..100
        ) {
            let pv = present as f64;
            let target = pv + gap as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let t = months_to_reach(pv, contribution as f64, target, rate);
            let months = t.months.value();
            prop_assert!(months.is_some());
            let months = months.unwrap_or_default();
            prop_assert!(months >= 0.0);
            prop_assert!(!t.reached);

            let fv = future_value(pv, contribution as f64, rate, months);
            prop_assert!((fv - target).abs() <= 1e-6 * target);
        }

        #[test]
        fn prop_required_contribution_meets_deadline(
            present in 0u32..100_000,
            gap in 1_000u32..500_000,
            rate_bp in 0u32..80,
            months in 1u32..480
        ) {
            let pv = present as f64;
            let target = pv + gap as f64;
            let rate = rate_bp as f64 / 10_000.0;
            let contribution = required_monthly_contribution(pv, target, rate, months);
            prop_assume!(contribution > 1e-6);

            let fv = future_value(pv, contribution, rate, months as f64);
            prop_assert!((fv - target).abs() <= 1e-6 * target);
        }
    }
}

use tracing::{debug, warn};

use super::amortization::{max_principal_from_payment, monthly_payment};
use super::error::EngineError;
use super::growth::months_to_reach;
use super::types::{FeasibilityResult, HouseholdFinancials, LimitingFactor, Months, MortgageConfig};

/// Affordability verdict for buying `cfg.house_price_target`.
///
/// Two ceilings bound the affordable price: the cash on hand (after the
/// emergency reserve) divided by the cash ratio, and the largest loan the DTI
/// budget can service grossed up by the financed share. When both ceilings
/// are equal and below target, `Dti` is reported as the limiting factor.
pub fn evaluate(
    financials: &HouseholdFinancials,
    cfg: &MortgageConfig,
) -> Result<FeasibilityResult, EngineError> {
    if let Err(err) = financials.validate().and_then(|()| cfg.validate()) {
        warn!(error = %err, "rejected feasibility inputs");
        return Err(err);
    }

    let household_net_income = financials.net_income();
    let available_for_goal = (financials.liquid_savings - cfg.emergency_fund_reserve).max(0.0);

    let required_cash_for_target = cfg.house_price_target * cfg.cash_ratio;
    let missing_cash_for_target = (required_cash_for_target - available_for_goal).max(0.0);

    let max_total_debt_service = household_net_income * cfg.dti_limit;
    let max_mortgage_payment = (max_total_debt_service - financials.other_debt_payments).max(0.0);
    let max_mortgage_principal =
        max_principal_from_payment(max_mortgage_payment, cfg.annual_rate, cfg.loan_years);

    let financed_share = 1.0 - cfg.cash_ratio;
    let max_by_cash = available_for_goal / cfg.cash_ratio;
    let max_by_dti = max_mortgage_principal / financed_share;
    let max_affordable_price = max_by_cash.min(max_by_dti).max(0.0);

    let limiting_factor = if max_affordable_price >= cfg.house_price_target {
        LimitingFactor::None
    } else if max_by_cash < max_by_dti {
        LimitingFactor::Cash
    } else {
        LimitingFactor::Dti
    };

    let loan_for_target = cfg.house_price_target * financed_share;
    let monthly_payment_for_target = monthly_payment(loan_for_target, cfg.annual_rate, cfg.loan_years);
    let dti_for_target = (household_net_income > 0.0).then(|| {
        (monthly_payment_for_target + financials.other_debt_payments) / household_net_income
    });

    let has_enough_cash = available_for_goal >= required_cash_for_target;
    let dti_ok = dti_for_target.is_some_and(|dti| dti <= cfg.dti_limit);

    let months_to_target = if missing_cash_for_target <= 0.0 {
        Months::Finite(0.0)
    } else {
        months_to_reach(
            available_for_goal,
            financials.avg_monthly_savings,
            required_cash_for_target,
            cfg.savings_return_rate / 12.0,
        )
        .months
    };

    let result = FeasibilityResult {
        household_net_income,
        available_for_goal,
        max_by_cash,
        max_by_dti,
        max_affordable_price,
        required_cash_for_target,
        missing_cash_for_target,
        dti_for_target,
        has_enough_cash,
        dti_ok,
        fully_ready: has_enough_cash && dti_ok,
        months_to_target,
        monthly_payment_for_target,
        limiting_factor,
    };
    debug!(
        max_affordable_price,
        limiting_factor = ?result.limiting_factor,
        fully_ready = result.fully_ready,
        "evaluated house feasibility"
    );
    Ok(result)
}

//! Retirement and safety-net figures derived from household cash flows.

use tracing::debug;

use super::error::{EngineError, ensure_non_negative, ensure_open_unit};
use super::growth::months_to_reach;
use super::types::{EmergencyFundProfile, EmergencyFundRecommendation, FireProjection};

/// The 4% rule: a portfolio of 25x annual spending.
pub const DEFAULT_SAFE_WITHDRAWAL_RATE: f64 = 0.04;
pub const DEFAULT_FIRE_REAL_RETURN: f64 = 0.05;
pub const DEFAULT_EMERGENCY_MIN_MONTHS: u32 = 3;
pub const DEFAULT_EMERGENCY_MAX_MONTHS: u32 = 6;

const LARGE_HOUSEHOLD_SIZE: u32 = 2;
const LARGE_HOUSEHOLD_MULTIPLIER: f64 = 1.25;
const VARIABLE_INCOME_MULTIPLIER: f64 = 1.5;

pub fn fire_number(annual_expenses: f64, safe_withdrawal_rate: f64) -> f64 {
    annual_expenses / safe_withdrawal_rate
}

/// Time until `investable_assets` plus the monthly surplus reach the FIRE
/// number, compounding monthly at `annual_real_return / 12`.
pub fn project_fire(
    investable_assets: f64,
    monthly_income: f64,
    monthly_expenses: f64,
    annual_real_return: f64,
    safe_withdrawal_rate: f64,
) -> Result<FireProjection, EngineError> {
    ensure_non_negative("investableAssets", investable_assets)?;
    ensure_non_negative("monthlyIncome", monthly_income)?;
    ensure_non_negative("monthlyExpenses", monthly_expenses)?;
    ensure_non_negative("annualRealReturn", annual_real_return)?;
    ensure_open_unit("safeWithdrawalRate", safe_withdrawal_rate)?;

    let annual_expenses = monthly_expenses * 12.0;
    let fire_number = fire_number(annual_expenses, safe_withdrawal_rate);
    let monthly_surplus = monthly_income - monthly_expenses;
    let time_to_fire = months_to_reach(
        investable_assets,
        monthly_surplus,
        fire_number,
        annual_real_return / 12.0,
    );
    let progress = if fire_number <= 0.0 {
        1.0
    } else {
        (investable_assets / fire_number).clamp(0.0, 1.0)
    };

    debug!(fire_number, monthly_surplus, months = ?time_to_fire.months, "projected fire");
    Ok(FireProjection {
        annual_expenses,
        fire_number,
        monthly_surplus,
        time_to_fire,
        progress,
    })
}

pub fn emergency_risk_multiplier(profile: &EmergencyFundProfile) -> f64 {
    let mut multiplier = 1.0;
    if profile.household_size > LARGE_HOUSEHOLD_SIZE {
        multiplier *= LARGE_HOUSEHOLD_MULTIPLIER;
    }
    if profile.variable_income {
        multiplier *= VARIABLE_INCOME_MULTIPLIER;
    }
    multiplier
}

pub fn recommend_emergency_fund(
    profile: &EmergencyFundProfile,
    min_months: u32,
    max_months: u32,
) -> Result<EmergencyFundRecommendation, EngineError> {
    ensure_non_negative("fixedCosts", profile.fixed_costs)?;
    if min_months == 0 {
        return Err(EngineError::invalid("emergencyMinMonths", "must be > 0"));
    }
    if max_months < min_months {
        return Err(EngineError::invalid(
            "emergencyMaxMonths",
            "must be >= emergencyMinMonths",
        ));
    }

    let risk_multiplier = emergency_risk_multiplier(profile);
    Ok(EmergencyFundRecommendation {
        risk_multiplier,
        minimum: profile.fixed_costs * min_months as f64 * risk_multiplier,
        maximum: profile.fixed_costs * max_months as f64 * risk_multiplier,
    })
}

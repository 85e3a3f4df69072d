use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{EngineError, ensure_non_negative, ensure_open_unit};

/// Slack subtracted before rounding a month count up.
pub(crate) const MONTH_EPSILON: f64 = 1e-9;

/// Rounds a non-negative month count up to whole months without turning
/// float noise such as 10.000000000000002 into an extra month.
pub(crate) fn ceil_months(months: f64) -> f64 {
    (months - MONTH_EPSILON).ceil().max(0.0)
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStream {
    pub name: String,
    pub monthly_amount: f64,
}

/// Snapshot of a household's monthly cash flows and balances.
///
/// All monetary fields are non-negative except `avg_monthly_savings`, which
/// goes negative when the household runs a deficit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdFinancials {
    pub income_streams: Vec<IncomeStream>,
    pub fixed_costs: f64,
    #[serde(default)]
    pub other_debt_payments: f64,
    pub liquid_savings: f64,
    pub avg_monthly_savings: f64,
}

impl HouseholdFinancials {
    pub fn net_income(&self) -> f64 {
        self.income_streams.iter().map(|s| s.monthly_amount).sum()
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for stream in &self.income_streams {
            ensure_non_negative("incomeStreams.monthlyAmount", stream.monthly_amount)?;
        }
        ensure_non_negative("fixedCosts", self.fixed_costs)?;
        ensure_non_negative("otherDebtPayments", self.other_debt_payments)?;
        ensure_non_negative("liquidSavings", self.liquid_savings)?;
        if !self.avg_monthly_savings.is_finite() {
            return Err(EngineError::invalid("avgMonthlySavings", "must be finite"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageConfig {
    pub emergency_fund_reserve: f64,
    pub house_price_target: f64,
    pub cash_ratio: f64,
    pub dti_limit: f64,
    pub annual_rate: f64,
    pub loan_years: u32,
    #[serde(default)]
    pub savings_return_rate: f64,
}

impl MortgageConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        ensure_non_negative("emergencyFundReserve", self.emergency_fund_reserve)?;
        ensure_non_negative("housePriceTarget", self.house_price_target)?;
        ensure_open_unit("cashRatio", self.cash_ratio)?;
        ensure_open_unit("dtiLimit", self.dti_limit)?;
        ensure_non_negative("annualRate", self.annual_rate)?;
        ensure_non_negative("savingsReturnRate", self.savings_return_rate)?;
        if self.loan_years == 0 {
            return Err(EngineError::invalid("loanYears", "must be > 0"));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitingFactor {
    Cash,
    Dti,
    None,
}

/// A month count that may be infinite.
///
/// `Unreachable` replaces the infinities and NaNs a naive logarithm would
/// produce, so callers have to branch on it explicitly.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", content = "months", rename_all = "camelCase")]
pub enum Months {
    Finite(f64),
    Unreachable,
}

impl Months {
    pub fn is_reachable(self) -> bool {
        matches!(self, Months::Finite(_))
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Months::Finite(m) => Some(m),
            Months::Unreachable => None,
        }
    }

    /// Rounds up to whole months. Absorbs float noise such as 12.000000001.
    pub fn whole_months(self) -> Option<u32> {
        self.value()
            .map(|m| ceil_months(m).min(u32::MAX as f64) as u32)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeToTarget {
    pub months: Months,
    pub reached: bool,
}

impl TimeToTarget {
    pub fn already_reached() -> Self {
        Self {
            months: Months::Finite(0.0),
            reached: true,
        }
    }

    pub fn after(months: f64) -> Self {
        Self {
            months: Months::Finite(months),
            reached: false,
        }
    }

    pub fn unreachable() -> Self {
        Self {
            months: Months::Unreachable,
            reached: false,
        }
    }

    pub fn projected_date(self, today: NaiveDate) -> Option<NaiveDate> {
        let months = self.months.whole_months()?;
        today.checked_add_months(chrono::Months::new(months))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeasibilityResult {
    pub household_net_income: f64,
    pub available_for_goal: f64,
    pub max_by_cash: f64,
    pub max_by_dti: f64,
    pub max_affordable_price: f64,
    pub required_cash_for_target: f64,
    pub missing_cash_for_target: f64,
    /// `None` when household income is zero: the ratio is undefined and the
    /// DTI check fails.
    pub dti_for_target: Option<f64>,
    pub has_enough_cash: bool,
    pub dti_ok: bool,
    pub fully_ready: bool,
    pub months_to_target: Months,
    pub monthly_payment_for_target: f64,
    pub limiting_factor: LimitingFactor,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
}

impl Goal {
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPlan {
    pub remaining: f64,
    pub months_until_deadline: u32,
    pub monthly_contribution_required: f64,
    pub time_to_target: TimeToTarget,
    pub projected_date: Option<NaiveDate>,
    pub on_track: bool,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FireProjection {
    pub annual_expenses: f64,
    pub fire_number: f64,
    pub monthly_surplus: f64,
    pub time_to_fire: TimeToTarget,
    pub progress: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundProfile {
    pub fixed_costs: f64,
    pub household_size: u32,
    #[serde(default)]
    pub variable_income: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyFundRecommendation {
    pub risk_multiplier: f64,
    pub minimum: f64,
    pub maximum: f64,
}

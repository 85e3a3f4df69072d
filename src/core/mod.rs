mod aggregates;
mod amortization;
mod error;
mod feasibility;
mod goals;
mod growth;
mod types;

pub use aggregates::{
    DEFAULT_EMERGENCY_MAX_MONTHS, DEFAULT_EMERGENCY_MIN_MONTHS, DEFAULT_FIRE_REAL_RETURN,
    DEFAULT_SAFE_WITHDRAWAL_RATE, emergency_risk_multiplier, fire_number, project_fire,
    recommend_emergency_fund,
};
pub use amortization::{max_principal_from_payment, monthly_payment, total_interest};
pub use error::EngineError;
pub use feasibility::evaluate;
pub use goals::{delay_months, goal_delay, months_until, plan_goal};
pub use growth::{future_value, months_to_reach, required_monthly_contribution};
pub use types::{
    EmergencyFundProfile, EmergencyFundRecommendation, FeasibilityResult, FireProjection, Goal,
    GoalPlan, HouseholdFinancials, IncomeStream, LimitingFactor, Months, MortgageConfig,
    TimeToTarget,
};

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::error::{EngineError, ensure_non_negative};
use super::growth::{months_to_reach, required_monthly_contribution};
use super::types::{Goal, GoalPlan, Months, ceil_months};

/// How long an incidental expense pushes back the main savings goal.
///
/// Deliberately linear: the expense is repaid out of plain monthly savings
/// with no compounding. Zero when the goal is already met, unreachable when
/// there is no savings capacity.
pub fn delay_months(
    expense_amount: f64,
    monthly_savings_rate: f64,
    outstanding_gap_for_main_goal: f64,
) -> Months {
    if outstanding_gap_for_main_goal <= 0.0 {
        return Months::Finite(0.0);
    }
    if !monthly_savings_rate.is_finite() || monthly_savings_rate <= 0.0 {
        return Months::Unreachable;
    }
    let months = ceil_months(expense_amount.max(0.0) / monthly_savings_rate);
    if months.is_finite() {
        Months::Finite(months)
    } else {
        Months::Unreachable
    }
}

pub fn goal_delay(expense_amount: f64, monthly_savings_rate: f64, goal: &Goal) -> Months {
    delay_months(expense_amount, monthly_savings_rate, goal.remaining())
}

/// Whole calendar months from `today` to `deadline`; 0 once the deadline has
/// passed. A month only counts once its day-of-month has been reached.
pub fn months_until(today: NaiveDate, deadline: NaiveDate) -> u32 {
    if deadline <= today {
        return 0;
    }
    let mut months = (deadline.year() - today.year()) * 12 + deadline.month() as i32
        - today.month() as i32;
    if deadline.day() < today.day() {
        months -= 1;
    }
    months.max(0) as u32
}

pub fn plan_goal(
    goal: &Goal,
    today: NaiveDate,
    monthly_contribution: f64,
    annual_return: f64,
) -> Result<GoalPlan, EngineError> {
    ensure_non_negative("targetAmount", goal.target_amount)?;
    ensure_non_negative("currentAmount", goal.current_amount)?;
    ensure_non_negative("annualReturn", annual_return)?;
    if !monthly_contribution.is_finite() {
        return Err(EngineError::invalid("monthlyContribution", "must be finite"));
    }

    let monthly_rate = annual_return / 12.0;
    let months_until_deadline = months_until(today, goal.deadline);
    let monthly_contribution_required = required_monthly_contribution(
        goal.current_amount,
        goal.target_amount,
        monthly_rate,
        months_until_deadline,
    );
    let time_to_target = months_to_reach(
        goal.current_amount,
        monthly_contribution,
        goal.target_amount,
        monthly_rate,
    );
    let on_track = time_to_target.reached
        || time_to_target
            .months
            .whole_months()
            .is_some_and(|m| m <= months_until_deadline);
    let progress = if goal.target_amount <= 0.0 {
        1.0
    } else {
        (goal.current_amount / goal.target_amount).clamp(0.0, 1.0)
    };

    debug!(
        months_until_deadline,
        monthly_contribution_required, on_track, "planned dated goal"
    );
    Ok(GoalPlan {
        remaining: goal.remaining(),
        months_until_deadline,
        monthly_contribution_required,
        time_to_target,
        projected_date: time_to_target.projected_date(today),
        on_track,
        progress,
    })
}

use super::allocation::{recommended_allocation, weighted_expected_return};
use super::tax::{compute_pension_flows, compute_tax_summary};
use super::types::{
    AllocationRange, Assumptions, Inputs, PlanResult, ProjectionResult, YearPoint,
};

/// Calculation entry point for a single input set: allocation, deduction
/// summary, and the deterministic projection, computed in that order so the
/// projection can blend returns from the recommended allocation.
pub fn compute_plan(inputs: &Inputs, assumptions: &Assumptions) -> PlanResult {
    let allocation = recommended_allocation(inputs.risk_tolerance);
    let tax = compute_tax_summary(inputs);
    let projections = compute_projections(inputs, assumptions, Some(&allocation));

    PlanResult {
        tax,
        allocation,
        projections,
    }
}

/// Year-by-year deterministic simulation across the three buckets.
///
/// Each simulated year contributes this year's pension flow (from the grown
/// salary), the fixed annual ISA amount, and whatever investable cash is left
/// after the ISA, then compounds each bucket. Pension and ISA compound at the
/// blended expected return, cash at the cash asset rate.
pub fn compute_projections(
    inputs: &Inputs,
    assumptions: &Assumptions,
    allocation: Option<&AllocationRange>,
) -> ProjectionResult {
    let current_age = inputs.age;
    let years_to_retirement = inputs.retirement_age.saturating_sub(current_age);
    let horizon_years = inputs.years_to_house.max(years_to_retirement);

    let expected_return = weighted_expected_return(allocation, assumptions);
    let cash_return = assumptions.expected_returns.cash;

    let annual_invest = inputs.monthly_invest * 12.0;
    let annual_isa = inputs.monthly_isa * 12.0;
    // Leftover investable cash after the ISA gets priority.
    let cash_contribution = (annual_invest - annual_isa).max(0.0);

    let mut salary = inputs.gross_income;
    let mut pension = inputs.current_pension;
    let mut isa = inputs.current_isa;
    let mut cash = inputs.current_savings;

    let mut years = Vec::with_capacity(horizon_years as usize + 1);
    let mut house_goal_met_age = None;

    for i in 0..=horizon_years {
        let age = current_age + i;

        let pension_contribution = compute_pension_flows(
            salary,
            inputs.employee_pension_pct,
            inputs.employer_pension_pct,
        )
        .total_annual;

        pension = (pension + pension_contribution) * (1.0 + expected_return);
        isa = (isa + annual_isa) * (1.0 + expected_return);
        cash = (cash + cash_contribution) * (1.0 + cash_return);

        years.push(YearPoint {
            age,
            pension,
            isa,
            cash,
            net_worth: pension + isa + cash,
        });

        // First year the deposit is covered wins; the window includes the
        // house horizon year itself.
        if i <= inputs.years_to_house
            && house_goal_met_age.is_none()
            && cash >= inputs.target_house_deposit
        {
            house_goal_met_age = Some(age);
        }

        salary *= 1.0 + assumptions.salary_growth;
    }

    let final_pension = years.last().map(|point| point.pension).unwrap_or(0.0);
    let implied_retirement_income = final_pension * assumptions.withdrawal_rate;
    let meets_retirement_target = implied_retirement_income >= inputs.desired_retirement_income;

    ProjectionResult {
        net_worth_at_5: net_worth_at_age(&years, current_age + 5),
        net_worth_at_10: net_worth_at_age(&years, current_age + 10),
        net_worth_at_20: net_worth_at_age(&years, current_age + 20),
        years,
        house_goal_met_age,
        final_pension,
        implied_retirement_income,
        meets_retirement_target,
    }
}

/// Net worth at the first recorded age >= the target, defaulting to the last
/// recorded year when the horizon is shorter.
pub(crate) fn net_worth_at_age(years: &[YearPoint], target_age: u32) -> f64 {
    let Some(last) = years.last() else {
        return 0.0;
    };
    years
        .iter()
        .find(|point| point.age >= target_age)
        .map(|point| point.net_worth)
        .unwrap_or(last.net_worth)
}

use serde::Serialize;

use super::allocation::recommended_allocation;
use super::engine::{compute_projections, net_worth_at_age};
use super::types::{AllocationRange, Assumptions, Inputs, ProjectionResult, RiskTolerance};

/// What-if overrides for Scenario B. Numeric overrides apply only when
/// present and non-negative; the risk override applies whenever present.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScenarioOverrides {
    pub monthly_invest: Option<f64>,
    pub employee_pension_pct: Option<f64>,
    pub risk_tolerance: Option<RiskTolerance>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioComparison {
    pub allocation: AllocationRange,
    pub projections: ProjectionResult,
    pub final_age: u32,
    pub net_worth_delta: f64,
}

pub fn apply_overrides(base: &Inputs, overrides: &ScenarioOverrides) -> Inputs {
    let mut alternate = base.clone();
    if let Some(value) = overrides.monthly_invest {
        if value >= 0.0 {
            alternate.monthly_invest = value;
        }
    }
    if let Some(value) = overrides.employee_pension_pct {
        if value >= 0.0 {
            alternate.employee_pension_pct = value;
        }
    }
    if let Some(risk) = overrides.risk_tolerance {
        alternate.risk_tolerance = risk;
    }
    alternate
}

/// Runs a fresh allocation + projection pass for Scenario B and reports the
/// net-worth delta against the baseline at the baseline's final recorded age.
pub fn compare_scenarios(
    baseline: &ProjectionResult,
    inputs: &Inputs,
    overrides: &ScenarioOverrides,
    assumptions: &Assumptions,
) -> ScenarioComparison {
    let alternate = apply_overrides(inputs, overrides);
    let allocation = recommended_allocation(alternate.risk_tolerance);
    let projections = compute_projections(&alternate, assumptions, Some(&allocation));

    let final_age = baseline
        .years
        .last()
        .map(|point| point.age)
        .unwrap_or(inputs.retirement_age);
    let baseline_net_worth = baseline
        .years
        .last()
        .map(|point| point.net_worth)
        .unwrap_or(0.0);
    let alternate_net_worth = net_worth_at_age(&projections.years, final_age);

    ScenarioComparison {
        allocation,
        projections,
        final_age,
        net_worth_delta: alternate_net_worth - baseline_net_worth,
    }
}

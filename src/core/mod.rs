mod allocation;
mod engine;
mod scenario;
mod tax;
mod types;

pub use allocation::{FALLBACK_EXPECTED_RETURN, recommended_allocation, weighted_expected_return};
pub use engine::{compute_plan, compute_projections};
pub use scenario::{ScenarioComparison, ScenarioOverrides, apply_overrides, compare_scenarios};
pub use tax::{
    PensionFlows, TaxAndNi, compute_income_tax_and_ni, compute_pension_flows,
    compute_student_loan, compute_tax_summary,
};
pub use types::{
    AllocationRange, Assumptions, BandRange, DrawdownReaction, EmploymentType, ExpectedReturns,
    Inputs, PlanResult, ProjectionResult, Region, RiskTolerance, StudentLoanPlan, TaxSummary,
    YearPoint,
};

use serde::Serialize;

/// UK nation the user pays tax in. Captured so the boundary layer matches the
/// form it collects from; the rate tables currently treat every region as
/// England (see `core::tax`).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Region {
    England,
    Scotland,
    Wales,
    NorthernIreland,
}

impl Region {
    pub fn from_key(key: &str) -> Self {
        match key {
            "scotland" => Region::Scotland,
            "wales" => Region::Wales,
            "northernIreland" | "northern-ireland" => Region::NorthernIreland,
            _ => Region::England,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StudentLoanPlan {
    None,
    Plan1,
    Plan2,
    Plan4,
    Plan5,
    Postgrad,
}

impl StudentLoanPlan {
    /// Unrecognized plan keys behave as "no loan" rather than failing.
    pub fn from_key(key: &str) -> Self {
        match key {
            "plan1" => StudentLoanPlan::Plan1,
            "plan2" => StudentLoanPlan::Plan2,
            "plan4" => StudentLoanPlan::Plan4,
            "plan5" => StudentLoanPlan::Plan5,
            "postgrad" => StudentLoanPlan::Postgrad,
            _ => StudentLoanPlan::None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EmploymentType {
    Employed,
    SelfEmployed,
}

impl EmploymentType {
    pub fn from_key(key: &str) -> Self {
        match key {
            "selfEmployed" | "self-employed" => EmploymentType::SelfEmployed,
            _ => EmploymentType::Employed,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RiskTolerance {
    Low,
    Medium,
    MediumHigh,
    High,
}

impl RiskTolerance {
    /// Unrecognized categories fall through to the high-risk tables.
    pub fn from_key(key: &str) -> Self {
        match key {
            "low" => RiskTolerance::Low,
            "medium" => RiskTolerance::Medium,
            "mediumHigh" | "medium-high" => RiskTolerance::MediumHigh,
            _ => RiskTolerance::High,
        }
    }
}

/// How the user says they would react to a large market drop. Collected with
/// the risk questions; not yet an input to any formula.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DrawdownReaction {
    Sell,
    Hold,
    BuyMore,
}

impl DrawdownReaction {
    pub fn from_key(key: &str) -> Self {
        match key {
            "sell" => DrawdownReaction::Sell,
            "buyMore" | "buy-more" => DrawdownReaction::BuyMore,
            _ => DrawdownReaction::Hold,
        }
    }
}

/// One immutable snapshot of everything the user told us, taken per
/// calculation run. The boundary layer substitutes documented defaults for
/// missing or negative numeric fields before the snapshot is built.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub age: u32,
    pub region: Region,
    pub gross_income: f64,
    pub student_loan_plan: StudentLoanPlan,
    pub employment_type: EmploymentType,
    pub monthly_invest: f64,
    pub current_savings: f64,
    pub emergency_months: f64,
    pub employee_pension_pct: f64,
    pub employer_pension_pct: f64,
    pub salary_sacrifice: bool,
    pub monthly_isa: f64,
    pub use_lisa: bool,
    pub current_pension: f64,
    pub current_isa: f64,
    pub years_to_house: u32,
    pub target_house_deposit: f64,
    pub retirement_age: u32,
    pub desired_retirement_income: f64,
    pub risk_tolerance: RiskTolerance,
    pub drawdown_reaction: DrawdownReaction,
}

/// Expected annual return per asset class, as fractions.
#[derive(Copy, Clone, Debug)]
pub struct ExpectedReturns {
    pub equity: f64,
    pub bonds: f64,
    pub cash: f64,
    pub reits: f64,
    pub crypto: f64,
}

/// Macro assumptions for a run. An explicit immutable value passed into every
/// calculation call; there is no process-wide assumptions state.
#[derive(Copy, Clone, Debug)]
pub struct Assumptions {
    pub expected_returns: ExpectedReturns,
    pub inflation: f64,
    pub salary_growth: f64,
    pub withdrawal_rate: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            expected_returns: ExpectedReturns {
                equity: 0.06,
                bonds: 0.03,
                cash: 0.01,
                reits: 0.045,
                crypto: 0.12,
            },
            inflation: 0.02,
            salary_growth: 0.03,
            withdrawal_rate: 0.04,
        }
    }
}

/// Recommended percentage band for one asset class.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BandRange {
    pub min: f64,
    pub max: f64,
}

impl BandRange {
    pub fn midpoint(self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Recommended allocation bands in percent; all five classes always present.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationRange {
    pub equities: BandRange,
    pub bonds: BandRange,
    pub cash: BandRange,
    pub reits: BandRange,
    pub crypto: BandRange,
}

/// Annual deduction breakdown for one income. Derived once per run and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSummary {
    pub tax_annual: f64,
    pub ni_annual: f64,
    pub student_loan_annual: f64,
    pub employee_pension_annual: f64,
    pub employer_pension_annual: f64,
    pub net_annual: f64,
    pub net_monthly: f64,
    pub effective_rate: f64,
}

/// Balances at the end of one simulated year.
#[derive(Copy, Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearPoint {
    pub age: u32,
    pub pension: f64,
    pub isa: f64,
    pub cash: f64,
    pub net_worth: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub years: Vec<YearPoint>,
    pub house_goal_met_age: Option<u32>,
    pub final_pension: f64,
    pub implied_retirement_income: f64,
    pub meets_retirement_target: bool,
    pub net_worth_at_5: f64,
    pub net_worth_at_10: f64,
    pub net_worth_at_20: f64,
}

/// Everything one calculation run produces for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResult {
    pub tax: TaxSummary,
    pub allocation: AllocationRange,
    pub projections: ProjectionResult,
}

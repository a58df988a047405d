use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    AllocationRange, Assumptions, DrawdownReaction, EmploymentType, ExpectedReturns, Inputs,
    ProjectionResult, Region, RiskTolerance, ScenarioOverrides, StudentLoanPlan, compare_scenarios,
    compute_plan, compute_projections, recommended_allocation,
};

/// Flat request payload for the plan endpoint. Every field is optional;
/// missing or invalid values fall back to the documented CLI defaults, the
/// same way the surrounding form layer substitutes its placeholders.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PlanPayload {
    age: Option<u32>,
    region: Option<String>,
    gross_income: Option<f64>,
    student_loan_plan: Option<String>,
    employment_type: Option<String>,

    monthly_invest: Option<f64>,
    current_savings: Option<f64>,
    emergency_months: Option<f64>,

    employee_pension_pct: Option<f64>,
    employer_pension_pct: Option<f64>,
    salary_sacrifice: Option<bool>,
    monthly_isa: Option<f64>,
    use_lisa: Option<bool>,
    current_pension: Option<f64>,
    current_isa: Option<f64>,

    years_to_house: Option<u32>,
    target_house_deposit: Option<f64>,
    retirement_age: Option<u32>,
    desired_ret_income: Option<f64>,

    risk_tolerance: Option<String>,
    drawdown_reaction: Option<String>,

    ret_equity: Option<f64>,
    ret_bonds: Option<f64>,
    ret_cash: Option<f64>,
    ret_reits: Option<f64>,
    ret_crypto: Option<f64>,
    inflation: Option<f64>,
    salary_growth: Option<f64>,
    withdrawal_rate: Option<f64>,
}

/// Scenario request: the baseline fields plus the Scenario B overrides.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ScenarioPayload {
    #[serde(flatten)]
    baseline: PlanPayload,
    scenario_b_monthly_invest: Option<f64>,
    scenario_b_employee_pension_pct: Option<f64>,
    scenario_b_risk_tolerance: Option<String>,
}

#[derive(Debug)]
struct PlanRequest {
    inputs: Inputs,
    assumptions: Assumptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ScenarioResponse {
    baseline: ProjectionResult,
    scenario: ProjectionResult,
    scenario_allocation: AllocationRange,
    final_age: u32,
    net_worth_delta: f64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Every input and assumption with its fallback value. Percentage-style
/// flags take percent and are converted to fractions where the engine wants
/// fractions.
#[derive(Parser, Debug)]
#[command(
    name = "nestegg",
    about = "Deterministic UK personal finance projections (tax, allocation, compounding)"
)]
struct Cli {
    #[arg(long, default_value_t = 22)]
    age: u32,
    #[arg(
        long,
        default_value = "england",
        help = "Tax region: england, scotland, wales or northernIreland"
    )]
    region: String,
    #[arg(long, default_value_t = 30_000.0)]
    gross_income: f64,
    #[arg(
        long,
        default_value = "none",
        help = "Student loan plan: none, plan1, plan2, plan4, plan5 or postgrad"
    )]
    student_loan_plan: String,
    #[arg(
        long,
        default_value = "employed",
        help = "Employment type: employed or selfEmployed"
    )]
    employment_type: String,
    #[arg(
        long,
        default_value_t = 500.0,
        help = "Total investable amount per month"
    )]
    monthly_invest: f64,
    #[arg(long, default_value_t = 2_000.0)]
    current_savings: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Months of spending held back as an emergency fund"
    )]
    emergency_months: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Employee pension contribution in percent of gross"
    )]
    employee_pension_pct: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Employer pension contribution in percent of gross"
    )]
    employer_pension_pct: f64,
    #[arg(long)]
    salary_sacrifice: bool,
    #[arg(long, default_value_t = 200.0, help = "Monthly ISA contribution")]
    monthly_isa: f64,
    #[arg(long)]
    use_lisa: bool,
    #[arg(long, default_value_t = 0.0)]
    current_pension: f64,
    #[arg(long, default_value_t = 0.0)]
    current_isa: f64,
    #[arg(
        long,
        default_value_t = 5,
        help = "Years until the house deposit is needed"
    )]
    years_to_house: u32,
    #[arg(long, default_value_t = 20_000.0)]
    target_house_deposit: f64,
    #[arg(long, default_value_t = 65)]
    retirement_age: u32,
    #[arg(
        long,
        default_value_t = 25_000.0,
        help = "Desired annual retirement income"
    )]
    desired_ret_income: f64,
    #[arg(
        long,
        default_value = "medium",
        help = "Risk tolerance: low, medium, mediumHigh or high"
    )]
    risk_tolerance: String,
    #[arg(
        long,
        default_value = "hold",
        help = "Reaction to a market drawdown: sell, hold or buyMore"
    )]
    drawdown_reaction: String,

    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual equity return in percent"
    )]
    ret_equity: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual bond return in percent"
    )]
    ret_bonds: f64,
    #[arg(
        long,
        default_value_t = 1.0,
        help = "Expected annual cash return in percent"
    )]
    ret_cash: f64,
    #[arg(
        long,
        default_value_t = 4.5,
        help = "Expected annual REIT return in percent"
    )]
    ret_reits: f64,
    #[arg(
        long,
        default_value_t = 12.0,
        help = "Expected annual crypto return in percent"
    )]
    ret_crypto: f64,
    #[arg(
        long,
        default_value_t = 2.0,
        help = "Expected annual inflation in percent"
    )]
    inflation_rate: f64,
    #[arg(
        long,
        default_value_t = 3.0,
        help = "Expected annual salary growth in percent"
    )]
    salary_growth_rate: f64,
    #[arg(
        long,
        default_value_t = 4.0,
        help = "Retirement withdrawal rate in percent"
    )]
    withdrawal_rate: f64,
}

fn default_cli_for_api() -> Cli {
    Cli {
        age: 22,
        region: "england".to_string(),
        gross_income: 30_000.0,
        student_loan_plan: "none".to_string(),
        employment_type: "employed".to_string(),
        monthly_invest: 500.0,
        current_savings: 2_000.0,
        emergency_months: 3.0,
        employee_pension_pct: 5.0,
        employer_pension_pct: 3.0,
        salary_sacrifice: false,
        monthly_isa: 200.0,
        use_lisa: false,
        current_pension: 0.0,
        current_isa: 0.0,
        years_to_house: 5,
        target_house_deposit: 20_000.0,
        retirement_age: 65,
        desired_ret_income: 25_000.0,
        risk_tolerance: "medium".to_string(),
        drawdown_reaction: "hold".to_string(),
        ret_equity: 6.0,
        ret_bonds: 3.0,
        ret_cash: 1.0,
        ret_reits: 4.5,
        ret_crypto: 12.0,
        inflation_rate: 2.0,
        salary_growth_rate: 3.0,
        withdrawal_rate: 4.0,
    }
}

/// Builds the immutable run snapshot from a defaults table. Negative or
/// non-finite numbers fall back to the default for that field; categorical
/// strings map through their default branch, so this never fails.
fn build_request(cli: Cli) -> PlanRequest {
    let fallback = default_cli_for_api();
    let number =
        |value: f64, fallback: f64| if value.is_finite() && value >= 0.0 { value } else { fallback };

    let inputs = Inputs {
        age: cli.age,
        region: Region::from_key(&cli.region),
        gross_income: number(cli.gross_income, fallback.gross_income),
        student_loan_plan: StudentLoanPlan::from_key(&cli.student_loan_plan),
        employment_type: EmploymentType::from_key(&cli.employment_type),
        monthly_invest: number(cli.monthly_invest, fallback.monthly_invest),
        current_savings: number(cli.current_savings, fallback.current_savings),
        emergency_months: number(cli.emergency_months, fallback.emergency_months),
        employee_pension_pct: number(cli.employee_pension_pct, fallback.employee_pension_pct),
        employer_pension_pct: number(cli.employer_pension_pct, fallback.employer_pension_pct),
        salary_sacrifice: cli.salary_sacrifice,
        monthly_isa: number(cli.monthly_isa, fallback.monthly_isa),
        use_lisa: cli.use_lisa,
        current_pension: number(cli.current_pension, fallback.current_pension),
        current_isa: number(cli.current_isa, fallback.current_isa),
        years_to_house: cli.years_to_house,
        target_house_deposit: number(cli.target_house_deposit, fallback.target_house_deposit),
        retirement_age: cli.retirement_age,
        desired_retirement_income: number(cli.desired_ret_income, fallback.desired_ret_income),
        risk_tolerance: RiskTolerance::from_key(&cli.risk_tolerance),
        drawdown_reaction: DrawdownReaction::from_key(&cli.drawdown_reaction),
    };

    let assumptions = Assumptions {
        expected_returns: ExpectedReturns {
            equity: number(cli.ret_equity, fallback.ret_equity) / 100.0,
            bonds: number(cli.ret_bonds, fallback.ret_bonds) / 100.0,
            cash: number(cli.ret_cash, fallback.ret_cash) / 100.0,
            reits: number(cli.ret_reits, fallback.ret_reits) / 100.0,
            crypto: number(cli.ret_crypto, fallback.ret_crypto) / 100.0,
        },
        inflation: number(cli.inflation_rate, fallback.inflation_rate) / 100.0,
        salary_growth: number(cli.salary_growth_rate, fallback.salary_growth_rate) / 100.0,
        withdrawal_rate: number(cli.withdrawal_rate, fallback.withdrawal_rate) / 100.0,
    };

    PlanRequest {
        inputs,
        assumptions,
    }
}

fn plan_request_from_payload(payload: PlanPayload) -> PlanRequest {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.age {
        cli.age = v;
    }
    if let Some(v) = payload.region {
        cli.region = v;
    }
    if let Some(v) = payload.gross_income {
        cli.gross_income = v;
    }
    if let Some(v) = payload.student_loan_plan {
        cli.student_loan_plan = v;
    }
    if let Some(v) = payload.employment_type {
        cli.employment_type = v;
    }
    if let Some(v) = payload.monthly_invest {
        cli.monthly_invest = v;
    }
    if let Some(v) = payload.current_savings {
        cli.current_savings = v;
    }
    if let Some(v) = payload.emergency_months {
        cli.emergency_months = v;
    }
    if let Some(v) = payload.employee_pension_pct {
        cli.employee_pension_pct = v;
    }
    if let Some(v) = payload.employer_pension_pct {
        cli.employer_pension_pct = v;
    }
    if let Some(v) = payload.salary_sacrifice {
        cli.salary_sacrifice = v;
    }
    if let Some(v) = payload.monthly_isa {
        cli.monthly_isa = v;
    }
    if let Some(v) = payload.use_lisa {
        cli.use_lisa = v;
    }
    if let Some(v) = payload.current_pension {
        cli.current_pension = v;
    }
    if let Some(v) = payload.current_isa {
        cli.current_isa = v;
    }
    if let Some(v) = payload.years_to_house {
        cli.years_to_house = v;
    }
    if let Some(v) = payload.target_house_deposit {
        cli.target_house_deposit = v;
    }
    if let Some(v) = payload.retirement_age {
        cli.retirement_age = v;
    }
    if let Some(v) = payload.desired_ret_income {
        cli.desired_ret_income = v;
    }
    if let Some(v) = payload.risk_tolerance {
        cli.risk_tolerance = v;
    }
    if let Some(v) = payload.drawdown_reaction {
        cli.drawdown_reaction = v;
    }
    if let Some(v) = payload.ret_equity {
        cli.ret_equity = v;
    }
    if let Some(v) = payload.ret_bonds {
        cli.ret_bonds = v;
    }
    if let Some(v) = payload.ret_cash {
        cli.ret_cash = v;
    }
    if let Some(v) = payload.ret_reits {
        cli.ret_reits = v;
    }
    if let Some(v) = payload.ret_crypto {
        cli.ret_crypto = v;
    }
    if let Some(v) = payload.inflation {
        cli.inflation_rate = v;
    }
    if let Some(v) = payload.salary_growth {
        cli.salary_growth_rate = v;
    }
    if let Some(v) = payload.withdrawal_rate {
        cli.withdrawal_rate = v;
    }

    build_request(cli)
}

fn scenario_overrides_from_payload(payload: &ScenarioPayload) -> ScenarioOverrides {
    ScenarioOverrides {
        monthly_invest: payload.scenario_b_monthly_invest,
        employee_pension_pct: payload.scenario_b_employee_pension_pct,
        risk_tolerance: payload
            .scenario_b_risk_tolerance
            .as_deref()
            .map(RiskTolerance::from_key),
    }
}

/// Runs the plan calculation from CLI-style arguments and renders the result
/// as pretty JSON.
pub fn run_plan_cli<I>(args: I) -> Result<String, String>
where
    I: IntoIterator<Item = String>,
{
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;
    let request = build_request(cli);
    let plan = compute_plan(&request.inputs, &request.assumptions);
    serde_json::to_string_pretty(&plan).map_err(|e| e.to_string())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/api/plan", get(plan_get_handler).post(plan_post_handler))
        .route("/api/scenario", post(scenario_post_handler))
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    info!("projection API listening on http://{addr}");
    axum::serve(listener, app).await
}

async fn plan_get_handler(Query(payload): Query<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

async fn plan_post_handler(Json(payload): Json<PlanPayload>) -> Response {
    plan_handler_impl(payload)
}

fn plan_handler_impl(payload: PlanPayload) -> Response {
    let request = plan_request_from_payload(payload);
    let plan = compute_plan(&request.inputs, &request.assumptions);
    json_response(StatusCode::OK, plan)
}

async fn scenario_post_handler(Json(payload): Json<ScenarioPayload>) -> Response {
    let overrides = scenario_overrides_from_payload(&payload);
    let request = plan_request_from_payload(payload.baseline);

    let baseline_allocation = recommended_allocation(request.inputs.risk_tolerance);
    let baseline = compute_projections(
        &request.inputs,
        &request.assumptions,
        Some(&baseline_allocation),
    );
    let comparison = compare_scenarios(
        &baseline,
        &request.inputs,
        &overrides,
        &request.assumptions,
    );

    let response = ScenarioResponse {
        baseline,
        scenario: comparison.projections,
        scenario_allocation: comparison.allocation,
        final_age: comparison.final_age,
        net_worth_delta: comparison.net_worth_delta,
    };
    json_response(StatusCode::OK, response)
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

use super::types::{Inputs, Region, StudentLoanPlan, TaxSummary};

/// Progressive income tax bands. Thresholds are gross-income ceilings; each
/// band taxes only the slice of income between its floor and ceiling.
#[derive(Copy, Clone, Debug)]
pub struct TaxBandConfig {
    pub personal_allowance: f64,
    pub basic_rate_limit: f64,
    pub higher_rate_limit: f64,
    pub basic_rate: f64,
    pub higher_rate: f64,
    pub additional_rate: f64,
}

const TAX_CONFIG_ENGLAND: TaxBandConfig = TaxBandConfig {
    personal_allowance: 12_570.0,
    basic_rate_limit: 50_270.0,
    higher_rate_limit: 125_140.0,
    basic_rate: 0.20,
    higher_rate: 0.40,
    additional_rate: 0.45,
};

/// Class 1 National Insurance, simplified to two bands above the primary
/// threshold.
#[derive(Copy, Clone, Debug)]
pub struct NiConfig {
    pub primary_threshold: f64,
    pub upper_threshold: f64,
    pub main_rate: f64,
    pub upper_rate: f64,
}

const NI_CONFIG: NiConfig = NiConfig {
    primary_threshold: 12_570.0,
    upper_threshold: 50_270.0,
    main_rate: 0.12,
    upper_rate: 0.02,
};

#[derive(Copy, Clone, Debug)]
pub struct StudentLoanTerms {
    pub threshold: f64,
    pub rate: f64,
}

/// Every region currently shares the England table. Scottish bands and other
/// regional differences are out of scope for these illustrations.
fn tax_config_for(_region: Region) -> TaxBandConfig {
    TAX_CONFIG_ENGLAND
}

fn loan_terms_for(plan: StudentLoanPlan) -> StudentLoanTerms {
    match plan {
        StudentLoanPlan::None => StudentLoanTerms {
            threshold: f64::INFINITY,
            rate: 0.0,
        },
        StudentLoanPlan::Plan1 => StudentLoanTerms {
            threshold: 22_015.0,
            rate: 0.09,
        },
        StudentLoanPlan::Plan2 => StudentLoanTerms {
            threshold: 27_295.0,
            rate: 0.09,
        },
        StudentLoanPlan::Plan4 => StudentLoanTerms {
            threshold: 27_295.0,
            rate: 0.09,
        },
        StudentLoanPlan::Plan5 => StudentLoanTerms {
            threshold: 25_000.0,
            rate: 0.09,
        },
        StudentLoanPlan::Postgrad => StudentLoanTerms {
            threshold: 21_000.0,
            rate: 0.06,
        },
    }
}

#[derive(Copy, Clone, Debug)]
pub struct TaxAndNi {
    pub tax_annual: f64,
    pub ni_annual: f64,
}

#[derive(Copy, Clone, Debug)]
pub struct PensionFlows {
    pub employee_annual: f64,
    pub employer_annual: f64,
    pub total_annual: f64,
}

fn band_amount(income: f64, floor: f64, ceiling: f64) -> f64 {
    (income.min(ceiling) - floor).max(0.0)
}

pub fn compute_income_tax_and_ni(gross_income: f64, region: Region) -> TaxAndNi {
    let cfg = tax_config_for(region);

    let tax = if gross_income <= cfg.personal_allowance {
        0.0
    } else {
        let basic_band = band_amount(gross_income, cfg.personal_allowance, cfg.basic_rate_limit);
        let higher_band = band_amount(gross_income, cfg.basic_rate_limit, cfg.higher_rate_limit);
        let additional_band = (gross_income - cfg.higher_rate_limit).max(0.0);

        basic_band * cfg.basic_rate
            + higher_band * cfg.higher_rate
            + additional_band * cfg.additional_rate
    };

    let ni_cfg = NI_CONFIG;
    let ni = if gross_income > ni_cfg.primary_threshold {
        let main_band = band_amount(gross_income, ni_cfg.primary_threshold, ni_cfg.upper_threshold);
        let upper_band = (gross_income - ni_cfg.upper_threshold).max(0.0);
        main_band * ni_cfg.main_rate + upper_band * ni_cfg.upper_rate
    } else {
        0.0
    };

    TaxAndNi {
        tax_annual: tax,
        ni_annual: ni,
    }
}

/// Annual student loan repayment. The `none` plan carries an unbounded
/// threshold so it always repays zero.
pub fn compute_student_loan(gross_income: f64, plan: StudentLoanPlan) -> f64 {
    let terms = loan_terms_for(plan);
    if !terms.threshold.is_finite() {
        return 0.0;
    }
    (gross_income - terms.threshold).max(0.0) * terms.rate
}

pub fn compute_pension_flows(
    gross_income: f64,
    employee_pct: f64,
    employer_pct: f64,
) -> PensionFlows {
    let employee_annual = gross_income * (employee_pct / 100.0);
    let employer_annual = gross_income * (employer_pct / 100.0);
    PensionFlows {
        employee_annual,
        employer_annual,
        total_annual: employee_annual + employer_annual,
    }
}

/// Full deduction breakdown for one run. Employer pension contributions are
/// reported but not part of take-home pay.
pub fn compute_tax_summary(inputs: &Inputs) -> TaxSummary {
    let tax_ni = compute_income_tax_and_ni(inputs.gross_income, inputs.region);
    let student_loan_annual = compute_student_loan(inputs.gross_income, inputs.student_loan_plan);
    let flows = compute_pension_flows(
        inputs.gross_income,
        inputs.employee_pension_pct,
        inputs.employer_pension_pct,
    );

    let net_annual = inputs.gross_income
        - (tax_ni.tax_annual + tax_ni.ni_annual + student_loan_annual + flows.employee_annual);

    let effective_rate = if inputs.gross_income > 0.0 {
        (tax_ni.tax_annual + tax_ni.ni_annual + student_loan_annual) / inputs.gross_income
    } else {
        0.0
    };

    TaxSummary {
        tax_annual: tax_ni.tax_annual,
        ni_annual: tax_ni.ni_annual,
        student_loan_annual,
        employee_pension_annual: flows.employee_annual,
        employer_pension_annual: flows.employer_annual,
        net_annual,
        net_monthly: net_annual / 12.0,
        effective_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DrawdownReaction, EmploymentType, RiskTolerance};
    use proptest::prelude::{prop_assert, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn sample_inputs() -> Inputs {
        Inputs {
            age: 30,
            region: Region::England,
            gross_income: 30_000.0,
            student_loan_plan: StudentLoanPlan::Plan2,
            employment_type: EmploymentType::Employed,
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
            desired_retirement_income: 25_000.0,
            risk_tolerance: RiskTolerance::Medium,
            drawdown_reaction: DrawdownReaction::Hold,
        }
    }

    #[test]
    fn worked_example_at_30k_gross() {
        let result = compute_income_tax_and_ni(30_000.0, Region::England);
        assert_approx(result.tax_annual, 3_486.0);
        assert_approx(result.ni_annual, 2_091.6);

        let loan = compute_student_loan(30_000.0, StudentLoanPlan::Plan2);
        assert_approx(loan, 243.45);
    }

    #[test]
    fn no_tax_at_or_below_personal_allowance() {
        for gross in [0.0, 5_000.0, 12_569.99, 12_570.0] {
            let result = compute_income_tax_and_ni(gross, Region::England);
            assert_approx(result.tax_annual, 0.0);
        }
    }

    #[test]
    fn no_ni_at_or_below_primary_threshold() {
        for gross in [0.0, 12_570.0] {
            let result = compute_income_tax_and_ni(gross, Region::England);
            assert_approx(result.ni_annual, 0.0);
        }
    }

    #[test]
    fn additional_rate_applies_above_higher_limit() {
        let result = compute_income_tax_and_ni(150_000.0, Region::England);
        let expected = (50_270.0 - 12_570.0) * 0.20
            + (125_140.0 - 50_270.0) * 0.40
            + (150_000.0 - 125_140.0) * 0.45;
        assert_approx(result.tax_annual, expected);
    }

    #[test]
    fn all_regions_share_the_same_table() {
        for region in [
            Region::England,
            Region::Scotland,
            Region::Wales,
            Region::NorthernIreland,
        ] {
            let result = compute_income_tax_and_ni(60_000.0, region);
            let england = compute_income_tax_and_ni(60_000.0, Region::England);
            assert_approx(result.tax_annual, england.tax_annual);
            assert_approx(result.ni_annual, england.ni_annual);
        }
    }

    #[test]
    fn none_plan_never_repays() {
        for gross in [0.0, 30_000.0, 1_000_000.0] {
            assert_approx(compute_student_loan(gross, StudentLoanPlan::None), 0.0);
        }
    }

    #[test]
    fn unrecognized_plan_key_behaves_as_none() {
        let plan = StudentLoanPlan::from_key("plan99");
        assert_eq!(plan, StudentLoanPlan::None);
        assert_approx(compute_student_loan(100_000.0, plan), 0.0);
    }

    #[test]
    fn postgrad_plan_uses_six_percent() {
        assert_approx(
            compute_student_loan(31_000.0, StudentLoanPlan::Postgrad),
            (31_000.0 - 21_000.0) * 0.06,
        );
    }

    #[test]
    fn no_repayment_at_plan_threshold() {
        assert_approx(compute_student_loan(27_295.0, StudentLoanPlan::Plan2), 0.0);
        assert_approx(compute_student_loan(27_295.0, StudentLoanPlan::Plan4), 0.0);
    }

    #[test]
    fn pension_flows_are_proportional() {
        let flows = compute_pension_flows(30_000.0, 5.0, 3.0);
        assert_approx(flows.employee_annual, 1_500.0);
        assert_approx(flows.employer_annual, 900.0);
        assert_approx(flows.total_annual, 2_400.0);
    }

    #[test]
    fn tax_summary_matches_component_calculations() {
        let inputs = sample_inputs();
        let summary = compute_tax_summary(&inputs);

        assert_approx(summary.tax_annual, 3_486.0);
        assert_approx(summary.ni_annual, 2_091.6);
        assert_approx(summary.student_loan_annual, 243.45);
        assert_approx(summary.employee_pension_annual, 1_500.0);
        assert_approx(summary.employer_pension_annual, 900.0);

        let expected_net = 30_000.0 - (3_486.0 + 2_091.6 + 243.45 + 1_500.0);
        assert_approx(summary.net_annual, expected_net);
        assert_approx(summary.net_monthly, expected_net / 12.0);
        assert_approx(
            summary.effective_rate,
            (3_486.0 + 2_091.6 + 243.45) / 30_000.0,
        );
    }

    #[test]
    fn zero_gross_income_yields_zero_effective_rate() {
        let mut inputs = sample_inputs();
        inputs.gross_income = 0.0;
        let summary = compute_tax_summary(&inputs);
        assert_approx(summary.effective_rate, 0.0);
        assert_approx(summary.net_annual, 0.0);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_tax_is_monotone_with_bounded_marginal_rate(
            gross_pounds in 0u32..200_000,
            step_pence in 1u32..100_000
        ) {
            let gross = gross_pounds as f64;
            let step = step_pence as f64 / 100.0;

            let lower = compute_income_tax_and_ni(gross, Region::England);
            let upper = compute_income_tax_and_ni(gross + step, Region::England);

            let tax_delta = upper.tax_annual - lower.tax_annual;
            prop_assert!(tax_delta >= -1e-9);
            prop_assert!(tax_delta <= step * 0.45 + 1e-9);

            let ni_delta = upper.ni_annual - lower.ni_annual;
            prop_assert!(ni_delta >= -1e-9);
            prop_assert!(ni_delta <= step * 0.12 + 1e-9);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_tax_is_continuous_at_band_boundaries(step_pence in 1u32..1_000) {
            let step = step_pence as f64 / 100.0;
            for threshold in [12_570.0, 50_270.0, 125_140.0] {
                let below = compute_income_tax_and_ni(threshold - step, Region::England);
                let above = compute_income_tax_and_ni(threshold + step, Region::England);
                // Crossing a boundary may change the marginal rate but must not
                // introduce a jump larger than the step itself allows.
                let jump = above.tax_annual - below.tax_annual;
                prop_assert!(jump >= -1e-9);
                prop_assert!(jump <= 2.0 * step * 0.45 + 1e-9);
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_student_loan_repayment_is_non_negative_and_linear_above_threshold(
            gross_pounds in 0u32..300_000
        ) {
            let gross = gross_pounds as f64;
            for plan in [
                StudentLoanPlan::None,
                StudentLoanPlan::Plan1,
                StudentLoanPlan::Plan2,
                StudentLoanPlan::Plan4,
                StudentLoanPlan::Plan5,
                StudentLoanPlan::Postgrad,
            ] {
                let repayment = compute_student_loan(gross, plan);
                prop_assert!(repayment >= 0.0);
                prop_assert!(repayment.is_finite());
                // Repayment can never exceed 9% of total income.
                prop_assert!(repayment <= gross * 0.09 + 1e-9);
            }
        }
    }
}

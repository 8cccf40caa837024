use pretty_assertions::assert_eq;
use realty_projection_core::investment::{
    compare_investments, generate_entity_series, generate_series, generate_summary,
    merge_series, project_investment, trace_projection, CalculationMethod, ComparisonInput,
    InvestmentKind, InvestmentRecord, ProjectionInput, ProjectionParameters,
};
use realty_projection_core::mortgage::calculate_mortgage_payment;
use realty_projection_core::RealtyError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn params(years: u32) -> ProjectionParameters {
    ProjectionParameters {
        years,
        rent_tax_rate: dec!(0.13),
        ..ProjectionParameters::default()
    }
}

fn reference_flat(method: CalculationMethod) -> InvestmentRecord {
    InvestmentRecord {
        name: "Reference flat".into(),
        calculation_method: Some(method),
        monthly_rent: Some(dec!(800)),
        property_appreciation_pct: Some(dec!(3)),
        maintenance_cost_per_sqm_per_year: Some(dec!(10)),
        area_sqm: Some(dec!(70)),
        ..InvestmentRecord::new(1, InvestmentKind::PropertyCash, dec!(200000))
    }
}

fn near(a: Decimal, b: Decimal, tol: Decimal) -> bool {
    (a - b).abs() < tol
}

// ===========================================================================
// End-to-end scenario
// ===========================================================================

#[test]
fn test_end_to_end_year_one_value() {
    let record = reference_flat(CalculationMethod::RoiPlusAppreciationMinusMaintenance);
    let series = generate_series(&record, &params(10)).unwrap();

    assert_eq!(series.len(), 11);
    assert_eq!(series[0].value, dec!(200000));

    // (200000 * 1.03 - 700) + 800 * 12 * 0.87 - 0
    assert_eq!(series[1].value.round_dp(2), dec!(213652.00));
}

#[test]
fn test_end_to_end_envelope() {
    let out = project_investment(&ProjectionInput {
        record: reference_flat(CalculationMethod::RoiPlusAppreciationMinusMaintenance),
        parameters: params(10),
    })
    .unwrap();
    assert_eq!(out.methodology, "Investment Value Projection");
    assert_eq!(out.result.series.len(), 11);
    assert_eq!(out.result.summary.years, 10);
    assert_eq!(out.result.summary.total_rent_income, dec!(83520));
    assert!(near(out.result.summary.total_maintenance, dec!(7000), dec!(0.0001)));
}

// ===========================================================================
// Method table exactness
// ===========================================================================

#[test]
fn test_method_table_holds_year_by_year() {
    let years = 12u32;
    let loan_amount = dec!(120000);
    let term = 8u32;
    let yearly_payment = calculate_mortgage_payment(loan_amount, dec!(4), term).unwrap() * dec!(12);

    for method in CalculationMethod::ALL {
        let record = InvestmentRecord {
            kind: InvestmentKind::PropertyLoan,
            loan_amount: Some(loan_amount),
            interest_rate_pct: Some(dec!(4)),
            loan_term_years: Some(term),
            ..reference_flat(method)
        };
        let series = generate_series(&record, &params(years)).unwrap();
        let states = trace_projection(&record, &params(years)).unwrap();
        assert_eq!(series.len(), states.len());

        let growth = if method.includes_appreciation() {
            dec!(1.03)
        } else {
            Decimal::ONE
        };
        let upkeep = if method.deducts_maintenance() {
            dec!(700)
        } else {
            Decimal::ZERO
        };
        // Upkeep comes out of the base that compounds next year
        let mut base = dec!(200000);

        for k in 1..=years {
            let ku = k as usize;
            base = base * growth - upkeep;
            let rent = if method.includes_rent() {
                dec!(8352) * Decimal::from(k)
            } else {
                Decimal::ZERO
            };
            let maintenance = upkeep * Decimal::from(k);
            let value = base + maintenance;
            let loan_paid = yearly_payment * Decimal::from(k.min(term));

            let state = &states[ku];
            assert!(near(state.current_value, value, dec!(0.0001)), "{method:?} year {k}");
            assert!(near(state.cumulative_rent, rent, dec!(0.0001)), "{method:?} year {k}");
            assert!(
                near(state.cumulative_maintenance, maintenance, dec!(0.0001)),
                "{method:?} year {k}"
            );
            assert!(
                near(state.cumulative_loan_paid(), loan_paid, dec!(0.01)),
                "{method:?} year {k}"
            );

            let expected = match method {
                CalculationMethod::Roi | CalculationMethod::RoiPlusAppreciation => value + rent,
                CalculationMethod::RoiMinusMaintenance => value + rent - maintenance,
                CalculationMethod::RoiPlusAppreciationMinusMaintenance => {
                    value + rent - loan_paid - maintenance
                }
                CalculationMethod::Appreciation | CalculationMethod::AppreciationMinusMaintenance => {
                    value - maintenance
                }
            };
            assert!(
                near(series[ku].value, expected, dec!(0.01)),
                "{method:?} year {k}: {} vs {expected}",
                series[ku].value
            );
        }
    }
}

#[test]
fn test_maintenance_compounds_out_of_later_years() {
    let record = reference_flat(CalculationMethod::RoiPlusAppreciationMinusMaintenance);
    let series = generate_series(&record, &params(2)).unwrap();

    // Year 2 grows the 205300 left after year-one upkeep, not 206000
    // (205300 * 1.03 - 700) + 2 * 8352
    assert_eq!(series[2].value.round_dp(2), dec!(227463.00));
    let flat_upkeep = dec!(200000) * dec!(1.0609) - dec!(1400) + dec!(16704);
    assert_ne!(series[2].value.round_dp(2), flat_upkeep);
}

#[test]
fn test_runaway_index_growth_is_an_error() {
    let record = InvestmentRecord {
        benchmark_return_pct: Some(dec!(100)),
        ..InvestmentRecord::new(6, InvestmentKind::IndexCash, dec!(1000000000))
    };
    let err = generate_series(&record, &params(100)).unwrap_err();
    assert!(matches!(err, RealtyError::Overflow { .. }));
    assert!(generate_summary(&record, &params(100)).is_err());
}

#[test]
fn test_appreciation_only_sanity() {
    let record = InvestmentRecord {
        calculation_method: Some(CalculationMethod::Appreciation),
        property_appreciation_pct: Some(Decimal::ZERO),
        ..InvestmentRecord::new(4, InvestmentKind::PropertyCash, dec!(175000))
    };
    let series = generate_series(&record, &params(20)).unwrap();
    assert!(series.iter().all(|p| p.value == dec!(175000)));
}

// ===========================================================================
// Index funds
// ===========================================================================

#[test]
fn test_monthly_contributions_at_zero_return() {
    let record = InvestmentRecord {
        benchmark_return_pct: Some(Decimal::ZERO),
        monthly_contribution: Some(dec!(100)),
        ..InvestmentRecord::new(2, InvestmentKind::IndexMonthly, Decimal::ZERO)
    };
    let series = generate_series(&record, &params(5)).unwrap();
    assert_eq!(series[5].value, dec!(6000));
}

#[test]
fn test_index_loan_reports_gross_value() {
    let record = InvestmentRecord {
        benchmark_return_pct: Some(dec!(10)),
        loan_amount: Some(dec!(50000)),
        interest_rate_pct: Some(dec!(5)),
        loan_term_years: Some(10),
        ..InvestmentRecord::new(3, InvestmentKind::IndexLoan, dec!(100000))
    };
    let series = generate_series(&record, &params(2)).unwrap();
    assert_eq!(series[2].value, dec!(121000));
    let summary = generate_summary(&record, &params(2)).unwrap();
    assert!(summary.total_loan_paid > Decimal::ZERO);
}

// ===========================================================================
// Merge & comparison
// ===========================================================================

#[test]
fn test_merge_alignment() {
    let a = generate_entity_series(&reference_flat(CalculationMethod::Roi), &params(3)).unwrap();
    let b = generate_entity_series(
        &InvestmentRecord::new(2, InvestmentKind::IndexCash, dec!(200000)),
        &params(3),
    )
    .unwrap();

    let rows = merge_series(&[a, b]).unwrap();
    assert_eq!(rows.len(), 4);
    for (k, row) in rows.iter().enumerate() {
        assert_eq!(row.year as usize, k);
        assert!(row.values.contains_key("investment-1"));
        assert!(row.values.contains_key("investment-2"));
    }
}

#[test]
fn test_merge_rejects_different_horizons() {
    let a = generate_entity_series(&reference_flat(CalculationMethod::Roi), &params(3)).unwrap();
    let b = generate_entity_series(
        &InvestmentRecord::new(2, InvestmentKind::IndexCash, dec!(1000)),
        &params(5),
    )
    .unwrap();
    assert!(matches!(
        merge_series(&[a, b]),
        Err(RealtyError::MismatchedSeriesLength { .. })
    ));
}

#[test]
fn test_comparison_keeps_input_order() {
    let input = ComparisonInput {
        records: vec![
            InvestmentRecord::new(9, InvestmentKind::IndexCash, dec!(1000)),
            reference_flat(CalculationMethod::Appreciation),
        ],
        parameters: params(4),
    };
    let out = compare_investments(&input).unwrap();
    let keys: Vec<&str> = out.result.summaries.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(keys, vec!["investment-9", "investment-1"]);
    assert_eq!(out.result.chart.len(), 5);
    assert_eq!(out.result.chart[4].values["investment-9"].round_dp(2), dec!(1464.10));
}

// ===========================================================================
// Summary
// ===========================================================================

#[test]
fn test_total_loan_interest_matches_payment_formula() {
    let payment = calculate_mortgage_payment(dec!(100000), dec!(5), 20).unwrap();
    let implied_interest = payment * dec!(12) * dec!(20) - dec!(100000);
    assert!(implied_interest > Decimal::ZERO);

    let record = InvestmentRecord {
        loan_amount: Some(dec!(100000)),
        interest_rate_pct: Some(dec!(5)),
        loan_term_years: Some(20),
        ..reference_flat(CalculationMethod::RoiPlusAppreciationMinusMaintenance)
    };
    let record = InvestmentRecord {
        kind: InvestmentKind::PropertyLoan,
        ..record
    };
    let summary = generate_summary(&record, &params(10)).unwrap();
    assert!(near(summary.total_loan_interest, implied_interest, dec!(0.0001)));
}

#[test]
fn test_summary_and_series_final_values_diverge() {
    // Growth-only appreciation ignores rent, so the two "final" figures differ
    let record = reference_flat(CalculationMethod::RoiPlusAppreciation);
    let series = generate_series(&record, &params(10)).unwrap();
    let summary = generate_summary(&record, &params(10)).unwrap();

    assert_eq!(summary.final_value, series[10].value);
    assert!(summary.total_appreciation < series[10].value - summary.initial_value);
}

#[test]
fn test_record_rates_override_parameters() {
    let mut record = InvestmentRecord::new(5, InvestmentKind::IndexCash, dec!(1000));
    let p = ProjectionParameters {
        benchmark_return_pct: dec!(5),
        ..params(1)
    };
    assert_eq!(generate_series(&record, &p).unwrap()[1].value, dec!(1050));

    record.benchmark_return_pct = Some(dec!(20));
    assert_eq!(generate_series(&record, &p).unwrap()[1].value, dec!(1200));
}

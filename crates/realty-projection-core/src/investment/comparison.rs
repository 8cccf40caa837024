use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::compounding::ProjectionContext;
use super::merge::{merge_series, ChartRow};
use super::record::{InvestmentRecord, ProjectionParameters, YearlyDataPoint};
use super::series::{generate_entity_series, generate_series};
use super::summary::{generate_summary, SummaryResult};
use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput};
use crate::RealtyResult;

const HIGH_LTV_THRESHOLD: Decimal = dec!(0.80);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub record: InvestmentRecord,
    #[serde(default)]
    pub parameters: ProjectionParameters,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub key: String,
    pub name: String,
    pub kind_label: String,
    pub method_label: String,
    pub series: Vec<YearlyDataPoint>,
    pub summary: SummaryResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub records: Vec<InvestmentRecord>,
    #[serde(default)]
    pub parameters: ProjectionParameters,
}

/// Summary table row for one compared entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub key: String,
    pub name: String,
    pub method_label: String,
    #[serde(flatten)]
    pub summary: SummaryResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub chart: Vec<ChartRow>,
    pub summaries: Vec<ComparisonSummary>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Series and summary for one record.
pub fn project_investment(
    input: &ProjectionInput,
) -> RealtyResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let record = &input.record;
    let params = &input.parameters;

    let ctx = ProjectionContext::resolve(record, params)?;
    let warnings = collect_warnings(record, &ctx);

    let series = generate_series(record, params)?;
    let summary = generate_summary(record, params)?;

    let output = ProjectionOutput {
        key: record.series_key(),
        name: record.name.clone(),
        kind_label: record.kind.label().to_string(),
        method_label: record.method_label().to_string(),
        series,
        summary,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Investment Value Projection",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Merged chart rows and a summary row for every record, in input order.
pub fn compare_investments(
    input: &ComparisonInput,
) -> RealtyResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let params = &input.parameters;

    if input.records.is_empty() {
        return Err(RealtyError::invalid(
            "records",
            "At least one record is required for a comparison",
        ));
    }

    let mut seen_ids: Vec<u64> = Vec::with_capacity(input.records.len());
    for record in &input.records {
        if seen_ids.contains(&record.id) {
            return Err(RealtyError::invalid(
                "records",
                format!("Duplicate record id {}", record.id),
            ));
        }
        seen_ids.push(record.id);
    }

    let mut warnings: Vec<String> = Vec::new();
    let mut all_series = Vec::with_capacity(input.records.len());
    let mut summaries = Vec::with_capacity(input.records.len());

    for record in &input.records {
        let ctx = ProjectionContext::resolve(record, params)?;
        warnings.extend(
            collect_warnings(record, &ctx)
                .into_iter()
                .map(|w| format!("{}: {w}", display_name(record))),
        );

        all_series.push(generate_entity_series(record, params)?);
        summaries.push(ComparisonSummary {
            key: record.series_key(),
            name: record.name.clone(),
            method_label: record.method_label().to_string(),
            summary: generate_summary(record, params)?,
        });
    }

    let chart = merge_series(&all_series)?;

    let output = ComparisonOutput { chart, summaries };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Multi-Investment Comparison",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

fn display_name(record: &InvestmentRecord) -> String {
    if record.name.is_empty() {
        record.series_key()
    } else {
        record.name.clone()
    }
}

fn collect_warnings(record: &InvestmentRecord, ctx: &ProjectionContext) -> Vec<String> {
    let mut warnings = Vec::new();

    if let Some(loan) = ctx.loan.as_ref() {
        if loan.term_years > ctx.years {
            warnings.push(format!(
                "Loan term of {} years outlasts the {}-year horizon; the loan is not repaid in the projection",
                loan.term_years, ctx.years
            ));
        }
        if !ctx.initial_amount.is_zero() {
            let ltv = loan.principal / ctx.initial_amount;
            if ltv > HIGH_LTV_THRESHOLD {
                warnings.push(format!(
                    "LTV of {:.1}% exceeds 80%, high leverage",
                    ltv * dec!(100)
                ));
            }
        }
    }

    if ctx.kind.is_property() {
        if ctx.method.deducts_maintenance()
            && ctx.method.includes_rent()
            && ctx.yearly_maintenance_cost > ctx.yearly_net_rent
        {
            warnings.push(format!(
                "Yearly maintenance {:.2} exceeds yearly net rent {:.2}",
                ctx.yearly_maintenance_cost, ctx.yearly_net_rent
            ));
        }
    } else {
        if record.calculation_method.is_some() {
            warnings.push("Calculation method is ignored for index-fund investments".into());
        }
        if record.monthly_rent.is_some_and(|r| !r.is_zero()) {
            warnings.push("Monthly rent is ignored for index-fund investments".into());
        }
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::record::{CalculationMethod, InvestmentKind};
    use rust_decimal_macros::dec;

    fn params(years: u32) -> ProjectionParameters {
        ProjectionParameters {
            years,
            ..ProjectionParameters::default()
        }
    }

    fn flat(id: u64, amount: Decimal) -> InvestmentRecord {
        InvestmentRecord {
            name: format!("Flat {id}"),
            calculation_method: Some(CalculationMethod::RoiPlusAppreciation),
            monthly_rent: Some(dec!(600)),
            ..InvestmentRecord::new(id, InvestmentKind::PropertyCash, amount)
        }
    }

    #[test]
    fn test_project_investment_envelope() {
        let input = ProjectionInput {
            record: flat(1, dec!(120000)),
            parameters: params(5),
        };
        let out = project_investment(&input).unwrap();
        assert_eq!(out.result.key, "investment-1");
        assert_eq!(out.result.series.len(), 6);
        assert_eq!(out.result.method_label, "ROI + Appreciation");
        assert_eq!(out.result.kind_label, "Property Bought with Cash");
        assert_eq!(out.result.summary.final_value, out.result.series[5].value);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_compare_builds_chart_and_summaries() {
        let mut index = InvestmentRecord::new(2, InvestmentKind::IndexCash, dec!(120000));
        index.name = "Index".into();
        let input = ComparisonInput {
            records: vec![flat(1, dec!(120000)), index],
            parameters: params(3),
        };
        let out = compare_investments(&input).unwrap();
        assert_eq!(out.result.chart.len(), 4);
        assert!(out.result.chart.iter().all(|r| r.values.len() == 2));
        assert_eq!(out.result.summaries.len(), 2);
        assert_eq!(out.result.summaries[1].method_label, "");
    }

    #[test]
    fn test_compare_rejects_duplicate_ids() {
        let input = ComparisonInput {
            records: vec![flat(1, dec!(100000)), flat(1, dec!(90000))],
            parameters: params(3),
        };
        assert!(compare_investments(&input).is_err());
    }

    #[test]
    fn test_compare_rejects_empty() {
        let input = ComparisonInput {
            records: vec![],
            parameters: params(3),
        };
        assert!(compare_investments(&input).is_err());
    }

    #[test]
    fn test_long_loan_and_high_ltv_warn() {
        let record = InvestmentRecord {
            loan_amount: Some(dec!(90000)),
            interest_rate_pct: Some(dec!(4)),
            loan_term_years: Some(30),
            ..InvestmentRecord::new(5, InvestmentKind::PropertyLoan, dec!(100000))
        };
        let out = project_investment(&ProjectionInput {
            record,
            parameters: params(10),
        })
        .unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("outlasts")));
        assert!(out.warnings.iter().any(|w| w.contains("LTV")));
    }

    #[test]
    fn test_ignored_fields_on_index_warn() {
        let record = InvestmentRecord {
            calculation_method: Some(CalculationMethod::Roi),
            monthly_rent: Some(dec!(500)),
            ..InvestmentRecord::new(6, InvestmentKind::IndexCash, dec!(1000))
        };
        let out = project_investment(&ProjectionInput {
            record,
            parameters: params(2),
        })
        .unwrap();
        assert_eq!(out.warnings.len(), 2);
    }

    #[test]
    fn test_comparison_summary_serializes_flat() {
        let input = ComparisonInput {
            records: vec![flat(1, dec!(100000))],
            parameters: params(1),
        };
        let out = compare_investments(&input).unwrap();
        let json = serde_json::to_value(&out.result.summaries[0]).unwrap();
        assert_eq!(json["key"], "investment-1");
        assert!(json.get("final_value").is_some());
    }
}

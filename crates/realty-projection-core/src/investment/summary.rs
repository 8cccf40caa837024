use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::composition::compose;
use super::compounding::{ProjectionContext, ProjectionState};
use super::record::{InvestmentRecord, ProjectionParameters};
use crate::error::RealtyError;
use crate::types::{Money, Percent};
use crate::RealtyResult;

/// Whole-horizon aggregates for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub initial_value: Money,
    pub years: u32,
    /// Composed value in the final year (same as the last series point)
    pub final_value: Money,
    /// Running value net of upkeep, minus initial amount. Rent and loan
    /// payments are not part of it, so it can differ from
    /// `final_value - initial_value`.
    pub total_appreciation: Money,
    pub total_rent_income: Money,
    pub total_maintenance: Money,
    /// Interest over the full loan term
    pub total_loan_interest: Money,
    pub downpayment: Money,
    pub loan_term_years: u32,
    pub loan_amount: Money,
    /// Principal plus interest paid within the horizon
    pub total_loan_paid: Money,
    /// Interest paid within the horizon
    pub total_interest_paid: Money,
    /// Sum of monthly contributions (index_monthly only)
    pub total_contributions: Money,
    /// `(final_value - initial_value) / initial_value * 100`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_pct: Option<Percent>,
}

pub fn generate_summary(
    record: &InvestmentRecord,
    params: &ProjectionParameters,
) -> RealtyResult<SummaryResult> {
    let ctx = ProjectionContext::resolve(record, params)?;
    log::debug!(
        "summary: record {} ({:?}) over {} years",
        record.id,
        ctx.kind,
        ctx.years
    );

    let mut state = ProjectionState::initial(&ctx);
    for _ in 0..ctx.years {
        state.advance(&ctx)?;
    }

    let final_value = compose(ctx.kind, ctx.method, &state.components())?;

    let loan_amount = ctx.loan_amount();
    let (total_loan_interest, loan_term_years) = match ctx.loan.as_ref() {
        Some(loan) => (loan.total_interest(), loan.term_years),
        None => (Decimal::ZERO, 0),
    };

    let return_pct = if ctx.initial_amount.is_zero() {
        None
    } else {
        let pct = final_value
            .checked_sub(ctx.initial_amount)
            .and_then(|gain| gain.checked_div(ctx.initial_amount))
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
            .ok_or_else(|| RealtyError::overflow("return percentage"))?;
        Some(pct)
    };

    Ok(SummaryResult {
        initial_value: ctx.initial_amount,
        years: ctx.years,
        final_value,
        total_appreciation: state.current_value - state.cumulative_maintenance - ctx.initial_amount,
        total_rent_income: state.cumulative_rent,
        total_maintenance: state.cumulative_maintenance,
        total_loan_interest,
        downpayment: ctx.initial_amount - loan_amount,
        loan_term_years,
        loan_amount,
        total_loan_paid: state.cumulative_loan_paid(),
        total_interest_paid: state.cumulative_interest_paid(),
        total_contributions: state.cumulative_contributions,
        return_pct,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::record::{CalculationMethod, InvestmentKind};
    use crate::investment::series::generate_series;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn params(years: u32) -> ProjectionParameters {
        ProjectionParameters {
            years,
            ..ProjectionParameters::default()
        }
    }

    fn leveraged_property() -> InvestmentRecord {
        InvestmentRecord {
            calculation_method: Some(CalculationMethod::RoiPlusAppreciationMinusMaintenance),
            monthly_rent: Some(dec!(700)),
            property_appreciation_pct: Some(dec!(2)),
            maintenance_cost_per_sqm_per_year: Some(dec!(8)),
            area_sqm: Some(dec!(60)),
            loan_amount: Some(dec!(100000)),
            interest_rate_pct: Some(dec!(5)),
            loan_term_years: Some(20),
            ..InvestmentRecord::new(1, InvestmentKind::PropertyLoan, dec!(180000))
        }
    }

    #[test]
    fn test_loan_summary_fields() {
        let summary = generate_summary(&leveraged_property(), &params(10)).unwrap();
        assert_eq!(summary.loan_amount, dec!(100000));
        assert_eq!(summary.downpayment, dec!(80000));
        assert_eq!(summary.loan_term_years, 20);
        assert!((summary.total_loan_interest - dec!(58389.37)).abs() < dec!(0.01));
        // Ten of twenty yearly payments made
        let half_of_total = (dec!(100000) + summary.total_loan_interest) / dec!(2);
        assert!((summary.total_loan_paid - half_of_total).abs() < dec!(0.01));
    }

    #[test]
    fn test_final_value_matches_series() {
        let record = leveraged_property();
        let series = generate_series(&record, &params(10)).unwrap();
        let summary = generate_summary(&record, &params(10)).unwrap();
        assert_eq!(summary.final_value, series[10].value);
    }

    #[test]
    fn test_appreciation_is_growth_only() {
        let record = InvestmentRecord {
            calculation_method: Some(CalculationMethod::RoiPlusAppreciation),
            ..leveraged_property()
        };
        let summary = generate_summary(&record, &params(10)).unwrap();
        let growth_only = dec!(180000) * dec!(1.02).powu(10) - dec!(180000);
        assert!((summary.total_appreciation - growth_only).abs() < dec!(0.0001));
        // Series year-N value folds in rent
        assert_ne!(
            summary.total_appreciation,
            summary.final_value - summary.initial_value
        );
    }

    #[test]
    fn test_appreciation_net_of_maintenance() {
        let record = InvestmentRecord {
            calculation_method: Some(CalculationMethod::AppreciationMinusMaintenance),
            ..leveraged_property()
        };
        let summary = generate_summary(&record, &params(1)).unwrap();
        // 180000 * 1.02 - 480
        assert_eq!(summary.total_appreciation, dec!(3120));
        assert_eq!(summary.final_value - summary.initial_value, dec!(3120));
    }

    #[test]
    fn test_cash_kind_has_no_loan_terms() {
        let mut record = leveraged_property();
        record.kind = InvestmentKind::PropertyCash;
        let summary = generate_summary(&record, &params(5)).unwrap();
        assert!(summary.loan_amount.is_zero());
        assert!(summary.total_loan_interest.is_zero());
        assert_eq!(summary.loan_term_years, 0);
        assert_eq!(summary.downpayment, dec!(180000));
    }

    #[test]
    fn test_return_pct_absent_for_zero_initial() {
        let mut record = InvestmentRecord::new(2, InvestmentKind::IndexMonthly, Decimal::ZERO);
        record.monthly_contribution = Some(dec!(50));
        let summary = generate_summary(&record, &params(2)).unwrap();
        assert!(summary.return_pct.is_none());
        assert_eq!(summary.total_contributions, dec!(1200));
    }
}

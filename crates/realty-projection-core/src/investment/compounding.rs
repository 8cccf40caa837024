use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use super::composition::ValueComponents;
use super::record::{CalculationMethod, InvestmentKind, InvestmentRecord, ProjectionParameters};
use crate::error::RealtyError;
use crate::mortgage::{LoanRepayment, LoanSchedule};
use crate::types::{Money, Rate};
use crate::RealtyResult;

const MONTHS_PER_YEAR: u32 = 12;

fn grow(value: Money, rate: Rate) -> Option<Money> {
    value.checked_mul(Decimal::ONE + rate)
}

/// Record and parameters resolved into the per-year rates the loop needs.
/// Built once per run; validation happens here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionContext {
    pub id: u64,
    pub kind: InvestmentKind,
    pub method: CalculationMethod,
    pub years: u32,
    pub initial_amount: Money,
    /// Yearly property appreciation as a fraction
    pub appreciation_rate: Rate,
    /// Yearly index-fund return as a fraction
    pub benchmark_rate: Rate,
    /// `monthly_rent * 12 * (1 - rent_tax_rate)`
    pub yearly_net_rent: Money,
    /// `maintenance_cost_per_sqm_per_year * area_sqm`
    pub yearly_maintenance_cost: Money,
    pub monthly_contribution: Money,
    pub loan: Option<LoanSchedule>,
}

/// Running accumulators after `year` compounding steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionState {
    pub year: u32,
    /// Running value (appreciation or fund return, plus contributions). For
    /// property kinds it is gross of `cumulative_maintenance`.
    pub current_value: Money,
    pub cumulative_rent: Money,
    pub cumulative_maintenance: Money,
    pub cumulative_contributions: Money,
    #[serde(skip)]
    pub repayment: Option<LoanRepayment>,
}

impl ProjectionContext {
    pub fn resolve(
        record: &InvestmentRecord,
        params: &ProjectionParameters,
    ) -> RealtyResult<Self> {
        params.validate()?;
        record.validate()?;

        let kind = record.kind;
        let zero = Decimal::ZERO;

        let (appreciation_rate, yearly_net_rent, yearly_maintenance_cost) = if kind.is_property() {
            let appreciation_pct = record
                .property_appreciation_pct
                .unwrap_or(params.base_appreciation_pct);
            let monthly_rent = record.monthly_rent.unwrap_or(zero);
            let yearly_net_rent = monthly_rent
                .checked_mul(dec!(12))
                .and_then(|v| v.checked_mul(Decimal::ONE - params.rent_tax_rate))
                .ok_or_else(|| RealtyError::overflow("yearly net rent"))?;
            let maintenance = record
                .maintenance_cost_per_sqm_per_year
                .unwrap_or(zero)
                .checked_mul(record.area_sqm.unwrap_or(zero))
                .ok_or_else(|| RealtyError::overflow("yearly maintenance cost"))?;
            (appreciation_pct / dec!(100), yearly_net_rent, maintenance)
        } else {
            (zero, zero, zero)
        };

        let benchmark_rate = if kind.is_property() {
            zero
        } else {
            record
                .benchmark_return_pct
                .unwrap_or(params.benchmark_return_pct)
                / dec!(100)
        };

        let monthly_contribution = match kind {
            InvestmentKind::IndexMonthly => record.monthly_contribution.unwrap_or(zero),
            InvestmentKind::PropertyCash
            | InvestmentKind::PropertyLoan
            | InvestmentKind::IndexCash
            | InvestmentKind::IndexLoan => zero,
        };

        let loan_amount = record.effective_loan_amount();
        let loan = if loan_amount > zero {
            Some(LoanSchedule::new(
                loan_amount,
                record.interest_rate_pct.unwrap_or(zero),
                record.loan_term_years.unwrap_or(0),
            )?)
        } else {
            None
        };

        Ok(ProjectionContext {
            id: record.id,
            kind,
            method: record.method(),
            years: params.years,
            initial_amount: record.initial_amount,
            appreciation_rate,
            benchmark_rate,
            yearly_net_rent,
            yearly_maintenance_cost,
            monthly_contribution,
            loan,
        })
    }

    pub fn loan_amount(&self) -> Money {
        self.loan.map(|l| l.principal).unwrap_or(Decimal::ZERO)
    }
}

impl ProjectionState {
    /// Year 0: the initial amount, nothing accrued.
    pub fn initial(ctx: &ProjectionContext) -> Self {
        ProjectionState {
            year: 0,
            current_value: ctx.initial_amount,
            cumulative_rent: Decimal::ZERO,
            cumulative_maintenance: Decimal::ZERO,
            cumulative_contributions: Decimal::ZERO,
            repayment: ctx.loan.as_ref().map(LoanRepayment::start),
        }
    }

    /// Advance every accumulator by exactly one year.
    pub fn advance(&mut self, ctx: &ProjectionContext) -> RealtyResult<()> {
        match ctx.kind {
            InvestmentKind::PropertyCash | InvestmentKind::PropertyLoan => {
                self.advance_property(ctx)?
            }
            InvestmentKind::IndexMonthly => self.advance_index_monthly(ctx)?,
            InvestmentKind::IndexCash | InvestmentKind::IndexLoan => {
                self.current_value = grow(self.current_value, ctx.benchmark_rate)
                    .ok_or_else(|| self.overflow(ctx, "index value"))?;
            }
        }

        if let (Some(repayment), Some(loan)) = (self.repayment.as_mut(), ctx.loan.as_ref()) {
            repayment.pay_year(loan);
        }

        self.year += 1;
        Ok(())
    }

    /// `current_value` stays gross of upkeep so the composition step can
    /// subtract the cumulative figure. Growth compounds on the net base.
    fn advance_property(&mut self, ctx: &ProjectionContext) -> RealtyResult<()> {
        let growth = if ctx.method.includes_appreciation() {
            ctx.appreciation_rate
        } else {
            Decimal::ZERO
        };
        let prior_maintenance = self.cumulative_maintenance;
        let base = self.current_value - prior_maintenance;
        let grown = grow(base, growth).ok_or_else(|| self.overflow(ctx, "property value"))?;

        if ctx.method.includes_rent() {
            self.cumulative_rent = self
                .cumulative_rent
                .checked_add(ctx.yearly_net_rent)
                .ok_or_else(|| self.overflow(ctx, "cumulative rent"))?;
        }

        let mut deduction = Decimal::ZERO;
        if ctx.method.deducts_maintenance()
            && !ctx.yearly_maintenance_cost.is_zero()
            && grown > Decimal::ZERO
        {
            // Share of this year's grown base eaten by upkeep, never above all of it
            let maintenance_pct = (ctx.yearly_maintenance_cost / grown).min(Decimal::ONE);
            deduction = grown * maintenance_pct;
        }

        self.cumulative_maintenance = prior_maintenance
            .checked_add(deduction)
            .ok_or_else(|| self.overflow(ctx, "cumulative maintenance"))?;
        self.current_value = grown
            .checked_add(prior_maintenance)
            .ok_or_else(|| self.overflow(ctx, "property value"))?;
        Ok(())
    }

    fn advance_index_monthly(&mut self, ctx: &ProjectionContext) -> RealtyResult<()> {
        let monthly_rate = ctx.benchmark_rate / dec!(12);
        for _ in 0..MONTHS_PER_YEAR {
            // Contribution lands after the month's growth
            self.current_value = grow(self.current_value, monthly_rate)
                .and_then(|v| v.checked_add(ctx.monthly_contribution))
                .ok_or_else(|| self.overflow(ctx, "index value"))?;
            self.cumulative_contributions = self
                .cumulative_contributions
                .checked_add(ctx.monthly_contribution)
                .ok_or_else(|| self.overflow(ctx, "cumulative contributions"))?;
        }
        Ok(())
    }

    fn overflow(&self, ctx: &ProjectionContext, what: &str) -> RealtyError {
        RealtyError::overflow(format!(
            "{what} for record {} in year {}",
            ctx.id,
            self.year + 1
        ))
    }

    pub fn cumulative_loan_paid(&self) -> Money {
        self.repayment
            .map(|r| r.total_paid)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cumulative_interest_paid(&self) -> Money {
        self.repayment
            .map(|r| r.interest_paid)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn components(&self) -> ValueComponents {
        ValueComponents {
            current_value: self.current_value,
            cumulative_rent: self.cumulative_rent,
            cumulative_maintenance: self.cumulative_maintenance,
            cumulative_loan_paid: self.cumulative_loan_paid(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

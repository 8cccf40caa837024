use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RealtyError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyResult;

const MONTHS_PER_YEAR: u32 = 12;

/// Longest loan term accepted, in years.
pub const MAX_LOAN_TERM_YEARS: u32 = 100;

/// Balances below this are treated as fully repaid (decimal rounding residue).
const BALANCE_EPSILON: Decimal = dec!(0.000001);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for a standalone mortgage analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    /// Amount borrowed
    pub principal: Money,
    /// Nominal annual interest rate as a percentage (5 = 5%)
    pub annual_rate_pct: Percent,
    /// Amortization term in whole years
    pub term_years: u32,
}

/// One year of the amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub year: u32,
    pub principal_paid: Money,
    pub interest_paid: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageOutput {
    pub monthly_payment: Money,
    pub yearly_payment: Money,
    pub total_repaid: Money,
    pub total_interest: Money,
    pub schedule: Vec<AmortizationRow>,
}

/// Level-payment figures derived once per loan and reused by every projection year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub term_years: u32,
    pub monthly_payment: Money,
    /// `monthly_payment * 12`
    pub yearly_payment: Money,
    /// Everything repaid over the full term, principal plus interest
    pub total_with_interest: Money,
    /// Interest share of one year of payments, spread evenly over the term
    pub yearly_interest: Money,
}

/// Running repayment state of a [`LoanSchedule`] inside a projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoanRepayment {
    /// Principal plus interest still owed
    pub remaining: Money,
    /// Interest still owed
    pub remaining_interest: Money,
    /// Cumulative principal plus interest paid so far
    pub total_paid: Money,
    /// Cumulative interest paid so far
    pub interest_paid: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Level monthly payment that fully amortises `principal` over `term_years`
/// at `annual_rate_pct` compounded monthly:
/// P * r(1+r)^n / ((1+r)^n - 1), with r = rate / 12 / 100 and n = years * 12.
///
/// A zero rate amortises straight-line (`principal / n`). A zero term has no
/// defined payment and is rejected.
pub fn calculate_mortgage_payment(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: u32,
) -> RealtyResult<Money> {
    if principal < Decimal::ZERO {
        return Err(RealtyError::invalid(
            "principal",
            "Loan principal cannot be negative",
        ));
    }
    if annual_rate_pct < Decimal::ZERO {
        return Err(RealtyError::invalid(
            "annual_rate_pct",
            "Interest rate cannot be negative",
        ));
    }
    if term_years == 0 {
        return Err(RealtyError::UndefinedAmortization(
            "loan term must be at least 1 year".into(),
        ));
    }
    if term_years > MAX_LOAN_TERM_YEARS {
        return Err(RealtyError::invalid(
            "term_years",
            format!("Loan term must not exceed {MAX_LOAN_TERM_YEARS} years"),
        ));
    }

    let total_months = term_years * MONTHS_PER_YEAR;
    let monthly_rate = annual_rate_pct / dec!(12) / dec!(100);

    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return Ok(principal / Decimal::from(total_months));
    }

    let compound = (Decimal::ONE + monthly_rate)
        .checked_powu(u64::from(total_months))
        .ok_or_else(|| {
            RealtyError::invalid(
                "annual_rate_pct",
                format!("Compound factor overflows for {annual_rate_pct}% over {term_years} years"),
            )
        })?;

    let denominator = compound - Decimal::ONE;
    if denominator.is_zero() {
        return Err(RealtyError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    principal
        .checked_mul(monthly_rate)
        .and_then(|v| v.checked_mul(compound))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| RealtyError::overflow("mortgage payment"))
}

impl LoanSchedule {
    pub fn new(principal: Money, annual_rate_pct: Percent, term_years: u32) -> RealtyResult<Self> {
        let monthly_payment = calculate_mortgage_payment(principal, annual_rate_pct, term_years)?;
        let yearly_payment = monthly_payment
            .checked_mul(Decimal::from(MONTHS_PER_YEAR))
            .ok_or_else(|| RealtyError::overflow("yearly loan payment"))?;

        let total_with_interest = if annual_rate_pct.is_zero() {
            principal
        } else {
            yearly_payment
                .checked_mul(Decimal::from(term_years))
                .ok_or_else(|| RealtyError::overflow("total loan repayment"))?
        };
        let yearly_interest = (total_with_interest - principal) / Decimal::from(term_years);

        Ok(LoanSchedule {
            principal,
            annual_rate_pct,
            term_years,
            monthly_payment,
            yearly_payment,
            total_with_interest,
            yearly_interest,
        })
    }

    pub fn total_interest(&self) -> Money {
        self.total_with_interest - self.principal
    }
}

impl LoanRepayment {
    pub fn start(schedule: &LoanSchedule) -> Self {
        LoanRepayment {
            remaining: schedule.total_with_interest,
            remaining_interest: schedule.total_interest(),
            total_paid: Decimal::ZERO,
            interest_paid: Decimal::ZERO,
        }
    }

    pub fn is_repaid(&self) -> bool {
        self.remaining <= Decimal::ZERO
    }

    /// Advance one year. Payments are capped at what is still owed, so the
    /// balance never goes negative. Returns the amount paid this year.
    pub fn pay_year(&mut self, schedule: &LoanSchedule) -> Money {
        if self.is_repaid() {
            return Decimal::ZERO;
        }

        let payment = schedule.yearly_payment.min(self.remaining);
        self.remaining -= payment;
        self.total_paid += payment;

        let interest = schedule.yearly_interest.min(self.remaining_interest);
        self.remaining_interest -= interest;
        self.interest_paid += interest;

        if self.remaining < BALANCE_EPSILON {
            self.remaining = Decimal::ZERO;
        }

        payment
    }
}

/// Payment figures plus a yearly amortization schedule for one loan.
pub fn analyze_mortgage(
    input: &MortgageInput,
) -> RealtyResult<ComputationOutput<MortgageOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let loan = LoanSchedule::new(input.principal, input.annual_rate_pct, input.term_years)?;
    let schedule = build_amortization_schedule(&loan);

    let total_repaid = loan.total_with_interest;
    let total_interest = loan.total_interest();

    if total_interest > input.principal {
        warnings.push(format!(
            "Total interest {:.2} exceeds the amount borrowed",
            total_interest
        ));
    }

    let output = MortgageOutput {
        monthly_payment: loan.monthly_payment,
        yearly_payment: loan.yearly_payment,
        total_repaid,
        total_interest,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Level-Payment Mortgage Amortization",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Amortization schedule
// ---------------------------------------------------------------------------

fn build_amortization_schedule(loan: &LoanSchedule) -> Vec<AmortizationRow> {
    let monthly_rate = loan.annual_rate_pct / dec!(12) / dec!(100);
    let mut balance = loan.principal;
    let mut rows = Vec::with_capacity(loan.term_years as usize);

    for year in 1..=loan.term_years {
        let mut principal_paid = Decimal::ZERO;
        let mut interest_paid = Decimal::ZERO;

        for _ in 0..MONTHS_PER_YEAR {
            if balance <= Decimal::ZERO {
                break;
            }
            let interest = balance * monthly_rate;
            let principal_part = (loan.monthly_payment - interest).min(balance);
            balance -= principal_part;
            principal_paid += principal_part;
            interest_paid += interest;
        }

        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        rows.push(AmortizationRow {
            year,
            principal_paid,
            interest_paid,
            closing_balance: balance,
        });
    }

    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

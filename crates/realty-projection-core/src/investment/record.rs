use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RealtyError;
use crate::mortgage::MAX_LOAN_TERM_YEARS;
use crate::types::{Money, Percent, Rate};
use crate::RealtyResult;

pub const DEFAULT_PROJECTION_YEARS: u32 = 30;
pub const DEFAULT_RENT_TAX_RATE: Rate = dec!(0.13);
pub const DEFAULT_BENCHMARK_RETURN_PCT: Percent = dec!(10);
pub const DEFAULT_BASE_APPRECIATION_PCT: Percent = dec!(3);

/// Longest horizon accepted by the engine.
pub const MAX_PROJECTION_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Kind & method
// ---------------------------------------------------------------------------

/// Fixed category of an investment. Never changes after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentKind {
    /// Property bought outright
    PropertyCash,
    /// Property bought with a bank loan
    PropertyLoan,
    /// Lump sum into an index fund
    #[serde(alias = "sp500_cash")]
    IndexCash,
    /// Lump sum into an index fund, partly borrowed
    #[serde(alias = "sp500_loan")]
    IndexLoan,
    /// Index fund with a recurring monthly contribution
    #[serde(alias = "sp500_monthly")]
    IndexMonthly,
}

impl InvestmentKind {
    pub fn is_property(self) -> bool {
        match self {
            InvestmentKind::PropertyCash | InvestmentKind::PropertyLoan => true,
            InvestmentKind::IndexCash | InvestmentKind::IndexLoan | InvestmentKind::IndexMonthly => {
                false
            }
        }
    }

    pub fn has_loan(self) -> bool {
        match self {
            InvestmentKind::PropertyLoan | InvestmentKind::IndexLoan => true,
            InvestmentKind::PropertyCash | InvestmentKind::IndexCash | InvestmentKind::IndexMonthly => {
                false
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InvestmentKind::PropertyCash => "Property Bought with Cash",
            InvestmentKind::PropertyLoan => "Property Bought with Bank Loan",
            InvestmentKind::IndexCash => "Index Fund Investment with Cash",
            InvestmentKind::IndexLoan => "Index Fund Investment with Bank Loan",
            InvestmentKind::IndexMonthly => "Index Fund Monthly Contribution",
        }
    }
}

/// Which return components feed a property's reported value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    Roi,
    RoiMinusMaintenance,
    #[default]
    Appreciation,
    RoiPlusAppreciation,
    AppreciationMinusMaintenance,
    RoiPlusAppreciationMinusMaintenance,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 6] = [
        CalculationMethod::Roi,
        CalculationMethod::RoiMinusMaintenance,
        CalculationMethod::Appreciation,
        CalculationMethod::RoiPlusAppreciation,
        CalculationMethod::AppreciationMinusMaintenance,
        CalculationMethod::RoiPlusAppreciationMinusMaintenance,
    ];

    pub fn includes_rent(self) -> bool {
        match self {
            CalculationMethod::Roi
            | CalculationMethod::RoiMinusMaintenance
            | CalculationMethod::RoiPlusAppreciation
            | CalculationMethod::RoiPlusAppreciationMinusMaintenance => true,
            CalculationMethod::Appreciation | CalculationMethod::AppreciationMinusMaintenance => {
                false
            }
        }
    }

    pub fn includes_appreciation(self) -> bool {
        match self {
            CalculationMethod::Appreciation
            | CalculationMethod::RoiPlusAppreciation
            | CalculationMethod::AppreciationMinusMaintenance
            | CalculationMethod::RoiPlusAppreciationMinusMaintenance => true,
            CalculationMethod::Roi | CalculationMethod::RoiMinusMaintenance => false,
        }
    }

    pub fn deducts_maintenance(self) -> bool {
        match self {
            CalculationMethod::RoiMinusMaintenance
            | CalculationMethod::AppreciationMinusMaintenance
            | CalculationMethod::RoiPlusAppreciationMinusMaintenance => true,
            CalculationMethod::Roi
            | CalculationMethod::Appreciation
            | CalculationMethod::RoiPlusAppreciation => false,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CalculationMethod::Roi => "ROI Only",
            CalculationMethod::RoiMinusMaintenance => "ROI - Maintenance",
            CalculationMethod::Appreciation => "Appreciation Only",
            CalculationMethod::RoiPlusAppreciation => "ROI + Appreciation",
            CalculationMethod::AppreciationMinusMaintenance => "Appreciation - Maintenance",
            CalculationMethod::RoiPlusAppreciationMinusMaintenance => {
                "ROI + Appreciation - Maintenance"
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Record & parameters
// ---------------------------------------------------------------------------

/// A candidate property or alternative investment.
///
/// Only the fields relevant to `kind` are read; the rest are ignored. Missing
/// optional amounts count as zero, missing rates fall back to
/// [`ProjectionParameters`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub kind: InvestmentKind,
    /// Purchase price plus renovation for property, lump sum for index funds
    pub initial_amount: Money,
    /// Property kinds only; unset means `appreciation`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation_method: Option<CalculationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_rent: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_appreciation_pct: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_return_pct: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_cost_per_sqm_per_year: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_sqm: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_amount: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interest_rate_pct: Option<Percent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan_term_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_contribution: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_sold: bool,
}

/// Horizon and shared defaults threaded through every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionParameters {
    pub years: u32,
    /// Tax withheld from rent, as a fraction (0.13 = 13%)
    pub rent_tax_rate: Rate,
    /// Index-fund return used when a record carries none
    pub benchmark_return_pct: Percent,
    /// Property appreciation used when a record carries none
    pub base_appreciation_pct: Percent,
}

impl Default for ProjectionParameters {
    fn default() -> Self {
        ProjectionParameters {
            years: DEFAULT_PROJECTION_YEARS,
            rent_tax_rate: DEFAULT_RENT_TAX_RATE,
            benchmark_return_pct: DEFAULT_BENCHMARK_RETURN_PCT,
            base_appreciation_pct: DEFAULT_BASE_APPRECIATION_PCT,
        }
    }
}

/// One point of a projected value series. Year 0 is the initial state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyDataPoint {
    pub year: u32,
    pub value: Money,
}

impl InvestmentRecord {
    /// A record with only the required fields set.
    pub fn new(id: u64, kind: InvestmentKind, initial_amount: Money) -> Self {
        InvestmentRecord {
            id,
            name: String::new(),
            kind,
            initial_amount,
            calculation_method: None,
            monthly_rent: None,
            property_appreciation_pct: None,
            benchmark_return_pct: None,
            maintenance_cost_per_sqm_per_year: None,
            area_sqm: None,
            loan_amount: None,
            interest_rate_pct: None,
            loan_term_years: None,
            monthly_contribution: None,
            notes: None,
            link: None,
            tags: Vec::new(),
            is_favorite: false,
            is_sold: false,
        }
    }

    /// Key under which this record's values appear in merged chart rows.
    pub fn series_key(&self) -> String {
        format!("investment-{}", self.id)
    }

    pub fn method(&self) -> CalculationMethod {
        self.calculation_method.unwrap_or_default()
    }

    /// Display label of the valuation method; empty for index kinds.
    pub fn method_label(&self) -> &'static str {
        if self.kind.is_property() {
            self.method().label()
        } else {
            ""
        }
    }

    /// Borrowed amount, zero for kinds that carry no loan.
    pub fn effective_loan_amount(&self) -> Money {
        if self.kind.has_loan() {
            self.loan_amount.unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// Reject records whose figures cannot be projected.
    pub fn validate(&self) -> RealtyResult<()> {
        if self.initial_amount < Decimal::ZERO {
            return Err(RealtyError::invalid(
                "initial_amount",
                "Initial amount cannot be negative",
            ));
        }

        if self.kind.is_property() {
            self.validate_property()?;
        } else {
            check_non_negative("benchmark_return_pct", self.benchmark_return_pct)?;
            if self.kind == InvestmentKind::IndexMonthly {
                check_non_negative("monthly_contribution", self.monthly_contribution)?;
            }
        }

        if self.kind.has_loan() {
            self.validate_loan()?;
        }

        Ok(())
    }

    fn validate_property(&self) -> RealtyResult<()> {
        if self.initial_amount.is_zero() {
            return Err(RealtyError::invalid(
                "initial_amount",
                "Property value must be positive",
            ));
        }
        check_non_negative("monthly_rent", self.monthly_rent)?;
        check_non_negative("property_appreciation_pct", self.property_appreciation_pct)?;
        check_non_negative(
            "maintenance_cost_per_sqm_per_year",
            self.maintenance_cost_per_sqm_per_year,
        )?;
        check_non_negative("area_sqm", self.area_sqm)?;

        let rate = self.maintenance_cost_per_sqm_per_year.unwrap_or(Decimal::ZERO);
        let area = self.area_sqm.unwrap_or(Decimal::ZERO);
        if rate > Decimal::ZERO && area.is_zero() {
            return Err(RealtyError::invalid(
                "area_sqm",
                "Area must be positive when a maintenance rate is set",
            ));
        }

        Ok(())
    }

    fn validate_loan(&self) -> RealtyResult<()> {
        let loan = self.loan_amount.unwrap_or(Decimal::ZERO);
        if loan < Decimal::ZERO {
            return Err(RealtyError::invalid("loan_amount", "Loan cannot be negative"));
        }
        if loan > self.initial_amount {
            return Err(RealtyError::invalid(
                "loan_amount",
                format!(
                    "Loan {loan} exceeds initial amount {}",
                    self.initial_amount
                ),
            ));
        }
        check_non_negative("interest_rate_pct", self.interest_rate_pct)?;
        if loan > Decimal::ZERO && self.loan_term_years.unwrap_or(0) == 0 {
            return Err(RealtyError::UndefinedAmortization(format!(
                "record {} borrows {loan} without a loan term",
                self.id
            )));
        }
        if self.loan_term_years.unwrap_or(0) > MAX_LOAN_TERM_YEARS {
            return Err(RealtyError::invalid(
                "loan_term_years",
                format!("Loan term must not exceed {MAX_LOAN_TERM_YEARS} years"),
            ));
        }
        Ok(())
    }
}

impl ProjectionParameters {
    pub fn validate(&self) -> RealtyResult<()> {
        if self.years > MAX_PROJECTION_YEARS {
            return Err(RealtyError::invalid(
                "years",
                format!("Horizon must not exceed {MAX_PROJECTION_YEARS} years"),
            ));
        }
        if self.rent_tax_rate < Decimal::ZERO || self.rent_tax_rate > Decimal::ONE {
            return Err(RealtyError::invalid(
                "rent_tax_rate",
                "Rent tax rate must be between 0 and 1",
            ));
        }
        if self.benchmark_return_pct < Decimal::ZERO {
            return Err(RealtyError::invalid(
                "benchmark_return_pct",
                "Benchmark return cannot be negative",
            ));
        }
        if self.base_appreciation_pct < Decimal::ZERO {
            return Err(RealtyError::invalid(
                "base_appreciation_pct",
                "Base appreciation cannot be negative",
            ));
        }
        Ok(())
    }
}

fn check_non_negative(field: &str, value: Option<Decimal>) -> RealtyResult<()> {
    match value {
        Some(v) if v < Decimal::ZERO => {
            Err(RealtyError::invalid(field, "Value cannot be negative"))
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::record::{CalculationMethod, InvestmentKind};
use crate::error::RealtyError;
use crate::types::Money;
use crate::RealtyResult;

/// Accumulators that feed one reported value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueComponents {
    pub current_value: Money,
    pub cumulative_rent: Money,
    pub cumulative_maintenance: Money,
    pub cumulative_loan_paid: Money,
}

/// Reported value for one year.
///
/// Index kinds report the running value as-is. For property kinds the terms
/// depend on the method, and only `roi_plus_appreciation_minus_maintenance`
/// subtracts loan payments:
///
/// | method | value |
/// |---|---|
/// | `roi`, `roi_plus_appreciation` | value + rent |
/// | `roi_minus_maintenance` | value + rent - maintenance |
/// | `roi_plus_appreciation_minus_maintenance` | value + rent - loan paid - maintenance |
/// | `appreciation`, `appreciation_minus_maintenance` | value - maintenance |
pub fn compose(
    kind: InvestmentKind,
    method: CalculationMethod,
    c: &ValueComponents,
) -> RealtyResult<Money> {
    let with_rent = || c.current_value.checked_add(c.cumulative_rent);
    let value = match kind {
        InvestmentKind::IndexCash | InvestmentKind::IndexLoan | InvestmentKind::IndexMonthly => {
            Some(c.current_value)
        }
        InvestmentKind::PropertyCash | InvestmentKind::PropertyLoan => match method {
            CalculationMethod::Roi | CalculationMethod::RoiPlusAppreciation => with_rent(),
            CalculationMethod::RoiMinusMaintenance => {
                with_rent().and_then(|v| v.checked_sub(c.cumulative_maintenance))
            }
            CalculationMethod::RoiPlusAppreciationMinusMaintenance => with_rent()
                .and_then(|v| v.checked_sub(c.cumulative_loan_paid))
                .and_then(|v| v.checked_sub(c.cumulative_maintenance)),
            CalculationMethod::Appreciation | CalculationMethod::AppreciationMinusMaintenance => {
                c.current_value.checked_sub(c.cumulative_maintenance)
            }
        },
    };
    value.ok_or_else(|| RealtyError::overflow("reported value"))
}

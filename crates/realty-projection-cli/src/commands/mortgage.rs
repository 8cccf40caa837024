use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use realty_projection_core::mortgage::{analyze_mortgage, MortgageInput};

use crate::input;

/// Arguments for mortgage amortization
#[derive(Args)]
pub struct MortgageArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 5 for 5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = if let Some(ref path) = args.input {
        input::file::read_document(path)?
    } else if let (Some(principal), Some(rate), Some(term_years)) =
        (args.principal, args.rate, args.term_years)
    {
        MortgageInput {
            principal,
            annual_rate_pct: rate,
            term_years,
        }
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--principal, --rate and --term-years, --input <file.json>, or stdin required for mortgage"
                .into(),
        );
    };
    let result = analyze_mortgage(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

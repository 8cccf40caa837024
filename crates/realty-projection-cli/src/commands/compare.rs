use clap::Args;
use serde_json::Value;

use realty_projection_core::investment::{compare_investments, ComparisonInput};

use super::{layer_parameters, ParameterArgs};
use crate::input;

/// Arguments for a multi-investment comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Path to JSON or YAML input with `records` and optional `parameters`
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub parameters: ParameterArgs,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(mut doc) = input::read_document(args.input.as_deref())? else {
        return Err("--input <file.json> or stdin required for comparison".into());
    };
    // A bare array is taken as the record list
    if doc.is_array() {
        doc = serde_json::json!({ "records": doc });
    }
    layer_parameters(&mut doc, &args.parameters)?;

    let comparison_input: ComparisonInput = serde_json::from_value(doc)?;
    let result = compare_investments(&comparison_input)?;
    Ok(serde_json::to_value(result)?)
}

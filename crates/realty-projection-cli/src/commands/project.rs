use clap::Args;
use serde_json::Value;

use realty_projection_core::investment::{project_investment, ProjectionInput};

use super::{layer_parameters, ParameterArgs};
use crate::input;

/// Arguments for a single-investment projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON or YAML input with `record` and optional `parameters`
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub parameters: ParameterArgs,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(mut doc) = input::read_document(args.input.as_deref())? else {
        return Err("--input <file.json> or stdin required for projection".into());
    };
    layer_parameters(&mut doc, &args.parameters)?;

    let projection_input: ProjectionInput = serde_json::from_value(doc)?;
    let result = project_investment(&projection_input)?;
    Ok(serde_json::to_value(result)?)
}

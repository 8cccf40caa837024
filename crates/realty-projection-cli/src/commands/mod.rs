pub mod compare;
pub mod listing;
pub mod mortgage;
pub mod project;

use clap::Args;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use realty_projection_core::investment::ProjectionParameters;

use crate::input;

/// Projection settings shared by `project` and `compare`.
#[derive(Args, Debug, Default)]
pub struct ParameterArgs {
    /// JSON or YAML file with projection parameters
    #[arg(long)]
    pub params: Option<String>,

    /// Projection horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Tax withheld from rent as a fraction (e.g. 0.13 for 13%)
    #[arg(long)]
    pub rent_tax_rate: Option<Decimal>,

    /// Default index-fund return in percent (e.g. 10)
    #[arg(long)]
    pub benchmark_return: Option<Decimal>,

    /// Default property appreciation in percent (e.g. 3)
    #[arg(long)]
    pub base_appreciation: Option<Decimal>,
}

/// Layer parameters into `doc["parameters"]`: defaults, then the `--params`
/// file, then whatever the document already carries, then individual flags.
pub fn layer_parameters(
    doc: &mut Value,
    args: &ParameterArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let Value::Object(doc_map) = doc else {
        return Err("input document must be an object".into());
    };

    let mut layered = as_object(serde_json::to_value(ProjectionParameters::default())?);
    if let Some(ref path) = args.params {
        overlay(&mut layered, input::file::read_value(path)?, "--params file")?;
    }
    if let Some(embedded) = doc_map.remove("parameters") {
        overlay(&mut layered, embedded, "input parameters")?;
    }

    let mut params: ProjectionParameters = serde_json::from_value(Value::Object(layered))?;
    if let Some(years) = args.years {
        params.years = years;
    }
    if let Some(rate) = args.rent_tax_rate {
        params.rent_tax_rate = rate;
    }
    if let Some(pct) = args.benchmark_return {
        params.benchmark_return_pct = pct;
    }
    if let Some(pct) = args.base_appreciation {
        params.base_appreciation_pct = pct;
    }

    log::info!(
        "parameters: {} years, rent tax {}, benchmark {}%, appreciation {}%",
        params.years,
        params.rent_tax_rate,
        params.benchmark_return_pct,
        params.base_appreciation_pct
    );
    doc_map.insert("parameters".into(), serde_json::to_value(params)?);
    Ok(())
}

fn as_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn overlay(
    base: &mut Map<String, Value>,
    layer: Value,
    source: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    match layer {
        Value::Object(map) => {
            for (key, value) in map {
                base.insert(key, value);
            }
            Ok(())
        }
        Value::Null => Ok(()),
        _ => Err(format!("{source} must be an object").into()),
    }
}

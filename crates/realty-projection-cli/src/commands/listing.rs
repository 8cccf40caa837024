use clap::Args;
use serde_json::Value;

use realty_projection_core::property::{analyze_listing, ListingAnalysisInput, RentTable};

use crate::input;

/// Arguments for listing analysis
#[derive(Args)]
pub struct ListingArgs {
    /// Path to JSON or YAML listing, bare or wrapped as `{"listing": ...}`
    #[arg(long)]
    pub input: Option<String>,

    /// Reference rent table used when the listing has no rent of its own
    #[arg(long)]
    pub rent_table: Option<String>,
}

pub fn run_listing(args: ListingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(doc) = input::read_document(args.input.as_deref())? else {
        return Err("--input <file.json> or stdin required for listing analysis".into());
    };
    let mut listing_input: ListingAnalysisInput = if doc.get("listing").is_some() {
        serde_json::from_value(doc)?
    } else {
        ListingAnalysisInput {
            listing: serde_json::from_value(doc)?,
            rent_table: None,
        }
    };

    if let Some(ref path) = args.rent_table {
        let table: RentTable = input::file::read_document(path)?;
        log::info!("rent table covers {} cities", table.cities.len());
        listing_input.rent_table = Some(table);
    }

    let result = analyze_listing(&listing_input)?;
    Ok(serde_json::to_value(result)?)
}

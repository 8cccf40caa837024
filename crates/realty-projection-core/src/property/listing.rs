use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::rent_lookup::{lookup_average_rent, NoRentData, RentLookup, RentTable};
use crate::error::RealtyError;
use crate::investment::record::{CalculationMethod, InvestmentKind, InvestmentRecord};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::RealtyResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// An apartment for sale, as collected from a listing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyListing {
    pub id: u64,
    pub asking_price: Money,
    /// Price the buyer expects to pay after negotiation
    pub expected_price: Money,
    pub apartment_size_sqm: Decimal,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub renovation_cost: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_costs: Option<Money>,
    /// Rent quoted on the listing; zero when none was given
    #[serde(default)]
    pub monthly_rent: Money,
    /// Rent entered by the user, wins over every other figure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rent: Option<Money>,
    #[serde(default)]
    pub maintenance_cost_per_sqm: Money,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub is_sold: bool,
}

/// Where the effective monthly rent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentSource {
    Custom,
    Listing,
    Reference,
    #[serde(rename = "none")]
    Unavailable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingAnalysisInput {
    pub listing: PropertyListing,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rent_table: Option<RentTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingAnalysisOutput {
    pub effective_rent: Money,
    pub rent_source: RentSource,
    /// Expected price + additional costs + renovation
    pub total_investment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_sqm: Option<Money>,
    /// Discount of the expected price against the asking price, in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiation_discount_pct: Option<Percent>,
    pub yearly_maintenance: Money,
    pub gross_yield_pct: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payback_years: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Yield helpers
// ---------------------------------------------------------------------------

/// Yearly rent over total outlay, in percent.
pub fn gross_rental_yield(
    purchase_price: Money,
    monthly_rent: Money,
    additional_costs: Money,
    renovation_cost: Money,
) -> RealtyResult<Percent> {
    let total_investment = purchase_price + additional_costs + renovation_cost;
    if total_investment.is_zero() {
        return Err(RealtyError::DivisionByZero {
            context: "gross rental yield with zero total investment".into(),
        });
    }
    Ok(monthly_rent * dec!(12) / total_investment * dec!(100))
}

/// Years of gross rent needed to recover the outlay.
pub fn payback_years(yield_pct: Percent) -> Option<Decimal> {
    if yield_pct <= Decimal::ZERO {
        None
    } else {
        Some(dec!(100) / yield_pct)
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

impl PropertyListing {
    pub fn additional_costs(&self) -> Money {
        self.additional_costs.unwrap_or(Decimal::ZERO)
    }

    pub fn total_investment(&self) -> Money {
        self.expected_price + self.additional_costs() + self.renovation_cost
    }

    pub fn yearly_maintenance(&self) -> Money {
        self.maintenance_cost_per_sqm * self.apartment_size_sqm
    }

    /// Custom rent, then the listing's own figure, then the reference lookup.
    pub fn effective_rent(&self, lookup: &dyn RentLookup) -> (Money, RentSource) {
        if let Some(custom) = self.custom_rent {
            return (custom, RentSource::Custom);
        }
        if self.monthly_rent > Decimal::ZERO {
            return (self.monthly_rent, RentSource::Listing);
        }
        let reference =
            lookup_average_rent(lookup, &self.city, &self.district, self.apartment_size_sqm);
        if reference > Decimal::ZERO {
            (reference, RentSource::Reference)
        } else {
            (Decimal::ZERO, RentSource::Unavailable)
        }
    }

    pub fn validate(&self) -> RealtyResult<()> {
        let checks = [
            ("asking_price", self.asking_price),
            ("expected_price", self.expected_price),
            ("apartment_size_sqm", self.apartment_size_sqm),
            ("renovation_cost", self.renovation_cost),
            ("additional_costs", self.additional_costs()),
            ("monthly_rent", self.monthly_rent),
            ("custom_rent", self.custom_rent.unwrap_or(Decimal::ZERO)),
            ("maintenance_cost_per_sqm", self.maintenance_cost_per_sqm),
        ];
        for (field, value) in checks {
            if value < Decimal::ZERO {
                return Err(RealtyError::invalid(field, "Value cannot be negative"));
            }
        }
        Ok(())
    }

    /// Property-kind record seeded from this listing.
    ///
    /// The initial amount is expected price plus renovation; loan fields are
    /// left for the caller to fill in.
    pub fn to_investment_record(
        &self,
        id: u64,
        kind: InvestmentKind,
        method: CalculationMethod,
        lookup: &dyn RentLookup,
    ) -> RealtyResult<InvestmentRecord> {
        if !kind.is_property() {
            return Err(RealtyError::invalid(
                "kind",
                "A listing can only seed a property investment",
            ));
        }
        self.validate()?;

        let (rent, _) = self.effective_rent(lookup);
        let name = match (self.district.is_empty(), self.city.is_empty()) {
            (false, false) => format!("{}, {}", self.district, self.city),
            (false, true) => self.district.clone(),
            (true, false) => self.city.clone(),
            (true, true) => format!("Listing {}", self.id),
        };

        Ok(InvestmentRecord {
            name,
            calculation_method: Some(method),
            monthly_rent: Some(rent),
            maintenance_cost_per_sqm_per_year: Some(self.maintenance_cost_per_sqm),
            area_sqm: Some(self.apartment_size_sqm),
            notes: (!self.notes.is_empty()).then(|| self.notes.clone()),
            link: self.link.clone(),
            is_favorite: self.is_favorite,
            is_sold: self.is_sold,
            ..InvestmentRecord::new(id, kind, self.expected_price + self.renovation_cost)
        })
    }
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Rent, yield and price figures for one listing.
pub fn analyze_listing(
    input: &ListingAnalysisInput,
) -> RealtyResult<ComputationOutput<ListingAnalysisOutput>> {
    let start = Instant::now();
    let listing = &input.listing;
    listing.validate()?;

    let mut warnings: Vec<String> = Vec::new();

    let (effective_rent, rent_source) = match input.rent_table.as_ref() {
        Some(table) => listing.effective_rent(table),
        None => listing.effective_rent(&NoRentData),
    };
    if rent_source == RentSource::Unavailable {
        warnings.push(format!(
            "No rent figure for listing {}; yield is reported as zero",
            listing.id
        ));
    }

    let gross_yield_pct = gross_rental_yield(
        listing.expected_price,
        effective_rent,
        listing.additional_costs(),
        listing.renovation_cost,
    )?;

    let price_per_sqm = if listing.apartment_size_sqm.is_zero() {
        warnings.push("Apartment size is zero; price per sqm is not available".into());
        None
    } else {
        Some(listing.expected_price / listing.apartment_size_sqm)
    };

    let negotiation_discount_pct = if listing.asking_price.is_zero() {
        None
    } else {
        Some((listing.asking_price - listing.expected_price) / listing.asking_price * dec!(100))
    };
    if listing.expected_price > listing.asking_price {
        warnings.push("Expected price is above the asking price".into());
    }

    let output = ListingAnalysisOutput {
        effective_rent,
        rent_source,
        total_investment: listing.total_investment(),
        price_per_sqm,
        negotiation_discount_pct,
        yearly_maintenance: listing.yearly_maintenance(),
        gross_yield_pct,
        payback_years: payback_years(gross_yield_pct),
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Property Listing Gross Yield Analysis",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

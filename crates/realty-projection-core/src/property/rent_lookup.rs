use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Source of reference rents by location and apartment size.
pub trait RentLookup {
    /// Average monthly rent for the location and size, `None` if unknown.
    fn average_rent(&self, city: &str, district: &str, area_sqm: Decimal) -> Option<Money>;
}

/// Reference rent, zero when the lookup has no figure.
pub fn lookup_average_rent(
    lookup: &dyn RentLookup,
    city: &str,
    district: &str,
    area_sqm: Decimal,
) -> Money {
    lookup
        .average_rent(city, district, area_sqm)
        .unwrap_or(Decimal::ZERO)
}

/// Lookup with no data at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRentData;

impl RentLookup for NoRentData {
    fn average_rent(&self, _city: &str, _district: &str, _area_sqm: Decimal) -> Option<Money> {
        None
    }
}

/// One apartment-size band with per-district average rents. Only the
/// upper bound takes part in matching; `min_size_sqm` is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizeBracket {
    pub min_size_sqm: Decimal,
    pub max_size_sqm: Decimal,
    pub average_rents: BTreeMap<String, Money>,
}

/// City -> size brackets. Serialized as a plain map keyed by city name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RentTable {
    pub cities: BTreeMap<String, Vec<SizeBracket>>,
}

impl RentTable {
    pub fn from_json(json: &str) -> crate::RealtyResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn brackets(&self, city: &str) -> Option<&[SizeBracket]> {
        self.cities
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(city))
            .map(|(_, brackets)| brackets.as_slice())
    }

    /// Smallest bracket whose upper bound covers the area. The largest
    /// bracket is open-ended and catches everything above it.
    fn bracket_for(&self, city: &str, area_sqm: Decimal) -> Option<&SizeBracket> {
        let brackets = self.brackets(city)?;
        brackets
            .iter()
            .filter(|b| area_sqm <= b.max_size_sqm)
            .min_by_key(|b| b.max_size_sqm)
            .or_else(|| brackets.iter().max_by_key(|b| b.max_size_sqm))
    }
}

impl RentLookup for RentTable {
    /// Non-positive entries count as missing.
    fn average_rent(&self, city: &str, district: &str, area_sqm: Decimal) -> Option<Money> {
        let bracket = self.bracket_for(city, area_sqm)?;
        bracket
            .average_rents
            .get(district)
            .copied()
            .filter(|rent| *rent > Decimal::ZERO)
    }
}

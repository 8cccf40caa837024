pub mod listing;
pub mod rent_lookup;

pub use listing::{
    analyze_listing, gross_rental_yield, payback_years, ListingAnalysisInput,
    ListingAnalysisOutput, PropertyListing, RentSource,
};
pub use rent_lookup::{lookup_average_rent, NoRentData, RentLookup, RentTable, SizeBracket};

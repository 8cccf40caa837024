pub mod error;
pub mod mortgage;
pub mod types;

#[cfg(feature = "investment")]
pub mod investment;

#[cfg(feature = "property")]
pub mod property;

pub use error::RealtyError;
pub use types::*;

/// Standard result type for all realty-projection operations
pub type RealtyResult<T> = Result<T, RealtyError>;

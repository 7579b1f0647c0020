/// Upper price bound expressed in cents (999999.99)
pub const MAX_PRICE_CENTS: i64 = 99_999_999;

/// Prices are stored as NUMERIC(8, 2)
pub const PRICE_SCALE: u32 = 2;

/// Message returned with every 422 response
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

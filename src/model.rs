//! Canonical data model for scraped branches.
//!
//! The JSON and CSV writers and the extractor use this as the single source of truth.

use serde::{Deserialize, Serialize};

/// Brand name stamped on every record. Not read from the page.
pub const BRAND_NAME: &str = "Oriencoop";

/// One branch ("sucursal") as listed on a detail page.
///
/// `latlon` and `phones` are fixed-size so a record can never carry a missing coordinate
/// or phone; the extractor fails instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchRecord {
    /// Address text as it appears in the page markup.
    pub address: String,
    /// Coordinates in the order encoded by the map embed (`2d` value, then `3d` value).
    pub latlon: [f64; 2],
    pub name: String,
    /// Branch phone, then the two page-level contact numbers.
    pub phones: [String; 3],
    pub working_hours: String,
}

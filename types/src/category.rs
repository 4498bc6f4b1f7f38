//! Insurance claim categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The line of cover a claim is filed under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimCategory {
    Health,
    Vehicle,
    Travel,
    ProductWarranty,
    Pet,
    Agricultural,
}

impl ClaimCategory {
    pub const ALL: [ClaimCategory; 6] = [
        Self::Health,
        Self::Vehicle,
        Self::Travel,
        Self::ProductWarranty,
        Self::Pet,
        Self::Agricultural,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Vehicle => "vehicle",
            Self::Travel => "travel",
            Self::ProductWarranty => "product_warranty",
            Self::Pet => "pet",
            Self::Agricultural => "agricultural",
        }
    }
}

impl fmt::Display for ClaimCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

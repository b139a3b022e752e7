//! Borough canonicalization
//!
//! Every canonical record is tagged with one of the five boroughs. Free text
//! from upstream providers (including county spellings like "Kings" or
//! "Richmond") resolves through a fixed alias table; anything the table does
//! not know is rejected rather than guessed.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::record::GeoPoint;

/// The five New York City boroughs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Borough {
    Manhattan,
    Brooklyn,
    Queens,
    Bronx,
    #[serde(rename = "Staten Island")]
    StatenIsland,
}

/// Lowercased upstream spellings and the borough each resolves to.
///
/// County names map to their boroughs (New York County is Manhattan, Kings
/// is Brooklyn, Richmond is Staten Island). Matching is whole-string only;
/// there is deliberately no fuzzy or substring matching.
static ALIASES: &[(&str, Borough)] = &[
    ("manhattan", Borough::Manhattan),
    ("new york", Borough::Manhattan),
    ("new york county", Borough::Manhattan),
    ("ny county", Borough::Manhattan),
    ("brooklyn", Borough::Brooklyn),
    ("kings", Borough::Brooklyn),
    ("kings county", Borough::Brooklyn),
    ("queens", Borough::Queens),
    ("queens county", Borough::Queens),
    ("bronx", Borough::Bronx),
    ("the bronx", Borough::Bronx),
    ("bronx county", Borough::Bronx),
    ("staten island", Borough::StatenIsland),
    ("richmond", Borough::StatenIsland),
    ("richmond county", Borough::StatenIsland),
    ("si", Borough::StatenIsland),
];

impl Borough {
    /// All five boroughs, in the dashboard's display order.
    pub const ALL: [Borough; 5] = [
        Borough::Manhattan,
        Borough::Brooklyn,
        Borough::Queens,
        Borough::Bronx,
        Borough::StatenIsland,
    ];

    /// Canonical display name.
    pub fn name(&self) -> &'static str {
        match self {
            Borough::Manhattan => "Manhattan",
            Borough::Brooklyn => "Brooklyn",
            Borough::Queens => "Queens",
            Borough::Bronx => "Bronx",
            Borough::StatenIsland => "Staten Island",
        }
    }

    /// Resolve free text to a borough.
    ///
    /// Input is trimmed, checked against the canonical spellings, then
    /// lowercased and looked up in the alias table. `None` means the caller
    /// must reject the record; this function never substitutes a default.
    pub fn canonicalize(input: &str) -> Option<Borough> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        // Fast path: already-canonical spellings skip the lowercase pass.
        for borough in Borough::ALL {
            if trimmed == borough.name() {
                return Some(borough);
            }
        }

        let lowered = trimmed.to_lowercase();
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == lowered)
            .map(|(_, borough)| *borough)
    }

    /// Representative center point, used when a record carries no
    /// coordinates of its own.
    pub fn centroid(&self) -> GeoPoint {
        match self {
            Borough::Manhattan => GeoPoint { latitude: 40.7831, longitude: -73.9712 },
            Borough::Brooklyn => GeoPoint { latitude: 40.6782, longitude: -73.9442 },
            Borough::Queens => GeoPoint { latitude: 40.7282, longitude: -73.7949 },
            Borough::Bronx => GeoPoint { latitude: 40.8448, longitude: -73.8648 },
            Borough::StatenIsland => GeoPoint { latitude: 40.5795, longitude: -74.1502 },
        }
    }
}

impl fmt::Display for Borough {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

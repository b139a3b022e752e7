//! Synthetic fallback data
//!
//! When every strategy for a source fails, the executor asks this generator
//! for a schema-valid stand-in dataset, so downstream consumers never see an
//! empty or partial response. Structure (boroughs, categories, counts) is
//! deterministic; values come from a seedable RNG so tests can pin exact
//! output while production runs stay varied.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::metrics::{aqi, Pollutant};
use crate::models::borough::Borough;
use crate::models::record::{
    CanonicalRecord, Domain, GeoPoint, Measurement, RecordDetail, SYNTHETIC_PROVENANCE,
};
use crate::sources::SourceSpec;

/// Coordinate spread around a borough centroid, in degrees.
const CENTROID_JITTER: f64 = 0.02;

/// Health indicator templates: label, value range, unit.
const HEALTH_INDICATORS: &[(&str, f64, f64, &str)] = &[
    ("Obesity among adults", 18.0, 34.0, "percent of adults"),
    ("Physical activity among adults", 62.0, 82.0, "percent of adults"),
    ("Flu vaccination in the past year", 38.0, 62.0, "percent of adults"),
    ("Current smoking among adults", 8.0, 18.0, "percent of adults"),
    ("Diagnosed diabetes", 7.0, 16.0, "percent of adults"),
];

/// Typical urban concentration ranges per pollutant.
const POLLUTANT_RANGES: &[(Pollutant, f64, f64)] = &[
    (Pollutant::Pm25, 4.0, 28.0),
    (Pollutant::Ozone, 18.0, 68.0),
];

const FACILITY_KINDS: &[&str] = &[
    "Hospital",
    "Community Health Center",
    "Urgent Care",
    "Walk-In Clinic",
    "Diagnostic Center",
];

const FACILITY_STEMS: &[&str] = &[
    "Riverside", "Parkview", "Harbor", "Crossroads", "Lighthouse", "Meadow", "Summit", "Gateway",
];

const FACILITY_HOURS: &[&str] = &[
    "Mon-Fri 8am-6pm",
    "Mon-Sat 9am-5pm",
    "Daily 8am-8pm",
    "24 hours",
];

/// Generator of plausible stand-in records for a failed source.
pub struct SyntheticGenerator {
    seed: Option<u64>,
}

impl SyntheticGenerator {
    /// Generator with entropy-seeded values.
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Generator whose output is reproducible for a given source name and
    /// `as_of` timestamp.
    pub fn seeded(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }

    /// Produce `spec.synthetic_count` records for the source.
    ///
    /// Boroughs rotate round-robin so every borough appears once the count
    /// reaches five; categories rotate through the domain's templates.
    pub fn generate(&self, spec: &SourceSpec, as_of: DateTime<Utc>) -> Vec<CanonicalRecord> {
        let mut rng = self.rng_for(&spec.name);
        (0..spec.synthetic_count)
            .map(|i| self.record(spec, i, as_of, &mut rng))
            .collect()
    }

    fn rng_for(&self, source: &str) -> StdRng {
        match self.seed {
            // Fold the source name in so two sources sharing one seed do
            // not emit identical value streams.
            Some(seed) => StdRng::seed_from_u64(seed ^ fold_name(source)),
            None => StdRng::from_entropy(),
        }
    }

    fn record(
        &self,
        spec: &SourceSpec,
        index: usize,
        as_of: DateTime<Utc>,
        rng: &mut StdRng,
    ) -> CanonicalRecord {
        let borough = Borough::ALL[index % Borough::ALL.len()];
        let location = jitter(borough.centroid(), rng);
        let id = format!("synthetic-{}-{:04}", spec.name, index);

        let (measurement, category, detail) = match spec.domain {
            Domain::Health => {
                let (label, low, high, unit) = HEALTH_INDICATORS[index % HEALTH_INDICATORS.len()];
                let value = round1(rng.gen_range(low..=high));
                (
                    Some(Measurement {
                        value,
                        unit: unit.to_string(),
                    }),
                    label.to_string(),
                    RecordDetail::HealthIndicator,
                )
            }
            Domain::Environment => {
                let (pollutant, low, high) = POLLUTANT_RANGES[index % POLLUTANT_RANGES.len()];
                let concentration = round1(rng.gen_range(low..=high));
                // Template ranges are nonnegative, so scoring cannot fail.
                let reading = aqi(pollutant, concentration).ok();
                (
                    Some(Measurement {
                        value: concentration,
                        unit: pollutant.unit().to_string(),
                    }),
                    pollutant.label().to_string(),
                    RecordDetail::EnvironmentalIndicator { aqi: reading },
                )
            }
            Domain::Facility => {
                let kind = FACILITY_KINDS[index % FACILITY_KINDS.len()];
                let stem = FACILITY_STEMS[rng.gen_range(0..FACILITY_STEMS.len())];
                let name = format!("{} {}", stem, kind);
                let phone = format!("(718) 555-{:04}", rng.gen_range(0..10000u32));
                let hours = FACILITY_HOURS[rng.gen_range(0..FACILITY_HOURS.len())];
                (
                    None,
                    kind.to_string(),
                    RecordDetail::Facility {
                        name,
                        phone: Some(phone),
                        hours: Some(hours.to_string()),
                    },
                )
            }
        };

        CanonicalRecord {
            id,
            borough,
            location,
            measurement,
            category,
            provenance: SYNTHETIC_PROVENANCE.to_string(),
            captured_at: as_of,
            detail,
        }
    }
}

impl Default for SyntheticGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn jitter(center: GeoPoint, rng: &mut StdRng) -> GeoPoint {
    GeoPoint {
        latitude: center.latitude + rng.gen_range(-CENTROID_JITTER..=CENTROID_JITTER),
        longitude: center.longitude + rng.gen_range(-CENTROID_JITTER..=CENTROID_JITTER),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// FNV-1a over the source name; keeps per-source streams distinct.
fn fold_name(name: &str) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in name.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

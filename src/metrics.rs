//! Air quality index computation
//!
//! Converts raw pollutant concentrations to the 0-500 AQI scale by
//! piecewise-linear interpolation over fixed breakpoint tables. The tables
//! are the dashboard's own: PM2.5 stops at index 300 and the top Ozone band
//! is widened to 106-200 ppb, so both are kept as explicit constants here
//! rather than loaded from a reference file.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a single AQI computation.
///
/// Callers drop the offending measurement and keep the batch going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    /// No breakpoint table is registered for the pollutant
    #[error("no breakpoint table for pollutant: {0:?}")]
    UnknownPollutant(String),

    /// Concentration was negative or not a finite number
    #[error("unusable concentration: {0}")]
    BadConcentration(f64),
}

/// Pollutants with registered breakpoint tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pollutant {
    Pm25,
    Ozone,
}

impl Pollutant {
    /// Resolve an upstream pollutant spelling.
    ///
    /// Providers disagree on naming ("pm25", "PM 2.5", "Fine particles
    /// (PM 2.5)"). Unknown names are rejected, not guessed.
    pub fn from_name(name: &str) -> Option<Pollutant> {
        match name.trim().to_lowercase().as_str() {
            "pm25" | "pm2.5" | "pm 2.5" | "fine particles (pm 2.5)" | "fine particulate matter (pm2.5)" => {
                Some(Pollutant::Pm25)
            }
            "o3" | "ozone" | "ozone (o3)" => Some(Pollutant::Ozone),
            _ => None,
        }
    }

    /// Unit concentrations are expressed in for this pollutant.
    pub fn unit(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "mcg/m3",
            Pollutant::Ozone => "ppb",
        }
    }

    /// Display label matching the city's published indicator names.
    pub fn label(&self) -> &'static str {
        match self {
            Pollutant::Pm25 => "Fine particles (PM 2.5)",
            Pollutant::Ozone => "Ozone (O3)",
        }
    }

    fn table(&self) -> &'static [Breakpoint] {
        match self {
            Pollutant::Pm25 => PM25_BREAKPOINTS,
            Pollutant::Ozone => OZONE_BREAKPOINTS,
        }
    }
}

/// One breakpoint row: a concentration bracket and the index bracket it
/// maps onto.
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    c_low: f64,
    c_high: f64,
    i_low: u16,
    i_high: u16,
}

/// PM2.5 breakpoints in mcg/m3, 24-hour averaging.
const PM25_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint { c_low: 0.0, c_high: 12.0, i_low: 0, i_high: 50 },
    Breakpoint { c_low: 12.1, c_high: 35.4, i_low: 51, i_high: 100 },
    Breakpoint { c_low: 35.5, c_high: 55.4, i_low: 101, i_high: 150 },
    Breakpoint { c_low: 55.5, c_high: 150.4, i_low: 151, i_high: 200 },
    Breakpoint { c_low: 150.5, c_high: 250.4, i_low: 201, i_high: 300 },
];

/// Ozone breakpoints in ppb, 8-hour averaging.
const OZONE_BREAKPOINTS: &[Breakpoint] = &[
    Breakpoint { c_low: 0.0, c_high: 54.0, i_low: 0, i_high: 50 },
    Breakpoint { c_low: 55.0, c_high: 70.0, i_low: 51, i_high: 100 },
    Breakpoint { c_low: 71.0, c_high: 85.0, i_low: 101, i_high: 150 },
    Breakpoint { c_low: 86.0, c_high: 105.0, i_low: 151, i_high: 200 },
    Breakpoint { c_low: 106.0, c_high: 200.0, i_low: 201, i_high: 300 },
];

/// AQI category bands at the standard thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthySensitive,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
}

impl AqiCategory {
    /// Category band containing `index`.
    pub fn for_index(index: u16) -> AqiCategory {
        match index {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthySensitive,
            151..=200 => AqiCategory::Unhealthy,
            _ => AqiCategory::VeryUnhealthy,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthySensitive => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A derived air quality index reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub index: u16,
    pub category: AqiCategory,
}

/// Compute the AQI for a pollutant concentration.
///
/// Interpolates linearly within the breakpoint row bracketing the
/// concentration. Concentrations above the top row clamp to the table
/// maximum; values falling in the gap between adjacent rows snap up to the
/// next row's floor. The result is monotonic in the concentration.
pub fn aqi(pollutant: Pollutant, concentration: f64) -> Result<AirQualityReading, MetricError> {
    if !concentration.is_finite() || concentration < 0.0 {
        return Err(MetricError::BadConcentration(concentration));
    }

    let table = pollutant.table();
    // Tables are non-empty constants; the last row absorbs out-of-range values.
    let last = table[table.len() - 1];
    let row = table
        .iter()
        .copied()
        .find(|r| concentration <= r.c_high)
        .unwrap_or(last);

    let clamped = concentration.clamp(row.c_low, row.c_high);
    let index_span = f64::from(row.i_high - row.i_low);
    let conc_span = row.c_high - row.c_low;
    let index = f64::from(row.i_low) + index_span / conc_span * (clamped - row.c_low);
    let index = index.round() as u16;

    Ok(AirQualityReading {
        index,
        category: AqiCategory::for_index(index),
    })
}

/// Compute the AQI for an upstream pollutant name.
///
/// Names that resolve to no registered table produce
/// [`MetricError::UnknownPollutant`].
pub fn aqi_for_name(name: &str, concentration: f64) -> Result<AirQualityReading, MetricError> {
    let pollutant =
        Pollutant::from_name(name).ok_or_else(|| MetricError::UnknownPollutant(name.to_string()))?;
    aqi(pollutant, concentration)
}

//! Parcel records supplied by a parcel data provider.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::types::SiteInputs;

/// One land parcel as listed by the parcel data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parcel {
    pub id: u32,
    /// Short display name (e.g. the street address prefix).
    pub name: String,
    /// Full address.
    #[serde(default)]
    pub location: Option<String>,
    /// Total parcel acreage.
    pub acres: f64,
    /// Mean terrain slope (degrees).
    #[serde(default)]
    pub slope: Option<f64>,
    /// Average peak sun-hours per day.
    pub sunlight_hours: f64,
    /// Distance to the nearest grid interconnection (km); unknown means 0.
    #[serde(default)]
    pub grid_distance_km: Option<f64>,
    /// Precomputed 0–100 suitability score.
    #[serde(default)]
    pub suitability_score: Option<f64>,
}

impl Parcel {
    /// Site inputs for this parcel, keeping `usable_fraction` of its acreage.
    pub fn site_inputs(&self, usable_fraction: f64) -> SiteInputs {
        SiteInputs::from_parcel_acres(
            self.acres,
            usable_fraction,
            self.sunlight_hours,
            self.grid_distance_km.unwrap_or(0.0),
        )
    }

    /// Tier of the precomputed suitability score, if any.
    pub fn tier(&self) -> Option<SuitabilityTier> {
        self.suitability_score.map(SuitabilityTier::from_score)
    }
}

/// Coarse classification of a 0–100 suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuitabilityTier {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SuitabilityTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            SuitabilityTier::Excellent
        } else if score >= 75.0 {
            SuitabilityTier::Good
        } else if score >= 60.0 {
            SuitabilityTier::Fair
        } else {
            SuitabilityTier::Poor
        }
    }
}

impl fmt::Display for SuitabilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SuitabilityTier::Poor => "Poor",
            SuitabilityTier::Fair => "Fair",
            SuitabilityTier::Good => "Good",
            SuitabilityTier::Excellent => "Excellent",
        })
    }
}

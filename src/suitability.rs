//! Portfolio-relative solar suitability score (0–100).
//!
//! Each site is scored from seven factors. Irradiance, substation distance,
//! land size and price are normalized against the other sites in the same
//! batch, so scores are only comparable within one call to [`score_sites`].

use serde::{Deserialize, Serialize};

const W_IRRADIANCE: f64 = 0.25;
const W_STABILITY: f64 = 0.15;
const W_LATITUDE: f64 = 0.10;
const W_TILT: f64 = 0.10;
const W_DISTANCE: f64 = 0.10;
const W_SIZE: f64 = 0.15;
const W_PRICE: f64 = 0.15;

/// Raw resource and market attributes of one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteFactors {
    /// Annual global horizontal irradiance.
    pub annual_ghi: f64,
    /// Annual irradiance on a latitude-tilted plane.
    pub annual_tilt_latitude: f64,
    /// Monthly GHI, January first.
    pub monthly_ghi: [f64; 12],
    /// Latitude (degrees).
    pub latitude: f64,
    /// Terrain tilt (degrees).
    pub tilt_deg: f64,
    /// Distance to the nearest substation (km).
    pub substation_km: f64,
    pub acres: f64,
    /// Asking price (USD).
    pub price: f64,
}

/// Scores every site against the others, in input order.
pub fn score_sites(sites: &[SiteFactors]) -> Vec<f64> {
    if sites.is_empty() {
        return Vec::new();
    }

    let (min_ghi, max_ghi) = min_max(sites.iter().map(|s| s.annual_ghi));
    let (min_price, max_price) = min_max(sites.iter().map(|s| s.price));
    let (_, max_distance) = min_max(sites.iter().map(|s| s.substation_km));
    let (_, max_acres) = min_max(sites.iter().map(|s| s.acres));

    sites
        .iter()
        .map(|s| {
            let irradiance = (s.annual_ghi + s.annual_tilt_latitude) / 2.0;
            let normalized_irr = if max_ghi != min_ghi {
                (irradiance - min_ghi) / (max_ghi - min_ghi)
            } else {
                1.0
            };

            let lat_factor = 1.0 - (s.latitude.abs() / 90.0) * 0.3;
            let tilt_factor = 1.0 - (s.tilt_deg - s.latitude.abs()).abs() / 90.0;

            let distance_factor = if max_distance != 0.0 {
                1.0 - s.substation_km / max_distance
            } else {
                1.0
            };
            let size_factor = if max_acres != 0.0 {
                s.acres / max_acres
            } else {
                1.0
            };
            let price_factor = if max_price != min_price {
                1.0 - (s.price - min_price) / (max_price - min_price)
            } else {
                1.0
            };

            let score = (normalized_irr * W_IRRADIANCE
                + seasonal_stability(&s.monthly_ghi) * W_STABILITY
                + lat_factor * W_LATITUDE
                + tilt_factor * W_TILT
                + distance_factor * W_DISTANCE
                + size_factor * W_SIZE
                + price_factor * W_PRICE)
                * 100.0;
            score.clamp(0.0, 100.0)
        })
        .collect()
}

/// `1 - stddev / mean` of the monthly profile; 0 for an all-dark profile.
fn seasonal_stability(monthly: &[f64; 12]) -> f64 {
    let n = monthly.len() as f64;
    let mean = monthly.iter().sum::<f64>() / n;
    if mean == 0.0 {
        return 0.0;
    }
    let variance = monthly.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
    1.0 - variance.sqrt() / mean
}

fn min_max(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

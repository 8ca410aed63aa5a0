//! Capital (installation) and operating (maintenance) cost models.
//!
//! Both models are independently callable so callers can display a cost
//! breakdown without running a full evaluation.

use serde::{Deserialize, Serialize};

use super::types::{CostAssumptions, CostModel, MaintenanceAssumptions};
use crate::error::{Result, ensure_non_negative};

const WATTS_PER_MW: f64 = 1_000_000.0;
const KW_PER_MW: f64 = 1000.0;

/// One priced component of the installed cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLineItem {
    /// Component label (`"module"`, `"inverter"`, ..., or `"flat_rate"`).
    pub component: String,
    pub cost_per_w: f64,
    pub cost_usd: f64,
}

/// Itemization of the capital cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationBreakdown {
    /// `capacity * 1e6 * blended_cost_per_w` (USD).
    pub base_cost_usd: f64,
    /// `grid_distance_km * interconnect_cost_per_km` (USD).
    pub interconnect_cost_usd: f64,
    /// Blended installed cost ($/W).
    pub blended_cost_per_w: f64,
    /// Per-component share of the base cost.
    pub line_items: Vec<CostLineItem>,
}

/// Capital expenditure with its breakdown.
///
/// `total_usd` is always exactly `base_cost_usd + interconnect_cost_usd`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallationCost {
    pub total_usd: f64,
    pub breakdown: InstallationBreakdown,
}

/// Itemization of the annual operating cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceBreakdown {
    pub base_opex_usd: f64,
    pub inverter_reserve_usd: f64,
}

/// Annual operating expenditure with its breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCost {
    pub total_usd: f64,
    pub breakdown: MaintenanceBreakdown,
}

/// Computes the capital cost of a system of `capacity_mw_dc` located
/// `grid_distance_km` from its interconnection point.
///
/// # Errors
///
/// Returns `ModelError::InvalidInput` if the capacity, distance, or any cost
/// figure is negative or not finite.
///
/// # Examples
///
/// ```
/// use solar_viability::model::cost::installation_cost;
/// use solar_viability::model::types::CostAssumptions;
///
/// let capex = installation_cost(20.0, 0.0, &CostAssumptions::default()).unwrap();
/// assert!((capex.total_usd - 17_400_000.0).abs() < 1e-3);
/// ```
pub fn installation_cost(
    capacity_mw_dc: f64,
    grid_distance_km: f64,
    cost: &CostAssumptions,
) -> Result<InstallationCost> {
    ensure_non_negative("capacity_mw_dc", capacity_mw_dc)?;
    ensure_non_negative("grid_distance_km", grid_distance_km)?;
    cost.validate()?;

    let watts = capacity_mw_dc * WATTS_PER_MW;
    let blended_cost_per_w = cost.model.blended_cost_per_w();

    let line_items = match &cost.model {
        CostModel::Itemized(components) => components
            .items()
            .iter()
            .map(|&(component, cost_per_w)| CostLineItem {
                component: component.to_string(),
                cost_per_w,
                cost_usd: watts * cost_per_w,
            })
            .collect(),
        CostModel::FlatRate { cost_per_w } => vec![CostLineItem {
            component: "flat_rate".to_string(),
            cost_per_w: *cost_per_w,
            cost_usd: watts * cost_per_w,
        }],
    };

    let base_cost_usd = watts * blended_cost_per_w;
    let interconnect_cost_usd = grid_distance_km * cost.interconnect_cost_per_km;

    Ok(InstallationCost {
        total_usd: base_cost_usd + interconnect_cost_usd,
        breakdown: InstallationBreakdown {
            base_cost_usd,
            interconnect_cost_usd,
            blended_cost_per_w,
            line_items,
        },
    })
}

/// Computes the annual operating cost of a system of `capacity_mw_dc`.
///
/// The figure is held constant across all project years.
///
/// # Errors
///
/// Returns `ModelError::InvalidInput` if the capacity or either rate is
/// negative or not finite.
pub fn maintenance_cost(
    capacity_mw_dc: f64,
    maintenance: &MaintenanceAssumptions,
) -> Result<MaintenanceCost> {
    ensure_non_negative("capacity_mw_dc", capacity_mw_dc)?;
    maintenance.validate()?;

    let capacity_kw = capacity_mw_dc * KW_PER_MW;
    let base_opex_usd = capacity_kw * maintenance.opex_per_kw_year;
    let inverter_reserve_usd = capacity_kw * maintenance.inverter_reserve_per_kw_year;

    Ok(MaintenanceCost {
        total_usd: base_opex_usd + inverter_reserve_usd,
        breakdown: MaintenanceBreakdown {
            base_opex_usd,
            inverter_reserve_usd,
        },
    })
}

//! Solar financial viability model.
//!
//! Data flows strictly forward: sizing → energy → cashflow ← cost, then
//! metrics. [`evaluate`] runs the whole chain from scratch on every call.

pub mod cashflow;
pub mod cost;
pub mod energy;
pub mod metrics;
pub mod sizing;
pub mod types;

use tracing::debug;

use self::cashflow::{ProjectionInputs, project_cashflows};
use self::cost::{installation_cost, maintenance_cost};
use self::metrics::SummaryMetrics;
use self::types::{Assumptions, CashflowYear, ProjectResult, SiteInputs};
use crate::error::{ModelError, Result};

/// Evaluates one parcel under one assumption set.
///
/// Inputs are validated before anything is computed; the result is a pure
/// function of `site` and `assumptions`.
///
/// # Errors
///
/// Returns `ModelError::InvalidInput` naming the first violated field.
///
/// # Examples
///
/// ```
/// use solar_viability::model::evaluate;
/// use solar_viability::model::types::{Assumptions, SiteInputs};
///
/// let site = SiteInputs::new(100.0, 6.0, 0.0);
/// let result = evaluate(&site, &Assumptions::default()).unwrap();
/// assert!((result.capacity_mw_dc - 20.0).abs() < 1e-9);
/// assert_eq!(result.cashflows.len(), 25);
/// ```
pub fn evaluate(site: &SiteInputs, assumptions: &Assumptions) -> Result<ProjectResult> {
    site.validate()?;
    assumptions.validate()?;

    let capacity_mw_dc = sizing::system_size_mw(
        site.usable_area_acres,
        assumptions.density_mw_per_acre,
    );
    let year1_energy_kwh = energy::year1_energy_kwh(
        capacity_mw_dc,
        site.sun_hours_per_day,
        assumptions.performance_ratio,
    );
    let lifetime_energy_kwh = energy::lifetime_energy_kwh(
        year1_energy_kwh,
        assumptions.degradation_rate,
        assumptions.lifetime_years,
    );
    debug!(capacity_mw_dc, year1_energy_kwh, lifetime_energy_kwh, "sized system");

    let capex = installation_cost(capacity_mw_dc, site.grid_distance_km, &assumptions.cost)?;
    let opex = maintenance_cost(capacity_mw_dc, &assumptions.maintenance)?;
    debug!(
        capex_usd = capex.total_usd,
        opex_usd = opex.total_usd,
        "priced system"
    );

    let cashflows = project_cashflows(&ProjectionInputs {
        year1_energy_kwh,
        degradation_rate: assumptions.degradation_rate,
        price_usd_per_kwh: assumptions.price_usd_per_kwh,
        price_escalation_rate: assumptions.price_escalation_rate,
        annual_opex_usd: opex.total_usd,
        discount_rate: assumptions.discount_rate,
        lifetime_years: assumptions.lifetime_years,
    });

    ensure_finite_projection(capex.total_usd, opex.total_usd, &cashflows)?;

    let metrics = SummaryMetrics::from_cashflows(&cashflows, capex.total_usd);
    if !metrics.npv_usd.is_finite() || !metrics.lifetime_net_usd.is_finite() {
        return Err(overflow("project totals"));
    }
    debug!(npv_usd = metrics.npv_usd, payback = %metrics.payback, "evaluated");

    Ok(ProjectResult {
        capacity_mw_dc,
        year1_energy_kwh,
        lifetime_energy_kwh,
        capital_cost_usd: capex.total_usd,
        capital_cost_breakdown: capex.breakdown,
        annual_opex_usd: opex.total_usd,
        annual_opex_breakdown: opex.breakdown,
        cashflows,
        npv_usd: metrics.npv_usd,
        lifetime_net_usd: metrics.lifetime_net_usd,
        payback_years: metrics.payback,
        simple_payback_years: metrics.simple_payback_years,
        lifetime_roi_pct: metrics.lifetime_roi_pct,
        average_annual_roi_pct: metrics.average_annual_roi_pct,
        year1_roi_pct: metrics.year1_roi_pct,
        capacity_factor: energy::capacity_factor(
            site.sun_hours_per_day,
            assumptions.performance_ratio,
        ),
    })
}

/// Rejects inputs that are individually in range but whose combination
/// overflows `f64` somewhere in the projection.
fn ensure_finite_projection(
    capital_cost_usd: f64,
    annual_opex_usd: f64,
    cashflows: &[CashflowYear],
) -> Result<()> {
    if !capital_cost_usd.is_finite() {
        return Err(overflow("capital cost"));
    }
    if !annual_opex_usd.is_finite() {
        return Err(overflow("annual opex"));
    }
    for c in cashflows {
        let row = [
            c.energy_kwh,
            c.price_per_kwh,
            c.revenue_usd,
            c.net_usd,
            c.discounted_net_usd,
        ];
        if row.iter().any(|v| !v.is_finite()) {
            return Err(overflow(&format!("year {} cashflow", c.year)));
        }
    }
    Ok(())
}

fn overflow(what: &str) -> ModelError {
    ModelError::InvalidInput {
        field: "assumptions",
        message: format!("combination overflows the {what} to a non-finite value"),
    }
}

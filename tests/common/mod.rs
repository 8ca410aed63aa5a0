//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_viability::model::types::{Assumptions, CostAssumptions, CostModel, SiteInputs};

/// 100 usable acres, 6 sun-hours, on the grid.
pub fn default_site() -> SiteInputs {
    SiteInputs::new(100.0, 6.0, 0.0)
}

/// Scenario A: 0.2 MW/acre, PR 0.8, no degradation; market and cost
/// defaults otherwise.
pub fn scenario_a_assumptions() -> Assumptions {
    Assumptions {
        density_mw_per_acre: 0.2,
        performance_ratio: 0.8,
        degradation_rate: 0.0,
        ..Assumptions::default()
    }
}

/// Default assumptions with a zero capital cost.
pub fn free_capital_assumptions() -> Assumptions {
    Assumptions {
        cost: CostAssumptions {
            model: CostModel::FlatRate { cost_per_w: 0.0 },
            interconnect_cost_per_km: 0.0,
        },
        ..Assumptions::default()
    }
}

/// Assertion helper for relative float comparison.
pub fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
    let scale = expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= rel_tol * scale,
        "expected {expected}, got {actual} (rel tol {rel_tol})"
    );
}

//! Core model types: site inputs, assumptions, per-year cashflows, and results.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::cost::{InstallationBreakdown, MaintenanceBreakdown};
use crate::error::{ModelError, Result, ensure_non_negative, ensure_positive};

/// Share of total parcel acreage available for array placement when no
/// explicit usable area is known.
pub const DEFAULT_USABLE_FRACTION: f64 = 0.90;

/// Longest supported evaluation horizon (years).
pub const MAX_LIFETIME_YEARS: u32 = 100;

/// Largest supported annual price escalation (100 %/yr).
pub const MAX_PRICE_ESCALATION_RATE: f64 = 1.0;

/// Physical attributes of one parcel, immutable for a given evaluation.
///
/// # Examples
///
/// ```
/// use solar_viability::model::types::SiteInputs;
///
/// let site = SiteInputs::from_parcel_acres(100.0, 0.9, 5.5, 2.0);
/// assert!((site.usable_area_acres - 90.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteInputs {
    /// Land available for array placement (acres, >= 0).
    pub usable_area_acres: f64,
    /// Average peak sun-hours per day (>= 0).
    pub sun_hours_per_day: f64,
    /// Distance to the nearest interconnection point (km, >= 0).
    #[serde(default)]
    pub grid_distance_km: f64,
}

impl SiteInputs {
    /// Creates site inputs from an explicit usable area.
    pub fn new(usable_area_acres: f64, sun_hours_per_day: f64, grid_distance_km: f64) -> Self {
        Self {
            usable_area_acres,
            sun_hours_per_day,
            grid_distance_km,
        }
    }

    /// Creates site inputs from total parcel acreage, keeping `usable_fraction`
    /// of it for the array.
    pub fn from_parcel_acres(
        total_acres: f64,
        usable_fraction: f64,
        sun_hours_per_day: f64,
        grid_distance_km: f64,
    ) -> Self {
        Self::new(
            total_acres * usable_fraction,
            sun_hours_per_day,
            grid_distance_km,
        )
    }

    /// Checks the site invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first violated field.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("site.usable_area_acres", self.usable_area_acres)?;
        ensure_non_negative("site.sun_hours_per_day", self.sun_hours_per_day)?;
        ensure_non_negative("site.grid_distance_km", self.grid_distance_km)?;
        Ok(())
    }
}

/// Itemized capital cost components, all in $/W-DC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComponentCosts {
    pub module_cost_per_w: f64,
    pub inverter_cost_per_w: f64,
    pub racking_cost_per_w: f64,
    pub wiring_cost_per_w: f64,
    pub labor_cost_per_w: f64,
    pub soft_cost_per_w: f64,
}

impl Default for ComponentCosts {
    fn default() -> Self {
        Self {
            module_cost_per_w: 0.32,
            inverter_cost_per_w: 0.07,
            racking_cost_per_w: 0.10,
            wiring_cost_per_w: 0.15,
            labor_cost_per_w: 0.15,
            soft_cost_per_w: 0.08,
        }
    }
}

impl ComponentCosts {
    /// Labelled components in display order.
    pub fn items(&self) -> [(&'static str, f64); 6] {
        [
            ("module", self.module_cost_per_w),
            ("inverter", self.inverter_cost_per_w),
            ("racking", self.racking_cost_per_w),
            ("wiring", self.wiring_cost_per_w),
            ("labor", self.labor_cost_per_w),
            ("soft", self.soft_cost_per_w),
        ]
    }

    /// Blended installed cost: the sum of all components ($/W).
    pub fn blended_cost_per_w(&self) -> f64 {
        self.items().iter().map(|(_, c)| c).sum()
    }

    fn validate(&self) -> Result<()> {
        ensure_non_negative("assumptions.cost.module_cost_per_w", self.module_cost_per_w)?;
        ensure_non_negative(
            "assumptions.cost.inverter_cost_per_w",
            self.inverter_cost_per_w,
        )?;
        ensure_non_negative(
            "assumptions.cost.racking_cost_per_w",
            self.racking_cost_per_w,
        )?;
        ensure_non_negative("assumptions.cost.wiring_cost_per_w", self.wiring_cost_per_w)?;
        ensure_non_negative("assumptions.cost.labor_cost_per_w", self.labor_cost_per_w)?;
        ensure_non_negative("assumptions.cost.soft_cost_per_w", self.soft_cost_per_w)?;
        Ok(())
    }
}

/// How the installed (base) capital cost is priced.
///
/// Resolved once when a configuration is turned into [`Assumptions`]; the
/// cost model never falls back from one variant to the other at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum CostModel {
    /// Component-by-component $/W pricing.
    Itemized(ComponentCosts),
    /// Single blended $/W figure.
    FlatRate { cost_per_w: f64 },
}

impl CostModel {
    /// Blended installed cost in $/W for either variant.
    pub fn blended_cost_per_w(&self) -> f64 {
        match self {
            CostModel::Itemized(components) => components.blended_cost_per_w(),
            CostModel::FlatRate { cost_per_w } => *cost_per_w,
        }
    }
}

/// Capital cost assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CostAssumptions {
    /// Installed cost pricing.
    pub model: CostModel,
    /// Interconnection capital cost per km of grid distance (USD/km).
    pub interconnect_cost_per_km: f64,
}

impl Default for CostAssumptions {
    fn default() -> Self {
        Self {
            model: CostModel::Itemized(ComponentCosts::default()),
            interconnect_cost_per_km: 150_000.0,
        }
    }
}

impl CostAssumptions {
    /// Checks that every cost figure is finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first violated field.
    pub fn validate(&self) -> Result<()> {
        match &self.model {
            CostModel::Itemized(components) => components.validate()?,
            CostModel::FlatRate { cost_per_w } => {
                ensure_non_negative("assumptions.cost.cost_per_w", *cost_per_w)?
            }
        }
        ensure_non_negative(
            "assumptions.cost.interconnect_cost_per_km",
            self.interconnect_cost_per_km,
        )
    }
}

/// Annual operating cost assumptions ($/kW-DC-yr).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaintenanceAssumptions {
    /// Base operations and maintenance.
    pub opex_per_kw_year: f64,
    /// Reserve for future inverter replacements.
    pub inverter_reserve_per_kw_year: f64,
}

impl Default for MaintenanceAssumptions {
    fn default() -> Self {
        Self {
            opex_per_kw_year: 15.0,
            inverter_reserve_per_kw_year: 4.0,
        }
    }
}

impl MaintenanceAssumptions {
    /// Checks that both rates are finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first violated field.
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative(
            "assumptions.maintenance.opex_per_kw_year",
            self.opex_per_kw_year,
        )?;
        ensure_non_negative(
            "assumptions.maintenance.inverter_reserve_per_kw_year",
            self.inverter_reserve_per_kw_year,
        )
    }
}

/// User-tunable economic and technical assumptions, independent of the site.
///
/// `Assumptions::default()` is the baseline set; it is a plain value that
/// callers pass into [`crate::model::evaluate`], never ambient state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Assumptions {
    /// Installed DC capacity per usable acre (MW/acre, > 0).
    pub density_mw_per_acre: f64,
    /// Delivered fraction of nameplate energy, in (0, 1].
    pub performance_ratio: f64,
    /// Fractional annual output decline, in [0, 1).
    pub degradation_rate: f64,
    /// Capital cost assumptions.
    pub cost: CostAssumptions,
    /// Operating cost assumptions.
    pub maintenance: MaintenanceAssumptions,
    /// Energy sale price in year 1 (USD/kWh).
    pub price_usd_per_kwh: f64,
    /// Fractional annual price growth, applied from year 2.
    pub price_escalation_rate: f64,
    /// Evaluation horizon in years (>= 1).
    pub lifetime_years: u32,
    /// Discount rate for NPV (>= 0).
    pub discount_rate: f64,
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            density_mw_per_acre: 0.20,
            performance_ratio: 0.80,
            degradation_rate: 0.005,
            cost: CostAssumptions::default(),
            maintenance: MaintenanceAssumptions::default(),
            price_usd_per_kwh: 0.11,
            price_escalation_rate: 0.02,
            lifetime_years: 25,
            discount_rate: 0.08,
        }
    }
}

impl Assumptions {
    /// Checks every assumption invariant.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidInput`] naming the first violated field.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("assumptions.density_mw_per_acre", self.density_mw_per_acre)?;

        let pr = self.performance_ratio;
        if !(pr.is_finite() && pr > 0.0 && pr <= 1.0) {
            return Err(ModelError::InvalidInput {
                field: "assumptions.performance_ratio",
                message: format!("must be in (0, 1], got {pr}"),
            });
        }

        let d = self.degradation_rate;
        if !(d.is_finite() && (0.0..1.0).contains(&d)) {
            return Err(ModelError::InvalidInput {
                field: "assumptions.degradation_rate",
                message: format!("must be in [0, 1), got {d}"),
            });
        }

        self.cost.validate()?;
        self.maintenance.validate()?;
        ensure_non_negative("assumptions.price_usd_per_kwh", self.price_usd_per_kwh)?;

        let esc = self.price_escalation_rate;
        if !(esc.is_finite() && esc > -1.0 && esc <= MAX_PRICE_ESCALATION_RATE) {
            return Err(ModelError::InvalidInput {
                field: "assumptions.price_escalation_rate",
                message: format!("must be in (-1, {MAX_PRICE_ESCALATION_RATE}], got {esc}"),
            });
        }

        if !(1..=MAX_LIFETIME_YEARS).contains(&self.lifetime_years) {
            return Err(ModelError::InvalidInput {
                field: "assumptions.lifetime_years",
                message: format!(
                    "must be in [1, {MAX_LIFETIME_YEARS}], got {}",
                    self.lifetime_years
                ),
            });
        }

        ensure_non_negative("assumptions.discount_rate", self.discount_rate)
    }
}

/// A derived metric that may be mathematically undefined for valid inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Metric {
    Value(f64),
    Undefined,
}

impl Metric {
    /// `numerator / denominator * scale`, or `Undefined` when the denominator
    /// is zero or the quotient is not finite.
    pub fn ratio(numerator: f64, denominator: f64, scale: f64) -> Self {
        if denominator == 0.0 {
            return Metric::Undefined;
        }
        let v = numerator / denominator * scale;
        if v.is_finite() {
            Metric::Value(v)
        } else {
            Metric::Undefined
        }
    }

    /// The defined value, if any.
    pub fn value(self) -> Option<f64> {
        match self {
            Metric::Value(v) => Some(v),
            Metric::Undefined => None,
        }
    }

    pub fn is_defined(self) -> bool {
        matches!(self, Metric::Value(_))
    }

    /// Displays the value followed by `unit`, or a bare `undefined`.
    pub fn with_unit(self, unit: &'static str) -> MetricWithUnit {
        MetricWithUnit { metric: self, unit }
    }
}

/// Display adapter returned by [`Metric::with_unit`]; honors precision.
#[derive(Debug, Clone, Copy)]
pub struct MetricWithUnit {
    metric: Metric,
    unit: &'static str,
}

impl fmt::Display for MetricWithUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.metric {
            Metric::Value(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$} {}", self.unit),
                None => write!(f, "{v} {}", self.unit),
            },
            Metric::Undefined => f.write_str("undefined"),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => match f.precision() {
                Some(p) => write!(f, "{v:.p$}"),
                None => write!(f, "{v}"),
            },
            Metric::Undefined => f.write_str("undefined"),
        }
    }
}

/// Payback outcome of the cumulative cashflow search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "year", rename_all = "snake_case")]
pub enum Payback {
    /// First project year whose cumulative net covers the capital cost.
    Year(u32),
    /// Capital is not recovered within the evaluation horizon.
    Unreachable,
}

impl Payback {
    pub fn year(self) -> Option<u32> {
        match self {
            Payback::Year(y) => Some(y),
            Payback::Unreachable => None,
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payback::Year(y) => write!(f, "year {y}"),
            Payback::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// One project year of the cashflow projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowYear {
    /// Project year, starting at 1.
    pub year: u32,
    /// Energy delivered this year (kWh).
    pub energy_kwh: f64,
    /// Sale price this year (USD/kWh).
    pub price_per_kwh: f64,
    /// `energy_kwh * price_per_kwh` (USD).
    pub revenue_usd: f64,
    /// Operating cost (USD).
    pub opex_usd: f64,
    /// `revenue_usd - opex_usd` (USD).
    pub net_usd: f64,
    /// `net_usd / (1 + discount_rate)^year` (USD).
    pub discounted_net_usd: f64,
}

impl fmt::Display for CashflowYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={:>3} | energy={:>14.0} kWh  price={:.4} $/kWh | \
             revenue={:>14.2}  opex={:>12.2}  net={:>14.2}  disc={:>14.2}",
            self.year,
            self.energy_kwh,
            self.price_per_kwh,
            self.revenue_usd,
            self.opex_usd,
            self.net_usd,
            self.discounted_net_usd,
        )
    }
}

/// Complete evaluation of one parcel under one assumption set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectResult {
    /// Installed DC capacity (MW).
    pub capacity_mw_dc: f64,
    /// Energy delivered in year 1 (kWh).
    pub year1_energy_kwh: f64,
    /// Energy delivered over the horizon, closed form (kWh).
    pub lifetime_energy_kwh: f64,
    /// Total capital cost (USD).
    pub capital_cost_usd: f64,
    pub capital_cost_breakdown: InstallationBreakdown,
    /// Operating cost, constant every year (USD).
    pub annual_opex_usd: f64,
    pub annual_opex_breakdown: MaintenanceBreakdown,
    /// Yearly cashflows in ascending year order.
    pub cashflows: Vec<CashflowYear>,
    pub npv_usd: f64,
    /// Undiscounted sum of `net_usd` over the horizon.
    pub lifetime_net_usd: f64,
    pub payback_years: Payback,
    /// `capital_cost_usd / year-1 net`, when year-1 net is positive.
    pub simple_payback_years: Metric,
    pub lifetime_roi_pct: Metric,
    /// Lifetime ROI spread evenly over the horizon.
    pub average_annual_roi_pct: Metric,
    pub year1_roi_pct: Metric,
    /// Diagnostic only: `sun_hours_per_day * performance_ratio / 24`.
    pub capacity_factor: f64,
}

impl fmt::Display for ProjectResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Project Summary ---")?;
        writeln!(f, "Capacity:              {:.3} MWdc", self.capacity_mw_dc)?;
        writeln!(f, "Capacity factor:       {:.4}", self.capacity_factor)?;
        writeln!(f, "Year-1 energy:         {:.0} kWh", self.year1_energy_kwh)?;
        writeln!(f, "Lifetime energy:       {:.0} kWh", self.lifetime_energy_kwh)?;
        writeln!(
            f,
            "Capital cost:          {:.2} USD ({:.4} $/W, interconnect {:.2} USD)",
            self.capital_cost_usd,
            self.capital_cost_breakdown.blended_cost_per_w,
            self.capital_cost_breakdown.interconnect_cost_usd
        )?;
        writeln!(f, "Annual opex:           {:.2} USD", self.annual_opex_usd)?;
        writeln!(f, "Lifetime net:          {:.2} USD", self.lifetime_net_usd)?;
        writeln!(f, "NPV:                   {:.2} USD", self.npv_usd)?;
        writeln!(f, "Payback:               {}", self.payback_years)?;
        writeln!(
            f,
            "Simple payback:        {:.2}",
            self.simple_payback_years.with_unit("years")
        )?;
        writeln!(f, "Lifetime ROI:          {:.2}", self.lifetime_roi_pct.with_unit("%"))?;
        writeln!(
            f,
            "Average annual ROI:    {:.2}",
            self.average_annual_roi_pct.with_unit("%")
        )?;
        write!(f, "Year-1 ROI:            {:.2}", self.year1_roi_pct.with_unit("%"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_assumptions_are_valid() {
        assert!(Assumptions::default().validate().is_ok());
    }

    #[test]
    fn performance_ratio_zero_rejected() {
        let a = Assumptions {
            performance_ratio: 0.0,
            ..Assumptions::default()
        };
        let err = a.validate().unwrap_err();
        assert_eq!(err.field(), "assumptions.performance_ratio");
    }

    #[test]
    fn performance_ratio_one_accepted() {
        let a = Assumptions {
            performance_ratio: 1.0,
            ..Assumptions::default()
        };
        assert!(a.validate().is_ok());
    }

    #[test]
    fn lifetime_above_maximum_rejected() {
        let a = Assumptions {
            lifetime_years: MAX_LIFETIME_YEARS + 1,
            ..Assumptions::default()
        };
        assert_eq!(a.validate().unwrap_err().field(), "assumptions.lifetime_years");

        let a = Assumptions {
            lifetime_years: MAX_LIFETIME_YEARS,
            ..Assumptions::default()
        };
        assert!(a.validate().is_ok());
    }

    #[test]
    fn runaway_price_escalation_rejected() {
        let a = Assumptions {
            price_escalation_rate: 5.0,
            ..Assumptions::default()
        };
        assert_eq!(
            a.validate().unwrap_err().field(),
            "assumptions.price_escalation_rate"
        );
    }

    #[test]
    fn undefined_metric_drops_unit() {
        assert_eq!(format!("{:.2}", Metric::Value(12.345).with_unit("%")), "12.35 %");
        assert_eq!(format!("{:.2}", Metric::Undefined.with_unit("%")), "undefined");
    }

    #[test]
    fn degradation_of_one_rejected() {
        let a = Assumptions {
            degradation_rate: 1.0,
            ..Assumptions::default()
        };
        assert_eq!(
            a.validate().unwrap_err().field(),
            "assumptions.degradation_rate"
        );
    }

    #[test]
    fn zero_lifetime_rejected() {
        let a = Assumptions {
            lifetime_years: 0,
            ..Assumptions::default()
        };
        assert_eq!(
            a.validate().unwrap_err().field(),
            "assumptions.lifetime_years"
        );
    }

    #[test]
    fn negative_component_cost_rejected() {
        let a = Assumptions {
            cost: CostAssumptions {
                model: CostModel::Itemized(ComponentCosts {
                    labor_cost_per_w: -0.1,
                    ..ComponentCosts::default()
                }),
                ..CostAssumptions::default()
            },
            ..Assumptions::default()
        };
        assert_eq!(
            a.validate().unwrap_err().field(),
            "assumptions.cost.labor_cost_per_w"
        );
    }

    #[test]
    fn negative_acreage_rejected() {
        let site = SiteInputs::new(-5.0, 6.0, 0.0);
        assert_eq!(site.validate().unwrap_err().field(), "site.usable_area_acres");
    }

    #[test]
    fn default_components_blend_to_087() {
        let blended = ComponentCosts::default().blended_cost_per_w();
        assert!((blended - 0.87).abs() < 1e-12);
    }

    #[test]
    fn metric_ratio_guards_zero_denominator() {
        assert_eq!(Metric::ratio(5.0, 0.0, 100.0), Metric::Undefined);
        assert_eq!(Metric::ratio(1.0, 4.0, 100.0), Metric::Value(25.0));
    }

    #[test]
    fn metric_display_respects_precision() {
        assert_eq!(format!("{:.1}", Metric::Value(12.345)), "12.3");
        assert_eq!(format!("{:.1}", Metric::Undefined), "undefined");
    }

    #[test]
    fn cashflow_display_does_not_panic() {
        let row = CashflowYear {
            year: 1,
            energy_kwh: 35_040_000.0,
            price_per_kwh: 0.11,
            revenue_usd: 3_854_400.0,
            opex_usd: 380_000.0,
            net_usd: 3_474_400.0,
            discounted_net_usd: 3_217_037.0,
        };
        assert!(format!("{row}").starts_with("year=  1"));
    }
}

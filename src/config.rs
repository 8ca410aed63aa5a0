//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::types::{
    Assumptions, ComponentCosts, CostAssumptions, CostModel, DEFAULT_USABLE_FRACTION,
    MAX_LIFETIME_YEARS, MAX_PRICE_ESCALATION_RATE, MaintenanceAssumptions, SiteInputs,
};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default. Turn a config into
/// model inputs with [`ScenarioConfig::site_inputs`] and
/// [`ScenarioConfig::assumptions`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Parcel attributes.
    #[serde(default)]
    pub site: SiteConfig,
    /// Array sizing and performance.
    #[serde(default)]
    pub system: SystemConfig,
    /// Capital cost pricing.
    #[serde(default)]
    pub installation: InstallationConfig,
    /// Operating cost rates.
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
    /// Energy sale price.
    #[serde(default)]
    pub market: MarketConfig,
    /// Horizon and discounting.
    #[serde(default)]
    pub finance: FinanceConfig,
}

/// Parcel attributes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Total parcel acreage.
    pub acres: f64,
    /// Share of `acres` usable for the array (0.0–1.0).
    pub usable_fraction: f64,
    /// Explicit usable acreage; overrides `acres * usable_fraction` when set.
    pub usable_acres: Option<f64>,
    /// Average peak sun-hours per day.
    pub sun_hours_per_day: f64,
    /// Distance to nearest interconnection point (km).
    pub grid_distance_km: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            acres: 100.0,
            usable_fraction: DEFAULT_USABLE_FRACTION,
            usable_acres: None,
            sun_hours_per_day: 5.5,
            grid_distance_km: 0.0,
        }
    }
}

/// Array sizing and performance.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Installed DC capacity per usable acre (MW/acre).
    pub density_mw_per_acre: f64,
    /// Delivered fraction of nameplate energy (0.0–1.0].
    pub performance_ratio: f64,
    /// Annual output decline [0.0–1.0).
    pub degradation_rate: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let a = Assumptions::default();
        Self {
            density_mw_per_acre: a.density_mw_per_acre,
            performance_ratio: a.performance_ratio,
            degradation_rate: a.degradation_rate,
        }
    }
}

/// Which capital cost variant the `[installation]` section selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModelKind {
    Itemized,
    FlatRate,
}

/// Capital cost pricing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallationConfig {
    /// `"itemized"` (component sum) or `"flat_rate"` (`flat_cost_per_w`).
    pub model: CostModelKind,
    pub module_cost_per_w: f64,
    pub inverter_cost_per_w: f64,
    pub racking_cost_per_w: f64,
    pub wiring_cost_per_w: f64,
    pub labor_cost_per_w: f64,
    pub soft_cost_per_w: f64,
    /// Blended $/W used when `model = "flat_rate"`.
    pub flat_cost_per_w: f64,
    /// Interconnection cost (USD/km).
    pub interconnect_cost_per_km: f64,
}

impl Default for InstallationConfig {
    fn default() -> Self {
        let c = ComponentCosts::default();
        Self {
            model: CostModelKind::Itemized,
            module_cost_per_w: c.module_cost_per_w,
            inverter_cost_per_w: c.inverter_cost_per_w,
            racking_cost_per_w: c.racking_cost_per_w,
            wiring_cost_per_w: c.wiring_cost_per_w,
            labor_cost_per_w: c.labor_cost_per_w,
            soft_cost_per_w: c.soft_cost_per_w,
            flat_cost_per_w: 1.00,
            interconnect_cost_per_km: CostAssumptions::default().interconnect_cost_per_km,
        }
    }
}

/// Operating cost rates ($/kW-yr).
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaintenanceConfig {
    pub opex_per_kw_year: f64,
    pub inverter_reserve_per_kw_year: f64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        let m = MaintenanceAssumptions::default();
        Self {
            opex_per_kw_year: m.opex_per_kw_year,
            inverter_reserve_per_kw_year: m.inverter_reserve_per_kw_year,
        }
    }
}

/// Energy sale price.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketConfig {
    /// Year-1 price (USD/kWh).
    pub price_usd_per_kwh: f64,
    /// Annual price growth, applied from year 2.
    pub price_escalation_rate: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        let a = Assumptions::default();
        Self {
            price_usd_per_kwh: a.price_usd_per_kwh,
            price_escalation_rate: a.price_escalation_rate,
        }
    }
}

/// Horizon and discounting.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FinanceConfig {
    /// Evaluation horizon (years, must be > 0).
    pub lifetime_years: u32,
    /// NPV discount rate.
    pub discount_rate: f64,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        let a = Assumptions::default();
        Self {
            lifetime_years: a.lifetime_years,
            discount_rate: a.discount_rate,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Error, Debug)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.performance_ratio"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Returns the baseline scenario evaluated over a single year.
    pub fn year_one() -> Self {
        Self {
            finance: FinanceConfig {
                lifetime_years: 1,
                ..FinanceConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the baseline scenario priced at a flat 1.00 $/W.
    pub fn flat_rate() -> Self {
        Self {
            installation: InstallationConfig {
                model: CostModelKind::FlatRate,
                flat_cost_per_w: 1.00,
                ..InstallationConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the conservative preset: sparser array, higher losses, flat
    /// prices and a higher cost of capital.
    pub fn conservative() -> Self {
        Self {
            site: SiteConfig::default(),
            system: SystemConfig {
                density_mw_per_acre: 0.15,
                performance_ratio: 0.75,
                degradation_rate: 0.007,
            },
            installation: InstallationConfig {
                model: CostModelKind::FlatRate,
                flat_cost_per_w: 1.10,
                ..InstallationConfig::default()
            },
            maintenance: MaintenanceConfig {
                opex_per_kw_year: 18.0,
                inverter_reserve_per_kw_year: 5.0,
            },
            market: MarketConfig {
                price_usd_per_kwh: 0.08,
                price_escalation_rate: 0.0,
            },
            finance: FinanceConfig {
                lifetime_years: 25,
                discount_rate: 0.10,
            },
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "year_one", "flat_rate", "conservative"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "year_one" => Ok(Self::year_one()),
            "flat_rate" => Ok(Self::flat_rate()),
            "conservative" => Ok(Self::conservative()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Usable acreage: the explicit override, or `acres * usable_fraction`.
    pub fn usable_acres(&self) -> f64 {
        self.site
            .usable_acres
            .unwrap_or(self.site.acres * self.site.usable_fraction)
    }

    /// Site inputs described by the `[site]` section.
    pub fn site_inputs(&self) -> SiteInputs {
        SiteInputs::new(
            self.usable_acres(),
            self.site.sun_hours_per_day,
            self.site.grid_distance_km,
        )
    }

    /// Model assumptions described by the remaining sections.
    ///
    /// The capital cost variant is resolved here, once.
    pub fn assumptions(&self) -> Assumptions {
        let inst = &self.installation;
        let model = match inst.model {
            CostModelKind::Itemized => CostModel::Itemized(ComponentCosts {
                module_cost_per_w: inst.module_cost_per_w,
                inverter_cost_per_w: inst.inverter_cost_per_w,
                racking_cost_per_w: inst.racking_cost_per_w,
                wiring_cost_per_w: inst.wiring_cost_per_w,
                labor_cost_per_w: inst.labor_cost_per_w,
                soft_cost_per_w: inst.soft_cost_per_w,
            }),
            CostModelKind::FlatRate => CostModel::FlatRate {
                cost_per_w: inst.flat_cost_per_w,
            },
        };

        Assumptions {
            density_mw_per_acre: self.system.density_mw_per_acre,
            performance_ratio: self.system.performance_ratio,
            degradation_rate: self.system.degradation_rate,
            cost: CostAssumptions {
                model,
                interconnect_cost_per_km: inst.interconnect_cost_per_km,
            },
            maintenance: MaintenanceAssumptions {
                opex_per_kw_year: self.maintenance.opex_per_kw_year,
                inverter_reserve_per_kw_year: self.maintenance.inverter_reserve_per_kw_year,
            },
            price_usd_per_kwh: self.market.price_usd_per_kwh,
            price_escalation_rate: self.market.price_escalation_rate,
            lifetime_years: self.finance.lifetime_years,
            discount_rate: self.finance.discount_rate,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let mut non_negative = |field: &str, value: f64| {
            if !value.is_finite() || value < 0.0 {
                errors.push(ConfigError::new(field, "must be a finite number >= 0"));
            }
        };

        let site = &self.site;
        non_negative("site.acres", site.acres);
        non_negative("site.sun_hours_per_day", site.sun_hours_per_day);
        non_negative("site.grid_distance_km", site.grid_distance_km);
        if let Some(usable) = site.usable_acres {
            non_negative("site.usable_acres", usable);
        }

        let inst = &self.installation;
        match inst.model {
            CostModelKind::Itemized => {
                non_negative("installation.module_cost_per_w", inst.module_cost_per_w);
                non_negative("installation.inverter_cost_per_w", inst.inverter_cost_per_w);
                non_negative("installation.racking_cost_per_w", inst.racking_cost_per_w);
                non_negative("installation.wiring_cost_per_w", inst.wiring_cost_per_w);
                non_negative("installation.labor_cost_per_w", inst.labor_cost_per_w);
                non_negative("installation.soft_cost_per_w", inst.soft_cost_per_w);
            }
            CostModelKind::FlatRate => {
                non_negative("installation.flat_cost_per_w", inst.flat_cost_per_w);
            }
        }
        non_negative(
            "installation.interconnect_cost_per_km",
            inst.interconnect_cost_per_km,
        );

        let m = &self.maintenance;
        non_negative("maintenance.opex_per_kw_year", m.opex_per_kw_year);
        non_negative(
            "maintenance.inverter_reserve_per_kw_year",
            m.inverter_reserve_per_kw_year,
        );

        non_negative("market.price_usd_per_kwh", self.market.price_usd_per_kwh);
        non_negative("finance.discount_rate", self.finance.discount_rate);

        if !(0.0..=1.0).contains(&site.usable_fraction) {
            errors.push(ConfigError::new(
                "site.usable_fraction",
                "must be in [0.0, 1.0]",
            ));
        }

        let sys = &self.system;
        if !(sys.density_mw_per_acre.is_finite() && sys.density_mw_per_acre > 0.0) {
            errors.push(ConfigError::new("system.density_mw_per_acre", "must be > 0"));
        }
        if !(sys.performance_ratio > 0.0 && sys.performance_ratio <= 1.0) {
            errors.push(ConfigError::new(
                "system.performance_ratio",
                "must be in (0.0, 1.0]",
            ));
        }
        if !(0.0..1.0).contains(&sys.degradation_rate) {
            errors.push(ConfigError::new(
                "system.degradation_rate",
                "must be in [0.0, 1.0)",
            ));
        }

        let esc = self.market.price_escalation_rate;
        if !(esc.is_finite() && esc > -1.0 && esc <= MAX_PRICE_ESCALATION_RATE) {
            errors.push(ConfigError::new(
                "market.price_escalation_rate",
                format!("must be in (-1, {MAX_PRICE_ESCALATION_RATE}]"),
            ));
        }

        if !(1..=MAX_LIFETIME_YEARS).contains(&self.finance.lifetime_years) {
            errors.push(ConfigError::new(
                "finance.lifetime_years",
                format!("must be in [1, {MAX_LIFETIME_YEARS}]"),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn baseline_matches_default_assumptions() {
        assert_eq!(ScenarioConfig::baseline().assumptions(), Assumptions::default());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
            let cfg = cfg.unwrap();
            assert!(cfg.assumptions().validate().is_ok());
            assert!(cfg.site_inputs().validate().is_ok());
        }
    }

    #[test]
    fn year_one_only_changes_horizon() {
        let base = ScenarioConfig::baseline().assumptions();
        let one = ScenarioConfig::year_one().assumptions();
        assert_eq!(one.lifetime_years, 1);
        assert_eq!(
            Assumptions {
                lifetime_years: base.lifetime_years,
                ..one
            },
            base
        );
    }

    #[test]
    fn flat_rate_resolves_to_flat_variant() {
        let a = ScenarioConfig::flat_rate().assumptions();
        assert_eq!(a.cost.model, CostModel::FlatRate { cost_per_w: 1.0 });
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
acres = 250.0
usable_fraction = 0.8
sun_hours_per_day = 6.2
grid_distance_km = 3.5

[system]
density_mw_per_acre = 0.25
performance_ratio = 0.82
degradation_rate = 0.004

[installation]
model = "flat_rate"
flat_cost_per_w = 0.95
interconnect_cost_per_km = 120000.0

[maintenance]
opex_per_kw_year = 12.0
inverter_reserve_per_kw_year = 3.0

[market]
price_usd_per_kwh = 0.09
price_escalation_rate = 0.015

[finance]
lifetime_years = 30
discount_rate = 0.07
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.unwrap();
        assert!(cfg.validate().is_empty());
        assert!((cfg.usable_acres() - 200.0).abs() < 1e-9);
        let a = cfg.assumptions();
        assert_eq!(a.lifetime_years, 30);
        assert_eq!(a.cost.model, CostModel::FlatRate { cost_per_w: 0.95 });
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
density_mw_per_acre = 0.2
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_cost_model_rejected() {
        let toml = r#"
[installation]
model = "guesswork"
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[finance]
discount_rate = 0.05
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).unwrap();
        assert_eq!(cfg.finance.discount_rate, 0.05);
        assert_eq!(cfg.finance.lifetime_years, 25);
        assert_eq!(cfg.installation.model, CostModelKind::Itemized);
    }

    #[test]
    fn usable_acres_override_wins() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.site.usable_acres = Some(42.0);
        assert_eq!(cfg.site_inputs().usable_area_acres, 42.0);
    }

    #[test]
    fn validation_catches_zero_performance_ratio() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.system.performance_ratio = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.performance_ratio"));
    }

    #[test]
    fn validation_catches_excessive_horizon() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.finance.lifetime_years = 4_000_000_000;
        cfg.market.price_escalation_rate = 5.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "finance.lifetime_years"));
        assert!(errors.iter().any(|e| e.field == "market.price_escalation_rate"));
    }

    #[test]
    fn validation_catches_zero_lifetime() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.finance.lifetime_years = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "finance.lifetime_years"));
    }

    #[test]
    fn validation_collects_every_error() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.site.acres = -1.0;
        cfg.system.degradation_rate = 1.5;
        cfg.market.price_usd_per_kwh = -0.1;
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"site.acres".to_string()));
        assert!(fields.contains(&"system.degradation_rate".to_string()));
        assert!(fields.contains(&"market.price_usd_per_kwh".to_string()));
    }

    #[test]
    fn flat_rate_ignores_negative_itemized_fields() {
        let mut cfg = ScenarioConfig::flat_rate();
        cfg.installation.labor_cost_per_w = -1.0;
        assert!(cfg.validate().is_empty());
    }
}

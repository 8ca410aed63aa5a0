//! Year-by-year cashflow projection over the evaluation horizon.

use super::energy::energy_in_year;
use super::types::CashflowYear;

/// Market and finance inputs to the projection.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs {
    /// Year-1 energy (kWh) before degradation.
    pub year1_energy_kwh: f64,
    pub degradation_rate: f64,
    /// Year-1 sale price (USD/kWh).
    pub price_usd_per_kwh: f64,
    pub price_escalation_rate: f64,
    /// Operating cost charged every year (USD).
    pub annual_opex_usd: f64,
    pub discount_rate: f64,
    /// Horizon in years; one record is produced per year.
    pub lifetime_years: u32,
}

/// Projects one [`CashflowYear`] per project year, in ascending year order.
///
/// Price escalation compounds annually starting in year 2; opex is flat.
/// A one-year evaluation is this same projection with `lifetime_years == 1`.
pub fn project_cashflows(inputs: &ProjectionInputs) -> Vec<CashflowYear> {
    let mut flows = Vec::with_capacity(inputs.lifetime_years as usize);
    let mut price = inputs.price_usd_per_kwh;

    for year in 1..=inputs.lifetime_years {
        if year > 1 {
            price *= 1.0 + inputs.price_escalation_rate;
        }
        let energy_kwh = energy_in_year(inputs.year1_energy_kwh, inputs.degradation_rate, year);
        let revenue_usd = energy_kwh * price;
        let net_usd = revenue_usd - inputs.annual_opex_usd;
        let discount = (1.0 + inputs.discount_rate).powf(f64::from(year));

        flows.push(CashflowYear {
            year,
            energy_kwh,
            price_per_kwh: price,
            revenue_usd,
            opex_usd: inputs.annual_opex_usd,
            net_usd,
            discounted_net_usd: net_usd / discount,
        });
    }

    flows
}

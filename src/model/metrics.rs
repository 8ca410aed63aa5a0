//! Summary profitability metrics reduced from a cashflow projection.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::types::{CashflowYear, Metric, Payback};

/// Profitability metrics for one evaluation.
///
/// Computed post-hoc from the cashflow sequence so reported metrics are
/// always consistent with the yearly records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetrics {
    /// `-capital_cost + Σ discounted net` (USD).
    pub npv_usd: f64,
    /// `Σ net` over the horizon (USD, undiscounted).
    pub lifetime_net_usd: f64,
    /// First year whose cumulative undiscounted net covers the capital cost.
    pub payback: Payback,
    /// `capital_cost / year-1 net`, defined only for positive year-1 net.
    pub simple_payback_years: Metric,
    /// `lifetime_net / capital_cost * 100`.
    pub lifetime_roi_pct: Metric,
    /// Lifetime ROI divided by the number of years.
    pub average_annual_roi_pct: Metric,
    /// `year-1 net / capital_cost * 100`.
    pub year1_roi_pct: Metric,
}

impl SummaryMetrics {
    /// Computes all metrics from the ordered cashflows and the initial outlay.
    ///
    /// # Arguments
    ///
    /// * `cashflows` - Yearly records in ascending year order
    /// * `capital_cost_usd` - Initial outlay (USD, >= 0)
    ///
    /// # Returns
    ///
    /// A `SummaryMetrics` where every undefined ratio is `Metric::Undefined`.
    pub fn from_cashflows(cashflows: &[CashflowYear], capital_cost_usd: f64) -> Self {
        let discounted_sum: f64 = cashflows.iter().map(|c| c.discounted_net_usd).sum();
        let lifetime_net_usd: f64 = cashflows.iter().map(|c| c.net_usd).sum();

        let year1_net = cashflows.first().map(|c| c.net_usd);

        let simple_payback_years = match year1_net {
            Some(net) if net > 0.0 => Metric::ratio(capital_cost_usd, net, 1.0),
            _ => Metric::Undefined,
        };

        let year1_roi_pct = match year1_net {
            Some(net) => Metric::ratio(net, capital_cost_usd, 100.0),
            None => Metric::Undefined,
        };

        let lifetime_roi_pct = Metric::ratio(lifetime_net_usd, capital_cost_usd, 100.0);
        let average_annual_roi_pct = match lifetime_roi_pct {
            Metric::Value(roi) if !cashflows.is_empty() => {
                Metric::Value(roi / cashflows.len() as f64)
            }
            _ => Metric::Undefined,
        };

        Self {
            npv_usd: -capital_cost_usd + discounted_sum,
            lifetime_net_usd,
            payback: payback_year(cashflows, capital_cost_usd),
            simple_payback_years,
            lifetime_roi_pct,
            average_annual_roi_pct,
            year1_roi_pct,
        }
    }
}

/// Smallest project year whose cumulative undiscounted net is at least
/// `capital_cost_usd`.
///
/// With zero capital the cumulative net must also be strictly positive, so a
/// stream that never earns anything is `Unreachable` rather than year 1.
pub fn payback_year(cashflows: &[CashflowYear], capital_cost_usd: f64) -> Payback {
    let mut cumulative = 0.0_f64;
    for c in cashflows {
        cumulative += c.net_usd;
        if cumulative >= capital_cost_usd && cumulative > 0.0 {
            return Payback::Year(c.year);
        }
    }
    Payback::Unreachable
}

impl fmt::Display for SummaryMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Financial Metrics ---")?;
        writeln!(f, "NPV:                   {:.2} USD", self.npv_usd)?;
        writeln!(f, "Lifetime net:          {:.2} USD", self.lifetime_net_usd)?;
        writeln!(f, "Payback:               {}", self.payback)?;
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

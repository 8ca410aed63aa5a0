//! Annual energy yield with geometric degradation.

/// Days per year used for annual energy.
const DAYS_PER_YEAR: f64 = 365.0;

/// Energy delivered in the first project year (kWh).
///
/// `capacity_mw_dc * 1000 * sun_hours_per_day * 365 * performance_ratio`
pub fn year1_energy_kwh(
    capacity_mw_dc: f64,
    sun_hours_per_day: f64,
    performance_ratio: f64,
) -> f64 {
    capacity_mw_dc * 1000.0 * sun_hours_per_day * DAYS_PER_YEAR * performance_ratio
}

/// Energy delivered in project year `year` (1-based) after degradation.
///
/// `year1_kwh * (1 - degradation_rate)^(year - 1)`
pub fn energy_in_year(year1_kwh: f64, degradation_rate: f64, year: u32) -> f64 {
    year1_kwh * retention(degradation_rate, year.saturating_sub(1))
}

/// Total energy over `years` project years, as the closed-form sum of the
/// geometric series of [`energy_in_year`].
///
/// For `degradation_rate == 0` this is exactly `year1_kwh * years`.
pub fn lifetime_energy_kwh(year1_kwh: f64, degradation_rate: f64, years: u32) -> f64 {
    if degradation_rate == 0.0 {
        return year1_kwh * f64::from(years);
    }
    // 1 - (1-d)^n, evaluated without cancellation for small d
    let lost = -(f64::from(years) * (-degradation_rate).ln_1p()).exp_m1();
    year1_kwh * lost / degradation_rate
}

/// Ratio of average output to nameplate continuous output.
///
/// Diagnostic only; not used in the financial math.
pub fn capacity_factor(sun_hours_per_day: f64, performance_ratio: f64) -> f64 {
    sun_hours_per_day * performance_ratio / 24.0
}

/// `(1 - d)^n`
fn retention(degradation_rate: f64, n: u32) -> f64 {
    (1.0 - degradation_rate).powf(f64::from(n))
}

//! Installed DC capacity from usable land area.

/// Installed DC capacity (MW) for `usable_area_acres` at `density_mw_per_acre`.
///
/// Zero area is a valid degenerate site and yields zero capacity.
pub fn system_size_mw(usable_area_acres: f64, density_mw_per_acre: f64) -> f64 {
    usable_area_acres * density_mw_per_acre
}

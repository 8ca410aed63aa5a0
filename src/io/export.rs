//! CSV export for projected cashflows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::model::types::CashflowYear;

/// Column header for the cashflow CSV export.
const HEADER: &str = "year,energy_kwh,price_per_kwh,revenue_usd,opex_usd,\
                       net_usd,discounted_net_usd,cumulative_net_usd";

/// Exports cashflows to a CSV file at the given path.
///
/// Writes a header row followed by one data row per project year. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `cashflows` - Yearly records in ascending year order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_cashflows_csv(cashflows: &[CashflowYear], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_cashflows_csv(cashflows, buf)
}

/// Writes cashflows as CSV to any writer.
///
/// The last column carries the running undiscounted net, which is what the
/// payback search walks.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_cashflows_csv(cashflows: &[CashflowYear], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    let mut cumulative = 0.0_f64;
    for c in cashflows {
        cumulative += c.net_usd;
        wtr.write_record(&[
            c.year.to_string(),
            format!("{:.2}", c.energy_kwh),
            format!("{:.6}", c.price_per_kwh),
            format!("{:.2}", c.revenue_usd),
            format!("{:.2}", c.opex_usd),
            format!("{:.2}", c.net_usd),
            format!("{:.2}", c.discounted_net_usd),
            format!("{:.2}", cumulative),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_year(year: u32) -> CashflowYear {
        CashflowYear {
            year,
            energy_kwh: 1_000_000.0,
            price_per_kwh: 0.11,
            revenue_usd: 110_000.0,
            opex_usd: 19_000.0,
            net_usd: 91_000.0,
            discounted_net_usd: 91_000.0 / 1.08_f64.powi(year as i32),
        }
    }

    fn render(cashflows: &[CashflowYear]) -> String {
        let mut buf = Vec::new();
        write_cashflows_csv(cashflows, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_is_stable() {
        let out = render(&[make_year(1)]);
        assert_eq!(
            out.lines().next(),
            Some(
                "year,energy_kwh,price_per_kwh,revenue_usd,opex_usd,\
                 net_usd,discounted_net_usd,cumulative_net_usd"
            )
        );
    }

    #[test]
    fn row_count_matches_year_count() {
        let flows: Vec<CashflowYear> = (1..=25).map(make_year).collect();
        assert_eq!(render(&flows).lines().count(), 26);
    }

    #[test]
    fn deterministic_output() {
        let flows: Vec<CashflowYear> = (1..=5).map(make_year).collect();
        assert_eq!(render(&flows), render(&flows));
    }

    #[test]
    fn cumulative_column_accumulates() {
        let flows: Vec<CashflowYear> = (1..=3).map(make_year).collect();
        let out = render(&flows);

        let mut rdr = csv::ReaderBuilder::new().from_reader(out.as_bytes());
        let last: Vec<f64> = rdr
            .records()
            .map(|r| r.unwrap()[7].parse::<f64>().unwrap())
            .collect();
        assert_eq!(last, vec![91_000.0, 182_000.0, 273_000.0]);
    }
}

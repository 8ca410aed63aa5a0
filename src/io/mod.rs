//! CSV import and export.

pub mod export;
pub mod parcels;

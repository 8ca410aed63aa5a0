//! Financial viability model for utility-scale solar on a land parcel.
//!
//! [`model::evaluate`] turns a parcel's usable area and solar resource plus
//! an [`model::types::Assumptions`] set into sizing, energy, costs, yearly
//! cashflows and summary metrics. The cost sub-models in [`model::cost`] are
//! callable on their own.

#[cfg(feature = "api")]
pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod parcel;
pub mod portfolio;
pub mod suitability;

//! API request and error types.
//!
//! Responses reuse the model's own serializable results.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ModelError;
use crate::model::types::SiteInputs;

/// Body of `POST /evaluate`.
///
/// `assumptions` is a partial `Assumptions` object merged over the server
/// defaults.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluateRequest {
    pub site: SiteInputs,
    #[serde(default)]
    pub assumptions: Option<Value>,
}

/// Body of `POST /costs/installation`.
///
/// `cost` is a partial `CostAssumptions` object merged over the server's.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstallationCostRequest {
    pub capacity_mw_dc: f64,
    #[serde(default)]
    pub grid_distance_km: f64,
    #[serde(default)]
    pub cost: Option<Value>,
}

/// Body of `POST /costs/maintenance`.
///
/// `maintenance` is a partial `MaintenanceAssumptions` object merged over
/// the server's.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaintenanceCostRequest {
    pub capacity_mw_dc: f64,
    #[serde(default)]
    pub maintenance: Option<Value>,
}

/// Applies a partial JSON override on top of `defaults`.
///
/// Objects merge key by key. A tagged object whose `model` tag differs from
/// the default's (e.g. switching to `flat_rate`) replaces it whole.
pub fn merge_over<T>(defaults: &T, patch: Option<Value>) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned + Clone,
{
    let Some(patch) = patch else {
        return Ok(defaults.clone());
    };
    let mut base = serde_json::to_value(defaults)?;
    merge_value(&mut base, patch);
    serde_json::from_value(base)
}

fn merge_value(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(b), Value::Object(p)) if same_variant(b, &p) => {
            for (key, value) in p {
                merge_value(b.entry(key).or_insert(Value::Null), value);
            }
        }
        (b, p) => *b = p,
    }
}

fn same_variant(base: &Map<String, Value>, patch: &Map<String, Value>) -> bool {
    match patch.get("model") {
        Some(Value::String(tag)) => {
            base.get("model").and_then(Value::as_str) == Some(tag.as_str())
        }
        _ => true,
    }
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Dotted path of the offending input.
    pub field: String,
}

impl From<&ModelError> for ErrorResponse {
    fn from(e: &ModelError) -> Self {
        Self {
            error: e.to_string(),
            field: e.field().to_string(),
        }
    }
}

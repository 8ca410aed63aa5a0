//! Independent evaluation and ranking of many parcels.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ModelError, Result};
use crate::model::evaluate;
use crate::model::types::{Assumptions, ProjectResult};
use crate::parcel::Parcel;

/// A parcel together with its evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct RankedParcel {
    pub parcel: Parcel,
    pub result: ProjectResult,
}

/// A parcel whose inputs failed validation.
#[derive(Debug, Clone)]
pub struct RejectedParcel {
    pub parcel: Parcel,
    pub error: ModelError,
}

/// Outcome of ranking a list of parcels.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Evaluated parcels, best NPV first.
    pub ranked: Vec<RankedParcel>,
    /// Parcels that could not be evaluated, in input order.
    pub rejected: Vec<RejectedParcel>,
}

/// Evaluates every parcel under the same assumptions and orders them by NPV
/// (descending). Ties keep input order.
///
/// Each parcel is evaluated from scratch; one parcel's failure never affects
/// another's result.
///
/// # Errors
///
/// Returns `ModelError::InvalidInput` for `usable_fraction` outside
/// `[0, 1]`, since it applies to every parcel.
pub fn rank_parcels(
    parcels: &[Parcel],
    assumptions: &Assumptions,
    usable_fraction: f64,
) -> Result<Ranking> {
    if !(0.0..=1.0).contains(&usable_fraction) {
        return Err(ModelError::InvalidInput {
            field: "usable_fraction",
            message: format!("must be in [0, 1], got {usable_fraction}"),
        });
    }

    let mut ranking = Ranking::default();

    for parcel in parcels {
        match evaluate(&parcel.site_inputs(usable_fraction), assumptions) {
            Ok(result) => {
                debug!(id = parcel.id, npv_usd = result.npv_usd, "ranked parcel");
                ranking.ranked.push(RankedParcel {
                    parcel: parcel.clone(),
                    result,
                });
            }
            Err(error) => {
                warn!(id = parcel.id, %error, "skipping parcel");
                ranking.rejected.push(RejectedParcel {
                    parcel: parcel.clone(),
                    error,
                });
            }
        }
    }

    ranking
        .ranked
        .sort_by(|a, b| b.result.npv_usd.total_cmp(&a.result.npv_usd));
    Ok(ranking)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parcel(id: u32, acres: f64, sunlight_hours: f64) -> Parcel {
        Parcel {
            id,
            name: format!("parcel-{id}"),
            location: None,
            acres,
            slope: None,
            sunlight_hours,
            grid_distance_km: None,
            suitability_score: None,
        }
    }

    #[test]
    fn sunnier_parcel_ranks_first() {
        let parcels = vec![parcel(1, 100.0, 4.0), parcel(2, 100.0, 6.5)];
        let ranking = rank_parcels(&parcels, &Assumptions::default(), 0.9).unwrap();
        assert_eq!(ranking.ranked.len(), 2);
        assert_eq!(ranking.ranked[0].parcel.id, 2);
        assert!(ranking.ranked[0].result.npv_usd >= ranking.ranked[1].result.npv_usd);
    }

    #[test]
    fn invalid_parcel_is_rejected_without_affecting_others() {
        let parcels = vec![parcel(1, -10.0, 5.0), parcel(2, 50.0, 5.0)];
        let ranking = rank_parcels(&parcels, &Assumptions::default(), 0.9).unwrap();
        assert_eq!(ranking.ranked.len(), 1);
        assert_eq!(ranking.rejected.len(), 1);
        assert_eq!(ranking.rejected[0].parcel.id, 1);
        assert_eq!(ranking.rejected[0].error.field(), "site.usable_area_acres");
    }

    #[test]
    fn usable_fraction_outside_unit_interval_rejected() {
        let parcels = vec![parcel(1, 320.0, 5.3)];
        for fraction in [2.5, -0.1, f64::NAN] {
            let err = rank_parcels(&parcels, &Assumptions::default(), fraction).unwrap_err();
            assert_eq!(err.field(), "usable_fraction");
        }
        assert!(rank_parcels(&parcels, &Assumptions::default(), 1.0).is_ok());
    }

    #[test]
    fn empty_input_empty_ranking() {
        let ranking = rank_parcels(&[], &Assumptions::default(), 0.9).unwrap();
        assert!(ranking.ranked.is_empty());
        assert!(ranking.rejected.is_empty());
    }
}

//! Award record entity <-> model mapper
//!
//! Normalizes the stored `places` JSON at the storage boundary: a place may
//! have been written as a single user id or as a list of co-equal user ids.
//! Everything past this module sees one uniform group per place.

use serde::Deserialize;

use tally_core::{AwardRecord, DomainError, UserId};

use crate::models::AwardModel;

/// One stored place: either a lone user or a group of co-equal users
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredPlace {
    One(UserId),
    Many(Vec<UserId>),
}

impl From<StoredPlace> for Vec<UserId> {
    fn from(place: StoredPlace) -> Self {
        match place {
            StoredPlace::One(user) => vec![user],
            StoredPlace::Many(users) => users,
        }
    }
}

impl TryFrom<AwardModel> for AwardRecord {
    type Error = DomainError;

    fn try_from(model: AwardModel) -> Result<Self, Self::Error> {
        let stored: Vec<StoredPlace> = serde_json::from_value(model.places).map_err(|e| {
            DomainError::StorageError(format!("malformed places payload for award {}: {e}", model.id))
        })?;

        Ok(AwardRecord {
            team_id: model.team_id,
            awarded_at: model.awarded_at,
            awarder_id: model.awarder_id,
            places: stored.into_iter().map(Vec::from).collect(),
        })
    }
}

/// Serialize places for insertion (always the normalized list-per-place form)
pub fn places_to_json(places: &[Vec<UserId>]) -> serde_json::Value {
    serde_json::json!(places)
}

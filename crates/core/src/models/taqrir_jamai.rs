//! Collective review unit (TaqrirJamai), its review entries and request bodies.

use serde::{Deserialize, Serialize};

use crate::review::PriorDecision;
use crate::types::{
    deserialize_id, deserialize_id_list, deserialize_opt_id, empty_metadata, EntityId, Timestamp,
};

/// A collective review aggregating several TaqrirKhass records.
///
/// Accumulates one [`TaqrirJamaiReview`] per reviewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaqrirJamai {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: EntityId,
    #[serde(deserialize_with = "deserialize_id")]
    pub document: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_id_list")]
    pub taqrir_khass: Vec<EntityId>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub created_by: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub status: Option<EntityId>,
    #[serde(default)]
    pub status_name: String,
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub reviews: Vec<TaqrirJamaiReview>,
    #[serde(default)]
    pub taqrir_khass_count: u32,
}

/// One reviewer's approve/reject entry on a TaqrirJamai.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaqrirJamaiReview {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: EntityId,
    #[serde(deserialize_with = "deserialize_id")]
    pub taqrir_jamai: EntityId,
    #[serde(deserialize_with = "deserialize_id")]
    pub reviewer: String,
    #[serde(default)]
    pub review_notes: String,
    pub review_date: Timestamp,
    pub is_approved: bool,
}

impl TaqrirJamai {
    /// The entry left by `reviewer`, if any.
    ///
    /// Display-only: the service is the authority on duplicate reviews.
    pub fn review_by(&self, reviewer: &str) -> Option<&TaqrirJamaiReview> {
        self.reviews.iter().find(|r| r.reviewer == reviewer)
    }

    /// The decision `reviewer` already recorded, if any.
    pub fn prior_decision_by(&self, reviewer: Option<&str>) -> Option<PriorDecision> {
        let review = self.review_by(reviewer?)?;
        Some(PriorDecision::Collective(review.clone()))
    }

    pub fn approvals(&self) -> usize {
        self.reviews.iter().filter(|r| r.is_approved).count()
    }

    pub fn rejections(&self) -> usize {
        self.reviews.len() - self.approvals()
    }
}

/// Body for `POST /tashih/taqrir-jamai/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaqrirJamai {
    pub document: EntityId,
    pub title: String,
    pub content: String,
    pub taqrir_khass: Vec<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Body for `POST /tashih/taqrir-jamai/{id}/review/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTaqrirJamai {
    pub review_notes: String,
    pub is_approved: bool,
}

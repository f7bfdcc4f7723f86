//! Individual review unit (TaqrirKhass) and its request bodies.

use serde::{Deserialize, Serialize};

use crate::review::PriorDecision;
use crate::types::{
    deserialize_id, deserialize_opt_id, empty_metadata, EntityId, Timestamp,
};

/// One scholar's review record for a document.
///
/// Decided exactly once: after the review call the service sets `reviewer`,
/// `review_notes`, `review_date` and `status` together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaqrirKhass {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: EntityId,
    #[serde(deserialize_with = "deserialize_id")]
    pub document: EntityId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub created_by: Option<EntityId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub status: Option<EntityId>,
    #[serde(default)]
    pub status_name: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub reviewer: Option<String>,
    #[serde(default)]
    pub review_notes: Option<String>,
    #[serde(default)]
    pub review_date: Option<Timestamp>,
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub document_title: String,
}

impl TaqrirKhass {
    pub fn is_reviewed(&self) -> bool {
        self.reviewer.is_some()
    }

    /// The recorded decision, present once any reviewer has decided.
    ///
    /// Independent of who is asking: a decided record is read-only for
    /// every actor.
    pub fn prior_decision(&self) -> Option<PriorDecision> {
        let reviewer = self.reviewer.clone()?;
        Some(PriorDecision::Individual {
            reviewer,
            status: self.status.clone(),
            status_name: self.status_name.clone(),
            review_notes: self.review_notes.clone(),
            review_date: self.review_date,
        })
    }
}

/// Body for `POST /tashih/taqrir-khass/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaqrirKhass {
    pub document: EntityId,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Body for `POST /tashih/taqrir-khass/{id}/review/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewTaqrirKhass {
    pub review_notes: String,
    pub status: EntityId,
}

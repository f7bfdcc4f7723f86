//! Read-only aggregates served by the tashih dashboard endpoints.

use serde::{Deserialize, Serialize};

use crate::models::taqrir_jamai::TaqrirJamai;
use crate::models::taqrir_khass::TaqrirKhass;
use crate::types::{deserialize_id, EntityId, Timestamp};

/// Per-document verification summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentTashihSummary {
    #[serde(deserialize_with = "deserialize_id")]
    pub document_id: EntityId,
    pub document_title: String,
    pub verification_status: String,
    #[serde(default)]
    pub taqrir_khass_count: u32,
    #[serde(default)]
    pub pending_reviews_count: u32,
    #[serde(default)]
    pub completed_reviews_count: u32,
    #[serde(default)]
    pub has_taqrir_jamai: bool,
    #[serde(default)]
    pub taqrir_jamai_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Global tashih counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TashihStatistics {
    pub documents_awaiting_verification: u64,
    pub documents_verified: u64,
    pub documents_rejected: u64,
    pub total_taqrir_khass: u64,
    pub pending_taqrir_khass_reviews: u64,
    pub completed_taqrir_khass_reviews: u64,
    pub total_taqrir_jamai: u64,
    pub taqrir_jamai_needing_review: u64,
}

/// The current reviewer's personal work list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewQueue {
    #[serde(default)]
    pub pending_taqrir_khass: Vec<TaqrirKhass>,
    #[serde(default)]
    pub pending_taqrir_jamai: Vec<TaqrirJamai>,
}

impl ReviewQueue {
    pub fn is_empty(&self) -> bool {
        self.pending_taqrir_khass.is_empty() && self.pending_taqrir_jamai.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending_taqrir_khass.len() + self.pending_taqrir_jamai.len()
    }
}

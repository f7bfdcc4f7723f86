//! Paginated list envelope and list filters.

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Standard `{ count, next, previous, results }` list envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Query for `GET /tashih/taqrir-khass/` and `GET /tashih/taqrir-jamai/`.
///
/// Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaqrirListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl TaqrirListQuery {
    /// Query pairs in a stable order, unset fields omitted.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(document) = &self.document {
            pairs.push(("document", document.clone()));
        }
        if let Some(status) = &self.status {
            pairs.push(("status", status.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

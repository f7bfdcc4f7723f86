//! Tashih dashboard snapshot and its in-memory views.
//!
//! Tabs and filters only re-slice what was fetched; switching views never
//! goes back to the network.

use std::str::FromStr;

use crate::error::CoreError;
use crate::models::{DocumentTashihSummary, ReviewQueue, TaqrirJamai, TaqrirKhass, TashihStatistics};

/// Everything the dashboard shows, fetched as one all-or-nothing batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub documents: Vec<DocumentTashihSummary>,
    pub queue: ReviewQueue,
    pub statistics: TashihStatistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    Documents,
    TaqrirKhass,
    TaqrirJamai,
}

impl FromStr for DashboardTab {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "documents" => Ok(Self::Documents),
            "khass" | "taqrir-khass" => Ok(Self::TaqrirKhass),
            "jamai" | "taqrir-jamai" => Ok(Self::TaqrirJamai),
            _ => Err(CoreError::Validation(format!(
                "Invalid tab '{s}'. Must be one of: documents, khass, jamai"
            ))),
        }
    }
}

/// Client-side filter applied to the active tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardFilter {
    /// Case-insensitive match against titles.
    pub search: Option<String>,
    /// Exact match on `verification_status`; documents tab only.
    pub verification_status: Option<String>,
}

impl DashboardFilter {
    fn matches_text(&self, fields: &[&str]) -> bool {
        let Some(needle) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
            return true;
        };
        let needle = needle.to_lowercase();
        fields.iter().any(|f| f.to_lowercase().contains(&needle))
    }

    fn matches_document(&self, doc: &DocumentTashihSummary) -> bool {
        let status_ok = self
            .verification_status
            .as_deref()
            .map_or(true, |status| doc.verification_status == status);
        status_ok && self.matches_text(&[&doc.document_title])
    }
}

/// Rows of one tab, borrowed from the snapshot.
#[derive(Debug, PartialEq)]
pub enum TabView<'a> {
    Documents(Vec<&'a DocumentTashihSummary>),
    TaqrirKhass(Vec<&'a TaqrirKhass>),
    TaqrirJamai(Vec<&'a TaqrirJamai>),
}

impl TabView<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Documents(rows) => rows.len(),
            Self::TaqrirKhass(rows) => rows.len(),
            Self::TaqrirJamai(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DashboardSnapshot {
    pub fn view(&self, tab: DashboardTab, filter: &DashboardFilter) -> TabView<'_> {
        match tab {
            DashboardTab::Documents => TabView::Documents(
                self.documents
                    .iter()
                    .filter(|d| filter.matches_document(d))
                    .collect(),
            ),
            DashboardTab::TaqrirKhass => TabView::TaqrirKhass(
                self.queue
                    .pending_taqrir_khass
                    .iter()
                    .filter(|k| filter.matches_text(&[&k.title, &k.document_title]))
                    .collect(),
            ),
            DashboardTab::TaqrirJamai => TabView::TaqrirJamai(
                self.queue
                    .pending_taqrir_jamai
                    .iter()
                    .filter(|j| filter.matches_text(&[&j.title, &j.document_title]))
                    .collect(),
            ),
        }
    }

    /// Tab badge counts: documents, pending individual, pending collective.
    pub fn tab_counts(&self) -> [(DashboardTab, usize); 3] {
        [
            (DashboardTab::Documents, self.documents.len()),
            (DashboardTab::TaqrirKhass, self.queue.pending_taqrir_khass.len()),
            (DashboardTab::TaqrirJamai, self.queue.pending_taqrir_jamai.len()),
        ]
    }
}

/// A labelled counter on the statistics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: u64,
}

/// Statistics cards, values copied straight from the fetched counters.
pub fn stat_cards(stats: &TashihStatistics) -> Vec<StatCard> {
    vec![
        StatCard {
            label: "Documents awaiting verification",
            value: stats.documents_awaiting_verification,
        },
        StatCard {
            label: "Documents verified",
            value: stats.documents_verified,
        },
        StatCard {
            label: "Documents rejected",
            value: stats.documents_rejected,
        },
        StatCard {
            label: "Total Taqrir Khass",
            value: stats.total_taqrir_khass,
        },
        StatCard {
            label: "Pending Taqrir Khass reviews",
            value: stats.pending_taqrir_khass_reviews,
        },
        StatCard {
            label: "Completed Taqrir Khass reviews",
            value: stats.completed_taqrir_khass_reviews,
        },
        StatCard {
            label: "Total Taqrir Jamai",
            value: stats.total_taqrir_jamai,
        },
        StatCard {
            label: "Taqrir Jamai needing review",
            value: stats.taqrir_jamai_needing_review,
        },
    ]
}

//! Tashih dashboard controller.
//!
//! Loads documents awaiting verification, the reviewer's queue and the
//! global statistics as one concurrent batch. Any failure discards the whole
//! batch: the dashboard is either fully populated or shows one error.

use tashih_core::dashboard::{
    stat_cards, DashboardFilter, DashboardSnapshot, DashboardTab, StatCard, TabView,
};
use tashih_core::guard::{GuardOutcome, WorkflowGuard};
use tashih_core::models::Actor;
use tashih_core::roles::Capability;
use tashih_core::routes::Route;

use crate::api::{SharedApi, TashihApi};
use crate::error::ApiResult;
use crate::session::Session;

/// Issue the three dashboard reads concurrently.
pub async fn fetch_snapshot(api: &dyn TashihApi) -> ApiResult<DashboardSnapshot> {
    let (documents, queue, statistics) = tokio::try_join!(
        api.get_documents_awaiting_verification(),
        api.get_my_review_queue(),
        api.get_tashih_statistics(),
    )?;
    Ok(DashboardSnapshot {
        documents,
        queue,
        statistics,
    })
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DashboardState {
    #[default]
    Idle,
    Loading,
    Ready(DashboardSnapshot),
    Failed(String),
}

pub struct DashboardController {
    api: SharedApi,
    actor: Actor,
    state: DashboardState,
    tab: DashboardTab,
    filter: DashboardFilter,
}

impl std::fmt::Debug for DashboardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DashboardController")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DashboardController {
    pub fn new(api: SharedApi, actor: Actor) -> Self {
        Self {
            api,
            actor,
            state: DashboardState::Idle,
            tab: DashboardTab::default(),
            filter: DashboardFilter::default(),
        }
    }

    /// Run the guard against the session, then build the controller.
    pub fn open(session: &Session, api: SharedApi) -> Result<Self, Route> {
        let mut guard = WorkflowGuard::requiring(Capability::ViewTashihDashboard);
        match guard.enter(None, session.current_actor().as_ref()) {
            GuardOutcome::Authorized(actor) => Ok(Self::new(api, actor)),
            GuardOutcome::RedirectTo(route) => {
                tracing::info!(redirect = %route, "Dashboard redirected");
                Err(route)
            }
        }
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn snapshot(&self) -> Option<&DashboardSnapshot> {
        match &self.state {
            DashboardState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            DashboardState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Fetch all three panels.
    pub async fn load(&mut self) -> &DashboardState {
        self.state = DashboardState::Loading;
        self.state = match fetch_snapshot(self.api.as_ref()).await {
            Ok(snapshot) => {
                tracing::debug!(
                    documents = snapshot.documents.len(),
                    queued = snapshot.queue.len(),
                    "Dashboard loaded"
                );
                DashboardState::Ready(snapshot)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Dashboard failed to load");
                DashboardState::Failed(err.to_string())
            }
        };
        &self.state
    }

    /// Re-run the same batch.
    pub async fn refresh(&mut self) -> &DashboardState {
        self.load().await
    }

    pub fn tab(&self) -> DashboardTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: DashboardTab) {
        self.tab = tab;
    }

    pub fn filter(&self) -> &DashboardFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: DashboardFilter) {
        self.filter = filter;
    }

    /// Rows of the active tab; `None` until the batch has loaded.
    pub fn view(&self) -> Option<TabView<'_>> {
        self.snapshot().map(|s| s.view(self.tab, &self.filter))
    }

    pub fn stat_cards(&self) -> Option<Vec<StatCard>> {
        self.snapshot().map(|s| stat_cards(&s.statistics))
    }
}

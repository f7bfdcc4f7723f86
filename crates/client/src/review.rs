//! Review page controllers.
//!
//! [`ReviewController`] drives [`ReviewState`] for one review target: it
//! loads the record, detects a decision already on file, validates the form
//! locally and performs the single write. The two entity kinds plug in via
//! [`ReviewKind`].

use std::marker::PhantomData;

use async_trait::async_trait;
use tashih_core::error::CoreError;
use tashih_core::guard::{GuardOutcome, WorkflowGuard};
use tashih_core::models::{
    Actor, ReviewTaqrirJamai, ReviewTaqrirKhass, ReviewerIdentity, TaqrirJamai, TaqrirKhass,
    VerificationStatus,
};
use tashih_core::review::{
    final_statuses, DecisionInput, JamaiDecision, KhassDecision, PriorDecision, ReviewEvent,
    ReviewForm, ReviewState, ReviewSubmission,
};
use tashih_core::routes::Route;
use tashih_core::types::EntityId;

use crate::api::{SharedApi, TashihApi};
use crate::error::ApiResult;
use crate::session::Session;

/// What differs between the individual and the collective review page.
#[async_trait]
pub trait ReviewKind: Send + Sync + 'static {
    /// The record under review.
    type Entity: Clone + Send + Sync;
    /// Extra data loaded alongside the record.
    type Context: Default + Send + Sync;
    /// Decision carried by the form.
    type Decision: DecisionInput + Send + Sync;

    /// Entity label used in logs.
    const ENTITY: &'static str;

    fn route(id: &str) -> Route;

    /// Fetch the record and its context concurrently.
    async fn fetch(api: &dyn TashihApi, id: &str) -> ApiResult<(Self::Entity, Self::Context)>;

    /// The decision that makes the form unavailable to `actor`.
    fn prior_decision(
        entity: &Self::Entity,
        actor: &Actor,
        identity: ReviewerIdentity,
    ) -> Option<PriorDecision>;

    /// Post the validated decision.
    async fn post(
        api: &dyn TashihApi,
        id: &str,
        submission: ReviewSubmission<Self::Decision>,
    ) -> ApiResult<()>;
}

/// Individual review (TaqrirKhass).
pub struct Khass;

/// Collective review (TaqrirJamai).
pub struct Jamai;

#[async_trait]
impl ReviewKind for Khass {
    type Entity = TaqrirKhass;
    /// Final verification statuses offered as decisions.
    type Context = Vec<VerificationStatus>;
    type Decision = KhassDecision;

    const ENTITY: &'static str = "TaqrirKhass";

    fn route(id: &str) -> Route {
        Route::TaqrirKhassReview(id.to_string())
    }

    async fn fetch(api: &dyn TashihApi, id: &str) -> ApiResult<(TaqrirKhass, Vec<VerificationStatus>)> {
        let (entity, catalog) =
            tokio::try_join!(api.get_taqrir_khass(id), api.get_verification_statuses())?;
        Ok((entity, final_statuses(&catalog)))
    }

    fn prior_decision(
        entity: &TaqrirKhass,
        _actor: &Actor,
        _identity: ReviewerIdentity,
    ) -> Option<PriorDecision> {
        entity.prior_decision()
    }

    async fn post(
        api: &dyn TashihApi,
        id: &str,
        submission: ReviewSubmission<KhassDecision>,
    ) -> ApiResult<()> {
        api.review_taqrir_khass(id, &ReviewTaqrirKhass::from(submission))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ReviewKind for Jamai {
    type Entity = TaqrirJamai;
    type Context = ();
    type Decision = JamaiDecision;

    const ENTITY: &'static str = "TaqrirJamai";

    fn route(id: &str) -> Route {
        Route::TaqrirJamaiReview(id.to_string())
    }

    async fn fetch(api: &dyn TashihApi, id: &str) -> ApiResult<(TaqrirJamai, ())> {
        Ok((api.get_taqrir_jamai(id).await?, ()))
    }

    fn prior_decision(
        entity: &TaqrirJamai,
        actor: &Actor,
        identity: ReviewerIdentity,
    ) -> Option<PriorDecision> {
        let reviewer = actor.reviewer_identity(identity);
        if reviewer.is_none() {
            tracing::warn!(
                actor_id = %actor.id,
                ?identity,
                "Credential lacks the reviewer identity field; cannot detect an earlier review"
            );
        }
        entity.prior_decision_by(reviewer)
    }

    async fn post(
        api: &dyn TashihApi,
        id: &str,
        submission: ReviewSubmission<JamaiDecision>,
    ) -> ApiResult<()> {
        api.review_taqrir_jamai(id, &ReviewTaqrirJamai::from(submission))
            .await
            .map(|_| ())
    }
}

/// Controller for one review page instance.
pub struct ReviewController<K: ReviewKind> {
    api: SharedApi,
    actor: Actor,
    identity: ReviewerIdentity,
    id: EntityId,
    state: ReviewState,
    entity: Option<K::Entity>,
    context: K::Context,
    form: ReviewForm<K::Decision>,
    guard: WorkflowGuard,
    _kind: PhantomData<K>,
}

impl<K: ReviewKind> std::fmt::Debug for ReviewController<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewController")
            .field("entity", &K::ENTITY)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

pub type KhassReviewController = ReviewController<Khass>;
pub type JamaiReviewController = ReviewController<Jamai>;

impl<K: ReviewKind> ReviewController<K> {
    /// Run the guard against the session, then build the controller.
    ///
    /// Nothing is fetched here; a redirect is returned before any request.
    pub fn open(
        session: &Session,
        api: SharedApi,
        identity: ReviewerIdentity,
        id: impl Into<EntityId>,
    ) -> Result<Self, Route> {
        let id = id.into();
        let mut guard = WorkflowGuard::new();
        let actor = Self::admit(&mut guard, session, &id)?;
        Ok(Self {
            api,
            actor,
            identity,
            id,
            state: ReviewState::Loading,
            entity: None,
            context: K::Context::default(),
            form: ReviewForm::default(),
            guard,
            _kind: PhantomData,
        })
    }

    fn admit(guard: &mut WorkflowGuard, session: &Session, id: &str) -> Result<Actor, Route> {
        match guard.enter(Some(id), session.current_actor().as_ref()) {
            GuardOutcome::Authorized(actor) => Ok(actor),
            GuardOutcome::RedirectTo(route) => {
                tracing::info!(entity = K::ENTITY, id, redirect = %route, "Review page redirected");
                Err(route)
            }
        }
    }

    /// Point the page at another target.
    ///
    /// A new id re-runs the guard and, once admitted, drops everything
    /// loaded for the old target and starts again from `Loading`. The same
    /// id keeps the current page as is.
    pub fn retarget(&mut self, session: &Session, id: impl Into<EntityId>) -> Result<(), Route> {
        let id = id.into();
        if id == self.id {
            return Ok(());
        }
        let actor = Self::admit(&mut self.guard, session, &id)?;
        tracing::debug!(entity = K::ENTITY, from = %self.id, to = %id, "Review page retargeted");
        self.actor = actor;
        self.id = id;
        self.state = ReviewState::Loading;
        self.entity = None;
        self.context = K::Context::default();
        self.form = ReviewForm::default();
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn route(&self) -> Route {
        K::route(&self.id)
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn entity(&self) -> Option<&K::Entity> {
        self.entity.as_ref()
    }

    pub fn context(&self) -> &K::Context {
        &self.context
    }

    pub fn form(&self) -> &ReviewForm<K::Decision> {
        &self.form
    }

    pub fn set_decision(&mut self, decision: K::Decision) {
        self.form.decision = Some(decision);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.form.notes = notes.into();
    }

    fn transition(&mut self, event: ReviewEvent) -> Result<&ReviewState, CoreError> {
        self.state = self.state.apply(event)?;
        Ok(&self.state)
    }

    /// Fetch the target and decide between the form and the read-only view.
    ///
    /// Only legal while `Loading`; anything else is refused before any
    /// request so a loaded page never holds a record its state disagrees
    /// with.
    pub async fn load(&mut self) -> Result<&ReviewState, CoreError> {
        if self.state != ReviewState::Loading {
            return Err(CoreError::Conflict(format!(
                "Cannot load while {}",
                self.state.label()
            )));
        }
        match K::fetch(self.api.as_ref(), &self.id).await {
            Ok((entity, context)) => {
                let prior = K::prior_decision(&entity, &self.actor, self.identity);
                if prior.is_some() {
                    tracing::debug!(entity = K::ENTITY, id = %self.id, "Already reviewed");
                }
                self.entity = Some(entity);
                self.context = context;
                self.transition(ReviewEvent::Loaded(prior))
            }
            Err(err) => {
                tracing::warn!(entity = K::ENTITY, id = %self.id, error = %err, "Review target failed to load");
                self.transition(ReviewEvent::LoadFailed(err.to_string()))
            }
        }
    }

    /// Validate and post the form.
    ///
    /// A validation failure never reaches the network. On success the
    /// state becomes `Completed(/dashboard/tashih)`; on a rejected write
    /// the message becomes the inline error and the form stays as entered.
    pub async fn submit(&mut self) -> Result<&ReviewState, CoreError> {
        if !self.state.can_submit() {
            return Err(CoreError::Conflict(format!(
                "Cannot submit while {}",
                self.state.label()
            )));
        }

        let submission = match self.form.validate() {
            Ok(submission) => submission,
            Err(err) => return self.transition(ReviewEvent::ValidationFailed(err.to_string())),
        };

        self.transition(ReviewEvent::Submit)?;
        match K::post(self.api.as_ref(), &self.id, submission).await {
            Ok(()) => self.transition(ReviewEvent::SubmitSucceeded),
            Err(err) => self.transition(ReviewEvent::SubmitFailed(err.to_string())),
        }
    }
}

impl ReviewController<Khass> {
    /// Select a status by id; only final statuses from the catalog are
    /// accepted.
    pub fn select_status(&mut self, status_id: &str) -> Result<(), CoreError> {
        if !self.context.iter().any(|s| s.id == status_id) {
            return Err(CoreError::Validation(format!(
                "Status '{status_id}' is not a selectable final status"
            )));
        }
        self.set_decision(KhassDecision {
            status: status_id.to_string(),
        });
        Ok(())
    }

    pub fn selectable_statuses(&self) -> &[VerificationStatus] {
        &self.context
    }
}

impl ReviewController<Jamai> {
    pub fn set_approval(&mut self, is_approved: bool) {
        self.set_decision(JamaiDecision { is_approved });
    }
}

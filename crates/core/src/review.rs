//! Review page state machine, decision forms and their validation.
//!
//! Both review screens (TaqrirKhass and TaqrirJamai) share the same shape:
//!
//! ```text
//! Loading -> LoadError
//!         -> AlreadyReviewed
//!         -> Reviewable -> Submitting -> Reviewable (error)
//!                                     -> Completed (/dashboard/tashih)
//! ```
//!
//! They differ only in the decision carried by the form: a verification
//! status id for individual reviews, approve/reject for collective ones.

use crate::error::CoreError;
use crate::models::{ReviewTaqrirJamai, ReviewTaqrirKhass, TaqrirJamaiReview, VerificationStatus};
use crate::routes::Route;
use crate::types::{EntityId, Timestamp};

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for review notes.
pub const MAX_REVIEW_NOTES_LENGTH: usize = 10_000;

pub const MISSING_STATUS_MESSAGE: &str = "Please select a verification status";
pub const MISSING_APPROVAL_MESSAGE: &str = "Please choose to approve or reject";
pub const MISSING_NOTES_MESSAGE: &str = "Review notes are required";

/* --------------------------------------------------------------------------
Decisions
-------------------------------------------------------------------------- */

/// Decision payload of an individual review: the chosen status id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KhassDecision {
    pub status: EntityId,
}

/// Decision payload of a collective review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JamaiDecision {
    pub is_approved: bool,
}

/// A decision kind the review form can carry.
pub trait DecisionInput: Clone {
    /// Inline message when no decision was picked.
    const MISSING_MESSAGE: &'static str;

    /// Reject a picked-but-empty decision.
    fn check(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

impl DecisionInput for KhassDecision {
    const MISSING_MESSAGE: &'static str = MISSING_STATUS_MESSAGE;

    fn check(&self) -> Result<(), CoreError> {
        if self.status.trim().is_empty() {
            return Err(CoreError::Validation(MISSING_STATUS_MESSAGE.to_string()));
        }
        Ok(())
    }
}

impl DecisionInput for JamaiDecision {
    const MISSING_MESSAGE: &'static str = MISSING_APPROVAL_MESSAGE;
}

/// A decision already recorded on the fetched record.
#[derive(Debug, Clone, PartialEq)]
pub enum PriorDecision {
    /// The single decision on a TaqrirKhass.
    Individual {
        reviewer: String,
        status: Option<EntityId>,
        status_name: String,
        review_notes: Option<String>,
        review_date: Option<Timestamp>,
    },
    /// The current actor's entry on a TaqrirJamai.
    Collective(TaqrirJamaiReview),
}

impl PriorDecision {
    pub fn review_notes(&self) -> Option<&str> {
        match self {
            Self::Individual { review_notes, .. } => review_notes.as_deref(),
            Self::Collective(review) => Some(&review.review_notes),
        }
    }
}

/* --------------------------------------------------------------------------
Form
-------------------------------------------------------------------------- */

/// Editable form state. Survives failed submissions untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm<D> {
    pub decision: Option<D>,
    pub notes: String,
}

impl<D> Default for ReviewForm<D> {
    fn default() -> Self {
        Self {
            decision: None,
            notes: String::new(),
        }
    }
}

/// A validated form, ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission<D> {
    pub decision: D,
    pub notes: String,
}

impl<D: DecisionInput> ReviewForm<D> {
    pub fn new(decision: Option<D>, notes: impl Into<String>) -> Self {
        Self {
            decision,
            notes: notes.into(),
        }
    }

    /// Require a decision and non-blank notes.
    pub fn validate(&self) -> Result<ReviewSubmission<D>, CoreError> {
        let decision = self
            .decision
            .clone()
            .ok_or_else(|| CoreError::Validation(D::MISSING_MESSAGE.to_string()))?;
        decision.check()?;

        if self.notes.trim().is_empty() {
            return Err(CoreError::Validation(MISSING_NOTES_MESSAGE.to_string()));
        }
        if self.notes.chars().count() > MAX_REVIEW_NOTES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Review notes exceed maximum length of {MAX_REVIEW_NOTES_LENGTH} characters"
            )));
        }

        Ok(ReviewSubmission {
            decision,
            notes: self.notes.clone(),
        })
    }
}

impl From<ReviewSubmission<KhassDecision>> for ReviewTaqrirKhass {
    fn from(submission: ReviewSubmission<KhassDecision>) -> Self {
        Self {
            review_notes: submission.notes,
            status: submission.decision.status,
        }
    }
}

impl From<ReviewSubmission<JamaiDecision>> for ReviewTaqrirJamai {
    fn from(submission: ReviewSubmission<JamaiDecision>) -> Self {
        Self {
            review_notes: submission.notes,
            is_approved: submission.decision.is_approved,
        }
    }
}

/// Statuses offered as decisions: only the final ones, in catalog order.
pub fn final_statuses(catalog: &[VerificationStatus]) -> Vec<VerificationStatus> {
    catalog.iter().filter(|s| s.is_final).cloned().collect()
}

/* --------------------------------------------------------------------------
State machine
-------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReviewState {
    #[default]
    Loading,
    LoadError(String),
    AlreadyReviewed(PriorDecision),
    Reviewable { error: Option<String> },
    Submitting,
    Completed(Route),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewEvent {
    /// Initial fetch finished; carries the decision already on record.
    Loaded(Option<PriorDecision>),
    LoadFailed(String),
    /// The form failed client-side validation; nothing was sent.
    ValidationFailed(String),
    Submit,
    SubmitFailed(String),
    SubmitSucceeded,
}

impl ReviewState {
    /// Compute the next state, or `Conflict` if `event` is not legal here.
    pub fn apply(&self, event: ReviewEvent) -> Result<Self, CoreError> {
        use ReviewEvent as E;

        let next = match (self, event) {
            (Self::Loading, E::Loaded(Some(prior))) => Self::AlreadyReviewed(prior),
            (Self::Loading, E::Loaded(None)) => Self::Reviewable { error: None },
            (Self::Loading, E::LoadFailed(message)) => Self::LoadError(message),
            (Self::Reviewable { .. }, E::ValidationFailed(message)) => Self::Reviewable {
                error: Some(message),
            },
            (Self::Reviewable { .. }, E::Submit) => Self::Submitting,
            (Self::Submitting, E::SubmitFailed(message)) => Self::Reviewable {
                error: Some(message),
            },
            (Self::Submitting, E::SubmitSucceeded) => Self::Completed(Route::TashihDashboard),
            (state, event) => {
                return Err(CoreError::Conflict(format!(
                    "Cannot apply {event:?} while {}",
                    state.label()
                )))
            }
        };
        Ok(next)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::LoadError(_) => "load_error",
            Self::AlreadyReviewed(_) => "already_reviewed",
            Self::Reviewable { .. } => "reviewable",
            Self::Submitting => "submitting",
            Self::Completed(_) => "completed",
        }
    }

    /// Whether the decision form is on screen.
    pub fn shows_form(&self) -> bool {
        matches!(self, Self::Reviewable { .. } | Self::Submitting)
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Reviewable { .. })
    }

    /// Page-level or inline error text.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::LoadError(message) => Some(message),
            Self::Reviewable { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Where the host should navigate, once the page is done.
    pub fn redirect(&self) -> Option<&Route> {
        match self {
            Self::Completed(route) => Some(route),
            _ => None,
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn status(id: &str, name: &str, is_final: bool) -> VerificationStatus {
        VerificationStatus {
            id: id.into(),
            name: name.into(),
            is_final,
            description: None,
        }
    }

    fn collective_prior() -> PriorDecision {
        PriorDecision::Collective(TaqrirJamaiReview {
            id: "r1".into(),
            taqrir_jamai: "j1".into(),
            reviewer: "fatimah".into(),
            review_notes: "Approved after second reading".into(),
            review_date: chrono::Utc::now(),
            is_approved: true,
        })
    }

    #[test]
    fn only_final_statuses_are_offered() {
        let catalog = vec![status("v1", "Verified", true), status("v2", "In Review", false)];
        let offered = final_statuses(&catalog);
        assert_eq!(offered.len(), 1);
        assert_eq!(offered[0].id, "v1");
        assert_eq!(offered[0].name, "Verified");
    }

    #[test]
    fn missing_status_is_rejected() {
        let form: ReviewForm<KhassDecision> = ReviewForm::new(None, "ok");
        assert_eq!(
            form.validate(),
            Err(CoreError::Validation(MISSING_STATUS_MESSAGE.into()))
        );
    }

    #[test]
    fn blank_status_id_is_rejected() {
        let form = ReviewForm::new(Some(KhassDecision { status: " ".into() }), "ok");
        assert_eq!(
            form.validate(),
            Err(CoreError::Validation(MISSING_STATUS_MESSAGE.into()))
        );
    }

    #[test]
    fn whitespace_notes_are_rejected() {
        let form = ReviewForm::new(Some(KhassDecision { status: "v1".into() }), "   \n");
        assert_eq!(
            form.validate(),
            Err(CoreError::Validation(MISSING_NOTES_MESSAGE.into()))
        );
    }

    #[test]
    fn missing_approval_is_rejected() {
        let form: ReviewForm<JamaiDecision> = ReviewForm::new(None, "fine");
        assert_eq!(
            form.validate(),
            Err(CoreError::Validation(MISSING_APPROVAL_MESSAGE.into()))
        );
    }

    #[test]
    fn oversized_notes_are_rejected() {
        let notes = "a".repeat(MAX_REVIEW_NOTES_LENGTH + 1);
        let form = ReviewForm::new(Some(JamaiDecision { is_approved: true }), notes);
        assert_matches!(form.validate(), Err(CoreError::Validation(msg)) => {
            assert!(msg.contains("maximum length"));
        });
    }

    #[test]
    fn valid_khass_form_builds_request_body() {
        let form = ReviewForm::new(Some(KhassDecision { status: "v1".into() }), "ok");
        let body: ReviewTaqrirKhass = form.validate().unwrap().into();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"review_notes": "ok", "status": "v1"})
        );
    }

    #[test]
    fn valid_jamai_form_builds_request_body() {
        let form = ReviewForm::new(Some(JamaiDecision { is_approved: false }), "needs work");
        let body: ReviewTaqrirJamai = form.validate().unwrap().into();
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"review_notes": "needs work", "is_approved": false})
        );
    }

    #[test]
    fn pages_start_loading() {
        assert_eq!(ReviewState::default(), ReviewState::Loading);
        assert!(!ReviewState::default().shows_form());
    }

    #[test]
    fn load_without_prior_decision_shows_form() {
        let state = ReviewState::Loading.apply(ReviewEvent::Loaded(None)).unwrap();
        assert!(state.shows_form());
        assert!(state.can_submit());
        assert!(state.error().is_none());
    }

    #[test]
    fn load_with_prior_decision_hides_form() {
        let state = ReviewState::Loading
            .apply(ReviewEvent::Loaded(Some(collective_prior())))
            .unwrap();
        assert!(!state.shows_form());
        assert_matches!(&state, ReviewState::AlreadyReviewed(prior) => {
            assert_eq!(prior.review_notes(), Some("Approved after second reading"));
        });
        assert!(state.apply(ReviewEvent::Submit).is_err());
    }

    #[test]
    fn load_failure_halts_with_message() {
        let state = ReviewState::Loading
            .apply(ReviewEvent::LoadFailed("Forbidden".into()))
            .unwrap();
        assert_eq!(state.error(), Some("Forbidden"));
        assert!(!state.shows_form());
        assert!(state.apply(ReviewEvent::Submit).is_err());
    }

    #[test]
    fn submit_before_load_is_illegal() {
        assert_matches!(
            ReviewState::Loading.apply(ReviewEvent::Submit),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn validation_failure_stays_reviewable() {
        let state = ReviewState::Reviewable { error: None }
            .apply(ReviewEvent::ValidationFailed(MISSING_NOTES_MESSAGE.into()))
            .unwrap();
        assert!(state.can_submit());
        assert_eq!(state.error(), Some(MISSING_NOTES_MESSAGE));
    }

    #[test]
    fn submitting_disables_submit_and_clears_error() {
        let state = ReviewState::Reviewable {
            error: Some("old".into()),
        }
        .apply(ReviewEvent::Submit)
        .unwrap();
        assert_eq!(state, ReviewState::Submitting);
        assert!(!state.can_submit());
        assert!(state.error().is_none());
        assert!(state.apply(ReviewEvent::Submit).is_err());
    }

    #[test]
    fn submit_failure_returns_to_reviewable_with_message() {
        let state = ReviewState::Submitting
            .apply(ReviewEvent::SubmitFailed("Already reviewed".into()))
            .unwrap();
        assert_eq!(
            state,
            ReviewState::Reviewable {
                error: Some("Already reviewed".into())
            }
        );
    }

    #[test]
    fn submit_success_navigates_to_tashih_dashboard() {
        let state = ReviewState::Submitting
            .apply(ReviewEvent::SubmitSucceeded)
            .unwrap();
        assert_eq!(state.redirect(), Some(&Route::TashihDashboard));
        assert_eq!(state.redirect().unwrap().path(), "/dashboard/tashih");
        assert!(state.apply(ReviewEvent::Submit).is_err());
    }
}

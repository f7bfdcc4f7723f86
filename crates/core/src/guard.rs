//! Access guard for tashih pages.
//!
//! Evaluated before a page issues any request. The outcome is data: the
//! host navigates on `RedirectTo` instead of the guard doing it as a side
//! effect.

use crate::models::Actor;
use crate::roles::Capability;
use crate::routes::Route;

/// Result of checking an actor against a page's requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Authorized(Actor),
    RedirectTo(Route),
}

impl GuardOutcome {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized(_))
    }

    pub fn actor(&self) -> Option<&Actor> {
        match self {
            Self::Authorized(actor) => Some(actor),
            Self::RedirectTo(_) => None,
        }
    }
}

/// Check an actor against `capability`.
///
/// No actor redirects to login; an actor lacking the capability redirects
/// to the general dashboard.
pub fn evaluate_for(actor: Option<&Actor>, capability: Capability) -> GuardOutcome {
    match actor {
        None => GuardOutcome::RedirectTo(Route::Login),
        Some(actor) if !actor.role.has(capability) => {
            tracing::debug!(role = %actor.role, ?capability, "Actor lacks capability");
            GuardOutcome::RedirectTo(Route::Dashboard)
        }
        Some(actor) => GuardOutcome::Authorized(actor.clone()),
    }
}

/// Check an actor against the review screens' requirement.
pub fn evaluate(actor: Option<&Actor>) -> GuardOutcome {
    evaluate_for(actor, Capability::Review)
}

/// Guard progress for one page instance.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Unresolved,
    Redirecting(Route),
    Authorized(Actor),
}

/// Per-page guard that re-runs whenever the page's target id changes.
#[derive(Debug, Default)]
pub struct WorkflowGuard {
    capability: Option<Capability>,
    target: Option<String>,
    state: GuardState,
}

impl WorkflowGuard {
    /// Guard for review screens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Guard for a page that needs something other than `Review`.
    pub fn requiring(capability: Capability) -> Self {
        Self {
            capability: Some(capability),
            ..Self::default()
        }
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Enter the page for `target_id`.
    ///
    /// Re-entering with the same id returns the cached outcome; a different
    /// id resets the guard and evaluates again.
    pub fn enter(&mut self, target_id: Option<&str>, actor: Option<&Actor>) -> GuardOutcome {
        let same_target = self.target.as_deref() == target_id;
        if same_target {
            match &self.state {
                GuardState::Authorized(actor) => return GuardOutcome::Authorized(actor.clone()),
                GuardState::Redirecting(route) => return GuardOutcome::RedirectTo(route.clone()),
                GuardState::Unresolved => {}
            }
        }

        self.target = target_id.map(str::to_string);
        let outcome = evaluate_for(actor, self.capability.unwrap_or(Capability::Review));
        self.state = match &outcome {
            GuardOutcome::Authorized(actor) => GuardState::Authorized(actor.clone()),
            GuardOutcome::RedirectTo(route) => GuardState::Redirecting(route.clone()),
        };
        outcome
    }

    /// Forget the cached outcome, e.g. after logout.
    pub fn reset(&mut self) {
        self.target = None;
        self.state = GuardState::Unresolved;
    }
}

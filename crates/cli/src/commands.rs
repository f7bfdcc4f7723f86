//! Subcommand implementations.
//!
//! Each command returns [`Outcome::Redirect`] when the guard turns the actor
//! away, and an error when a load or submission fails.

use anyhow::{bail, Context, Result};
use tashih_client::dashboard::DashboardController;
use tashih_client::review::{JamaiReviewController, KhassReviewController};
use tashih_client::{ClientConfig, Session, SharedApi};
use tashih_core::dashboard::{DashboardFilter, DashboardTab, TabView};
use tashih_core::models::Actor;
use tashih_core::review::{PriorDecision, ReviewState};

use crate::Outcome;

pub fn whoami(session: &Session) -> Result<Outcome> {
    match session.current_actor() {
        Some(actor) => print_actor(&actor),
        None => println!("not authenticated"),
    }
    Ok(Outcome::Done)
}

pub fn login(session: &Session, token: String) -> Result<Outcome> {
    let Some(path) = session.token_file().map(|p| p.display().to_string()) else {
        bail!("No token file configured; set TASHIH_TOKEN_FILE or pass --token-file");
    };
    session
        .store_token(token)
        .with_context(|| format!("Failed to write token file {path}"))?;
    tracing::info!(path = %path, "Stored credential");

    match session.current_actor() {
        Some(actor) => print_actor(&actor),
        None => println!("credential stored, but it is expired or unreadable"),
    }
    Ok(Outcome::Done)
}

pub fn logout(session: &Session) -> Result<Outcome> {
    let next = session.logout();
    println!("logged out; continue at {next}");
    Ok(Outcome::Done)
}

pub async fn dashboard(
    session: &Session,
    api: SharedApi,
    tab: DashboardTab,
    search: Option<String>,
    status: Option<String>,
) -> Result<Outcome> {
    let mut controller = match DashboardController::open(session, api) {
        Ok(controller) => controller,
        Err(route) => return Ok(Outcome::Redirect(route)),
    };

    controller.load().await;
    if let Some(message) = controller.error() {
        bail!("{message}");
    }

    controller.select_tab(tab);
    controller.set_filter(DashboardFilter {
        search,
        verification_status: status,
    });

    for card in controller.stat_cards().unwrap_or_default() {
        println!("{:>6}  {}", card.value, card.label);
    }
    if let Some(snapshot) = controller.snapshot() {
        let counts = snapshot
            .tab_counts()
            .iter()
            .map(|(tab, count)| format!("{} ({count})", tab_name(*tab)))
            .collect::<Vec<_>>()
            .join(" | ");
        println!();
        println!("{counts}");
    }
    println!();

    match controller.view() {
        Some(TabView::Documents(rows)) => {
            for doc in rows {
                println!(
                    "{}  {}  [{}]  reviews {}/{} pending, jamai {}",
                    doc.document_id,
                    doc.document_title,
                    doc.verification_status,
                    doc.pending_reviews_count,
                    doc.taqrir_khass_count,
                    doc.taqrir_jamai_count,
                );
            }
        }
        Some(TabView::TaqrirKhass(rows)) => {
            for khass in rows {
                println!("{}  {}  ({})", khass.id, khass.title, khass.document_title);
            }
        }
        Some(TabView::TaqrirJamai(rows)) => {
            for jamai in rows {
                println!(
                    "{}  {}  ({})  {} approved, {} rejected",
                    jamai.id,
                    jamai.title,
                    jamai.document_title,
                    jamai.approvals(),
                    jamai.rejections(),
                );
            }
        }
        None => {}
    }
    Ok(Outcome::Done)
}

pub async fn review_khass(
    session: &Session,
    api: SharedApi,
    config: &ClientConfig,
    id: String,
    status: Option<String>,
    notes: Option<String>,
) -> Result<Outcome> {
    let mut controller =
        match KhassReviewController::open(session, api, config.reviewer_identity, id) {
            Ok(controller) => controller,
            Err(route) => return Ok(Outcome::Redirect(route)),
        };

    let state = controller.load().await?.clone();
    if let Some(done) = settled(&state)? {
        return Ok(done);
    }

    if status.is_none() && notes.is_none() {
        if let Some(khass) = controller.entity() {
            println!("{}  {}", khass.id, khass.title);
            println!("document: {} ({})", khass.document_title, khass.document);
            println!();
            println!("{}", khass.content);
            println!();
        }
        println!("selectable statuses:");
        for status in controller.selectable_statuses() {
            println!("  {}  {}", status.id, status.name);
        }
        return Ok(Outcome::Done);
    }

    if let Some(status) = status {
        controller.select_status(&status)?;
    }
    controller.set_notes(notes.unwrap_or_default());
    finish(controller.submit().await?)
}

pub async fn review_jamai(
    session: &Session,
    api: SharedApi,
    config: &ClientConfig,
    id: String,
    decision: Option<bool>,
    notes: Option<String>,
) -> Result<Outcome> {
    let mut controller =
        match JamaiReviewController::open(session, api, config.reviewer_identity, id) {
            Ok(controller) => controller,
            Err(route) => return Ok(Outcome::Redirect(route)),
        };

    let state = controller.load().await?.clone();
    if let Some(done) = settled(&state)? {
        return Ok(done);
    }

    if decision.is_none() && notes.is_none() {
        if let Some(jamai) = controller.entity() {
            println!("{}  {}", jamai.id, jamai.title);
            println!(
                "document: {} ({}), {} individual reports",
                jamai.document_title, jamai.document, jamai.taqrir_khass_count
            );
            println!();
            println!("{}", jamai.content);
            println!();
            for review in &jamai.reviews {
                let verdict = if review.is_approved { "approved" } else { "rejected" };
                println!("  {} {verdict}: {}", review.reviewer, review.review_notes);
            }
        }
        return Ok(Outcome::Done);
    }

    if let Some(is_approved) = decision {
        controller.set_approval(is_approved);
    }
    controller.set_notes(notes.unwrap_or_default());
    finish(controller.submit().await?)
}

/// Handle the states where the form is unavailable after loading.
fn settled(state: &ReviewState) -> Result<Option<Outcome>> {
    match state {
        ReviewState::LoadError(message) => bail!("{message}"),
        ReviewState::AlreadyReviewed(prior) => {
            print_prior(prior);
            Ok(Some(Outcome::Done))
        }
        _ => Ok(None),
    }
}

fn finish(state: &ReviewState) -> Result<Outcome> {
    if let Some(next) = state.redirect() {
        println!("review submitted; continue at {next}");
        return Ok(Outcome::Done);
    }
    match state.error() {
        Some(message) => bail!("{message}"),
        None => bail!("Review not submitted ({})", state.label()),
    }
}

fn print_actor(actor: &Actor) {
    println!("{} <{}>", actor.name, actor.email);
    println!("id: {}", actor.id);
    println!("role: {}", actor.role);
    if let Some(username) = &actor.username {
        println!("username: {username}");
    }
}

fn print_prior(prior: &PriorDecision) {
    println!("already reviewed");
    match prior {
        PriorDecision::Individual {
            reviewer,
            status_name,
            review_date,
            ..
        } => {
            println!("reviewer: {reviewer}");
            println!("status: {status_name}");
            if let Some(date) = review_date {
                println!("date: {}", date.format("%Y-%m-%d %H:%M"));
            }
        }
        PriorDecision::Collective(review) => {
            let verdict = if review.is_approved { "approved" } else { "rejected" };
            println!("your decision: {verdict}");
            println!("date: {}", review.review_date.format("%Y-%m-%d %H:%M"));
        }
    }
    if let Some(notes) = prior.review_notes() {
        println!("notes: {notes}");
    }
}

fn tab_name(tab: DashboardTab) -> &'static str {
    match tab {
        DashboardTab::Documents => "documents",
        DashboardTab::TaqrirKhass => "khass",
        DashboardTab::TaqrirJamai => "jamai",
    }
}

//! The seam between page controllers and the Tashih service.

use std::sync::Arc;

use async_trait::async_trait;
use tashih_core::models::{
    CreateTaqrirJamai, CreateTaqrirKhass, DocumentTashihSummary, Paginated, ReviewQueue,
    ReviewTaqrirJamai, ReviewTaqrirKhass, TaqrirJamai, TaqrirJamaiReview, TaqrirKhass,
    TaqrirListQuery, TashihStatistics, VerificationStatus,
};

use crate::error::ApiResult;

/// Operations offered by the remote review API.
///
/// [`crate::gateway::TashihGateway`] is the HTTP implementation. Controllers
/// only see the trait object.
#[async_trait]
pub trait TashihApi: Send + Sync {
    // ---- dashboard ----

    async fn get_documents_awaiting_verification(&self) -> ApiResult<Vec<DocumentTashihSummary>>;

    async fn get_my_review_queue(&self) -> ApiResult<ReviewQueue>;

    async fn get_tashih_statistics(&self) -> ApiResult<TashihStatistics>;

    // ---- taqrir khass ----

    async fn get_taqrir_khass_list(
        &self,
        query: &TaqrirListQuery,
    ) -> ApiResult<Paginated<TaqrirKhass>>;

    async fn get_taqrir_khass(&self, id: &str) -> ApiResult<TaqrirKhass>;

    async fn create_taqrir_khass(&self, body: &CreateTaqrirKhass) -> ApiResult<TaqrirKhass>;

    /// Record the single decision on a TaqrirKhass. The service decides
    /// whether the transition is legal.
    async fn review_taqrir_khass(
        &self,
        id: &str,
        body: &ReviewTaqrirKhass,
    ) -> ApiResult<TaqrirKhass>;

    async fn get_taqrir_khass_by_document(&self, document_id: &str)
        -> ApiResult<Vec<TaqrirKhass>>;

    // ---- taqrir jamai ----

    async fn get_taqrir_jamai_list(
        &self,
        query: &TaqrirListQuery,
    ) -> ApiResult<Paginated<TaqrirJamai>>;

    async fn get_taqrir_jamai(&self, id: &str) -> ApiResult<TaqrirJamai>;

    async fn create_taqrir_jamai(&self, body: &CreateTaqrirJamai) -> ApiResult<TaqrirJamai>;

    /// Append the caller's entry to a TaqrirJamai.
    async fn review_taqrir_jamai(
        &self,
        id: &str,
        body: &ReviewTaqrirJamai,
    ) -> ApiResult<TaqrirJamaiReview>;

    async fn get_taqrir_jamai_by_document(&self, document_id: &str)
        -> ApiResult<Vec<TaqrirJamai>>;

    // ---- catalog ----

    async fn get_verification_statuses(&self) -> ApiResult<Vec<VerificationStatus>>;
}

/// Shared handle used by controllers.
pub type SharedApi = Arc<dyn TashihApi>;

//! HTTP client for the Tashih review API.
//!
//! Wraps the `/tashih/...` endpoints using [`reqwest`]. Every request
//! carries the session's `Authorization` header and a JSON content type;
//! every response goes through [`decode_or_error`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tashih_core::models::{
    CreateTaqrirJamai, CreateTaqrirKhass, DocumentTashihSummary, Paginated, ReviewQueue,
    ReviewTaqrirJamai, ReviewTaqrirKhass, TaqrirJamai, TaqrirJamaiReview, TaqrirKhass,
    TaqrirListQuery, TashihStatistics, VerificationStatus,
};

use crate::api::TashihApi;
use crate::config::{normalize_base_url, ClientConfig};
use crate::error::{ApiError, ApiResult};
use crate::session::Session;

const KHASS: &str = "/tashih/taqrir-khass";
const JAMAI: &str = "/tashih/taqrir-jamai";

/// Typed client for one Tashih service.
pub struct TashihGateway {
    client: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
}

impl TashihGateway {
    /// Build a gateway with its own HTTP client using the configured
    /// timeout.
    pub fn new(config: &ClientConfig, session: Arc<Session>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, &config.api_url, session))
    }

    /// Build a gateway reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str, session: Arc<Session>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    // ---- private helpers ----

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        tracing::debug!(%method, path, "Tashih API request");
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTHORIZATION, self.session.authorization_header())
            .header(CONTENT_TYPE, "application/json")
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        decode_or_error(response).await
    }

    async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let response = self.request(Method::GET, path).query(query).send().await?;
        decode_or_error(response).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let response = self.request(Method::POST, path).json(body).send().await?;
        decode_or_error(response).await
    }
}

/// `/tashih/<collection>/<id>/` with the id percent-encoded.
fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}/{}/", urlencoding::encode(id))
}

/// Parse a successful JSON body, or turn a failure status into
/// [`ApiError::Http`] carrying the server's message.
pub async fn decode_or_error<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let url_path = response.url().path().to_string();
    let body = response.bytes().await?;

    if !status.is_success() {
        let message = error_message(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), path = %url_path, error = %message, "Tashih API error");
        return Err(ApiError::Http {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(path = %url_path, error = %e, "Unexpected Tashih API response body");
        ApiError::Decode(e.to_string())
    })
}

/// Human-readable message for a failed response: the body's `detail`, then
/// its `error`, then `HTTP <status>`.
pub fn error_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            ["detail", "error"].iter().find_map(|key| {
                json.get(key)
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl TashihApi for TashihGateway {
    async fn get_documents_awaiting_verification(&self) -> ApiResult<Vec<DocumentTashihSummary>> {
        self.get("/tashih/dashboard/documents-awaiting-verification/")
            .await
    }

    async fn get_my_review_queue(&self) -> ApiResult<ReviewQueue> {
        self.get("/tashih/dashboard/my-review-queue/").await
    }

    async fn get_tashih_statistics(&self) -> ApiResult<TashihStatistics> {
        self.get("/tashih/dashboard/statistics/").await
    }

    async fn get_taqrir_khass_list(
        &self,
        query: &TaqrirListQuery,
    ) -> ApiResult<Paginated<TaqrirKhass>> {
        self.get_with_query(&format!("{KHASS}/"), &query.pairs())
            .await
    }

    async fn get_taqrir_khass(&self, id: &str) -> ApiResult<TaqrirKhass> {
        self.get(&item_path(KHASS, id)).await
    }

    async fn create_taqrir_khass(&self, body: &CreateTaqrirKhass) -> ApiResult<TaqrirKhass> {
        let created: TaqrirKhass = self.post(&format!("{KHASS}/"), body).await?;
        tracing::info!(id = %created.id, document_id = %created.document, "Created TaqrirKhass");
        Ok(created)
    }

    async fn review_taqrir_khass(
        &self,
        id: &str,
        body: &ReviewTaqrirKhass,
    ) -> ApiResult<TaqrirKhass> {
        let path = format!("{}review/", item_path(KHASS, id));
        let reviewed: TaqrirKhass = self.post(&path, body).await?;
        tracing::info!(id, status = %body.status, "Submitted TaqrirKhass review");
        Ok(reviewed)
    }

    async fn get_taqrir_khass_by_document(
        &self,
        document_id: &str,
    ) -> ApiResult<Vec<TaqrirKhass>> {
        self.get(&item_path(&format!("{KHASS}/by-document"), document_id))
            .await
    }

    async fn get_taqrir_jamai_list(
        &self,
        query: &TaqrirListQuery,
    ) -> ApiResult<Paginated<TaqrirJamai>> {
        self.get_with_query(&format!("{JAMAI}/"), &query.pairs())
            .await
    }

    async fn get_taqrir_jamai(&self, id: &str) -> ApiResult<TaqrirJamai> {
        self.get(&item_path(JAMAI, id)).await
    }

    async fn create_taqrir_jamai(&self, body: &CreateTaqrirJamai) -> ApiResult<TaqrirJamai> {
        let created: TaqrirJamai = self.post(&format!("{JAMAI}/"), body).await?;
        tracing::info!(id = %created.id, document_id = %created.document, "Created TaqrirJamai");
        Ok(created)
    }

    async fn review_taqrir_jamai(
        &self,
        id: &str,
        body: &ReviewTaqrirJamai,
    ) -> ApiResult<TaqrirJamaiReview> {
        let path = format!("{}review/", item_path(JAMAI, id));
        let review: TaqrirJamaiReview = self.post(&path, body).await?;
        tracing::info!(id, is_approved = body.is_approved, "Submitted TaqrirJamai review");
        Ok(review)
    }

    async fn get_taqrir_jamai_by_document(
        &self,
        document_id: &str,
    ) -> ApiResult<Vec<TaqrirJamai>> {
        self.get(&item_path(&format!("{JAMAI}/by-document"), document_id))
            .await
    }

    async fn get_verification_statuses(&self) -> ApiResult<Vec<VerificationStatus>> {
        self.get("/tashih/verification-statuses/").await
    }
}

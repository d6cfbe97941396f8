//! HTTP transport for the reservation API
//!
//! Every call goes through [`ApiClient::execute`], which signs the request
//! with the session credential and performs the one global reaction to a
//! rejected credential: clear the session and let the host know.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::dto::{decode_body, error_message};
use crate::application::session::SharedSessionStore;
use crate::config::ApiConfig;
use crate::domain::Credential;
use crate::notifications::EndReason;
use crate::shared::{ApiError, ClientResult, ConfigError};

/// Thin JSON client over `reqwest` bound to one backend and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SharedSessionStore,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: SharedSessionStore) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ConfigError::Invalid(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SharedSessionStore {
        &self.session
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path), self.session.credential())
            .await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let request = self.request(Method::GET, path).query(query);
        self.execute(request, self.session.credential()).await
    }

    /// GET signed with an explicit credential instead of the session's.
    /// Used to validate a persisted credential before a session exists.
    pub async fn get_as<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path), Some(credential.clone()))
            .await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.execute(request, self.session.credential()).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.execute(request, self.session.credential()).await
    }

    /// POST without a body whose response content is irrelevant.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let request = self.request(Method::POST, path);
        self.execute::<serde_json::Value>(request, self.session.credential())
            .await
            .map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.http.request(method, url)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: Option<Credential>,
    ) -> Result<T, ApiError> {
        let request = match &credential {
            Some(credential) => request.bearer_auth(credential.as_str()),
            None => request,
        };

        let request = request.build()?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%method, path = %path, status = status.as_u16(), "API call");

        if status.is_success() {
            return decode_body(&body);
        }

        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });

        if status == StatusCode::UNAUTHORIZED {
            // A response to a request signed with an older credential must
            // not end a newer session.
            let current = self.session.credential();
            let stale = matches!((&credential, &current), (Some(sent), Some(now)) if sent != now);
            if !stale && (credential.is_some() || current.is_some()) {
                warn!(%method, path = %path, "Credential rejected by backend, clearing session");
                self.session.clear_session(EndReason::Expired).await;
            }
            return Err(ApiError::Unauthorized(message));
        }

        Err(ApiError::Status { status, message })
    }
}

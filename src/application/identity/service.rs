//! Auth client: login, registration, logout and session recovery
//!
//! The only component, besides the 401 handler in the transport, that
//! writes the persisted credential (through the session store).

use tracing::{info, warn};

use crate::domain::{Credential, Session, User, UserRole};
use crate::infrastructure::http::dto::{AuthResponse, LoginRequest, RegisterRequest};
use crate::infrastructure::http::ApiClient;
use crate::notifications::EndReason;
use crate::shared::{validate_request, ApiError, ClientError, ClientResult};

/// What the user submitted on the auth form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthIntent {
    Login {
        email: String,
        password: String,
    },
    Register {
        email: String,
        password: String,
        role: UserRole,
    },
}

impl AuthIntent {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Login {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Registration with the default customer role.
    pub fn register(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Register {
            email: email.into(),
            password: password.into(),
            role: UserRole::Customer,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Login { email, .. } | Self::Register { email, .. } => email,
        }
    }
}

/// Auth client: talks to `/login`, `/register`, `/logout` and `/auth/check`.
#[derive(Clone)]
pub struct AuthClient {
    api: ApiClient,
}

impl AuthClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Dispatch a login or registration intent.
    pub async fn submit(&self, intent: AuthIntent) -> ClientResult<Session> {
        match intent {
            AuthIntent::Login { email, password } => self.login(&email, &password).await,
            AuthIntent::Register {
                email,
                password,
                role,
            } => self.register(&email, &password, role).await,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        validate_request(&request)?;

        let response: AuthResponse = self
            .api
            .post("/login", &request)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized(_) => ClientError::Auth("invalid email or password".into()),
                other => auth_error(other),
            })?;

        self.establish(response).await
    }

    // ── Registration ────────────────────────────────────────────

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> ClientResult<Session> {
        let request = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            role,
        };
        validate_request(&request)?;

        let response: AuthResponse = self
            .api
            .post("/register", &request)
            .await
            .map_err(|e| match e.status() {
                Some(status) if status == reqwest::StatusCode::CONFLICT => {
                    ClientError::Auth(format!("email {} is already registered", request.email))
                }
                _ => auth_error(e),
            })?;

        info!(email = %response.user.email, "New account registered");
        self.establish(response).await
    }

    async fn establish(&self, response: AuthResponse) -> ClientResult<Session> {
        let credential = Credential::new(response.token);
        if credential.is_empty() {
            return Err(ClientError::Auth("backend returned an empty token".into()));
        }
        let session = Session::new(response.user, credential);
        self.api.session().set_session(session.clone()).await?;
        Ok(session)
    }

    // ── Logout ──────────────────────────────────────────────────

    /// Notify the backend if possible, then always drop the local session.
    pub async fn logout(&self) {
        if self.api.session().credential().is_some() {
            if let Err(e) = self.api.post_empty("/logout").await {
                warn!(error = %e, "Logout request failed, clearing local session anyway");
            }
        }
        self.api.session().clear_session(EndReason::Logout).await;
    }

    // ── Session recovery ────────────────────────────────────────

    /// Recover a session from the persisted credential at startup.
    ///
    /// Yields `None` on any failure. The credential is kept when the
    /// backend is unreachable or failing, and dropped when it is refused.
    pub async fn check_session(&self) -> Option<Session> {
        let store = self.api.session();
        if let Some(session) = store.current_session() {
            return Some(session);
        }

        let credential = store.persisted_credential().await?;
        match self.api.get_as::<User>("/auth/check", &credential).await {
            Ok(user) => {
                let session = Session::new(user, credential);
                store.restore_session(session.clone());
                Some(session)
            }
            // the transport already cleared the rejected credential
            Err(ApiError::Unauthorized(_)) => None,
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Backend unavailable, keeping stored credential");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not restore session");
                store.clear_session(EndReason::Invalid).await;
                None
            }
        }
    }
}

fn auth_error(error: ApiError) -> ClientError {
    match error {
        ApiError::Network(e) => ClientError::Auth(format!("backend unreachable: {e}")),
        other => ClientError::Auth(other.message()),
    }
}

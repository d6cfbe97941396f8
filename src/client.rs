//! Client bootstrap
//!
//! Wires the event bus, credential storage, session store, HTTP transport,
//! the three API clients and the workflow controller from one [`AppConfig`].

use std::sync::Arc;

use tracing::info;

use crate::application::{
    AuthClient, BookingClient, CatalogClient, SessionStore, SharedSessionStore,
    WorkflowController,
};
use crate::config::AppConfig;
use crate::infrastructure::{ApiClient, CredentialStore, FileCredentialStore};
use crate::notifications::{create_event_bus, SessionEvents, SharedEventBus};
use crate::shared::ClientResult;

/// Fully wired client stack.
///
/// # Examples
///
/// ```rust,no_run
/// use hotel_booking::{AppConfig, ClientHandle};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ClientHandle::from_config(&AppConfig::default())?;
///     let state = handle.workflow.start().await;
///     println!("{state}");
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct ClientHandle {
    /// Session lifecycle notifications (sign-in, logout, expiry).
    pub events: SharedEventBus,
    pub session: SharedSessionStore,
    pub auth: AuthClient,
    pub catalog: CatalogClient,
    pub booking: BookingClient,
    pub workflow: Arc<WorkflowController>,
    /// The configuration the client was built from.
    pub config: AppConfig,
}

impl ClientHandle {
    /// Build the stack with the credential persisted to the configured file.
    pub fn from_config(config: &AppConfig) -> ClientResult<Self> {
        let path = config.session.credential_path();
        info!(base_url = %config.api.base_url, credential = %path.display(), "Initializing booking client");
        Self::with_credential_store(config, Arc::new(FileCredentialStore::new(path)))
    }

    /// Build the stack over an arbitrary credential store.
    pub fn with_credential_store(
        config: &AppConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let events = create_event_bus();
        let session = SessionStore::shared(credentials, events.clone());
        let api = ApiClient::new(&config.api, session.clone())?;

        let auth = AuthClient::new(api.clone());
        let catalog = CatalogClient::new(api.clone());
        let booking = BookingClient::new(api);
        let workflow = Arc::new(WorkflowController::new(
            auth.clone(),
            catalog.clone(),
            booking.clone(),
            session.clone(),
        ));

        Ok(Self {
            events,
            session,
            auth,
            catalog,
            booking,
            workflow,
            config: config.clone(),
        })
    }

    /// Register for session events. This is where a host reacts to an
    /// expired credential, e.g. by showing its sign-in screen.
    pub fn subscribe(&self) -> SessionEvents {
        self.events.subscribe()
    }
}

/// Initialize tracing (logging) from the application config.
///
/// `RUST_LOG` overrides the configured level. Call once at process startup;
/// later calls are no-ops.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    let result = match config.logging.format.to_lowercase().as_str() {
        "json" => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        _ => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
    if let Err(e) = result {
        // the host installed its own subscriber first; keep it
        tracing::debug!(error = %e, "Global tracing subscriber already set");
    }
}

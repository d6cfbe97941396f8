//! Session store: the client's single record of who is signed in

use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::domain::{Credential, Session};
use crate::infrastructure::storage::CredentialStore;
use crate::notifications::{
    EndReason, SessionEndedEvent, SessionEvent, SessionEvents, SessionStartedEvent,
    SharedEventBus,
};
use crate::shared::ClientResult;

/// Holds the current session in memory and its credential in durable
/// storage. Injected into every client; there is no global session.
pub struct SessionStore {
    current: RwLock<Option<Session>>,
    credentials: Arc<dyn CredentialStore>,
    events: SharedEventBus,
}

/// Shared, reference-counted session store
pub type SharedSessionStore = Arc<SessionStore>;

impl SessionStore {
    pub fn new(credentials: Arc<dyn CredentialStore>, events: SharedEventBus) -> Self {
        Self {
            current: RwLock::new(None),
            credentials,
            events,
        }
    }

    /// Wrap in `Arc` for shared ownership
    pub fn shared(credentials: Arc<dyn CredentialStore>, events: SharedEventBus) -> SharedSessionStore {
        Arc::new(Self::new(credentials, events))
    }

    /// Current session, if any.
    pub fn current_session(&self) -> Option<Session> {
        match self.current.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_session().is_some()
    }

    /// Credential of the in-memory session, used to sign requests.
    pub fn credential(&self) -> Option<Credential> {
        self.current_session().map(|s| s.credential)
    }

    /// Credential left by a previous process, read once at startup.
    /// Storage failures are logged and treated as "nothing persisted".
    pub async fn persisted_credential(&self) -> Option<Credential> {
        match self.credentials.load().await {
            Ok(credential) => credential,
            Err(e) => {
                warn!(error = %e, "Could not read persisted credential");
                None
            }
        }
    }

    /// Replace the current session and persist its credential.
    pub async fn set_session(&self, session: Session) -> ClientResult<()> {
        self.credentials.save(&session.credential).await?;
        self.install(session);
        Ok(())
    }

    /// Adopt a session whose credential is already persisted.
    pub(crate) fn restore_session(&self, session: Session) {
        self.install(session);
    }

    fn install(&self, session: Session) {
        let started = SessionStartedEvent {
            email: session.user.email.clone(),
            role: session.user.role,
        };
        info!(email = %started.email, role = %started.role, "Session started");

        match self.current.write() {
            Ok(mut guard) => *guard = Some(session),
            Err(poisoned) => *poisoned.into_inner() = Some(session),
        }
        self.events.publish(SessionEvent::Started(started));
    }

    /// Remove the session and the persisted credential.
    ///
    /// Never fails: a storage error is logged and the in-memory session is
    /// dropped regardless. `Ended` is published only if there was a
    /// session or a stored credential to end.
    pub async fn clear_session(&self, reason: EndReason) {
        let previous = match self.current.write() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        let had_session =
            previous.is_some() || matches!(self.credentials.load().await, Ok(Some(_)));

        if let Err(e) = self.credentials.clear().await {
            warn!(error = %e, "Could not remove persisted credential");
        }

        if !had_session {
            debug!(reason = ?reason, "No session to end");
            return;
        }

        let email = previous.map(|s| s.user.email);
        info!(email = ?email, reason = ?reason, "Session ended");
        self.events
            .publish(SessionEvent::Ended(SessionEndedEvent { email, reason }));
    }

    /// Register for session lifecycle events.
    pub fn subscribe(&self) -> SessionEvents {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{User, UserRole};
    use crate::infrastructure::storage::InMemoryCredentialStore;
    use crate::notifications::create_event_bus;

    fn session(email: &str, token: &str) -> Session {
        Session::new(
            User {
                id: "1".into(),
                email: email.into(),
                role: UserRole::Customer,
            },
            Credential::new(token),
        )
    }

    #[tokio::test]
    async fn set_persists_and_clear_removes() {
        let credentials = Arc::new(InMemoryCredentialStore::new());
        let store = SessionStore::new(credentials.clone(), create_event_bus());
        let mut events = store.subscribe();

        store.set_session(session("a@example.com", "t1")).await.unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.credential(), Some(Credential::new("t1")));
        assert_eq!(credentials.load().await.unwrap(), Some(Credential::new("t1")));
        assert_eq!(events.try_recv().unwrap().event.event_type(), "session_started");

        store.clear_session(EndReason::Logout).await;
        assert!(store.current_session().is_none());
        assert!(store.persisted_credential().await.is_none());

        let ended = events.try_recv().unwrap();
        assert_eq!(ended.event.end_reason(), Some(EndReason::Logout));
    }

    #[tokio::test]
    async fn at_most_one_session() {
        let store = SessionStore::new(Arc::new(InMemoryCredentialStore::new()), create_event_bus());
        store.set_session(session("a@example.com", "t1")).await.unwrap();
        store.set_session(session("b@example.com", "t2")).await.unwrap();

        let current = store.current_session().unwrap();
        assert_eq!(current.user.email, "b@example.com");
        assert_eq!(store.persisted_credential().await, Some(Credential::new("t2")));
    }

    #[tokio::test]
    async fn restore_does_not_touch_storage() {
        let credentials = Arc::new(InMemoryCredentialStore::with_credential(Credential::new("old")));
        let store = SessionStore::new(credentials.clone(), create_event_bus());

        store.restore_session(session("a@example.com", "old"));
        assert!(store.is_authenticated());
        assert_eq!(credentials.load().await.unwrap(), Some(Credential::new("old")));
    }

    #[tokio::test]
    async fn clearing_without_a_session_is_silent() {
        let store = SessionStore::new(Arc::new(InMemoryCredentialStore::new()), create_event_bus());
        let mut events = store.subscribe();

        store.clear_session(EndReason::Logout).await;
        assert!(events.try_recv().is_none());
    }

    #[tokio::test]
    async fn clearing_a_stored_credential_is_announced() {
        let credentials = Arc::new(InMemoryCredentialStore::with_credential(Credential::new("old")));
        let store = SessionStore::new(credentials.clone(), create_event_bus());
        let mut events = store.subscribe();

        store.clear_session(EndReason::Invalid).await;
        assert!(credentials.load().await.unwrap().is_none());
        let ended = events.try_recv().expect("session end published");
        assert_eq!(ended.event.end_reason(), Some(EndReason::Invalid));
    }
}

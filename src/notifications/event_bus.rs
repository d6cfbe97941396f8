//! Session event bus
//!
//! A `tokio::sync::broadcast` channel. Each subscriber sees the events
//! published after it subscribed, in publication order.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::events::{EventMessage, SessionEvent};

/// Session events are rare; a small buffer only matters for a host that
/// stops polling for a long time.
const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventMessage>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Fan `event` out to current subscribers. Having none is normal for
    /// headless use.
    pub fn publish(&self, event: SessionEvent) {
        let message = EventMessage::new(event);
        let event_type = message.event.event_type();
        let delivered = self.sender.send(message).unwrap_or(0);
        debug!(event_type, subscribers = delivered, "Session event published");
    }

    pub fn subscribe(&self) -> SessionEvents {
        SessionEvents {
            receiver: self.sender.subscribe(),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription handed to the host application
pub struct SessionEvents {
    receiver: broadcast::Receiver<EventMessage>,
}

impl SessionEvents {
    /// Wait for the next event; `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.recv().await {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!(missed, "Session event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Non-blocking receive, for hosts that poll between frames
    pub fn try_recv(&mut self) -> Option<EventMessage> {
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => return Some(msg),
                Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Session event subscriber lagged");
                }
                Err(_) => return None,
            }
        }
    }
}

pub type SharedEventBus = Arc<EventBus>;

pub fn create_event_bus() -> SharedEventBus {
    Arc::new(EventBus::new())
}

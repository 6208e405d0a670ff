//! Broadcast channel decoupling the transport from session state.
//!
//! The transport detects terminal auth failures deep inside the refresh
//! protocol; the session store must react without the transport calling
//! into it. Events flow over a `tokio::sync::broadcast` channel that any
//! interested layer subscribes to.

use tokio::sync::broadcast;
use tracing::trace;

const EVENT_CAPACITY: usize = 64;

/// Events emitted by the API client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// The credential was cleared (refresh failed). Listeners must drop
    /// any local session state.
    LoggedOut,
    /// Best-effort user-facing notice for a non-auth request failure.
    Notification { message: String },
}

/// Handle to the client's event channel.
#[derive(Debug, Clone)]
pub struct EventChannel {
    tx: broadcast::Sender<ClientEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.tx.subscribe()
    }

    /// Emit an event. A send with no subscribers is not an error.
    pub fn emit(&self, event: ClientEvent) {
        trace!(?event, "emitting client event");
        let _ = self.tx.send(event);
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_emitted_events() {
        let channel = EventChannel::new();
        let mut rx = channel.subscribe();

        channel.emit(ClientEvent::LoggedOut);

        assert_eq!(rx.recv().await.unwrap(), ClientEvent::LoggedOut);
    }

    #[tokio::test]
    async fn emit_without_subscribers_is_silent() {
        let channel = EventChannel::new();
        channel.emit(ClientEvent::Notification {
            message: "nobody listening".to_string(),
        });
    }

    #[tokio::test]
    async fn each_subscriber_gets_its_own_copy() {
        let channel = EventChannel::new();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        channel.emit(ClientEvent::LoggedOut);

        assert_eq!(first.recv().await.unwrap(), ClientEvent::LoggedOut);
        assert_eq!(second.recv().await.unwrap(), ClientEvent::LoggedOut);
    }
}

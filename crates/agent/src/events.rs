//! Event-shaped dispatch over the agent's handlers.
//!
//! Hosts that receive worker-style events can hand them to [`dispatch`]
//! instead of calling individual handlers.
//!
//! [`dispatch`]: OfflineCacheAgent::dispatch

use crate::agent::{FetchOutcome, OfflineCacheAgent, SyncOutcome};
use crate::notifications::Notification;
use crate::request::FetchRequest;
use pantry_core::Error;

/// Events a host can deliver to the agent.
#[derive(Debug)]
pub enum AgentEvent {
    Install,
    Activate,
    Fetch(FetchRequest),
    Sync { tag: String },
    Push { payload: Option<Vec<u8>> },
    NotificationClick { action: String },
}

/// What handling an event produced.
#[derive(Debug)]
pub enum EventOutcome {
    /// A lifecycle event completed.
    Lifecycle,
    /// A fetch was handled.
    Fetch(FetchOutcome),
    /// A sync was handled.
    Sync(SyncOutcome),
    /// A push was handled; this notification was shown.
    Push(Notification),
    /// A notification click was handled.
    NotificationClick,
}

impl OfflineCacheAgent {
    /// Deliver one event to the matching handler.
    pub async fn dispatch(&self, event: AgentEvent) -> Result<EventOutcome, Error> {
        match event {
            AgentEvent::Install => {
                self.install().await?;
                Ok(EventOutcome::Lifecycle)
            }
            AgentEvent::Activate => {
                self.activate().await;
                Ok(EventOutcome::Lifecycle)
            }
            AgentEvent::Fetch(request) => Ok(EventOutcome::Fetch(self.handle_fetch(&request).await?)),
            AgentEvent::Sync { tag } => Ok(EventOutcome::Sync(self.handle_sync(&tag).await)),
            AgentEvent::Push { payload } => Ok(EventOutcome::Push(self.handle_push(payload.as_deref()).await)),
            AgentEvent::NotificationClick { action } => {
                self.handle_notification_click(&action).await;
                Ok(EventOutcome::NotificationClick)
            }
        }
    }
}

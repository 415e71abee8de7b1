//! Offline-first cache agent for a recipe PWA origin.
//!
//! The agent runs a service-worker style lifecycle as plain async Rust: it
//! installs a generation-named store of app-shell assets, activates by
//! deleting older generations, and serves intercepted requests cache-first
//! with network and offline fallbacks. Hosts drive it through
//! [`OfflineCacheAgent`] directly or the event-shaped
//! [`OfflineCacheAgent::dispatch`] surface.

pub mod agent;
pub mod events;
pub mod host;
pub mod lifecycle;
pub mod notifications;
pub mod request;
pub mod response;

pub use agent::{FetchOutcome, OfflineCacheAgent, SYNC_TAG, SyncOutcome};
pub use events::{AgentEvent, EventOutcome};
pub use host::{HostRuntime, NullHost};
pub use lifecycle::LifecycleState;
pub use notifications::{ACTION_CLOSE, ACTION_EXPLORE, Notification, NotificationAction, NotificationData};
pub use request::{Destination, FetchRequest};
pub use response::{ServeSource, ServedResponse};

//! Host-side effects the agent can request.

use crate::notifications::Notification;
use url::Url;

/// Surface the agent drives on its host.
///
/// In a browser this would be the worker's global scope. The host binary
/// implements it with logging; tests implement it with recorders. The calls
/// are advisory signals, so none of them return errors.
#[async_trait::async_trait]
pub trait HostRuntime: Send + Sync {
    /// Ask the host to promote this agent without waiting for old clients
    /// to go away.
    async fn skip_waiting(&self);

    /// Ask the host to hand every current client over to this agent.
    async fn claim_clients(&self);

    /// Display a notification.
    async fn show_notification(&self, notification: &Notification);

    /// Dismiss the notification being interacted with.
    async fn close_notification(&self);

    /// Open (or focus) a window at the given URL.
    async fn open_window(&self, url: &Url);
}

/// Host that ignores every request.
///
/// Useful when embedding the agent somewhere with no notification or
/// window surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHost;

#[async_trait::async_trait]
impl HostRuntime for NullHost {
    async fn skip_waiting(&self) {}

    async fn claim_clients(&self) {}

    async fn show_notification(&self, _notification: &Notification) {}

    async fn close_notification(&self) {}

    async fn open_window(&self, _url: &Url) {}
}

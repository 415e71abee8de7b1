//! Agent lifecycle states.

/// Lifecycle phase of the agent.
///
/// A fresh agent is `Idle`. `install` moves it through `Installing` to
/// `Waiting`, and `activate` makes it `Active`. A failed install falls back
/// to `Idle`, so the previous generation keeps serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// Not installed; nothing cached by this agent yet.
    #[default]
    Idle,
    /// Install in progress.
    Installing,
    /// Installed and waiting to take over.
    Waiting,
    /// In control of the origin's requests.
    Active,
}

/// An error returned when an event can no longer be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    /// Every strong [`Event`](crate::Event) handle was dropped, taking the listeners with it.
    #[error("the event was dropped and has no listeners left to fire")]
    Dropped,
}

/// A result with [`EventError`] as the error type.
pub type Result<T, E = EventError> = std::result::Result<T, E>;

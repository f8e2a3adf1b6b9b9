use crate::{Listener, WeakEvent};
use std::fmt::Debug;

/// A listener that stays registered until this guard is dropped. Created with [`Event::subscribe`](crate::Event::subscribe).
///
/// The guard only holds a weak handle to the event, so keeping a subscription around does not keep the event alive.
#[must_use = "the listener is removed as soon as the subscription is dropped"]
pub struct Subscription<T = (), R = ()> {
    event: WeakEvent<T, R>,
    listener: Option<Listener<T, R>>,
}

impl<T, R> Subscription<T, R> {
    pub(crate) fn new(event: WeakEvent<T, R>, listener: Listener<T, R>) -> Self {
        Self {
            event,
            listener: Some(listener),
        }
    }

    /// The registered listener.
    pub fn listener(&self) -> Option<&Listener<T, R>> {
        self.listener.as_ref()
    }

    /// Leave the listener registered for the rest of the event's life and return it.
    pub fn forget(mut self) -> Option<Listener<T, R>> {
        self.listener.take()
    }
}

impl<T, R> Drop for Subscription<T, R> {
    fn drop(&mut self) {
        let Some(listener) = self.listener.take() else {
            return;
        };

        if let Some(event) = self.event.upgrade() {
            event.unlisten(&listener);
        }
    }
}

impl<T, R> Debug for Subscription<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event", &self.event)
            .field("listener", &self.listener)
            .finish()
    }
}

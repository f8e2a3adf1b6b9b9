use crate::{EventError, Listener, Result, Subscription};
use rustc_hash::FxHashMap;
use std::{
    cell::RefCell,
    collections::BTreeMap,
    fmt::Debug,
    rc::{Rc, Weak},
};

/// Create a new event with no listeners.
///
/// This is the same as [`Event::new`], with the payload and result types usually inferred from the first
/// listener.
///
/// ```rust
/// use dioxus_event::create_event;
///
/// let saved = create_event::<String, usize>();
/// saved.listen_fn(|name: &String| name.len());
/// assert_eq!(saved.fire(&"notes.txt".to_string()), vec![9]);
/// ```
pub fn create_event<T, R>() -> Event<T, R> {
    Event::new()
}

/// A typed publish/subscribe channel.
///
/// Producers call [`Event::fire`] with a payload and every listener registered at that moment runs synchronously,
/// in the order it was first registered. The results are collected into a `Vec` in the same order.
///
/// `Event` is a cheap handle: cloning it shares the same set of listeners. It is not `Send`, the same way hook
/// state in a component is not.
///
/// ```rust
/// use dioxus_event::{Event, Listener};
///
/// let event = Event::<i32, i32>::new();
/// let add_one = Listener::new(|n: &i32| n + 1);
/// let square = Listener::new(|n: &i32| n * n);
///
/// event.listen(&add_one);
/// event.listen(&square);
/// assert_eq!(event.fire(&3), vec![4, 9]);
///
/// event.unlisten(&add_one);
/// assert_eq!(event.fire(&3), vec![9]);
/// ```
pub struct Event<T = (), R = ()> {
    inner: Rc<RefCell<Registry<T, R>>>,
}

/// The listeners of an event, kept in registration order.
struct Registry<T, R> {
    // Every registration gets a fresh sequence number, so a listener that is removed and added again moves to the
    // back of the order.
    ordered: BTreeMap<u64, Listener<T, R>>,
    by_addr: FxHashMap<*const (), u64>,
    next_seq: u64,
}

impl<T, R> Default for Registry<T, R> {
    fn default() -> Self {
        Self {
            ordered: BTreeMap::new(),
            by_addr: FxHashMap::default(),
            next_seq: 0,
        }
    }
}

impl<T, R> Registry<T, R> {
    fn insert(&mut self, listener: &Listener<T, R>) -> bool {
        let addr = listener.addr();
        if self.by_addr.contains_key(&addr) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_addr.insert(addr, seq);
        self.ordered.insert(seq, listener.clone());
        true
    }

    fn remove(&mut self, listener: &Listener<T, R>) -> Option<Listener<T, R>> {
        let seq = self.by_addr.remove(&listener.addr())?;
        self.ordered.remove(&seq)
    }

    fn snapshot(&self) -> Vec<Listener<T, R>> {
        self.ordered.values().cloned().collect()
    }
}

impl<T, R> Event<T, R> {
    /// Create a new event with no listeners.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry::default())),
        }
    }

    /// Call every registered listener with `details` and collect what they return.
    ///
    /// The set of listeners is captured before the first one runs. A listener added during this call will not run
    /// until the next fire, and a listener removed during this call still runs this time. Listeners are free to
    /// fire, listen to, or unlisten from this event while they run.
    ///
    /// A panic in a listener unwinds out of `fire`. The remaining listeners are skipped for this call but stay
    /// registered.
    pub fn fire(&self, details: &T) -> Vec<R> {
        let listeners = self.inner.borrow().snapshot();
        tracing::trace!(listeners = listeners.len(), "firing event");
        listeners
            .iter()
            .map(|listener| listener.call(details))
            .collect()
    }

    /// Register a listener. Returns false if the listener was already registered, in which case it keeps its place
    /// in the order.
    pub fn listen(&self, listener: &Listener<T, R>) -> bool {
        let inserted = self.inner.borrow_mut().insert(listener);
        tracing::trace!(?listener, inserted, "listen");
        inserted
    }

    /// Remove a listener. Returns false if the listener was not registered.
    pub fn unlisten(&self, listener: &Listener<T, R>) -> bool {
        // Bind the removed listener so it is dropped after the borrow ends. Dropping a closure can run arbitrary
        // code, including code that touches this event.
        let removed = self.inner.borrow_mut().remove(listener);
        tracing::trace!(?listener, removed = removed.is_some(), "unlisten");
        removed.is_some()
    }

    /// Wrap `f` in a new [`Listener`], register it, and return the handle so it can be unlistened later.
    pub fn listen_fn(&self, f: impl Fn(&T) -> R + 'static) -> Listener<T, R> {
        let listener = Listener::new(f);
        self.listen(&listener);
        listener
    }

    /// Register `f` for as long as the returned [`Subscription`] is alive.
    ///
    /// ```rust
    /// use dioxus_event::Event;
    ///
    /// let event = Event::<(), &str>::new();
    /// {
    ///     let _sub = event.subscribe(|_| "hello");
    ///     assert_eq!(event.fire(&()), vec!["hello"]);
    /// }
    /// assert!(event.fire(&()).is_empty());
    /// ```
    #[must_use = "the listener is removed as soon as the subscription is dropped"]
    pub fn subscribe(&self, f: impl Fn(&T) -> R + 'static) -> Subscription<T, R> {
        let listener = self.listen_fn(f);
        Subscription::new(self.downgrade(), listener)
    }

    /// Returns true if the listener is currently registered.
    pub fn contains(&self, listener: &Listener<T, R>) -> bool {
        self.inner.borrow().by_addr.contains_key(&listener.addr())
    }

    /// The number of registered listeners.
    pub fn len(&self) -> usize {
        self.inner.borrow().ordered.len()
    }

    /// Returns true if no listeners are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every listener.
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.inner.borrow_mut());
        tracing::trace!(removed = removed.ordered.len(), "clearing event");
        drop(removed);
    }

    /// Returns true if both handles share the same listeners.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Create a handle that does not keep the listeners alive.
    ///
    /// Capture a [`WeakEvent`] inside a listener instead of an `Event` to avoid a reference cycle through the
    /// event's own registry.
    pub fn downgrade(&self) -> WeakEvent<T, R> {
        WeakEvent {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T, R> Default for Event<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R> Clone for Event<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, R> PartialEq for Event<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T, R> Debug for Event<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut debug = f.debug_struct("Event");
        match self.inner.try_borrow() {
            Ok(registry) => debug.field("listeners", &registry.ordered.len()),
            Err(_) => debug.field("listeners", &"<borrowed>"),
        };
        debug.finish()
    }
}

/// A non-owning handle to an [`Event`]. Created with [`Event::downgrade`].
pub struct WeakEvent<T = (), R = ()> {
    inner: Weak<RefCell<Registry<T, R>>>,
}

impl<T, R> WeakEvent<T, R> {
    /// Get a strong handle back if the event is still alive.
    pub fn upgrade(&self) -> Option<Event<T, R>> {
        self.inner.upgrade().map(|inner| Event { inner })
    }

    /// Fire the event if it is still alive.
    ///
    /// ```rust
    /// use dioxus_event::{Event, EventError};
    ///
    /// let event = Event::<u8, u8>::new();
    /// let weak = event.downgrade();
    /// event.listen_fn(|n: &u8| n + 1);
    /// assert_eq!(weak.try_fire(&1), Ok(vec![2]));
    ///
    /// drop(event);
    /// assert_eq!(weak.try_fire(&1), Err(EventError::Dropped));
    /// ```
    pub fn try_fire(&self, details: &T) -> Result<Vec<R>> {
        let event = self.upgrade().ok_or(EventError::Dropped)?;
        Ok(event.fire(details))
    }

    /// Returns true if the event has been dropped.
    pub fn is_dropped(&self) -> bool {
        self.inner.strong_count() == 0
    }
}

impl<T, R> Clone for WeakEvent<T, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T, R> Debug for WeakEvent<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakEvent")
            .field("dropped", &self.is_dropped())
            .finish()
    }
}

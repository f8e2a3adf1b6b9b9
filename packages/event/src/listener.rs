use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
    rc::Rc,
};

/// A callback that can be registered on an [`Event`](crate::Event).
///
/// Listeners are compared by identity, not by behavior. Cloning a listener gives you another handle to the
/// same listener, so `listen` followed by `unlisten` with a clone removes it. Two listeners built from identical
/// closures are still two different listeners.
///
/// ```rust
/// use dioxus_event::Listener;
///
/// let double = Listener::new(|n: &i32| n * 2);
/// assert_eq!(double.call(&21), 42);
/// assert_eq!(double, double.clone());
/// assert_ne!(double, Listener::new(|n: &i32| n * 2));
/// ```
pub struct Listener<T = (), R = ()> {
    callback: Rc<dyn Fn(&T) -> R>,
}

impl<T, R> Listener<T, R> {
    /// Wrap a closure in a new listener with its own identity.
    pub fn new(f: impl Fn(&T) -> R + 'static) -> Self {
        Self {
            callback: Rc::new(f),
        }
    }

    /// Run the listener with the given payload.
    pub fn call(&self, details: &T) -> R {
        (self.callback)(details)
    }

    /// Returns true if both handles point to the same listener.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }

    /// The address of the callback allocation. Only the data pointer is used so two handles to the same closure
    /// always compare equal, even if their vtables were instantiated in different codegen units.
    pub(crate) fn addr(&self) -> *const () {
        Rc::as_ptr(&self.callback) as *const ()
    }
}

impl<T, R> Clone for Listener<T, R> {
    fn clone(&self) -> Self {
        Self {
            callback: self.callback.clone(),
        }
    }
}

impl<T, R> PartialEq for Listener<T, R> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T, R> Eq for Listener<T, R> {}

impl<T, R> Hash for Listener<T, R> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T, R> Debug for Listener<T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("Listener({:?})", self.addr()))
    }
}

impl<T, R, F: Fn(&T) -> R + 'static> From<F> for Listener<T, R> {
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

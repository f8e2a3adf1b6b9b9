use crate::{Event, Listener};
use dioxus_core::{use_drop, use_hook};
use std::{cell::RefCell, rc::Rc};

/// Listen to an event for as long as the current component is mounted.
///
/// The listener is registered the first time the component renders and removed when the component is dropped.
/// Every render replaces the stored closure with the new one, so a fire always runs the closure from the most recent
/// render and you never need to resubscribe when captured values change.
///
/// If a later render passes a different event, the listener moves from the old event to the new one.
///
/// ```rust
/// use dioxus::prelude::*;
/// use dioxus_event::{use_listen, Event};
///
/// #[component]
/// fn Toasts(saved: Event<String>) -> Element {
///     let last = use_signal(String::new);
///
///     use_listen(&saved, move |name: &String| {
///         let mut last = last;
///         last.set(name.clone());
///     });
///
///     rsx! { "Saved {last}" }
/// }
/// ```
#[doc(alias = "useListen")]
pub fn use_listen<T: 'static, R: 'static>(
    event: &Event<T, R>,
    listener: impl Fn(&T) -> R + 'static,
) -> Listener<T, R> {
    let mut callback: Option<Rc<dyn Fn(&T) -> R>> = Some(Rc::new(listener));

    let state = use_hook(|| {
        let initial = callback
            .take()
            .expect("Listener cannot be None on first call");
        Rc::new(ListenState::attach(event.clone(), initial))
    });

    use_drop({
        let state = state.clone();
        move || state.detach()
    });

    // Later renders only swap the closure, the registration stays the same
    if let Some(callback) = callback.take() {
        state.replace(callback);
    }

    state.follow(event);

    state.listener.clone()
}

/// The hook state shared between renders.
struct ListenState<T, R> {
    event: RefCell<Event<T, R>>,
    current: Rc<RefCell<Rc<dyn Fn(&T) -> R>>>,
    listener: Listener<T, R>,
}

impl<T: 'static, R: 'static> ListenState<T, R> {
    fn attach(event: Event<T, R>, initial: Rc<dyn Fn(&T) -> R>) -> Self {
        let current = Rc::new(RefCell::new(initial));

        let listener = Listener::new({
            let current = current.clone();
            move |details: &T| {
                // Clone the callback out so the cell is free if the callback fires this event again.
                let callback = current.borrow().clone();
                callback(details)
            }
        });

        event.listen(&listener);

        Self {
            event: RefCell::new(event),
            current,
            listener,
        }
    }

    fn replace(&self, callback: Rc<dyn Fn(&T) -> R>) {
        *self.current.borrow_mut() = callback;
    }

    fn follow(&self, event: &Event<T, R>) {
        if self.event.borrow().ptr_eq(event) {
            return;
        }

        let old = self.event.replace(event.clone());
        old.unlisten(&self.listener);
        event.listen(&self.listener);
        tracing::trace!(listener = ?self.listener, "moved listener to a new event");
    }

    fn detach(&self) {
        self.event.borrow().unlisten(&self.listener);
    }
}

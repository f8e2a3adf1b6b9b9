use dioxus_event::{create_event, Event, EventError, Listener};
use std::{
    cell::{Cell, RefCell},
    panic::{catch_unwind, AssertUnwindSafe},
    rc::Rc,
};

#[test]
fn fire_collects_results_in_registration_order() {
    let event = create_event::<i32, String>();
    event.listen_fn(|n: &i32| format!("a{n}"));
    event.listen_fn(|n: &i32| format!("b{n}"));
    event.listen_fn(|n: &i32| format!("c{n}"));

    assert_eq!(event.fire(&1), vec!["a1", "b1", "c1"]);
}

#[test]
fn fire_without_listeners() {
    let event: Event = Event::new();
    assert!(event.is_empty());
    assert_eq!(event.fire(&()), Vec::<()>::new());
}

#[test]
fn listening_twice_keeps_the_first_position() {
    let event = Event::<(), u8>::new();
    let first = Listener::new(|_: &()| 1);
    let second = Listener::new(|_: &()| 2);

    assert!(event.listen(&first));
    assert!(event.listen(&second));
    assert!(!event.listen(&first));
    assert!(!event.listen(&first.clone()));

    assert_eq!(event.len(), 2);
    assert_eq!(event.fire(&()), vec![1, 2]);
}

#[test]
fn identical_closures_are_different_listeners() {
    let event = Event::<(), u8>::new();
    let make = || Listener::new(|_: &()| 7);

    assert!(event.listen(&make()));
    assert!(event.listen(&make()));
    assert_eq!(event.fire(&()), vec![7, 7]);
}

#[test]
fn unlisten_removes_by_identity() {
    let event = Event::<(), u8>::new();
    let listener: Listener<(), u8> = (|_: &()| 3).into();

    assert!(!event.unlisten(&listener));

    event.listen(&listener);
    assert!(event.contains(&listener));
    assert!(event.unlisten(&listener.clone()));
    assert!(!event.contains(&listener));
    assert!(!event.unlisten(&listener));
    assert!(event.fire(&()).is_empty());
}

#[test]
fn relisten_moves_to_the_back() {
    let event = Event::<(), char>::new();
    let a = event.listen_fn(|_| 'a');
    event.listen_fn(|_| 'b');

    event.unlisten(&a);
    event.listen(&a);

    assert_eq!(event.fire(&()), vec!['b', 'a']);
}

#[test]
fn clones_share_listeners() {
    let event = Event::<u32, u32>::new();
    let other = event.clone();
    assert!(event.ptr_eq(&other));
    assert_eq!(event, other);
    assert_ne!(event, Event::new());

    other.listen_fn(|n| n + 1);
    assert_eq!(event.fire(&1), vec![2]);
}

#[test]
fn listeners_see_the_payload_by_reference() {
    let event = Event::<Vec<u8>, usize>::new();
    event.listen_fn(|bytes| bytes.len());
    event.listen_fn(|bytes| bytes.iter().map(|b| *b as usize).sum());

    assert_eq!(event.fire(&vec![1, 2, 3]), vec![3, 6]);
}

#[test]
fn listener_added_during_fire_runs_next_time() {
    let event = Event::<(), &'static str>::new();
    let late = Listener::new(|_: &()| "late");

    event.listen_fn({
        let event = event.downgrade();
        let late = late.clone();
        move |_| {
            if let Some(event) = event.upgrade() {
                event.listen(&late);
            }
            "early"
        }
    });

    assert_eq!(event.fire(&()), vec!["early"]);
    assert_eq!(event.fire(&()), vec!["early", "late"]);
}

#[test]
fn listener_removed_during_fire_still_runs_this_time() {
    let event = Event::<(), &'static str>::new();
    let victim = Rc::new(RefCell::new(None::<Listener<(), &'static str>>));

    event.listen_fn({
        let event = event.downgrade();
        let victim = victim.clone();
        move |_| {
            if let (Some(event), Some(victim)) = (event.upgrade(), victim.borrow().as_ref()) {
                event.unlisten(victim);
            }
            "remover"
        }
    });
    *victim.borrow_mut() = Some(event.listen_fn(|_| "victim"));

    assert_eq!(event.fire(&()), vec!["remover", "victim"]);
    assert_eq!(event.fire(&()), vec!["remover"]);
}

#[test]
fn listeners_can_fire_recursively() {
    let event = Event::<u32, u32>::new();

    event.listen_fn({
        let event = event.downgrade();
        move |depth| {
            if *depth == 0 {
                return 0;
            }
            let inner = event.try_fire(&(depth - 1)).unwrap_or_default();
            1 + inner.into_iter().sum::<u32>()
        }
    });

    assert_eq!(event.fire(&4), vec![4]);
}

#[test]
fn listeners_can_clear_the_event() {
    let event = Event::<(), u8>::new();
    event.listen_fn({
        let event = event.downgrade();
        move |_| {
            if let Some(event) = event.upgrade() {
                event.clear();
            }
            1
        }
    });
    event.listen_fn(|_| 2);

    assert_eq!(event.fire(&()), vec![1, 2]);
    assert!(event.is_empty());
    assert!(event.fire(&()).is_empty());
}

#[test]
fn panics_propagate_and_keep_listeners() {
    let event = Event::<(), ()>::new();
    let ran = Rc::new(Cell::new(0));

    event.listen_fn(|_| panic!("listener failed"));
    event.listen_fn({
        let ran = ran.clone();
        move |_| ran.set(ran.get() + 1)
    });

    let result = catch_unwind(AssertUnwindSafe(|| event.fire(&())));
    assert!(result.is_err());
    assert_eq!(ran.get(), 0);
    assert_eq!(event.len(), 2);
}

#[test]
fn weak_events_stop_firing_once_dropped() {
    let event = Event::<i8, i8>::new();
    let weak = event.downgrade();
    event.listen_fn(|n| -n);

    assert!(!weak.is_dropped());
    assert_eq!(weak.try_fire(&5), Ok(vec![-5]));

    drop(event);
    assert!(weak.is_dropped());
    assert!(weak.upgrade().is_none());
    assert_eq!(weak.try_fire(&5), Err(EventError::Dropped));
}

#[test]
fn dropping_the_event_drops_its_listeners() {
    struct Flag(Rc<Cell<bool>>);
    impl Drop for Flag {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    let dropped = Rc::new(Cell::new(false));
    let event = Event::<(), ()>::new();
    let flag = Flag(dropped.clone());
    event.listen_fn(move |_| {
        let _flag = &flag;
    });

    assert!(!dropped.get());
    drop(event);
    assert!(dropped.get());
}

#[test]
fn debug_output_shows_listener_count() {
    let event = Event::<(), ()>::new();
    event.listen_fn(|_| ());
    assert_eq!(format!("{event:?}"), "Event { listeners: 1 }");
    assert_eq!(
        format!("{:?}", event.downgrade()),
        "WeakEvent { dropped: false }"
    );
}

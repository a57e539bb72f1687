mod support;

use std::sync::{Arc, Mutex};

use event_registry::{Callback, Registry, Subscription};
use support::{entries, make_log, recorder};

#[test]
fn unsubscribe_removes_callback_from_every_listed_name() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb = recorder(&log, "cb");

    let subscription = bus.on("a, b", &cb);
    bus.emit("a", &1);
    subscription.unsubscribe();
    bus.emit("a", &2);
    bus.emit("b", &3);

    assert_eq!(entries(&log), vec!["cb:1"]);
    assert!(bus.events().is_empty());
}

#[test]
fn chained_registrations_happen_immediately() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();

    let _subscription = bus
        .on("e1", &recorder(&log, "one"))
        .once("e2", &recorder(&log, "two"));
    bus.emit("e1,e2", &1);

    assert_eq!(entries(&log), vec!["one:1", "two:1"]);
}

#[test]
fn chained_unsubscribe_removes_every_link() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb1 = recorder(&log, "cb1");
    let cb2 = recorder(&log, "cb2");
    let cb3 = recorder(&log, "cb3");

    let handle = bus.on("e1", &cb1).once("e2", &cb2).on("e3", &cb3);
    assert_eq!(bus.events().len(), 3);

    handle.unsubscribe();

    let events = bus.events();
    assert!(!events.contains_key("e1"));
    assert!(!events.contains_key("e2"));
    assert!(!events.contains_key("e3"));
}

#[test]
fn chain_only_touches_its_own_callbacks() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let mine = recorder(&log, "mine");
    let theirs = recorder(&log, "theirs");
    bus.on("e", &theirs);

    bus.on("e", &mine).on("f", &mine).unsubscribe();
    bus.emit("e,f", &1);

    assert_eq!(entries(&log), vec!["theirs:1"]);
}

#[test]
fn unsubscribe_also_removes_independent_registrations_of_the_same_callback() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb = recorder(&log, "cb");
    bus.on("e", &cb);

    bus.on("e", &cb).unsubscribe();

    assert!(!bus.has_listeners("e"));
}

#[test]
fn unsubscribe_twice_is_harmless() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let subscription = bus.on("e", &recorder(&log, "cb"));

    subscription.unsubscribe();
    subscription.unsubscribe();

    assert!(bus.events().is_empty());
}

#[test]
fn unsubscribe_after_one_shot_fired_is_a_no_op() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb = recorder(&log, "cb");
    let subscription = bus.once("e", &cb);
    let other = bus.on("f", &recorder(&log, "other"));

    bus.emit("e", &1);
    subscription.unsubscribe();
    bus.emit("e,f", &2);

    assert_eq!(entries(&log), vec!["cb:1", "other:2"]);
    assert_eq!(bus.listener_count("f"), 1);
    other.unsubscribe();
    assert!(bus.events().is_empty());
}

#[test]
fn once_subscription_removes_pending_one_shots() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();

    bus.once("a, b", &recorder(&log, "cb")).unsubscribe();
    bus.emit("a,b", &1);

    assert!(entries(&log).is_empty());
    assert!(bus.events().is_empty());
}

#[test]
fn empty_registration_still_chains() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb = recorder(&log, "cb");

    let handle = bus.on("", &cb).on("e", &cb);
    assert_eq!(handle.names().collect::<Vec<_>>(), vec!["e"]);

    handle.unsubscribe();
    assert!(bus.events().is_empty());
}

#[test]
fn unsubscribe_covers_blank_segments() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();

    let subscription = bus.on("a,,b", &recorder(&log, "cb"));
    assert_eq!(subscription.names().collect::<Vec<_>>(), vec!["a", "", "b"]);

    subscription.unsubscribe();
    assert!(bus.events().is_empty());
}

#[test]
fn callback_can_own_its_subscription() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let slot: Arc<Mutex<Option<Subscription<i32>>>> = Arc::new(Mutex::new(None));

    let cb = {
        let log = Arc::clone(&log);
        let slot = Arc::clone(&slot);
        Callback::new(move |n: &i32| {
            log.lock().unwrap().push(format!("cb:{n}"));
            if let Some(subscription) = slot.lock().unwrap().take() {
                subscription.unsubscribe();
            }
        })
    };
    *slot.lock().unwrap() = Some(bus.on("tick", &cb));

    bus.emit("tick", &1);
    bus.emit("tick", &2);

    assert_eq!(entries(&log), vec!["cb:1"]);
    assert!(bus.events().is_empty());
}

#[test]
fn subscription_does_not_keep_registry_alive() {
    let bus: Registry<i32> = Registry::new();
    let log = make_log();
    let cb = recorder(&log, "cb");
    let subscription = bus.on("e", &cb);

    drop(bus);

    assert!(!subscription.is_attached());
    subscription.unsubscribe();
}

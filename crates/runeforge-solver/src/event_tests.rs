//! Tests for the event system.

use std::sync::atomic::AtomicUsize;

use runeforge_core::{AttributeVector, Loadout, Prediction, Rune, RuneSet};
use runeforge_test::full_set;

use super::*;
use crate::statistics::SearchStatistics;

fn scored(runes: &[Rune], score: f64) -> ScoredLoadout<'_> {
    let refs: [&Rune; SLOT_COUNT] = std::array::from_fn(|i| &runes[i]);
    ScoredLoadout::new(
        Loadout::new(refs, [Prediction::NEUTRAL; SLOT_COUNT]),
        AttributeVector::new(),
        score,
    )
}

#[test]
fn test_event_support_new() {
    let support = SearchEventSupport::new();
    assert_eq!(support.listener_count(), 0);
}

#[test]
fn test_fire_reaches_every_listener() {
    let first = Arc::new(CountingEventListener::new());
    let second = Arc::new(CountingEventListener::new());
    let mut support = SearchEventSupport::new();
    support.add_listener(first.clone());
    support.add_listener(second.clone());

    let runes = full_set(1, RuneSet::Energy);
    support.fire_progress(0.5);
    support.fire_progress_count(5, 10);
    support.fire_progress_message("50%");
    support.fire_result_added(&scored(&runes, 3.0));
    support.fire_result_removed(&scored(&runes, 3.0));
    support.fire_completed(&ResultSet::default());

    for listener in [&first, &second] {
        assert_eq!(listener.progress_count(), 1);
        assert_eq!(listener.last_fraction(), 0.5);
        assert_eq!(listener.last_completed(), 5);
        assert_eq!(listener.messages(), vec!["50%".to_string()]);
        assert_eq!(listener.added_count(), 1);
        assert_eq!(listener.removed_count(), 1);
        assert_eq!(listener.completed_count(), 1);
    }

    support.clear_listeners();
    assert_eq!(support.listener_count(), 0);
}

#[test]
fn test_fn_listener_forwards_callbacks() {
    let messages = Mutex::new(Vec::new());
    let calls = AtomicUsize::new(0);
    let on_message: &(dyn Fn(&str) + Send + Sync) =
        &|m: &str| messages.lock().unwrap().push(m.to_string());
    let on_progress: &(dyn Fn(f64) + Send + Sync) = &|_: f64| {
        calls.fetch_add(1, Ordering::SeqCst);
    };

    {
        let mut support = SearchEventSupport::new();
        support.add_listener(Arc::new(FnEventListener::new(
            Some(on_message),
            Some(on_progress),
        )));
        support.fire_progress(0.1);
        support.fire_progress(0.2);
        support.fire_progress_message("hello");
        support.fire_completed(&ResultSet::default());
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(*messages.lock().unwrap(), vec!["hello".to_string()]);
}

#[test]
fn test_channel_listener() {
    let (listener, mut events) = ChannelEventListener::new();
    let runes = full_set(1, RuneSet::Energy);

    listener.on_progress_message("working");
    listener.on_result_added(&scored(&runes, 7.0));
    let (results, _) = ResultSet::assemble(
        vec![scored(&runes, 7.0)],
        1,
        SearchStatistics::default(),
    );
    listener.on_completed(&results);

    assert_eq!(
        events.try_recv().unwrap(),
        SearchEvent::Message("working".to_string())
    );
    assert_eq!(
        events.try_recv().unwrap(),
        SearchEvent::ResultAdded {
            runes: [1, 2, 3, 4, 5, 6],
            score: 7.0
        }
    );
    assert_eq!(
        events.try_recv().unwrap(),
        SearchEvent::Completed {
            count: 1,
            best_score: Some(7.0)
        }
    );
    assert!(events.try_recv().is_err());
}

#[test]
fn test_channel_listener_survives_dropped_receiver() {
    let (listener, events) = ChannelEventListener::new();
    drop(events);
    listener.on_progress(1.0);
}

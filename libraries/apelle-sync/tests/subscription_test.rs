//! Subscription driver tests
//!
//! Full life of a followed queue against mocked collaborators: snapshot,
//! events, autoplay and every way a subscription can stop.

mod common;

use apelle_core::{ApelleError, Clock, EventStream, QueueEvent, QueueId, SystemClock};
use apelle_sync::{Playhead, QueueSubscription, SongCache, SubscriptionEnd, SyncConfig};
use common::*;
use futures_util::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

fn subscription(
    id: QueueId,
    api: MockApi,
    events: EventStream,
    config: SyncConfig,
) -> QueueSubscription {
    let mut source = MockEvents::new();
    source
        .expect_subscribe()
        .times(1)
        .return_once(move |_| Ok(events));

    QueueSubscription::new(id, Arc::new(api), Arc::new(source), SongCache::new(), config)
}

fn api_serving(snapshot: apelle_core::QueueSnapshot) -> MockApi {
    let mut api = MockApi::new();
    api.expect_fetch_queue()
        .times(1)
        .returning(move |_| Ok(snapshot.clone()));
    api.expect_fetch_song()
        .returning(|_, id| Ok(detail_for(id)));
    api
}

// ===== Lifecycle Tests =====

#[tokio::test]
async fn test_runs_until_queue_deleted() {
    init_tracing();
    let id = QueueId::generate();
    let a = summary("a", 0, 0);
    let b = summary("b", 3, 1);

    let events: EventStream = Box::pin(stream::iter(vec![
        Ok(QueueEvent::QueuedSongsState {
            queue: vec![a.clone(), b.clone()],
        }),
        Ok(QueueEvent::QueuedSongDeleted { deleted_id: a.id }),
        Ok(QueueEvent::QueueDeleted),
        Ok(QueueEvent::QueuedSongsState { queue: vec![] }),
    ]));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sub = subscription(
        id,
        api_serving(snapshot(id, None, vec![])),
        events,
        SyncConfig::default(),
    );

    let recorded = seen.clone();
    let end = sub
        .run(move |queue| recorded.lock().unwrap().push(ids(queue.queue())))
        .await
        .unwrap();

    assert_eq!(end, SubscriptionEnd::QueueDeleted);
    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec![vec![], vec![b.id, a.id], vec![b.id], vec![b.id]]
    );
}

#[tokio::test]
async fn test_stops_when_stream_closes() {
    let id = QueueId::generate();
    let events: EventStream = Box::pin(stream::empty());
    let sub = subscription(
        id,
        api_serving(snapshot(id, None, vec![])),
        events,
        SyncConfig::default(),
    );

    let end = sub.run(|_| {}).await.unwrap();

    assert_eq!(end, SubscriptionEnd::StreamClosed);
}

#[tokio::test]
async fn test_cancellation_stops_the_subscription() {
    let id = QueueId::generate();
    let (tx, events) = channel_stream();
    let sub = subscription(
        id,
        api_serving(snapshot(id, None, vec![])),
        events,
        SyncConfig::default(),
    );
    let token = sub.cancellation_token();

    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();
    let handle = tokio::spawn(sub.run(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    tx.send(Ok(QueueEvent::QueuedSongsState {
        queue: vec![summary("a", 0, 0)],
    }))
    .unwrap();
    while updates.load(Ordering::SeqCst) < 2 {
        tokio::task::yield_now().await;
    }

    token.cancel();
    let end = handle.await.unwrap().unwrap();

    assert_eq!(end, SubscriptionEnd::Cancelled);
    drop(tx);
}

#[tokio::test(start_paused = true)]
async fn test_timers_are_stopped_on_exit() {
    let clock = Arc::new(SystemClock::new());
    let id = QueueId::generate();
    let (tx, events) = channel_stream();
    let sub = subscription(
        id,
        api_serving(snapshot(id, Some(playing(clock.now(), 0, 600)), vec![])),
        events,
        SyncConfig::default(),
    )
    .with_clock(clock);

    let playhead: Arc<Mutex<Option<watch::Receiver<Playhead>>>> = Arc::new(Mutex::new(None));
    let slot = playhead.clone();
    let handle = tokio::spawn(sub.run(move |queue| {
        let mut slot = slot.lock().unwrap();
        if slot.is_none() {
            *slot = queue.current().map(|song| song.watch());
        }
    }));

    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    drop(tx);
    let end = handle.await.unwrap().unwrap();
    assert_eq!(end, SubscriptionEnd::StreamClosed);

    let mut playhead = playhead.lock().unwrap().take().unwrap();
    let closed = tokio::time::timeout(std::time::Duration::from_secs(1), async {
        while playhead.changed().await.is_ok() {}
    })
    .await;
    assert!(closed.is_ok());
}

// ===== Error Tests =====

#[tokio::test]
async fn test_missing_queue_is_not_found() {
    let id = QueueId::generate();
    let mut api = MockApi::new();
    api.expect_fetch_queue()
        .returning(|id| Err(ApelleError::not_found("Queue", id)));
    let mut source = MockEvents::new();
    source.expect_subscribe().times(0);

    let sub = QueueSubscription::new(
        id,
        Arc::new(api),
        Arc::new(source),
        SongCache::new(),
        SyncConfig::default(),
    );
    let result = sub.run(|_| {}).await;

    assert!(matches!(result, Err(ApelleError::NotFound { .. })));
}

#[tokio::test]
async fn test_unknown_event_kind_is_fatal() {
    let id = QueueId::generate();
    let events: EventStream = Box::pin(stream::iter(vec![Err(ApelleError::UnknownEventKind(
        "queue-renamed".to_string(),
    ))]));
    let sub = subscription(
        id,
        api_serving(snapshot(id, None, vec![])),
        events,
        SyncConfig::default(),
    );

    let err = sub.run(|_| {}).await.unwrap_err();

    assert!(err.is_fatal());
}

// ===== Autoplay Tests =====

#[tokio::test(start_paused = true)]
async fn test_autoplay_advances_once_per_natural_end() {
    let clock = Arc::new(SystemClock::new());
    let id = QueueId::generate();
    let data = snapshot(id, Some(playing(clock.now(), 8, 10)), vec![]);
    let expected = data.state_version;

    let advances = Arc::new(AtomicUsize::new(0));
    let counter = advances.clone();
    let mut api = api_serving(data);
    api.expect_advance_queue()
        .withf(move |queue, version| *queue == id && *version == expected)
        .returning(move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

    let (tx, events) = channel_stream();
    let sub = subscription(id, api, events, SyncConfig::default().with_autoplay(true))
        .with_clock(clock);
    let handle = tokio::spawn(sub.run(|_| {}));

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    drop(tx);
    handle.await.unwrap().unwrap();

    assert_eq!(advances.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_lost_advance_race_keeps_running() {
    let clock = Arc::new(SystemClock::new());
    let id = QueueId::generate();
    let mut api = api_serving(snapshot(id, Some(playing(clock.now(), 8, 10)), vec![]));
    api.expect_advance_queue()
        .times(1)
        .returning(|_, _| Err(ApelleError::PreconditionFailed));

    let (tx, events) = channel_stream();
    let sub = subscription(id, api, events, SyncConfig::default().with_autoplay(true))
        .with_clock(clock.clone());

    let updates = Arc::new(AtomicUsize::new(0));
    let counter = updates.clone();
    let handle = tokio::spawn(sub.run(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    tokio::time::sleep(std::time::Duration::from_secs(5)).await;

    // Another client moved the queue on
    tx.send(Ok(QueueEvent::CurrentSongState {
        current: Some(playing(clock.now(), 0, 200)),
        state_version: Some(apelle_core::StateVersion::generate()),
    }))
    .unwrap();
    tx.send(Ok(QueueEvent::QueueDeleted)).unwrap();

    let end = handle.await.unwrap().unwrap();
    assert_eq!(end, SubscriptionEnd::QueueDeleted);
    // Initial load, natural end, new song, deletion
    assert_eq!(updates.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn test_no_advance_without_autoplay() {
    let clock = Arc::new(SystemClock::new());
    let id = QueueId::generate();
    let mut api = api_serving(snapshot(id, Some(playing(clock.now(), 8, 10)), vec![]));
    api.expect_advance_queue().times(0);

    let (tx, events) = channel_stream();
    let sub = subscription(id, api, events, SyncConfig::default()).with_clock(clock);

    let stopped = Arc::new(AtomicUsize::new(0));
    let counter = stopped.clone();
    let handle = tokio::spawn(sub.run(move |queue| {
        if queue.current().is_some_and(|song| song.stopped()) {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }));

    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    drop(tx);
    handle.await.unwrap().unwrap();

    // The observer still saw the song end
    assert_eq!(stopped.load(Ordering::SeqCst), 1);
}

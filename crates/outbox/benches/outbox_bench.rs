use criterion::{Criterion, criterion_group, criterion_main};
use outbox::{InMemoryOutboxStore, NewOutboxEvent, OutboxStore};

fn make_event(key: Option<&str>, payload: u8) -> NewOutboxEvent {
    let event = NewOutboxEvent::new("bench-topic", vec![payload]);
    match key {
        Some(key) => event.with_aggregate_key(key),
        None => event,
    }
}

fn bench_save_unordered(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("outbox/save_unordered", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryOutboxStore::new();
                store.save_event(make_event(None, 1)).await.unwrap();
            });
        });
    });
}

fn bench_save_sequenced_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("outbox/save_sequenced_batch_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                let store = InMemoryOutboxStore::new();
                for i in 0..100u8 {
                    store
                        .save_event(make_event(Some("order-1"), i))
                        .await
                        .unwrap();
                }
            });
        });
    });
}

fn bench_get_pending_for_aggregate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let store = InMemoryOutboxStore::new();
    rt.block_on(async {
        for key in ["order-1", "order-2", "order-3"] {
            for i in 0..100u8 {
                store.save_event(make_event(Some(key), i)).await.unwrap();
            }
        }
    });

    c.bench_function("outbox/get_pending_for_aggregate", |b| {
        b.iter(|| {
            rt.block_on(async {
                let events = store
                    .get_pending_events_for_aggregate("order-2")
                    .await
                    .unwrap();
                assert_eq!(events.len(), 100);
            });
        });
    });
}

criterion_group!(
    benches,
    bench_save_unordered,
    bench_save_sequenced_batch_100,
    bench_get_pending_for_aggregate
);
criterion_main!(benches);

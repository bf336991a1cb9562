use core::num::NonZeroU32;
use std::collections::HashSet;

use crate::{
    AllocStrategy, Allocator, AllocatorConfig, CsvReceipt, MemoryStore, PlainTextReceipt,
    ReceiptWriter, RequestStore, Status, StatusUpdater, TrackingId, TransitionPolicy,
};

#[tokio::test]
async fn submit_lookup_export_end_to_end() {
    let store = MemoryStore::new();
    let allocator = Allocator::new(store.clone(), AllocatorConfig::default());

    let request = allocator
        .allocate("Jane Doe", Some("first child".to_owned()))
        .await
        .unwrap();

    assert!((1000..=9999).contains(&request.id.value()));
    assert_eq!(request.status, Status::InProgress);
    assert_eq!(store.row_count(), 1);

    let stored = store.find(request.id).await.unwrap().unwrap();
    assert_eq!(stored, request);

    let receipt = PlainTextReceipt.write_receipt(&stored);
    assert!(receipt.contains("Jane Doe"));
    assert!(receipt.contains(&request.id.to_string()));
    assert_eq!(PlainTextReceipt.file_name(&stored), "Jane_Doe.txt");
    assert_eq!(CsvReceipt.file_name(&stored), "Jane_Doe.csv");
}

#[tokio::test]
async fn update_round_trip_survives_repeated_reads() {
    let store = MemoryStore::new();
    let allocator = Allocator::new(store.clone(), AllocatorConfig::default());
    let updater = StatusUpdater::new(store.clone(), TransitionPolicy::Guarded);

    let request = allocator.allocate("Jane Doe", None).await.unwrap();
    let updated = updater
        .update(request.id, Status::Approved, Some("docs verified".to_owned()))
        .await
        .unwrap();

    assert_eq!(updated.status, Status::Approved);
    for _ in 0..3 {
        let row = store.find(request.id).await.unwrap().unwrap();
        assert_eq!(row.status, Status::Approved);
        assert_eq!(row.notes.as_deref(), Some("docs verified"));
    }
}

#[tokio::test]
async fn untrusted_input_is_validated_before_the_updater_runs() {
    // The original flow solicited the status interactively; here both inputs
    // are parsed up front and the updater only sees typed values.
    let id = TrackingId::parse("1000").unwrap();
    let status = Status::parse("approved").unwrap();

    assert!(TrackingId::parse("one thousand").is_err());
    assert!(Status::parse("done").is_err());

    let store = MemoryStore::new();
    let updater = StatusUpdater::new(store, TransitionPolicy::Guarded);
    assert!(updater.update(id, status, None).await.is_err()); // empty table
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_random_allocations_yield_distinct_ids() {
    const CALLERS: usize = 64;

    let store = MemoryStore::new();
    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let allocator = Allocator::new(store.clone(), AllocatorConfig::default());
            tokio::spawn(async move {
                allocator
                    .allocate(&format!("Applicant {i}"), None)
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        assert!(seen.insert(handle.await.unwrap()));
    }

    assert_eq!(seen.len(), CALLERS);
    assert_eq!(store.row_count(), CALLERS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_monotonic_allocations_retry_through_races() {
    const CALLERS: usize = 32;

    // Two racing callers can both read the same max and propose the same
    // next value; the duplicate-key signal must push the loser into a fresh
    // read rather than a failure.
    let config = AllocatorConfig {
        strategy: AllocStrategy::MonotonicNext { floor: 1000 },
        max_attempts: NonZeroU32::new(64).unwrap(),
    };

    let store = MemoryStore::new();
    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let allocator = Allocator::new(store.clone(), config);
            tokio::spawn(async move {
                allocator
                    .allocate(&format!("Applicant {i}"), None)
                    .await
                    .unwrap()
                    .id
            })
        })
        .collect();

    let ids: HashSet<TrackingId> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|res| res.unwrap())
        .collect();

    assert_eq!(ids.len(), CALLERS);
    assert_eq!(store.row_count(), CALLERS);
    // Dense from the floor upward: every slot below the max is filled.
    assert!(ids.contains(&TrackingId::new(1000)));
    assert!(ids.contains(&TrackingId::new(1000 + CALLERS as u32 - 1)));
}

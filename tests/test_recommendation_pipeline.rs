mod helpers;

use gymflow::{DomainEvent, EventKind, RecommendationService};
use helpers::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn catalog() -> Arc<RecordingClassRepository> {
    Arc::new(RecordingClassRepository::new(&[
        (1, "Pilates Mat"),
        (20, "Spinning Pro"),
        (42, "Yoga Avanzado"),
    ]))
}

#[tokio::test]
async fn test_numeric_class_is_enriched_from_catalog() {
    let repo = catalog();
    let mut pipeline = RecommendationService::new(repo.clone()).pipeline();

    let event = DomainEvent::new("42", EventKind::SlotFreed);
    let rec = pipeline.process(&event).await.unwrap();

    assert_eq!(rec.class_id, "42");
    assert_eq!(rec.class_name.as_deref(), Some("Yoga Avanzado"));
    assert_eq!(rec.priority, 1);
    assert!(rec.message.contains("Yoga Avanzado"));
    assert_eq!(rec.timestamp, event.occurred_at);
    assert_eq!(repo.calls(), vec![42]);
}

#[tokio::test]
async fn test_class_code_is_named_without_lookup() {
    let repo = catalog();
    let mut pipeline = RecommendationService::new(repo.clone()).pipeline();

    let rec = pipeline
        .process(&DomainEvent::new("YOGA-101", EventKind::ClassFull))
        .await
        .unwrap();

    assert_eq!(rec.class_name.as_deref(), Some("Yoga"));
    assert_eq!(rec.priority, 3);
    assert!(rec.message.contains("Yoga"));
    assert_eq!(repo.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_class_is_dropped_and_pipeline_continues() {
    let repo = catalog();
    let mut pipeline = RecommendationService::new(repo.clone()).pipeline();

    let missing = pipeline
        .process(&DomainEvent::new("999", EventKind::SlotFreed))
        .await;
    assert!(missing.is_none());

    let next = pipeline
        .process(&DomainEvent::new("1", EventKind::ScheduleChanged))
        .await
        .unwrap();
    assert_eq!(next.class_name.as_deref(), Some("Pilates Mat"));
    assert_eq!(next.priority, 2);
    assert_eq!(repo.calls(), vec![999, 1]);
}

#[tokio::test]
async fn test_unknown_class_does_not_claim_its_id() {
    let repo = Arc::new(RecordingClassRepository::empty());
    let mut pipeline = RecommendationService::new(repo).pipeline();

    assert!(pipeline
        .process(&DomainEvent::new("7", EventKind::SlotFreed))
        .await
        .is_none());
    assert_eq!(pipeline.seen_count(), 0);
}

#[tokio::test]
async fn test_only_first_recommendation_per_class_is_emitted() {
    let repo = catalog();
    let mut pipeline = RecommendationService::new(repo.clone()).pipeline();

    let kinds = [
        EventKind::SlotFreed,
        EventKind::ClassFull,
        EventKind::BookingCreated,
    ];
    let mut emitted = Vec::new();
    for kind in kinds {
        if let Some(rec) = pipeline.process(&DomainEvent::new("20", kind)).await {
            emitted.push(rec);
        }
    }

    assert_eq!(emitted.len(), 1);
    assert_eq!(emitted[0].priority, 1);
    assert!(emitted[0].message.contains("Spinning Pro"));
    // Enrichment still runs for the later duplicates
    assert_eq!(repo.call_count(), 3);
    assert_eq!(pipeline.seen_count(), 1);
}

#[tokio::test]
async fn test_dedup_state_is_per_pipeline() {
    let service = RecommendationService::new(catalog());
    let mut first = service.pipeline();
    let mut second = service.pipeline();
    let event = DomainEvent::new("42", EventKind::SlotFreed);

    assert!(first.process(&event).await.is_some());
    assert!(first.process(&event).await.is_none());
    assert!(second.process(&event).await.is_some());
}

#[tokio::test]
async fn test_lookup_failure_is_swallowed() {
    let repo = Arc::new(FailingClassRepository::default());
    let mut pipeline = RecommendationService::new(repo.clone()).pipeline();

    assert!(pipeline
        .process(&DomainEvent::new("5", EventKind::SlotFreed))
        .await
        .is_none());

    let rec = pipeline
        .process(&DomainEvent::new("ZUMBA-3", EventKind::BookingCancelled))
        .await
        .unwrap();
    assert_eq!(rec.class_name.as_deref(), Some("Zumba"));
    assert_eq!(rec.priority, 4);
    assert_eq!(repo.call_count(), 1);
}

#[tokio::test]
async fn test_irrelevant_kinds_are_filtered_before_lookup() {
    let repo = catalog();
    let service = RecommendationService::new(repo.clone())
        .with_relevant_kinds(&[EventKind::SlotFreed, EventKind::ClassFull]);
    let mut pipeline = service.pipeline();

    assert!(pipeline
        .process(&DomainEvent::new("42", EventKind::BookingCreated))
        .await
        .is_none());
    assert_eq!(repo.call_count(), 0);
    assert_eq!(pipeline.seen_count(), 0);

    let rec = pipeline
        .process(&DomainEvent::new("42", EventKind::ClassFull))
        .await
        .unwrap();
    assert_eq!(rec.priority, 3);
}

#[tokio::test]
async fn test_priorities_follow_event_kind() {
    let mut pipeline = RecommendationService::new(catalog()).pipeline();

    let cases = [
        ("PILATES-1", EventKind::SlotFreed, 1, "Pilates"),
        ("SPINNING-202", EventKind::ScheduleChanged, 2, "Spinning"),
        ("BOX-7", EventKind::ClassFull, 3, "Boxing"),
        ("HIIT-9", EventKind::BookingCreated, 4, "HIIT"),
        ("salsa-2", EventKind::BookingCancelled, 4, "Salsa"),
    ];

    for (class_id, kind, priority, name) in cases {
        let rec = pipeline
            .process(&DomainEvent::new(class_id, kind))
            .await
            .unwrap();
        assert_eq!(rec.priority, priority, "{}", class_id);
        assert_eq!(rec.class_name.as_deref(), Some(name), "{}", class_id);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_lookup_does_not_stall_other_pipelines() {
    let slow = RecommendationService::new(Arc::new(SlowClassRepository::new(
        Duration::from_millis(500),
        "Slow Class",
    )));
    let fast = RecommendationService::new(catalog());

    let slow_task = tokio::spawn(async move {
        slow.pipeline()
            .process(&DomainEvent::new("1", EventKind::SlotFreed))
            .await
    });

    let started = Instant::now();
    let rec = fast
        .pipeline()
        .process(&DomainEvent::new("YOGA-1", EventKind::SlotFreed))
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_millis(250));
    assert_eq!(rec.class_name.as_deref(), Some("Yoga"));

    let slow_rec = slow_task.await.unwrap().unwrap();
    assert_eq!(slow_rec.class_name.as_deref(), Some("Slow Class"));
}

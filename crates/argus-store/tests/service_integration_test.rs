//! End-to-end tests for AuditService over the storage adapters
//!
//! Every scenario runs against both the SQLite and the in-memory
//! repository so the two adapters stay interchangeable.

use std::collections::HashSet;
use std::io::Write;
use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};

use argus_core::domain::{CreateAuditLogRequest, ValidationField};
use argus_core::enums::{EnumCategory, EnumRegistry, EnumValues};
use argus_core::ports::IAuditRepository;
use argus_core::usecases::{AuditLogQuery, AuditService, OperationContext};
use argus_store::{DatabasePool, InMemoryAuditRepository, PoolOptions, SqliteAuditRepository};

// ============================================================================
// Test helpers
// ============================================================================

async fn repositories() -> Vec<(&'static str, Arc<dyn IAuditRepository>)> {
    let pool = DatabasePool::in_memory()
        .await
        .expect("Failed to create in-memory database");
    vec![
        (
            "sqlite",
            Arc::new(SqliteAuditRepository::new(pool.pool().clone())) as Arc<dyn IAuditRepository>,
        ),
        ("memory", Arc::new(InMemoryAuditRepository::new())),
    ]
}

fn scenario_registry() -> Arc<EnumRegistry> {
    Arc::new(EnumRegistry::from_values(&EnumValues {
        actor_types: vec!["SERVICE".into(), "ADMIN".into()],
        target_types: vec!["SERVICE".into(), "RESOURCE".into()],
        ..Default::default()
    }))
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn request_at(timestamp: DateTime<Utc>) -> CreateAuditLogRequest {
    CreateAuditLogRequest {
        timestamp: rfc3339(timestamp),
        status: "SUCCESS".into(),
        actor_type: "SERVICE".into(),
        actor_id: "svc-a".into(),
        target_type: "SERVICE".into(),
        target_id: Some("svc-b".into()),
        ..Default::default()
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_create_valid_request_assigns_id() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, scenario_registry());
        let ctx = OperationContext::new();

        let log = service
            .create_audit_log(&ctx, &request_at(Utc::now()))
            .await
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        assert!(!log.id().is_nil(), "{name}");
        assert_eq!(log.target_id(), Some("svc-b"), "{name}");
    }
}

#[tokio::test]
async fn test_unknown_actor_type_is_rejected_and_not_persisted() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, scenario_registry());
        let ctx = OperationContext::new();

        let mut request = request_at(t0());
        request.actor_type = "INVALID".into();

        let err = service.create_audit_log(&ctx, &request).await.unwrap_err();
        assert!(err.is_validation_error(), "{name}");
        assert_eq!(
            err.validation_error().unwrap().field,
            ValidationField::ActorType
        );

        let page = service
            .get_audit_logs(&ctx, &AuditLogQuery::new(10, 0))
            .await
            .unwrap();
        assert_eq!(page.total, 0, "{name}");
    }
}

#[tokio::test]
async fn test_trace_groups_records_in_timestamp_order() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, scenario_registry());
        let ctx = OperationContext::new();
        let trace = uuid::Uuid::new_v4().to_string();

        // Insert the later record first so ordering comes from timestamps.
        for ts in [t0() + Duration::seconds(1), t0()] {
            let mut request = request_at(ts);
            request.trace_id = Some(trace.clone());
            service.create_audit_log(&ctx, &request).await.unwrap();
        }
        service.create_audit_log(&ctx, &request_at(t0())).await.unwrap();

        let logs = service
            .get_audit_logs_by_trace_id(&ctx, &trace)
            .await
            .unwrap();
        let stamps: Vec<_> = logs.iter().map(|l| l.timestamp()).collect();
        assert_eq!(stamps, vec![t0(), t0() + Duration::seconds(1)], "{name}");
    }
}

#[tokio::test]
async fn test_paging_reports_total() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, scenario_registry());
        let ctx = OperationContext::new();

        for s in 0..5 {
            service
                .create_audit_log(&ctx, &request_at(t0() + Duration::seconds(s)))
                .await
                .unwrap();
        }

        let page = service
            .get_audit_logs(&ctx, &AuditLogQuery::new(2, 0))
            .await
            .unwrap();
        assert_eq!(page.logs.len(), 2, "{name}");
        assert_eq!(page.total, 5, "{name}");
        assert_eq!(page.logs[0].timestamp(), t0(), "{name}");
    }
}

#[tokio::test]
async fn test_malformed_trace_id_is_rejected() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, scenario_registry());
        let ctx = OperationContext::new();

        let mut request = request_at(t0());
        request.trace_id = Some("not-a-uuid".into());
        let err = service.create_audit_log(&ctx, &request).await.unwrap_err();
        assert_eq!(
            err.validation_error().map(|e| e.field),
            Some(ValidationField::TraceId),
            "{name}"
        );

        let err = service
            .get_audit_logs_by_trace_id(&ctx, "not-a-uuid")
            .await
            .unwrap_err();
        assert!(err.is_validation_error(), "{name}");
    }
}

#[tokio::test]
async fn test_absent_enum_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let registry = EnumRegistry::load(Some(dir.path().join("missing.yaml").as_path())).unwrap();
    assert_eq!(registry, EnumRegistry::defaults());
}

// ============================================================================
// Properties
// ============================================================================

#[tokio::test]
async fn test_every_allowed_actor_target_pair_is_accepted() {
    let registry = Arc::new(EnumRegistry::defaults());
    let repo = Arc::new(InMemoryAuditRepository::new());
    let service = AuditService::new(repo.clone(), registry.clone());
    let ctx = OperationContext::new();

    let mut expected = 0;
    for actor in registry.values(EnumCategory::ActorType) {
        for target in registry.values(EnumCategory::TargetType) {
            let mut request = request_at(t0());
            request.actor_type = actor.to_string();
            request.target_type = target.to_string();

            let log = service.create_audit_log(&ctx, &request).await.unwrap();
            assert_eq!(log.actor_type(), actor);
            assert_eq!(log.target_type(), target);
            expected += 1;
        }
    }
    assert_eq!(repo.len(), expected);
}

#[tokio::test]
async fn test_page_size_matches_window_arithmetic() {
    let repo = Arc::new(InMemoryAuditRepository::new());
    let service = AuditService::new(repo, scenario_registry());
    let ctx = OperationContext::new();

    let n: i64 = 7;
    for s in 0..n {
        service
            .create_audit_log(&ctx, &request_at(t0() + Duration::seconds(s)))
            .await
            .unwrap();
    }

    for (limit, offset) in [(3, 0), (3, 6), (5, 5), (10, 0), (2, 9)] {
        let page = service
            .get_audit_logs(&ctx, &AuditLogQuery::new(limit, offset))
            .await
            .unwrap();
        let expected = limit.min((n - offset).max(0)) as usize;
        assert_eq!(page.logs.len(), expected, "limit={limit} offset={offset}");
        assert_eq!(page.total, n as u64);
    }
}

#[tokio::test]
async fn test_round_trip_preserves_caller_fields() {
    for (name, repo) in repositories().await {
        let service = AuditService::new(repo, Arc::new(EnumRegistry::defaults()));
        let ctx = OperationContext::new();
        let trace = uuid::Uuid::new_v4();

        let request = CreateAuditLogRequest {
            timestamp: "2024-05-01T14:00:00.250+02:00".into(),
            status: "FAILURE".into(),
            actor_type: "MEMBER".into(),
            actor_id: "user-42".into(),
            target_type: "RESOURCE".into(),
            target_id: Some("doc-7".into()),
            event_type: Some("DATA_FETCH".into()),
            event_action: Some("READ".into()),
            trace_id: Some(trace.to_string().to_uppercase()),
        };
        let created = service.create_audit_log(&ctx, &request).await.unwrap();

        let page = service
            .get_audit_logs(&ctx, &AuditLogQuery::new(10, 0).with_trace_id(trace.to_string()))
            .await
            .unwrap();
        assert_eq!(page.logs, vec![created.clone()], "{name}");

        let read = &page.logs[0];
        assert_eq!(
            read.timestamp(),
            t0() + Duration::milliseconds(250),
            "{name}"
        );
        assert_eq!(read.status().as_str(), "FAILURE");
        assert_eq!(read.actor_id(), "user-42");
        assert_eq!(read.event_action(), Some("READ"));
        assert_eq!(read.trace_id().map(|t| t.to_string()), Some(trace.to_string()));
    }
}

#[tokio::test]
async fn test_empty_optional_fields_are_accepted() {
    let repo = Arc::new(InMemoryAuditRepository::new());
    let service = AuditService::new(repo, scenario_registry());
    let ctx = OperationContext::new();

    let mut request = request_at(t0());
    request.event_type = Some(String::new());
    request.event_action = Some(String::new());
    request.trace_id = Some(String::new());

    let log = service.create_audit_log(&ctx, &request).await.unwrap();
    assert!(log.event_type().is_none());
    assert!(log.event_action().is_none());
    assert!(log.trace_id().is_none());
}

#[tokio::test]
async fn test_override_file_extends_only_named_category() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"enums:\n  eventTypes: [FOO]\n").unwrap();
    file.flush().unwrap();

    let registry = EnumRegistry::load(Some(file.path())).unwrap();
    let defaults = EnumRegistry::defaults();

    let mut expected = defaults.values(EnumCategory::EventType);
    expected.push("FOO");
    expected.sort_unstable();
    assert_eq!(registry.values(EnumCategory::EventType), expected);

    for category in [
        EnumCategory::EventAction,
        EnumCategory::ActorType,
        EnumCategory::TargetType,
    ] {
        assert_eq!(registry.values(category), defaults.values(category));
    }
}

#[tokio::test]
async fn test_cancelled_context_performs_no_write() {
    let repo = Arc::new(InMemoryAuditRepository::new());
    let service = AuditService::new(repo.clone(), scenario_registry());
    let ctx = OperationContext::new();
    ctx.cancel();

    let err = service
        .create_audit_log(&ctx, &request_at(t0()))
        .await
        .unwrap_err();
    assert!(!err.is_validation_error());
    assert!(repo.is_empty());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_on_file_database() {
    const CALLERS: i64 = 64;

    let dir = tempfile::tempdir().unwrap();
    let pool = DatabasePool::new(&dir.path().join("audit.db"), PoolOptions::default())
        .await
        .expect("Failed to open file database");
    let repo = Arc::new(SqliteAuditRepository::new(pool.pool().clone()));
    let service = Arc::new(AuditService::new(repo, scenario_registry()));
    let ctx = OperationContext::new();

    let handles: Vec<_> = (0..CALLERS)
        .map(|i| {
            let service = Arc::clone(&service);
            let ctx = ctx.clone();
            tokio::spawn(async move {
                service
                    .create_audit_log(&ctx, &request_at(t0() + Duration::milliseconds(i)))
                    .await
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let log = handle.await.unwrap().expect("concurrent create failed");
        ids.insert(log.id());
    }
    assert_eq!(ids.len() as i64, CALLERS);

    let page = service
        .get_audit_logs(&ctx, &AuditLogQuery::new(1000, 0))
        .await
        .unwrap();
    assert_eq!(page.total as i64, CALLERS);
    assert_eq!(page.logs.len() as i64, CALLERS);

    pool.close().await;
}

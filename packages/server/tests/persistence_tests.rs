mod common;

use analyzer_core::common::{AnalysisId, PartialReport};
use analyzer_core::domains::analysis::models::{UpdateError, JSON_COLUMNS};
use analyzer_core::kernel::BaseAnalysisStore;
use common::{fitness_request, generated_report, TestHarness};
use serde_json::{json, Map, Value};
use test_context::test_context;
use tokio_test::assert_ok;

#[test_context(TestHarness)]
#[tokio::test]
async fn stored_sections_round_trip_unchanged(ctx: &TestHarness) {
    let store = ctx.store();
    let request = fitness_request();
    let report = generated_report(&request).await;

    let id = store.create(&request, &report).await.unwrap();
    let record = store.get(id).await.unwrap().expect("row exists");

    assert_eq!(record.segment, "Fitness");
    assert_eq!(record.price, Some(497.0));
    assert_eq!(record.status, "completed");
    assert_eq!(
        record.avatar_data,
        Some(serde_json::to_value(&report.avatar).unwrap())
    );
    assert_eq!(
        record.projections_data,
        Some(serde_json::to_value(&report.projections).unwrap())
    );
    assert_eq!(
        record.comprehensive_analysis,
        Some(serde_json::to_value(&report).unwrap())
    );

    let rebuilt = PartialReport::from_value(record.report_value()).unwrap();
    assert_eq!(rebuilt.avatar, Some(report.avatar.clone()));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn every_json_column_accepts_updates(ctx: &TestHarness) {
    let store = ctx.store();
    let request = fitness_request();
    let id = store
        .create(&request, &generated_report(&request).await)
        .await
        .unwrap();

    let mut fields = Map::new();
    for (i, column) in JSON_COLUMNS.iter().enumerate() {
        fields.insert(column.to_string(), json!({"revisado": true, "ordem": i}));
    }
    assert!(store.update(id, &fields).await.unwrap());

    let record = store.get(id).await.unwrap().unwrap();
    for (i, column) in JSON_COLUMNS.iter().enumerate() {
        assert_eq!(
            record.json_column(column),
            Some(&json!({"revisado": true, "ordem": i})),
            "column {}",
            column
        );
    }
    assert!(record.updated_at >= record.created_at);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unknown_columns_are_rejected(ctx: &TestHarness) {
    let store = ctx.store();
    let request = fitness_request();
    let id = store
        .create(&request, &generated_report(&request).await)
        .await
        .unwrap();

    let mut fields = Map::new();
    fields.insert("created_at".to_string(), Value::String("2020-01-01".into()));
    assert!(store.update(id, &fields).await.is_err());

    let mut fields = Map::new();
    fields.insert("status".to_string(), Value::Null);
    let err = store.update(id, &fields).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<UpdateError>(),
        Some(&UpdateError::NullNotAllowed("status".into()))
    );
    assert_eq!(store.get(id).await.unwrap().unwrap().status, "completed");

    let mut fields = Map::new();
    fields.insert("status".to_string(), json!("arquivada"));
    assert!(!store.update(AnalysisId::new(), &fields).await.unwrap());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn list_is_newest_first_and_delete_removes(ctx: &TestHarness) {
    let store = ctx.store();
    let request = fitness_request();
    let report = generated_report(&request).await;

    let first = store.create(&request, &report).await.unwrap();
    let second = store.create(&request, &report).await.unwrap();

    let listed: Vec<AnalysisId> = store
        .list(100, 0)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    let first_pos = listed.iter().position(|id| *id == first).unwrap();
    let second_pos = listed.iter().position(|id| *id == second).unwrap();
    assert!(second_pos < first_pos);

    assert!(store.delete(first).await.unwrap());
    assert!(!store.delete(first).await.unwrap());
    assert!(store.get(first).await.unwrap().is_none());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn stats_count_recent_rows(ctx: &TestHarness) {
    let store = ctx.store();
    let request = fitness_request();
    store
        .create(&request, &generated_report(&request).await)
        .await
        .unwrap();

    let stats = store.stats().await.unwrap();
    assert!(stats.total_analyses >= 1);
    assert!(stats.recent_analyses >= 1);
    assert!(stats.status_counts.get("completed").copied().unwrap_or(0) >= 1);
    assert_ok!(store.ping().await);
}

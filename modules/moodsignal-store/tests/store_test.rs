//! Store against a throwaway SQLite file.

use moodsignal_common::{Handle, Questionnaire};
use moodsignal_store::Store;
use serde_json::json;
use tempfile::TempDir;

async fn fresh_store() -> (TempDir, Store) {
    let dir = tempfile::tempdir().unwrap();
    let store = Store::new(dir.path().join("moodsignal.db"));
    store.migrate().await.unwrap();
    (dir, store)
}

fn handle(name: &str) -> Handle {
    Handle::parse(name).unwrap()
}

fn questionnaire(age: i64, sleep: &str) -> Questionnaire {
    Questionnaire::from_json(&json!({
        "age": age,
        "gender": "Male",
        "profession": "Student",
        "academic_pressure": 3,
        "work_pressure": 0,
        "study_satisfaction": 4,
        "job_satisfaction": 0,
        "sleep_duration": sleep,
        "dietary_habits": "Healthy",
        "degree": "MSc",
        "suicidal_thoughts": "No",
        "work_study_hours": 6.5,
        "financial_stress": 2,
        "family_history": "Yes"
    }))
    .unwrap()
}

#[tokio::test]
async fn migrate_is_idempotent_and_creates_file() {
    let (_dir, store) = fresh_store().await;
    store.migrate().await.unwrap();

    assert!(store.path().exists());
    assert_eq!(store.counts().await.unwrap(), (0, 0));
}

#[tokio::test]
async fn text_score_last_write_wins() {
    let (_dir, store) = fresh_store().await;
    let alice = handle("alice");

    store.upsert_text_score(&alice, 0.42).await.unwrap();
    store.upsert_text_score(&alice, 0.91).await.unwrap();

    let record = store.text_score(&alice).await.unwrap().unwrap();
    assert_eq!(record.handle, "alice");
    assert_eq!(record.text_score, 0.91);
    assert_eq!(store.counts().await.unwrap(), (1, 0));
}

#[tokio::test]
async fn missing_records_are_none() {
    let (_dir, store) = fresh_store().await;
    let nobody = handle("nobody");

    assert!(store.text_score(&nobody).await.unwrap().is_none());
    assert!(store.demographics(&nobody).await.unwrap().is_none());
}

#[tokio::test]
async fn demographics_round_trip_through_questionnaire() {
    let (_dir, store) = fresh_store().await;
    let bob = handle("bob");
    let answers = questionnaire(22, "7-8 hours");

    store.upsert_demographics(&bob, &answers, 1, 0.73).await.unwrap();

    let record = store.demographics(&bob).await.unwrap().unwrap();
    assert_eq!(record.submitted_class, 1);
    assert_eq!(record.submitted_score, 0.73);
    assert_eq!(record.questionnaire(), answers);
}

#[tokio::test]
async fn demographics_replaced_not_duplicated() {
    let (_dir, store) = fresh_store().await;
    let bob = handle("bob");

    store
        .upsert_demographics(&bob, &questionnaire(22, "7-8 hours"), 1, 0.73)
        .await
        .unwrap();
    store
        .upsert_demographics(&bob, &questionnaire(23, "5-6 hours"), 0, 0.31)
        .await
        .unwrap();

    let record = store.demographics(&bob).await.unwrap().unwrap();
    assert_eq!(record.age, 23);
    assert_eq!(record.sleep_duration, "5-6 hours");
    assert_eq!(record.submitted_class, 0);
    assert_eq!(store.counts().await.unwrap(), (0, 1));
}

#[tokio::test]
async fn demographics_do_not_require_a_text_score() {
    let (_dir, store) = fresh_store().await;
    let carol = handle("carol");

    store
        .upsert_demographics(&carol, &questionnaire(30, "5-6 hours"), 0, 0.2)
        .await
        .unwrap();

    assert!(store.text_score(&carol).await.unwrap().is_none());
    assert!(store.demographics(&carol).await.unwrap().is_some());
}

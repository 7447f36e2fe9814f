use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use shared::{ActivityType, FeedingMethod, Gender};
use tempfile::TempDir;

use kid_tracker_backend::config::BackendConfig;
use kid_tracker_backend::domain::models::{
    ActivityDetails, DiaperDetails, FeedingDetails, KidFields, MedicationDetails, NoteDetails, SleepDetails,
};
use kid_tracker_backend::domain::{ActivityPatch, NewActivity};
use kid_tracker_backend::initialize_backend;
use kid_tracker_backend::storage::json::{ACTIVITY_KEY, KIDS_KEY};
use kid_tracker_backend::storage::{
    ActivityRepository, ActivityStorage, DocumentStore, FileDocumentStore, KidRepository, KidStorage,
    MemoryDocumentStore,
};

fn file_repositories(dir: &TempDir) -> (Arc<dyn DocumentStore>, ActivityRepository, KidRepository) {
    let store: Arc<dyn DocumentStore> = Arc::new(FileDocumentStore::new(dir.path()).unwrap());
    (
        store.clone(),
        ActivityRepository::new(store.clone()),
        KidRepository::new(store),
    )
}

fn bottle(kid_id: &str, amount: f64) -> NewActivity {
    let mut feeding = FeedingDetails::new(FeedingMethod::Bottle);
    feeding.amount = Some(amount);
    NewActivity::new(kid_id, Utc::now(), ActivityDetails::Feeding(feeding))
}

fn note(kid_id: &str, content: &str) -> NewActivity {
    NewActivity::new(
        kid_id,
        Utc::now(),
        ActivityDetails::Note(NoteDetails {
            content: content.to_string(),
        }),
    )
}

#[tokio::test]
async fn added_activities_survive_a_reload() {
    let dir = TempDir::new().unwrap();
    let (_, repo, _) = file_repositories(&dir);

    let feeding = repo.add(bottle("k1", 90.0)).await.unwrap();
    let diaper = repo
        .add(NewActivity::new("k1", Utc::now(), ActivityDetails::Diaper(DiaperDetails::new(true, false))))
        .await
        .unwrap();

    // A second repository over the same directory sees identical records
    let (_, reopened, _) = file_repositories(&dir);
    assert_eq!(reopened.get_all().await, vec![feeding, diaper]);
}

#[tokio::test]
async fn add_edit_delete_feeding() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));

    let added = repo.add(bottle("k1", 90.0)).await.unwrap();
    assert_eq!(added.created_at, added.updated_at);

    let updated = repo
        .update(&added.id, ActivityPatch::new().detail("amount", 120))
        .await
        .unwrap();
    match &updated.details {
        ActivityDetails::Feeding(feeding) => {
            assert_eq!(feeding.amount, Some(120.0));
            assert_eq!(feeding.method, FeedingMethod::Bottle);
        }
        other => panic!("expected feeding, got {:?}", other),
    }
    assert_eq!(updated.created_at, added.created_at);
    assert!(updated.updated_at > added.updated_at);
    assert_eq!(repo.get_all().await, vec![updated]);

    assert!(repo.delete(&added.id).await);
    assert!(repo.get_all().await.is_empty());
}

#[tokio::test]
async fn type_cannot_change_on_update() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let added = repo.add(bottle("k1", 90.0)).await.unwrap();

    let err = repo
        .update(
            &added.id,
            ActivityPatch::new()
                .activity_type(ActivityType::Sleep)
                .detail("duration", 30),
        )
        .await
        .unwrap_err();
    assert!(err.is_type_mismatch());

    assert_eq!(repo.get_all().await, vec![added]);
}

#[tokio::test]
async fn update_of_unknown_id_is_not_found() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let kept = repo.add(note("k1", "keep me")).await.unwrap();

    let err = repo
        .update("missing", ActivityPatch::new().detail("content", "x"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(repo.get_all().await, vec![kept]);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let first = repo.add(note("k1", "first")).await.unwrap();
    let second = repo.add(note("k1", "second")).await.unwrap();

    assert!(repo.delete(&first.id).await);
    assert!(repo.delete(&first.id).await);
    assert!(repo.delete("never-existed").await);
    assert_eq!(repo.get_all().await, vec![second]);
}

#[tokio::test]
async fn detail_merge_keeps_unmentioned_fields() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let mut medication = MedicationDetails::new("Paracetamol", "2.5");
    medication.reason = Some("fever".to_string());
    let added = repo
        .add(NewActivity::new("k1", Utc::now(), ActivityDetails::Medication(medication)))
        .await
        .unwrap();

    let updated = repo
        .update(&added.id, ActivityPatch::new().detail("dose", "5"))
        .await
        .unwrap();
    match updated.details {
        ActivityDetails::Medication(m) => {
            assert_eq!(m.name, "Paracetamol");
            assert_eq!(m.dose, "5");
            assert_eq!(m.reason.as_deref(), Some("fever"));
        }
        other => panic!("expected medication, got {:?}", other),
    }
}

#[tokio::test]
async fn note_update_changes_only_content() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let added = repo.add(note("k1", "before")).await.unwrap();

    let updated = repo
        .update(&added.id, ActivityPatch::new().detail("content", "x"))
        .await
        .unwrap();

    assert_eq!(updated.id, added.id);
    assert_eq!(updated.kid_id, added.kid_id);
    assert_eq!(updated.timestamp, added.timestamp);
    assert_eq!(updated.created_at, added.created_at);
    assert_eq!(updated.activity_type(), ActivityType::Note);
    assert_eq!(
        updated.details,
        ActivityDetails::Note(NoteDetails {
            content: "x".to_string()
        })
    );
}

#[tokio::test]
async fn failed_read_does_not_wipe_activities() {
    let store = MemoryDocumentStore::new();
    let repo = ActivityRepository::new(Arc::new(store.clone()));
    for i in 0..5 {
        repo.add(note("k1", &format!("entry {}", i))).await.unwrap();
    }

    store.fail_next_read();
    let err = repo.add(note("k1", "during outage")).await.unwrap_err();
    assert!(err.is_storage());

    assert_eq!(repo.get_all().await.len(), 5);
    repo.add(note("k1", "after outage")).await.unwrap();
    assert_eq!(repo.get_all().await.len(), 6);
}

#[tokio::test]
async fn filter_by_kid_matches_full_list() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    repo.add(note("k1", "a")).await.unwrap();
    repo.add(note("k2", "b")).await.unwrap();
    repo.add(note("k1", "c")).await.unwrap();

    let all = repo.get_all().await;
    let expected: Vec<_> = all.iter().filter(|a| a.kid_id == "k1").cloned().collect();
    assert_eq!(repo.get_for_kid("k1").await, expected);
    assert_eq!(expected.len(), 2);
    assert!(repo.get_for_kid("nobody").await.is_empty());
}

#[tokio::test]
async fn corrupt_collection_reads_as_empty_and_is_replaced() {
    let dir = TempDir::new().unwrap();
    let (store, repo, _) = file_repositories(&dir);
    store.set(ACTIVITY_KEY, "not an array").await.unwrap();

    assert!(repo.get_all().await.is_empty());

    let added = repo.add(note("k1", "fresh start")).await.unwrap();
    assert_eq!(repo.get_all().await, vec![added]);

    let raw = store.get(ACTIVITY_KEY).await.unwrap().unwrap();
    let parsed: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn sleep_duration_is_derived_from_range() {
    let repo = ActivityRepository::new(Arc::new(MemoryDocumentStore::new()));
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 21, 0, 0).unwrap();
    let end = start + Duration::hours(9);

    let added = repo
        .add(NewActivity::new(
            "k1",
            start,
            ActivityDetails::Sleep(SleepDetails::from_range(start, end).unwrap()),
        ))
        .await
        .unwrap();

    let stored = repo.get_all().await;
    match &stored[0].details {
        ActivityDetails::Sleep(sleep) => {
            assert_eq!(sleep.duration, 540);
            assert_eq!(sleep.end, end);
        }
        other => panic!("expected sleep, got {:?}", other),
    }
    assert_eq!(added.summary(), "Duration: 540 min");
}

#[tokio::test]
async fn deleting_a_kid_keeps_its_activities() {
    let dir = TempDir::new().unwrap();
    let (store, activities, kids) = file_repositories(&dir);

    let kid = kids
        .add(KidFields::new("Mia", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Gender::Girl))
        .await
        .unwrap();
    let activity = activities.add(note(&kid.id, "first smile")).await.unwrap();

    assert!(kids.delete(&kid.id).await);
    assert!(kids.get_all().await.is_empty());
    assert_eq!(activities.get_for_kid(&kid.id).await, vec![activity]);

    let raw_kids = store.get(KIDS_KEY).await.unwrap().unwrap();
    assert_eq!(serde_json::from_str::<Value>(&raw_kids).unwrap(), Value::Array(vec![]));
}

#[tokio::test]
async fn backend_initializes_from_config() {
    let dir = TempDir::new().unwrap();
    let config = BackendConfig {
        data_directory: dir.path().join("data"),
        log_level: "debug".to_string(),
    };

    let mut state = initialize_backend(config.clone()).await.unwrap();
    assert!(state.context.kids().is_empty());

    let kid = state
        .context
        .add_kid(KidFields::new("Leo", NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(), Gender::Boy))
        .await
        .unwrap();
    state.context.add_activity(note(&kid.id, "hello")).await.unwrap();

    let restarted = initialize_backend(config).await.unwrap();
    assert_eq!(restarted.context.selected_kid().map(|k| k.id.clone()), Some(kid.id));
    assert_eq!(restarted.context.activities().len(), 1);
    assert!(dir.path().join("data").join("activity_list.json").exists());
}

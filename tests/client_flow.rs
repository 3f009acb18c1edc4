use async_trait::async_trait;
use chrono::NaiveDateTime;
use liftlog::auth::CredentialStore;
use liftlog::client::{AutoConfirm, ClientCore, ConfirmPrompt};
use liftlog::config::ClientConfig;
use liftlog::errors::ClientError;
use liftlog::gateway::fake::FakeGateway;
use liftlog::gateway::GatewayError;
use liftlog::models::{
    Category, CreateSetRequest, CreateTemplateExerciseRequest, CreateTemplateRequest, Exercise,
    SetItem, TemplateExerciseInput, UpdateSetRequest,
};
use std::sync::Arc;
use tokio::time::Duration;

struct DeclinePrompt;

#[async_trait]
impl ConfirmPrompt for DeclinePrompt {
    async fn confirm(&self, _message: &str) -> bool {
        false
    }
}

fn core_with(prompt: Arc<dyn ConfirmPrompt>) -> (Arc<ClientCore>, Arc<FakeGateway>) {
    let fake = Arc::new(FakeGateway::new());
    let core = ClientCore::new(
        ClientConfig::default(),
        fake.clone(),
        prompt,
        Arc::new(CredentialStore::new()),
    );
    (core, fake)
}

fn core_with_fake() -> (Arc<ClientCore>, Arc<FakeGateway>) {
    core_with(Arc::new(AutoConfirm))
}

fn category(id: &str, title: &str) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
    }
}

fn exercise(id: &str, title: &str, category: &Category) -> Exercise {
    Exercise {
        id: id.to_string(),
        title: title.to_string(),
        short: title.chars().take(6).collect(),
        category: category.clone(),
        is_archived: false,
        created_at: None,
        updated_at: None,
    }
}

fn timestamp(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").expect("test timestamp")
}

fn set(id: &str, exercise_id: &str, created_at: &str) -> SetItem {
    SetItem {
        id: id.to_string(),
        exercise_id: Some(exercise_id.to_string()),
        exercise: None,
        reps: 10,
        weight: 40.0,
        created_at: Some(timestamp(created_at)),
    }
}

#[tokio::test(start_paused = true)]
async fn mutations_on_distinct_ids_settle_independently() {
    let (core, fake) = core_with_fake();
    fake.seed_sets(vec![
        set("s1", "e1", "2024-01-01T10:00:00"),
        set("s2", "e1", "2024-01-01T11:00:00"),
        set("s3", "e1", "2024-01-02T09:00:00"),
    ]);
    core.reload_sets().await.expect("initial load");

    // the slower update settles after the faster delete; each completion
    // lands on its own id without clobbering the other
    fake.delay_next("update_set", Duration::from_millis(100));
    fake.delay_next("delete_set", Duration::from_millis(10));

    let update = core.update_set(
        "s1",
        UpdateSetRequest {
            reps: Some(15),
            weight: None,
        },
    );
    let delete = core.delete_set("s2");
    let (updated, deleted) = tokio::join!(update, delete);
    assert_eq!(updated.expect("update s1").reps, 15);
    assert!(deleted.expect("delete s2"));

    let ids: Vec<String> = core
        .sets()
        .expect("sets snapshot")
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["s1", "s3"]);
    assert_eq!(core.sets().expect("sets snapshot")[0].reps, 15);
}

#[tokio::test(start_paused = true)]
async fn late_reload_result_is_discarded_after_newer_one_applied() {
    let (core, fake) = core_with_fake();
    fake.seed_sets(vec![set("s1", "e1", "2024-01-01T10:00:00")]);

    fake.delay_next("list_sets", Duration::from_millis(100));
    fake.delay_next("list_sets", Duration::from_millis(10));

    let first = core.reload_sets();
    let second = async {
        // the server state moves on between the two requests
        fake.seed_sets(vec![set("s2", "e1", "2024-01-03T10:00:00")]);
        core.reload_sets().await
    };
    let (first, second) = tokio::join!(first, second);
    first.expect("first reload settles cleanly");
    second.expect("second reload settles cleanly");

    let ids: Vec<String> = core
        .sets()
        .expect("sets snapshot")
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["s2"]);
    assert_eq!(fake.call_count("list_sets"), 2);
}

#[tokio::test(start_paused = true)]
async fn scope_reopened_on_other_category_ignores_first_load() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    let arms = category("c2", "Arms");
    fake.seed_categories(vec![legs.clone(), arms.clone()]);
    fake.seed_exercises(vec![
        exercise("e1", "Squat", &legs),
        exercise("e2", "Curl", &arms),
    ]);
    core.reload_categories().await.expect("categories");

    fake.delay_next("list_exercises", Duration::from_millis(100));
    fake.delay_next("list_exercises", Duration::from_millis(10));

    let open_first = core.open_category("c1");
    let reopen = async {
        core.close_category().expect("close");
        core.open_category("c2").await
    };
    let (first, second) = tokio::join!(open_first, reopen);
    first.expect("first open settles cleanly");
    second.expect("second open settles cleanly");

    let snapshot = core.scope().expect("scope snapshot").expect("open scope");
    assert_eq!(snapshot.category.id, "c2");
    let ids: Vec<&str> = snapshot
        .exercises
        .iter()
        .map(|entry| entry.id.as_str())
        .collect();
    assert_eq!(ids, vec!["e2"]);
}

#[tokio::test]
async fn archive_excludes_from_picker_and_restore_brings_back() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    fake.seed_categories(vec![legs.clone()]);
    fake.seed_exercises(vec![exercise("e1", "Squat", &legs)]);
    core.reload_categories().await.expect("categories");
    core.open_category("c1").await.expect("open scope");

    core.archive_exercise("e1").await.expect("archive");
    assert!(core.pickable_exercises().expect("picker").is_empty());
    // archived entries stay listable in the scope itself
    let snapshot = core.scope().expect("scope snapshot").expect("open scope");
    assert_eq!(snapshot.exercises.len(), 1);
    assert!(snapshot.exercises[0].is_archived);

    core.restore_exercise("e1").await.expect("restore");
    let picker = core.pickable_exercises().expect("picker");
    assert_eq!(picker.len(), 1);
    assert_eq!(picker[0].id, "e1");
}

#[tokio::test]
async fn failed_delete_keeps_item_and_raises_notice_without_retry() {
    let (core, fake) = core_with_fake();
    fake.seed_sets(vec![set("s1", "e1", "2024-01-01T10:00:00")]);
    core.reload_sets().await.expect("initial load");

    fake.fail_next("delete_set", 500);
    let result = core.delete_set("s1").await;
    match result {
        Err(ClientError::Remote(GatewayError::Status { status, .. })) => assert_eq!(status, 500),
        other => panic!("expected remote failure, got {other:?}"),
    }

    assert_eq!(core.sets().expect("sets snapshot").len(), 1);
    let notice = core.last_error().expect("error notice");
    assert_eq!(notice.operation, "delete_set");
    assert_eq!(fake.call_count("delete_set"), 1);

    // the control stays usable: the retry succeeds and clears the notice
    assert!(core.delete_set("s1").await.expect("retry"));
    assert!(core.sets().expect("sets snapshot").is_empty());
    assert!(core.last_error().is_none());
}

#[tokio::test]
async fn declined_prompt_aborts_with_no_gateway_call() {
    let (core, fake) = core_with(Arc::new(DeclinePrompt));
    fake.seed_sets(vec![set("s1", "e1", "2024-01-01T10:00:00")]);
    core.reload_sets().await.expect("initial load");

    assert!(!core.delete_set("s1").await.expect("declined delete"));
    assert_eq!(fake.call_count("delete_set"), 0);
    assert_eq!(core.sets().expect("sets snapshot").len(), 1);
}

#[tokio::test]
async fn failed_create_leaves_store_untouched() {
    let (core, fake) = core_with_fake();
    fake.fail_next("create_category", 500);
    assert!(core.create_category("Legs").await.is_err());
    assert!(core.categories().expect("categories").is_empty());

    let created = core.create_category("Legs").await.expect("retry");
    let categories = core.categories().expect("categories");
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].id, created.id);
}

#[tokio::test(start_paused = true)]
async fn second_mutation_on_pending_id_is_rejected_not_raced() {
    let (core, fake) = core_with_fake();
    fake.seed_sets(vec![set("s1", "e1", "2024-01-01T10:00:00")]);
    core.reload_sets().await.expect("initial load");

    fake.delay_next("update_set", Duration::from_millis(50));
    let slow = core.update_set(
        "s1",
        UpdateSetRequest {
            reps: Some(12),
            weight: None,
        },
    );
    let contender = core.update_set(
        "s1",
        UpdateSetRequest {
            reps: Some(99),
            weight: None,
        },
    );
    let (slow, contender) = tokio::join!(slow, contender);
    assert_eq!(slow.expect("first update").reps, 12);
    assert!(matches!(contender, Err(ClientError::MutationPending(_))));
    assert_eq!(fake.call_count("update_set"), 1);
    assert_eq!(core.sets().expect("sets snapshot")[0].reps, 12);
}

#[tokio::test]
async fn each_filter_change_triggers_exactly_one_reload() {
    let (core, fake) = core_with_fake();
    fake.seed_sets(vec![
        set("s1", "e1", "2024-01-01T10:00:00"),
        set("s2", "e2", "2024-01-05T10:00:00"),
    ]);
    core.reload_sets().await.expect("initial load");
    assert_eq!(fake.call_count("list_sets"), 1);

    core.set_exercise_filter(Some("e1".to_string()))
        .await
        .expect("filter by exercise");
    assert_eq!(fake.call_count("list_sets"), 2);
    let ids: Vec<String> = core
        .sets()
        .expect("sets snapshot")
        .into_iter()
        .map(|item| item.id)
        .collect();
    assert_eq!(ids, vec!["s1"]);

    // same value again composes the same query: no reload
    core.set_exercise_filter(Some("e1".to_string()))
        .await
        .expect("unchanged filter");
    assert_eq!(fake.call_count("list_sets"), 2);

    core.set_created_from_filter(Some(timestamp("2024-01-02T00:00:00").date()))
        .await
        .expect("filter by date");
    assert_eq!(fake.call_count("list_sets"), 3);
    assert!(core.sets().expect("sets snapshot").is_empty());

    // reset clears three fields but reloads once
    core.reset_filters().await.expect("reset");
    assert_eq!(fake.call_count("list_sets"), 4);
    assert_eq!(core.sets().expect("sets snapshot").len(), 2);

    core.reset_filters().await.expect("reset of empty filter");
    assert_eq!(fake.call_count("list_sets"), 4);
}

#[tokio::test]
async fn auth_expiry_clears_credential_and_is_not_retried() {
    let (core, fake) = core_with_fake();
    core.authenticate("init-data-blob").await.expect("exchange");
    assert!(core.is_authenticated());

    fake.fail_next("list_sets", 401);
    let result = core.reload_sets().await;
    assert!(matches!(result, Err(ClientError::Auth(_))));
    assert!(!core.is_authenticated());
    assert_eq!(fake.call_count("list_sets"), 1);
}

#[tokio::test]
async fn deleting_open_category_closes_scope() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    fake.seed_categories(vec![legs.clone()]);
    fake.seed_exercises(vec![exercise("e1", "Squat", &legs)]);
    core.reload_categories().await.expect("categories");
    core.open_category("c1").await.expect("open scope");

    assert!(core.delete_category("c1").await.expect("delete"));
    assert!(core.scope().expect("scope snapshot").is_none());
    assert!(core.categories().expect("categories").is_empty());
}

#[tokio::test]
async fn renaming_open_category_updates_header_without_reload() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    fake.seed_categories(vec![legs.clone()]);
    fake.seed_exercises(vec![exercise("e1", "Squat", &legs)]);
    core.reload_categories().await.expect("categories");
    core.open_category("c1").await.expect("open scope");
    assert_eq!(fake.call_count("list_exercises"), 1);

    core.rename_category("c1", "Lower body").await.expect("rename");
    let snapshot = core.scope().expect("scope snapshot").expect("open scope");
    assert_eq!(snapshot.category.title, "Lower body");
    assert_eq!(snapshot.exercises.len(), 1);
    assert_eq!(fake.call_count("list_exercises"), 1);
}

#[tokio::test]
async fn created_set_lands_in_its_day_bucket() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    fake.seed_categories(vec![legs.clone()]);
    fake.seed_exercises(vec![exercise("e1", "Squat", &legs)]);
    fake.seed_sets(vec![
        set("s1", "e1", "2024-01-01T10:00:00"),
        set("s2", "e1", "2024-01-01T18:00:00"),
        set("s3", "e1", "2024-01-02T09:00:00"),
    ]);
    core.reload_sets().await.expect("initial load");

    let groups = core.grouped_sets().expect("groups");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].day_key, "2024-01-01");
    assert_eq!(groups[0].items.len(), 2);
    assert_eq!(groups[1].day_key, "2024-01-02");

    core.create_set(CreateSetRequest {
        exercise_id: "e1".to_string(),
        reps: 8,
        weight: 60.0,
        created_at: Some(timestamp("2024-01-02T11:00:00")),
    })
    .await
    .expect("create set");

    let groups = core.grouped_sets().expect("groups");
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[1].items.len(), 2);
}

#[tokio::test]
async fn template_exercises_keep_explicit_order() {
    let (core, fake) = core_with_fake();
    let legs = category("c1", "Legs");
    fake.seed_categories(vec![legs.clone()]);
    fake.seed_exercises(vec![
        exercise("e1", "Squat", &legs),
        exercise("e2", "Lunge", &legs),
        exercise("e3", "Press", &legs),
    ]);

    let template = core
        .create_template(CreateTemplateRequest {
            title: "Leg day".to_string(),
            day_of_week: Some(2),
            exercises: vec![
                TemplateExerciseInput {
                    exercise_id: "e2".to_string(),
                    order: Some(2),
                    ..Default::default()
                },
                TemplateExerciseInput {
                    exercise_id: "e1".to_string(),
                    order: Some(1),
                    ..Default::default()
                },
            ],
        })
        .await
        .expect("create template");
    let sequence: Vec<&str> = template
        .exercises
        .iter()
        .map(|entry| entry.exercise.id.as_str())
        .collect();
    assert_eq!(sequence, vec!["e1", "e2"]);

    core.add_template_exercise(CreateTemplateExerciseRequest {
        template_id: template.id.clone(),
        exercise_id: "e3".to_string(),
        default_weight: Some(50.0),
        default_reps: Some(8),
        order: Some(0),
    })
    .await
    .expect("add template exercise");

    let templates = core.templates().expect("templates snapshot");
    let sequence: Vec<&str> = templates[0]
        .exercises
        .iter()
        .map(|entry| entry.exercise.id.as_str())
        .collect();
    assert_eq!(sequence, vec!["e3", "e1", "e2"]);
}

#[tokio::test]
async fn invalid_day_of_week_rejected_before_gateway_call() {
    let (core, fake) = core_with_fake();
    let result = core
        .create_template(CreateTemplateRequest {
            title: "Bad day".to_string(),
            day_of_week: Some(7),
            exercises: Vec::new(),
        })
        .await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert_eq!(fake.call_count("create_template"), 0);
}

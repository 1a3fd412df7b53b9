mod common;

use awards_storage::dto::criteria::UpdateCriteriaRequest;
use awards_storage::services::{CriteriaStore, CycleService, NominationWorkflow};
use awards_storage::{ErrorKind, StorageError};
use common::{criteria_request, dec, draft_cycle, open_cycle, score, seed, submission};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Weight ceiling
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_add_criteria_up_to_ceiling(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);

    let created = store
        .add_criteria(
            cycle.cycle_id,
            &[criteria_request("Impact", "6"), criteria_request("Teamwork", "4")],
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.len(), 2);
    let listed = store.list_criteria(cycle.cycle_id, true).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "Impact");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_batch_over_ceiling_is_rolled_back(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);
    store
        .add_criteria(cycle.cycle_id, &[criteria_request("Impact", "6")], None)
        .await
        .unwrap();

    let err = store
        .add_criteria(
            cycle.cycle_id,
            &[criteria_request("Teamwork", "3"), criteria_request("Mentoring", "1.5")],
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::WeightCeilingExceeded { .. }));
    assert_eq!(err.kind(), ErrorKind::ConstraintViolation);
    assert_eq!(common::count(&pool, "criteria").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_weights_finer_than_cents_rejected(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);

    let err = store
        .add_criteria(
            cycle.cycle_id,
            &[
                criteria_request("Impact", "3.335"),
                criteria_request("Teamwork", "3.335"),
                criteria_request("Mentoring", "3.33"),
            ],
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, StorageError::InvalidWeight));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(common::count(&pool, "criteria").await, 0);

    let created = store
        .add_criteria(
            cycle.cycle_id,
            &[
                criteria_request("Impact", "3.34"),
                criteria_request("Teamwork", "3.33"),
                criteria_request("Mentoring", "3.33"),
            ],
            None,
        )
        .await
        .unwrap();
    let stored: rust_decimal::Decimal = store
        .list_criteria(cycle.cycle_id, true)
        .await
        .unwrap()
        .iter()
        .map(|c| c.weight)
        .sum();
    assert_eq!(created.len(), 3);
    assert!(stored <= fixture.config.weight_ceiling, "stored sum {}", stored);

    let err = store
        .update_criteria(
            created[0].criteria_id,
            UpdateCriteriaRequest {
                weight: Some(dec("3.345")),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidWeight));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inactive_criteria_do_not_count(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);

    let mut archived = criteria_request("Archived", "9");
    archived.is_active = false;
    store
        .add_criteria(cycle.cycle_id, &[archived, criteria_request("Impact", "10")], None)
        .await
        .unwrap();

    let active = store.list_criteria(cycle.cycle_id, true).await.unwrap();
    let all = store.list_criteria(cycle.cycle_id, false).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reactivation_rechecks_ceiling(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);

    let mut archived = criteria_request("Archived", "4");
    archived.is_active = false;
    let created = store
        .add_criteria(cycle.cycle_id, &[archived, criteria_request("Impact", "8")], None)
        .await
        .unwrap();

    let err = store
        .update_criteria(
            created[0].criteria_id,
            UpdateCriteriaRequest {
                is_active: Some(true),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::WeightCeilingExceeded { .. }));

    let unchanged = store.get_criteria(created[0].criteria_id).await.unwrap();
    assert!(!unchanged.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_weight_update_in_draft(pool: PgPool) {
    let fixture = seed(&pool).await;
    let cycle = draft_cycle(&pool, &fixture, "2025 H1").await;
    let store = CriteriaStore::new(&pool, &fixture.config);
    let created = store
        .add_criteria(
            cycle.cycle_id,
            &[criteria_request("Impact", "5"), criteria_request("Teamwork", "5")],
            None,
        )
        .await
        .unwrap();

    let lowered = store
        .update_criteria(
            created[0].criteria_id,
            UpdateCriteriaRequest {
                weight: Some(dec("2")),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(lowered.weight, dec("2"));

    let err = store
        .update_criteria(
            created[1].criteria_id,
            UpdateCriteriaRequest {
                weight: Some(dec("8.5")),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::WeightCeilingExceeded { .. }));
}

// ---------------------------------------------------------------------------
// Frozen structure outside DRAFT
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_open_cycle_rejects_weight_change(pool: PgPool) {
    let fixture = seed(&pool).await;
    let (_, criteria) =
        open_cycle(&pool, &fixture, "2025 H1", &[criteria_request("Impact", "5")]).await;
    let store = CriteriaStore::new(&pool, &fixture.config);

    let err = store
        .update_criteria(
            criteria[0].criteria_id,
            UpdateCriteriaRequest {
                weight: Some(dec("3")),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::InvalidTransition(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let deactivated = store
        .update_criteria(
            criteria[0].criteria_id,
            UpdateCriteriaRequest {
                is_active: Some(false),
                description: Some("Retired mid-cycle".to_string()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert!(!deactivated.is_active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_add_to_missing_cycle(pool: PgPool) {
    let fixture = seed(&pool).await;
    let err = CriteriaStore::new(&pool, &fixture.config)
        .add_criteria(uuid::Uuid::new_v4(), &[criteria_request("Impact", "5")], None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::CycleNotFound));
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_answered_criteria_cannot_be_deleted(pool: PgPool) {
    let fixture = seed(&pool).await;
    let (cycle, criteria) = open_cycle(
        &pool,
        &fixture,
        "2025 H1",
        &[criteria_request("Impact", "5"), criteria_request("Teamwork", "3")],
    )
    .await;
    NominationWorkflow::new(&pool, &fixture.config)
        .submit(
            submission(&cycle, &fixture.nominees[0], vec![score(criteria[0].criteria_id, 4)]),
            fixture.lead.user_id,
        )
        .await
        .unwrap();

    let store = CriteriaStore::new(&pool, &fixture.config);
    let err = store
        .delete_criteria(criteria[0].criteria_id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::CriteriaInUse));

    store.delete_criteria(criteria[1].criteria_id, None).await.unwrap();
    assert_eq!(common::count(&pool, "criteria").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_finalized_cycle_rejects_criteria_changes(pool: PgPool) {
    let fixture = seed(&pool).await;
    let (cycle, criteria) =
        open_cycle(&pool, &fixture, "2025 H1", &[criteria_request("Impact", "5")]).await;
    CycleService::new(&pool)
        .close_cycle(cycle.cycle_id, None)
        .await
        .unwrap();
    awards_storage::services::Finalization::new(&pool)
        .finalize(cycle.cycle_id, None)
        .await
        .unwrap();

    let store = CriteriaStore::new(&pool, &fixture.config);
    let err = store
        .add_criteria(cycle.cycle_id, &[criteria_request("Late", "1")], None)
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::CycleFinalized));

    let err = store
        .update_criteria(
            criteria[0].criteria_id,
            UpdateCriteriaRequest {
                is_active: Some(false),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::CycleFinalized));
}

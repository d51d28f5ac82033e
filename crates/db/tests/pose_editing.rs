//! Integration tests for manual pose editing.
//!
//! Invariant under test: after any insert, delete, or move, positions
//! within a phase are exactly `0..n-1` in presentation order.

use sqlx::PgPool;
use yogaflow_core::assembler::{AssembledPhase, AssembledPose, AssembledSequence};
use yogaflow_core::params::{Difficulty, Focus, Style};
use yogaflow_core::types::DbId;
use yogaflow_db::models::sequence_pose::{
    CreateSequencePose, MoveSequencePose, UpdateSequencePose,
};
use yogaflow_db::repositories::{PoseRepo, SequencePoseRepo, SequenceRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

struct Fixture {
    sequence_id: DbId,
    warm_up: DbId,
    cool_down: DbId,
    catalog: Vec<DbId>,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let catalog: Vec<DbId> = PoseRepo::list(pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();

    let pose = |pose_id: DbId, position: i32| AssembledPose {
        pose_id,
        name: String::new(),
        position,
        duration_secs: 30,
        side: String::new(),
        cues: String::new(),
    };
    let assembled = AssembledSequence {
        title: "Editing Fixture".to_string(),
        description: None,
        duration_minutes: 20,
        difficulty: Difficulty::Beginner,
        style: Style::Hatha,
        focus: Focus::FullBody,
        ai_generated: false,
        phases: vec![
            AssembledPhase {
                carried_id: None,
                name: "Warm Up".to_string(),
                description: None,
                position: 0,
                duration_minutes: None,
                intensity: None,
                poses: vec![
                    pose(catalog[0], 0),
                    pose(catalog[1], 1),
                    pose(catalog[2], 2),
                ],
            },
            AssembledPhase {
                carried_id: None,
                name: "Cool Down".to_string(),
                description: None,
                position: 1,
                duration_minutes: None,
                intensity: None,
                poses: vec![pose(catalog[3], 100)],
            },
        ],
    };

    let detail = SequenceRepo::create_full(pool, Some(1), &assembled)
        .await
        .unwrap();
    Fixture {
        sequence_id: detail.sequence.id,
        warm_up: detail.phases[0].phase.id,
        cool_down: detail.phases[1].phase.id,
        catalog,
    }
}

fn add(pose_id: DbId, position: Option<i32>) -> CreateSequencePose {
    CreateSequencePose {
        pose_id,
        position,
        duration_secs: None,
        side: None,
        cues: None,
        transition: None,
        modifications: None,
    }
}

async fn positions(pool: &PgPool, phase_id: DbId) -> Vec<(DbId, i32)> {
    SequencePoseRepo::list_by_phase(pool, phase_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.pose_id, p.position))
        .collect()
}

fn assert_contiguous(rows: &[(DbId, i32)]) {
    for (index, (_, position)) in rows.iter().enumerate() {
        assert_eq!(*position, index as i32, "positions must be 0..n-1: {rows:?}");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_at_position_shifts_and_renumbers(pool: PgPool) {
    let fx = fixture(&pool).await;

    let created = SequencePoseRepo::create(&pool, fx.warm_up, &add(fx.catalog[4], Some(1)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.position, 1);
    assert_eq!(created.duration_secs, 30);
    assert_eq!(created.side, "");

    let rows = positions(&pool, fx.warm_up).await;
    assert_contiguous(&rows);
    assert_eq!(
        rows.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![fx.catalog[0], fx.catalog[4], fx.catalog[1], fx.catalog[2]],
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_insert_without_position_appends(pool: PgPool) {
    let fx = fixture(&pool).await;

    let created = SequencePoseRepo::create(&pool, fx.warm_up, &add(fx.catalog[4], None))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.position, 3);
    assert_eq!(created.sequence_id, fx.sequence_id);

    // Unknown phase yields no row.
    let missing = SequencePoseRepo::create(&pool, 999_999, &add(fx.catalog[0], None))
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_closes_the_gap(pool: PgPool) {
    let fx = fixture(&pool).await;
    let rows = SequencePoseRepo::list_by_phase(&pool, fx.warm_up).await.unwrap();
    let middle = rows[1].id;

    assert!(SequencePoseRepo::delete(&pool, middle).await.unwrap());
    let rows = positions(&pool, fx.warm_up).await;
    assert_eq!(rows.len(), 2);
    assert_contiguous(&rows);
    assert_eq!(rows[1].0, fx.catalog[2]);

    assert!(!SequencePoseRepo::delete(&pool, middle).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_within_phase_reorders(pool: PgPool) {
    let fx = fixture(&pool).await;
    let rows = SequencePoseRepo::list_by_phase(&pool, fx.warm_up).await.unwrap();
    let last = rows[2].id;

    let moved = SequencePoseRepo::move_pose(
        &pool,
        last,
        &MoveSequencePose {
            to_phase_id: None,
            to_position: 0,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.position, 0);
    assert_eq!(moved.phase_id, fx.warm_up);

    let rows = positions(&pool, fx.warm_up).await;
    assert_contiguous(&rows);
    assert_eq!(
        rows.iter().map(|(id, _)| *id).collect::<Vec<_>>(),
        vec![fx.catalog[2], fx.catalog[0], fx.catalog[1]],
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_across_phases_renumbers_both(pool: PgPool) {
    let fx = fixture(&pool).await;
    let rows = SequencePoseRepo::list_by_phase(&pool, fx.warm_up).await.unwrap();
    let first = rows[0].id;

    let moved = SequencePoseRepo::move_pose(
        &pool,
        first,
        &MoveSequencePose {
            to_phase_id: Some(fx.cool_down),
            to_position: 0,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(moved.phase_id, fx.cool_down);
    assert_eq!(moved.position, 0);

    let warm = positions(&pool, fx.warm_up).await;
    assert_eq!(warm.len(), 2);
    assert_contiguous(&warm);

    let cool = positions(&pool, fx.cool_down).await;
    assert_eq!(cool.len(), 2);
    assert_contiguous(&cool);
    assert_eq!(cool[0].0, fx.catalog[0]);
    assert_eq!(cool[1].0, fx.catalog[3]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_move_to_foreign_sequence_phase_is_rejected(pool: PgPool) {
    let fx = fixture(&pool).await;
    let other = fixture(&pool).await;
    let rows = SequencePoseRepo::list_by_phase(&pool, fx.warm_up).await.unwrap();

    let result = SequencePoseRepo::move_pose(
        &pool,
        rows[0].id,
        &MoveSequencePose {
            to_phase_id: Some(other.warm_up),
            to_position: 0,
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());

    // Source phase is untouched.
    let warm = positions(&pool, fx.warm_up).await;
    assert_eq!(warm.len(), 3);
    assert_contiguous(&warm);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_applies_only_provided_fields(pool: PgPool) {
    let fx = fixture(&pool).await;
    let rows = SequencePoseRepo::list_by_phase(&pool, fx.warm_up).await.unwrap();

    let updated = SequencePoseRepo::update(
        &pool,
        rows[0].id,
        &UpdateSequencePose {
            duration_secs: Some(45),
            side: Some("left".to_string()),
            cues: None,
            transition: Some("step back".to_string()),
            modifications: Some(vec!["use a block".to_string()]),
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.duration_secs, 45);
    assert_eq!(updated.side, "left");
    assert_eq!(updated.cues, "");
    assert_eq!(updated.transition.as_deref(), Some("step back"));
    assert_eq!(updated.modifications, vec!["use a block".to_string()]);
    // Position untouched by field updates.
    assert_eq!(updated.position, 0);
}

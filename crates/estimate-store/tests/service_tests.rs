use estimate_core::{
    generate_session_code_with, EstimationFactors, FactorError, ParticipantId, TaskStatus,
    VoteSummary,
};
use estimate_store::{
    EstimationService, MemoryStore, RecordStore, ServiceConfig, ServiceError, StoreError,
};
use estimate_test_utils::{legacy_vote, neutral_factors, sample_factors};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

fn service() -> EstimationService<MemoryStore> {
    EstimationService::new(Arc::new(MemoryStore::new()), ServiceConfig::new())
}

#[tokio::test]
async fn full_round() {
    let svc = service();
    let session = svc.create_session("Sprint 12").await.unwrap();
    let ana = svc.join(&session.code, "Ana", true).await.unwrap();
    let ben = svc.join(&session.code, "Ben", false).await.unwrap();
    let task = svc.add_task(session.id, "Checkout redesign").await.unwrap();

    svc.start_voting(task.id).await.unwrap();
    let vote = svc
        .submit_vote(task.id, ana.id, &sample_factors())
        .await
        .unwrap();
    assert_eq!(vote.value, 18);
    svc.submit_vote(task.id, ben.id, &neutral_factors())
        .await
        .unwrap();

    let summary = svc.reveal(task.id).await.unwrap();
    assert_eq!(
        summary,
        Some(VoteSummary {
            average: 11,
            min: 3,
            max: 18,
            count: 2,
        })
    );

    let done = svc.finalize_task(task.id, 11, 0.2, 2.0).await.unwrap();
    assert_eq!(done.status, TaskStatus::Completed);
    assert_eq!(done.total_points(), Some(26));

    let stored = svc.store().task(task.id).await.unwrap();
    assert_eq!(stored.final_estimate, Some(11));
}

#[tokio::test]
async fn resubmission_replaces_vote() {
    let svc = service();
    let session = svc.create_session("Upsert").await.unwrap();
    let ana = svc.join(&session.code, "Ana", false).await.unwrap();
    let task = svc.add_task(session.id, "Settings page").await.unwrap();
    svc.start_voting(task.id).await.unwrap();

    let first = svc
        .submit_vote(task.id, ana.id, &neutral_factors())
        .await
        .unwrap();
    let second = svc
        .submit_vote(task.id, ana.id, &sample_factors())
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    let votes = svc.store().votes(task.id).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].value, 18);
}

#[tokio::test]
async fn incomplete_factors_rejected_at_submission() {
    let svc = service();
    let session = svc.create_session("Validation").await.unwrap();
    let ana = svc.join(&session.code, "Ana", false).await.unwrap();
    let task = svc.add_task(session.id, "Profile").await.unwrap();
    svc.start_voting(task.id).await.unwrap();

    let mut partial = sample_factors();
    partial.designer_levels.clear();
    let err = svc.submit_vote(task.id, ana.id, &partial).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidFactors(FactorError::DesignerLevelMismatch { .. })
    ));

    let err = svc
        .submit_vote(task.id, ana.id, &EstimationFactors::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidFactors(_)));
}

#[tokio::test]
async fn votes_only_while_voting() {
    let svc = service();
    let session = svc.create_session("Status").await.unwrap();
    let ana = svc.join(&session.code, "Ana", false).await.unwrap();
    let task = svc.add_task(session.id, "Search").await.unwrap();

    let err = svc
        .submit_vote(task.id, ana.id, &sample_factors())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotVoting {
            status: TaskStatus::Pending,
            ..
        }
    ));
}

#[tokio::test]
async fn strangers_cannot_vote() {
    let svc = service();
    let session = svc.create_session("Closed").await.unwrap();
    let task = svc.add_task(session.id, "Search").await.unwrap();
    svc.start_voting(task.id).await.unwrap();

    let err = svc
        .submit_vote(task.id, ParticipantId::new(), &sample_factors())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::UnknownParticipant { .. }));
}

#[tokio::test]
async fn reveal_tolerates_legacy_and_raw_votes() {
    let svc = service();
    let session = svc.create_session("History").await.unwrap();
    let task = svc.add_task(session.id, "Legacy import").await.unwrap();
    svc.start_voting(task.id).await.unwrap();

    svc.store()
        .upsert_vote(legacy_vote(task.id, 1))
        .await
        .unwrap();
    svc.store()
        .upsert_vote(estimate_test_utils::raw_vote(task.id, 20))
        .await
        .unwrap();

    let summary = svc.reveal(task.id).await.unwrap().unwrap();
    assert_eq!((summary.min, summary.max, summary.average), (10, 20, 15));
    // second reveal is a pure recompute
    assert_eq!(svc.reveal(task.id).await.unwrap(), Some(summary));
}

#[tokio::test]
async fn reset_reopens_voting() {
    let svc = service();
    let session = svc.create_session("Revote").await.unwrap();
    let ana = svc.join(&session.code, "Ana", false).await.unwrap();
    let task = svc.add_task(session.id, "Dashboard").await.unwrap();
    svc.start_voting(task.id).await.unwrap();
    svc.submit_vote(task.id, ana.id, &sample_factors())
        .await
        .unwrap();
    svc.reveal(task.id).await.unwrap();

    assert_eq!(svc.reset_votes(task.id).await.unwrap(), 1);
    let task = svc.store().task(task.id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Voting);
    assert_eq!(svc.reveal(task.id).await.unwrap(), None);
}

#[tokio::test]
async fn completed_tasks_are_final() {
    let svc = service();
    let session = svc.create_session("Final").await.unwrap();
    let task = svc.add_task(session.id, "Nav").await.unwrap();
    svc.start_voting(task.id).await.unwrap();
    svc.finalize_task(task.id, 5, 0.0, 1.0).await.unwrap();

    let err = svc.start_voting(task.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Store(StoreError::IllegalTransition { .. })
    ));
}

#[tokio::test]
async fn finalize_rejects_bad_adjustments() {
    let svc = service();
    let session = svc.create_session("Adjust").await.unwrap();
    let task = svc.add_task(session.id, "Nav").await.unwrap();
    svc.start_voting(task.id).await.unwrap();

    let err = svc
        .finalize_task(task.id, 5, f64::NAN, 1.0)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidAdjustment(_)));

    let task = svc.store().task(task.id).await.unwrap();
    assert_eq!(task.status, TaskStatus::Voting);
}

#[tokio::test]
async fn session_code_collisions_are_retried() {
    let store = Arc::new(MemoryStore::new());
    let svc = EstimationService::new(Arc::clone(&store), ServiceConfig::new());

    // Occupy the first code a seed-9 RNG will draw
    let taken = generate_session_code_with(&mut StdRng::seed_from_u64(9));
    svc.create_session_with_rng("First", &mut StdRng::seed_from_u64(9))
        .await
        .unwrap();

    let second = svc
        .create_session_with_rng("Second", &mut StdRng::seed_from_u64(9))
        .await
        .unwrap();
    assert_ne!(second.code, taken);
    assert!(store.session_by_code(&taken).await.unwrap().is_some());
}

#[tokio::test]
async fn session_code_attempts_are_bounded() {
    let store = Arc::new(MemoryStore::new());
    let svc = EstimationService::new(
        Arc::clone(&store),
        ServiceConfig::new().with_max_code_attempts(1),
    );

    svc.create_session_with_rng("First", &mut StdRng::seed_from_u64(3))
        .await
        .unwrap();
    let err = svc
        .create_session_with_rng("Second", &mut StdRng::seed_from_u64(3))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::CodeSpaceExhausted { attempts: 1 }
    ));
}

#[tokio::test]
async fn writes_racing_a_reveal_are_counted_next_time() {
    let svc = service();
    let session = svc.create_session("Late").await.unwrap();
    let ana = svc.join(&session.code, "Ana", false).await.unwrap();
    let task = svc.add_task(session.id, "Search").await.unwrap();
    svc.start_voting(task.id).await.unwrap();
    svc.submit_vote(task.id, ana.id, &neutral_factors())
        .await
        .unwrap();
    svc.reveal(task.id).await.unwrap();

    let err = svc
        .submit_vote(task.id, ana.id, &sample_factors())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::NotVoting {
            status: TaskStatus::VotingCompleted,
            ..
        }
    ));

    // A write that passed the status check before the reveal still lands
    svc.store()
        .upsert_vote(estimate_test_utils::raw_vote(task.id, 9))
        .await
        .unwrap();
    let summary = svc.reveal(task.id).await.unwrap().unwrap();
    assert_eq!((summary.count, summary.min, summary.max), (2, 3, 9));
}

mod common;

use std::time::Duration;

use audition::{
    ActorStatus, CreateActorOptions, Error, IdMatcher, WaitOptions, create_actor, run_until_spawn,
    run_until_spawn_with, wait_for_spawn,
};
use common::{idle, spawner, staged};

#[tokio::test]
async fn resolves_with_a_handle_to_the_spawned_actor() {
    let actor = create_actor(spawner(), CreateActorOptions::default());

    let child = run_until_spawn(&actor, "test-actor").await.unwrap();
    assert_eq!(child.id().name(), "test-actor");

    // run-until semantics: the root is torn down right after the match.
    let status = actor.snapshot().status;
    assert!(
        matches!(status, ActorStatus::Stopped | ActorStatus::Done),
        "root should be finished, got {status}"
    );
}

#[tokio::test]
async fn matches_ids_by_predicate() {
    let actor = create_actor(spawner(), CreateActorOptions::default());

    let child = wait_for_spawn(&actor, IdMatcher::matching(|id| id.starts_with("test-")))
        .await
        .unwrap();
    assert_eq!(child.id().name(), "test-actor");
    assert_eq!(actor.snapshot().status, ActorStatus::Running);
    actor.stop();
}

#[tokio::test]
async fn rejects_when_the_actor_completes_without_spawning() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    match run_until_spawn(&actor, "test-actor").await {
        Err(Error::Unmatched { message }) => {
            assert_eq!(
                message,
                "Actor completed before spawning actor matching test-actor"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn rejects_with_timeout_when_no_spawn_happens_in_time() {
    let actor = create_actor(idle(), CreateActorOptions::default());

    let result = run_until_spawn_with(
        &actor,
        WaitOptions::default().with_timeout(Duration::from_millis(30)),
        "test-actor",
    )
    .await;
    match result {
        Err(Error::Timeout { message }) => {
            assert_eq!(
                message,
                "Failed to detect a spawned actor matching test-actor in 30ms"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

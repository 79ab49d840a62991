mod common;

use std::time::Duration;

use audition::{
    ActorStatus, CreateActorOptions, Error, WaitOptions, create_actor, run_until_transition,
    run_until_transition_with, wait_for_transition,
};
use common::staged;

#[tokio::test]
async fn resolves_on_the_direct_transition() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    run_until_transition(&actor, "first", "second").await.unwrap();
}

#[tokio::test]
async fn rejects_when_the_direct_transition_never_occurs() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    // The machine reaches "third", but only ever via "second".
    match run_until_transition(&actor, "first", "third").await {
        Err(Error::Unmatched { message }) => {
            assert_eq!(
                message,
                "Transition from first to third not detected before actor completion"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn unknown_state_ids_fail_before_starting_the_actor() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    match run_until_transition(&actor, "first", "fourth").await {
        Err(Error::UnknownStateId(id)) => assert_eq!(id, "fourth"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(actor.snapshot().status, ActorStatus::Idle);
}

#[tokio::test]
async fn rejects_with_timeout_when_the_machine_is_too_slow() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    let result = run_until_transition_with(
        &actor,
        WaitOptions::default().with_timeout(Duration::from_millis(30)),
        "second",
        "third",
    )
    .await;
    match result {
        Err(Error::Timeout { message }) => {
            assert_eq!(message, "Transition from second to third not detected in 30ms");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn wait_for_leaves_the_actor_running() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    wait_for_transition(&actor, "first", "second").await.unwrap();
    assert_eq!(actor.snapshot().status, ActorStatus::Running);
    actor.stop();
}

mod common;

use std::time::Duration;

use audition::{
    ActorStatus, CreateActorOptions, Error, WaitOptions, create_actor, run_until_emitted,
    run_until_emitted_with, wait_for_emitted,
};
use common::{TestEvent, emitter, half_emitter, idle};

#[tokio::test]
async fn resolves_with_events_emitted_synchronously_on_entry() {
    let actor = create_actor(emitter(), CreateActorOptions::default());

    let events = run_until_emitted(&actor, &["EMIT1", "EMIT2"]).await.unwrap();
    assert_eq!(events, vec![TestEvent::Emit1, TestEvent::Emit2]);
    assert_eq!(actor.snapshot().status, ActorStatus::Stopped);
}

#[tokio::test]
async fn non_matching_events_do_not_advance_the_queue() {
    let actor = create_actor(emitter(), CreateActorOptions::default());

    // EMIT1 arrives while EMIT2 is the front of the queue: dropped, so the
    // condition can only time out.
    let result = run_until_emitted_with(
        &actor,
        WaitOptions::default().with_timeout(Duration::from_millis(30)),
        &["EMIT2", "EMIT1"],
    )
    .await;
    match result {
        Err(Error::Timeout { message }) => assert_eq!(message, "Event not emitted in 30ms"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn rejects_when_the_actor_completes_with_unmet_expectations() {
    let actor = create_actor(half_emitter(), CreateActorOptions::default());

    match run_until_emitted(&actor, &["EMIT1", "EMIT2"]).await {
        Err(Error::Unmatched { message }) => {
            assert_eq!(
                message,
                "Event(s) not emitted before actor completed: EMIT2"
            );
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn empty_expectation_fails_before_starting_the_actor() {
    let actor = create_actor(emitter(), CreateActorOptions::default());

    let result = run_until_emitted(&actor, &[]).await;
    assert!(matches!(result, Err(Error::EmptyExpectation)));
    assert_eq!(actor.snapshot().status, ActorStatus::Idle);
}

#[tokio::test]
async fn wait_for_leaves_the_actor_running() {
    let actor = create_actor(emitter(), CreateActorOptions::default());

    let events = wait_for_emitted(&actor, &["EMIT1"]).await.unwrap();
    assert_eq!(events, vec![TestEvent::Emit1]);
    assert_eq!(actor.snapshot().status, ActorStatus::Running);
    actor.stop();
}

#[tokio::test]
async fn times_out_when_nothing_is_emitted() {
    let quiet = create_actor(idle(), CreateActorOptions::default());

    let result = run_until_emitted_with(
        &quiet,
        WaitOptions::default().with_timeout(Duration::from_millis(30)),
        &["EMIT1"],
    )
    .await;
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

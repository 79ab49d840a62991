mod common;

use std::time::{Duration, Instant};

use audition::{
    Actor, CreateActorOptions, Error, WaitOptions, create_actor, from_async, run_until_done,
    run_until_done_with,
};
use common::{TestEvent, greeting, staged};

#[tokio::test]
async fn resolves_with_the_actor_output() {
    let actor: Actor<TestEvent, String> =
        create_actor(greeting("world"), CreateActorOptions::default());

    let output = run_until_done(&actor).await.unwrap();
    assert_eq!(output.as_deref(), Some("hello world"));
}

#[tokio::test]
async fn rejects_after_the_configured_timeout() {
    let actor: Actor<TestEvent, String> =
        create_actor(greeting("world"), CreateActorOptions::default());

    let started = Instant::now();
    let result = run_until_done_with(
        &actor,
        WaitOptions::default().with_timeout(Duration::from_millis(10)),
    )
    .await;
    let elapsed = started.elapsed();

    match result {
        Err(Error::Timeout { message }) => {
            assert_eq!(message, "Actor did not complete in 10ms")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(elapsed >= Duration::from_millis(10));
    assert!(elapsed < Duration::from_millis(500), "deadline fired late: {elapsed:?}");
}

#[tokio::test]
async fn resolves_none_when_the_actor_is_stopped_first() {
    let actor: Actor<TestEvent, String> =
        create_actor(greeting("world"), CreateActorOptions::default());

    let stopper = actor.actor_ref();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        stopper.stop();
    });

    let output = run_until_done(&actor).await.unwrap();
    assert_eq!(output, None);
}

#[tokio::test]
async fn propagates_an_underlying_actor_failure() {
    let actor: Actor<TestEvent, ()> = create_actor(
        from_async(async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(Error::External("boom".into()))
        }),
        CreateActorOptions::default(),
    );

    match run_until_done(&actor).await {
        Err(Error::ActorFailed(cause)) => assert_eq!(cause.to_string(), "boom"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn machine_without_output_resolves_none_via_snapshot_status() {
    let actor = create_actor(staged(), CreateActorOptions::default());

    // AnyOutput-typed machines report completion through their snapshot.
    let output = run_until_done(&actor).await.unwrap();
    assert!(output.is_none());
    assert_eq!(
        actor.snapshot().status,
        audition::ActorStatus::Done
    );
}

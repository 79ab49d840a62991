mod common;

use std::time::Duration;

use audition::{
    Actor, ActorStatus, CreateActorOptions, Machine, State, create_actor, wait_for_spawn,
};
use common::{TestEvent, greeting, spawner};

#[tokio::test]
async fn promise_actor_completes_with_typed_output() {
    let actor: Actor<TestEvent, String> =
        create_actor(greeting("runtime"), CreateActorOptions::default());
    actor.start();

    let output = actor.completion().await.unwrap();
    assert!(output.is_some());
    assert_eq!(actor.output().as_deref(), Some("hello runtime"));
    assert_eq!(actor.snapshot().status, ActorStatus::Done);
}

#[tokio::test]
async fn machine_transitions_on_delivered_events() {
    let machine: Machine<TestEvent> = Machine::new("waiting")
        .state(State::new("waiting").on("PING", "ponged"))
        .state(State::new("ponged").terminal());
    let actor = create_actor(machine, CreateActorOptions::default());
    actor.start();

    actor.send(TestEvent::Ping).await.unwrap();
    actor.completion().await.unwrap();
    assert_eq!(actor.snapshot().status, ActorStatus::Done);
    assert_eq!(actor.snapshot().state_id(), Some("ponged"));
}

#[tokio::test]
async fn actors_do_not_run_before_start() {
    let actor = create_actor(spawner(), CreateActorOptions::default());
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert_eq!(actor.snapshot().status, ActorStatus::Idle);
    actor.stop();
}

#[tokio::test]
async fn stopping_a_parent_cascades_to_children() {
    let actor = create_actor(spawner(), CreateActorOptions::default());
    let child = wait_for_spawn(&actor, "test-actor").await.unwrap();

    actor.stop();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(child.snapshot().status, ActorStatus::Stopped);
}

#[tokio::test]
async fn anonymous_actors_get_counted_fallback_ids() {
    let machine: Machine<TestEvent> = Machine::new("spawning")
        .state(State::new("spawning").spawn(None, common::idle));
    let actor = create_actor(machine, CreateActorOptions::default());
    assert_eq!(actor.id().name(), "actor-0");

    let child = wait_for_spawn(&actor, audition::IdMatcher::matching(|id| id == "actor-1"))
        .await
        .unwrap();
    assert_eq!(child.id().name(), "actor-1");
    actor.stop();
}

#[tokio::test]
async fn sending_events_keeps_working_while_a_condition_is_pending() {
    let machine: Machine<TestEvent> = Machine::new("a")
        .state(State::new("a").on("PING", "b"))
        .state(State::new("b").emit(TestEvent::Emit1).terminal());
    let actor = create_actor(machine, CreateActorOptions::default());
    let mailbox = actor.actor_ref();

    let (events, _) = tokio::join!(audition::run_until_emitted(&actor, &["EMIT1"]), async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        mailbox.send(TestEvent::Ping).await.unwrap();
    });
    assert_eq!(events.unwrap(), vec![TestEvent::Emit1]);
}

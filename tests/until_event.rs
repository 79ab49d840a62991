mod common;

use std::time::Duration;

use audition::{
    CreateActorOptions, Error, WaitOptions, create_actor, run_until_event_received,
    run_until_event_received_with, run_until_event_sent, run_until_event_sent_with,
    wait_for_event_received_with,
};
use common::{TestEvent, idle, parent_with_replier, sender};

#[tokio::test]
async fn received_resolves_with_delivered_events_in_order() {
    let actor = create_actor(idle(), CreateActorOptions::default());
    let mailbox = actor.actor_ref();

    let (events, _) = tokio::join!(
        run_until_event_received(&actor, &["PING", "PONG"]),
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            mailbox.send(TestEvent::Ping).await.unwrap();
            mailbox.send(TestEvent::Pong).await.unwrap();
        }
    );
    assert_eq!(events.unwrap(), vec![TestEvent::Ping, TestEvent::Pong]);
}

#[tokio::test]
async fn received_drops_out_of_order_events_then_matches_in_order() {
    let actor = create_actor(idle(), CreateActorOptions::default());
    let mailbox = actor.actor_ref();

    // PONG before PING: the front of the queue is PING, so the early PONG
    // is dropped and the next PING/PONG pair resolves in order.
    let (events, _) = tokio::join!(
        run_until_event_received(&actor, &["PING", "PONG"]),
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            mailbox.send(TestEvent::Pong).await.unwrap();
            mailbox.send(TestEvent::Ping).await.unwrap();
            mailbox.send(TestEvent::Pong).await.unwrap();
        }
    );
    assert_eq!(events.unwrap(), vec![TestEvent::Ping, TestEvent::Pong]);
}

#[tokio::test]
async fn received_times_out_when_the_sequence_never_completes() {
    let actor = create_actor(idle(), CreateActorOptions::default());
    let mailbox = actor.actor_ref();

    let (result, _) = tokio::join!(
        run_until_event_received_with(
            &actor,
            WaitOptions::default().with_timeout(Duration::from_millis(40)),
            &["PING", "PONG"],
        ),
        async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            mailbox.send(TestEvent::Pong).await.unwrap();
        }
    );
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

#[tokio::test]
async fn received_filters_by_sender_identity() {
    let actor = create_actor(
        parent_with_replier(),
        CreateActorOptions::default().with_id("parent"),
    );

    let events = run_until_event_received_with(
        &actor,
        WaitOptions::default().with_other_actor("replier"),
        &["PONG"],
    )
    .await
    .unwrap();
    assert_eq!(events, vec![TestEvent::Pong]);
}

#[tokio::test]
async fn received_ignores_events_from_the_wrong_sender() {
    let actor = create_actor(
        parent_with_replier(),
        CreateActorOptions::default().with_id("parent"),
    );

    let result = wait_for_event_received_with(
        &actor,
        WaitOptions::default()
            .with_other_actor("impostor")
            .with_timeout(Duration::from_millis(40)),
        &["PONG"],
    )
    .await;
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

#[tokio::test]
async fn sent_resolves_when_the_actor_sends_to_another() {
    let actor = create_actor(sender(), CreateActorOptions::default());

    let events = run_until_event_sent(&actor, &["PING"]).await.unwrap();
    assert_eq!(events, vec![TestEvent::Ping]);
}

#[tokio::test]
async fn sent_filters_by_target_identity() {
    let actor = create_actor(sender(), CreateActorOptions::default());

    let events = run_until_event_sent_with(
        &actor,
        WaitOptions::default().with_other_actor("sink"),
        &["PING"],
    )
    .await
    .unwrap();
    assert_eq!(events, vec![TestEvent::Ping]);
}

#[tokio::test]
async fn sent_ignores_deliveries_to_the_wrong_target() {
    let actor = create_actor(sender(), CreateActorOptions::default());

    let result = run_until_event_sent_with(
        &actor,
        WaitOptions::default()
            .with_other_actor("elsewhere")
            .with_timeout(Duration::from_millis(40)),
        &["PING"],
    )
    .await;
    assert!(matches!(result, Err(Error::Timeout { .. })));
}

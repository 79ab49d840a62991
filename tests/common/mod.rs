#![allow(dead_code)]

use std::{borrow::Cow, time::Duration};

use audition::{Event, Label, Machine, PromiseLogic, State, from_async};

#[derive(Clone, Debug, PartialEq)]
pub enum TestEvent {
    Ping,
    Pong,
    Emit1,
    Emit2,
}

impl Event for TestEvent {}

impl Label for TestEvent {
    fn label(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            TestEvent::Ping => "PING",
            TestEvent::Pong => "PONG",
            TestEvent::Emit1 => "EMIT1",
            TestEvent::Emit2 => "EMIT2",
        })
    }
}

/// Promise-backed logic resolving to `"hello {input}"` after 100ms.
pub fn greeting(input: &str) -> PromiseLogic<TestEvent, String> {
    let input = input.to_string();
    from_async(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        Ok(format!("hello {input}"))
    })
}

/// first -> second -> third (terminal), 100ms apart.
pub fn staged() -> Machine<TestEvent> {
    Machine::new("first")
        .state(State::new("first").after(Duration::from_millis(100), "second"))
        .state(State::new("second").after(Duration::from_millis(100), "third"))
        .state(State::new("third").terminal())
}

/// Sits in one state consuming whatever is delivered.
pub fn idle() -> Machine<TestEvent> {
    Machine::new("listening").state(State::new("listening"))
}

/// Waits 50ms, spawns a child with id "test-actor", waits 50ms more, stops.
pub fn spawner() -> Machine<TestEvent> {
    Machine::new("waiting")
        .state(State::new("waiting").after(Duration::from_millis(50), "spawning"))
        .state(
            State::new("spawning")
                .spawn(Some("test-actor"), idle)
                .after(Duration::from_millis(50), "finished"),
        )
        .state(State::new("finished").terminal())
}

/// Emits EMIT1 then EMIT2 synchronously on entry, then idles.
pub fn emitter() -> Machine<TestEvent> {
    Machine::new("emitting").state(
        State::new("emitting")
            .emit(TestEvent::Emit1)
            .emit(TestEvent::Emit2),
    )
}

/// Emits EMIT1 only, then completes.
pub fn half_emitter() -> Machine<TestEvent> {
    Machine::new("emitting").state(
        State::new("emitting")
            .emit(TestEvent::Emit1)
            .after(Duration::from_millis(20), "done"),
    )
    .state(State::new("done").terminal())
}

/// Spawns a "replier" child that sends PONG back to the actor named
/// "parent", then listens.
pub fn parent_with_replier() -> Machine<TestEvent> {
    Machine::new("init").state(State::new("init").spawn(Some("replier"), replier))
}

fn replier() -> Machine<TestEvent> {
    Machine::new("reply").state(State::new("reply").send_to("parent", TestEvent::Pong))
}

/// Spawns a passive "sink" child and sends it PING.
pub fn sender() -> Machine<TestEvent> {
    Machine::new("sending").state(
        State::new("sending")
            .spawn(Some("sink"), idle)
            .send_to("sink", TestEvent::Ping),
    )
}

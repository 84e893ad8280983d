//! Common test utilities shared across integration tests.
#![allow(dead_code)]

use socialist_millionaire::{Event, EventReceiver, Message, Session, Version};

/// Initialize test tracing (call once at the beginning of tests).
///
/// Logs from the library go to the test writer at DEBUG level.
/// Subsequent calls are safe and will be ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::new("socialist_millionaire=debug");

    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(filter)
        .try_init();
}

/// A V2 session holding `secret`, with its event receiver.
pub fn session(secret: u32) -> (Session, EventReceiver) {
    let mut session = Session::new(Version::V2);
    session
        .set_secret(secret.into())
        .expect("small secrets fit the group order");
    let events = session.events().expect("fresh session has a receiver");
    (session, events)
}

/// Drains every event currently queued.
pub fn drain(events: &mut EventReceiver) -> Vec<Event> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Messages of a complete exchange between two sessions, as seen on the wire.
pub struct Transcript {
    pub smp1: Message,
    pub smp2: Message,
    pub smp3: Message,
    pub smp4: Option<Message>,
}

/// Plays an exchange until one side has nothing more to say.
pub fn run_exchange(alice: &mut Session, bob: &mut Session) -> Transcript {
    let smp1 = alice.compare().expect("initiator starts");
    let smp2 = bob
        .receive(smp1.clone())
        .expect("responder processes SMP1")
        .expect("responder replies with SMP2");
    let smp3 = alice
        .receive(smp2.clone())
        .expect("initiator processes SMP2")
        .expect("initiator replies with SMP3");
    let smp4 = bob.receive(smp3.clone()).expect("responder processes SMP3");
    if let Some(reply) = &smp4 {
        let last = alice.receive(reply.clone()).expect("initiator processes reply");
        assert!(last.is_none(), "initiator never replies to the last message");
    }
    Transcript {
        smp1,
        smp2,
        smp3,
        smp4,
    }
}

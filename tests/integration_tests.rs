mod common;

use common::{drain, init_tracing, run_exchange, session};
use socialist_millionaire::{
    tlv, Error, Event, Message, MessageKind, Session, Smp1Q, StateKind, Version,
};

#[test]
fn equal_secrets_succeed_on_both_sides() {
    init_tracing();
    let (mut alice, mut alice_events) = session(1234);
    let (mut bob, mut bob_events) = session(1234);

    let transcript = run_exchange(&mut alice, &mut bob);
    assert_eq!(transcript.smp4.map(|m| m.kind()), Some(MessageKind::Smp4));

    let alice_seen = drain(&mut alice_events);
    let bob_seen = drain(&mut bob_events);
    assert_eq!(
        alice_seen,
        vec![Event::InProgress, Event::InProgress, Event::Success]
    );
    assert_eq!(bob_seen, vec![Event::InProgress, Event::Success]);
    assert_eq!(alice.state(), StateKind::Expect1);
    assert_eq!(bob.state(), StateKind::Expect1);
}

#[test]
fn different_secrets_fail_without_cheating() {
    init_tracing();
    let (mut alice, mut alice_events) = session(1);
    let (mut bob, mut bob_events) = session(2);

    let transcript = run_exchange(&mut alice, &mut bob);
    assert_eq!(transcript.smp4, Some(Message::Abort));

    let alice_seen = drain(&mut alice_events);
    let bob_seen = drain(&mut bob_events);
    assert_eq!(bob_seen.last(), Some(&Event::Failure));
    assert_eq!(alice_seen.last(), Some(&Event::Abort));
    assert!(!alice_seen.contains(&Event::Success));
    assert!(!alice_seen.contains(&Event::Cheated));
    assert!(!bob_seen.contains(&Event::Cheated));
    assert_eq!(alice.state(), StateKind::Expect1);
    assert_eq!(bob.state(), StateKind::Expect1);
}

#[test]
fn v3_exchange_succeeds() {
    let mut alice = Session::new(Version::V3);
    let mut bob = Session::new(Version::V3);
    let secret = Version::V3.parameter_length() as u32;
    alice.set_secret(secret.into()).unwrap();
    bob.set_secret(secret.into()).unwrap();
    let mut events = bob.events().unwrap();

    run_exchange(&mut alice, &mut bob);
    assert_eq!(drain(&mut events).last(), Some(&Event::Success));
}

#[test]
fn zero_secret_is_a_valid_secret() {
    let (mut alice, _) = session(0);
    let (mut bob, mut events) = session(0);
    run_exchange(&mut alice, &mut bob);
    assert_eq!(drain(&mut events).last(), Some(&Event::Success));
}

#[test]
fn sessions_are_reusable_after_completion() {
    let (mut alice, mut alice_events) = session(9);
    let (mut bob, _) = session(9);

    run_exchange(&mut alice, &mut bob);
    run_exchange(&mut alice, &mut bob);
    let successes = drain(&mut alice_events)
        .into_iter()
        .filter(|e| *e == Event::Success)
        .count();
    assert_eq!(successes, 2);
}

#[test]
fn roles_can_swap_between_exchanges() {
    let (mut alice, _) = session(77);
    let (mut bob, mut bob_events) = session(77);

    run_exchange(&mut alice, &mut bob);
    run_exchange(&mut bob, &mut alice);
    let successes = drain(&mut bob_events)
        .into_iter()
        .filter(|e| *e == Event::Success)
        .count();
    assert_eq!(successes, 2);
}

#[test]
fn question_reaches_the_responder() {
    let (mut alice, _) = session(3);
    let (mut bob, mut bob_events) = session(3);
    alice.set_question(Some("name of our first server?".into()));

    let smp1 = alice.compare().unwrap();
    let question = match &smp1 {
        Message::Smp1Q(q) => q.question().to_string(),
        other => panic!("expected SMP1Q, got {}", other.kind()),
    };
    assert_eq!(question, "name of our first server?");

    let smp2 = bob.receive(smp1).unwrap().unwrap();
    let smp3 = alice.receive(smp2).unwrap().unwrap();
    let smp4 = bob.receive(smp3).unwrap().unwrap();
    assert!(alice.receive(smp4).unwrap().is_none());
    assert_eq!(drain(&mut bob_events).last(), Some(&Event::Success));
}

#[test]
fn exchange_survives_tlv_encoding() {
    let (mut alice, mut alice_events) = session(55);
    let (mut bob, _) = session(55);
    alice.set_question(Some("q".into()));

    let wire = |m: Message| tlv::decode(&tlv::encode(&m).unwrap()).unwrap();

    let smp1 = wire(alice.compare().unwrap());
    assert!(matches!(smp1, Message::Smp1Q(_)));
    let smp2 = wire(bob.receive(smp1).unwrap().unwrap());
    let smp3 = wire(alice.receive(smp2).unwrap().unwrap());
    let smp4 = wire(bob.receive(smp3).unwrap().unwrap());
    alice.receive(smp4).unwrap();

    assert_eq!(drain(&mut alice_events).last(), Some(&Event::Success));
}

#[test]
fn abort_from_every_state_resets() {
    let (mut alice, _) = session(4);
    let (mut bob, mut bob_events) = session(4);

    // Expect1
    assert_eq!(bob.receive(Message::Abort).unwrap(), None);
    assert_eq!(bob.state(), StateKind::Expect1);

    // Expect2
    let smp1 = alice.compare().unwrap();
    assert_eq!(alice.state(), StateKind::Expect2);
    assert_eq!(alice.receive(Message::Abort).unwrap(), None);
    assert_eq!(alice.state(), StateKind::Expect1);

    // Expect3
    let smp1_again = alice.compare().unwrap();
    drop(smp1);
    bob.receive(smp1_again).unwrap();
    assert_eq!(bob.state(), StateKind::Expect3);
    assert_eq!(bob.receive(Message::Abort).unwrap(), None);
    assert_eq!(bob.state(), StateKind::Expect1);

    // Expect4
    let (mut carol, _) = session(4);
    let (mut dave, _) = session(4);
    let smp1 = carol.compare().unwrap();
    let smp2 = dave.receive(smp1).unwrap().unwrap();
    carol.receive(smp2).unwrap();
    assert_eq!(carol.state(), StateKind::Expect4);
    assert_eq!(carol.receive(Message::Abort).unwrap(), None);
    assert_eq!(carol.state(), StateKind::Expect1);

    // Twice in a row is harmless.
    assert_eq!(carol.receive(Message::Abort).unwrap(), None);

    let seen = drain(&mut bob_events);
    assert_eq!(seen.iter().filter(|e| **e == Event::Abort).count(), 2);
}

#[test]
fn local_abort_tells_the_peer() {
    let (mut alice, mut alice_events) = session(8);
    let (mut bob, mut bob_events) = session(8);

    let smp1 = alice.compare().unwrap();
    bob.receive(smp1).unwrap();

    let abort = bob.abort();
    assert_eq!(abort, Message::Abort);
    assert_eq!(alice.receive(abort).unwrap(), None);

    assert_eq!(drain(&mut bob_events).last(), Some(&Event::Abort));
    assert_eq!(drain(&mut alice_events).last(), Some(&Event::Abort));
}

#[test]
fn compare_while_running_keeps_the_exchange() {
    let (mut alice, _) = session(5);
    let (mut bob, mut bob_events) = session(5);

    let smp1 = alice.compare().unwrap();
    assert!(matches!(alice.compare(), Err(Error::AlreadyInProgress)));

    let smp2 = bob.receive(smp1).unwrap().unwrap();
    let smp3 = alice.receive(smp2).unwrap().unwrap();
    let smp4 = bob.receive(smp3).unwrap().unwrap();
    alice.receive(smp4).unwrap();
    assert_eq!(drain(&mut bob_events).last(), Some(&Event::Success));
}

#[test]
fn responder_can_set_secret_after_first_message() {
    let (mut alice, _) = session(6);
    let mut bob = Session::new(Version::V2);
    let mut bob_events = bob.events().unwrap();

    let smp1 = alice.compare().unwrap();
    assert!(matches!(
        bob.receive(smp1.clone()),
        Err(Error::MissingSecret)
    ));
    assert_eq!(bob.state(), StateKind::Expect1);

    bob.set_secret(6u32.into()).unwrap();
    let smp2 = bob.receive(smp1).unwrap().unwrap();
    let smp3 = alice.receive(smp2).unwrap().unwrap();
    let smp4 = bob.receive(smp3).unwrap().unwrap();
    alice.receive(smp4).unwrap();

    assert_eq!(
        drain(&mut bob_events),
        vec![Event::Failure, Event::InProgress, Event::Success]
    );
}

#[test]
fn smp1q_body_matches_plain_smp1() {
    let (mut alice, _) = session(1);
    let smp1 = match alice.compare().unwrap() {
        Message::Smp1(m) => m,
        other => panic!("expected SMP1, got {}", other.kind()),
    };
    let wrapped = Smp1Q::new("?", smp1.clone());
    assert_eq!(wrapped.to_mpis(), smp1.to_mpis());
}

#[test]
fn question_with_nul_is_refused_on_the_wire() {
    let (mut alice, _) = session(2);
    alice.set_question(Some("a\0b".into()));

    let smp1 = alice.compare().unwrap();
    assert!(matches!(tlv::encode(&smp1), Err(Error::MalformedTlv(_))));
}

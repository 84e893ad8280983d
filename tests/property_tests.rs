mod common;

use common::{drain, run_exchange, session};
use num_bigint::BigUint;
use proptest::prelude::*;
use socialist_millionaire::{
    derive_secret, tlv, Event, Message, MessageKind, Smp1, Smp2, Smp3, Smp4,
};

fn mpi() -> impl Strategy<Value = BigUint> {
    prop::collection::vec(any::<u8>(), 0..200).prop_map(|bytes| BigUint::from_bytes_be(&bytes))
}

fn mpis(n: usize) -> impl Strategy<Value = Vec<BigUint>> {
    prop::collection::vec(mpi(), n)
}

fn plain(kind: MessageKind, n: usize) -> impl Strategy<Value = Message> {
    mpis(n).prop_map(move |m| Message::from_mpis(kind, None, &m).unwrap())
}

fn message() -> impl Strategy<Value = Message> {
    prop_oneof![
        plain(MessageKind::Smp1, Smp1::MPI_COUNT),
        ("[^\\x00]{0,40}", mpis(Smp1::MPI_COUNT)).prop_map(|(q, m)| {
            Message::from_mpis(MessageKind::Smp1Q, Some(&q), &m).unwrap()
        }),
        plain(MessageKind::Smp2, Smp2::MPI_COUNT),
        plain(MessageKind::Smp3, Smp3::MPI_COUNT),
        plain(MessageKind::Smp4, Smp4::MPI_COUNT),
        Just(Message::Abort),
    ]
}

proptest! {
    #[test]
    fn tlv_preserves_every_message(msg in message()) {
        let encoded = tlv::encode(&msg).unwrap();
        prop_assert_eq!(tlv::decode(&encoded).unwrap(), msg);
    }

    #[test]
    fn question_with_nul_never_encodes(
        head in "[^\\x00]{0,20}",
        tail in "[^\\x00]{0,20}",
        m in mpis(Smp1::MPI_COUNT),
    ) {
        let question = format!("{head}\0{tail}");
        let msg = Message::from_mpis(MessageKind::Smp1Q, Some(&question), &m).unwrap();
        prop_assert!(tlv::encode(&msg).is_err());
    }

    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = tlv::decode(&bytes);
    }

    #[test]
    fn wrong_integer_count_is_rejected(n in 0usize..16) {
        prop_assume!(n != Smp3::MPI_COUNT);
        let values = vec![BigUint::from(2u32); n];
        prop_assert!(Smp3::from_mpis(&values).is_err());
    }

    #[test]
    fn derived_secret_fits_group_order(
        a in prop::collection::vec(any::<u8>(), 0..64),
        b in prop::collection::vec(any::<u8>(), 0..64),
        secret in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let derived = derive_secret(&a, &b, b"ssid", &secret);
        prop_assert!(derived.bits() <= 256);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn outcome_tracks_secret_equality(x in any::<u32>(), y in any::<u32>()) {
        let (mut alice, mut alice_events) = session(x);
        let (mut bob, mut bob_events) = session(y);

        run_exchange(&mut alice, &mut bob);

        let alice_last = drain(&mut alice_events).last().copied();
        let bob_last = drain(&mut bob_events).last().copied();
        if x == y {
            prop_assert_eq!(alice_last, Some(Event::Success));
            prop_assert_eq!(bob_last, Some(Event::Success));
        } else {
            prop_assert_eq!(alice_last, Some(Event::Abort));
            prop_assert_eq!(bob_last, Some(Event::Failure));
        }
    }

    #[test]
    fn equal_secrets_always_succeed(x in any::<u32>()) {
        let (mut alice, _) = session(x);
        let (mut bob, mut bob_events) = session(x);

        run_exchange(&mut alice, &mut bob);
        prop_assert_eq!(drain(&mut bob_events).last().copied(), Some(Event::Success));
    }
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use socialist_millionaire::{Message, MessageKind, Session, Version};

const KINDS: [MessageKind; 6] = [
    MessageKind::Smp1,
    MessageKind::Smp1Q,
    MessageKind::Smp2,
    MessageKind::Smp3,
    MessageKind::Smp4,
    MessageKind::Abort,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, rest)) = data.split_first() else {
        return;
    };
    let kind = KINDS[selector as usize % KINDS.len()];
    let mpis: Vec<BigUint> = rest.chunks(24).map(BigUint::from_bytes_be).collect();

    if let Ok(message) = Message::from_mpis(kind, Some("q"), &mpis) {
        if kind != MessageKind::Abort {
            assert_eq!(message.to_mpis(), mpis);
        }

        let mut session = Session::new(Version::V2);
        session.set_secret(1u32.into()).unwrap();
        let _ = session.receive(message);
    }
});

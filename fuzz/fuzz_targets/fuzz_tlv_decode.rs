#![no_main]

use libfuzzer_sys::fuzz_target;
use socialist_millionaire::tlv;

fuzz_target!(|data: &[u8]| {
    if let Ok(message) = tlv::decode(data) {
        let encoded = tlv::encode(&message).unwrap();
        assert_eq!(tlv::decode(&encoded).unwrap(), message);
    }
});

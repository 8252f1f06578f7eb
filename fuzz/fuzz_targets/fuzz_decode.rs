#![no_main]

use libfuzzer_sys::fuzz_target;
use msgit_embed_format::{from_bytes, to_bytes};

fuzz_target!(|data: &[u8]| {
    // Anything that decodes must re-encode to a prefix of the input.
    if let Ok(records) = from_bytes(data) {
        let bytes = to_bytes(&records).expect("decoded records re-encode");
        assert_eq!(&bytes[24..], &data[24..bytes.len()]);
    }
});

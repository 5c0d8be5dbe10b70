#![no_main]

use libfuzzer_sys::fuzz_target;
use zktx_codec::messages::{Counter, QueryCountersResponse, QueryParamsResponse};
use zktx_codec::Message;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic; anything that decodes must
    // re-encode to exactly its computed size and decode back to itself
    if let Ok(msg) = QueryCountersResponse::decode(data) {
        let bytes = msg.encode_to_vec().expect("decoded message must encode");
        assert_eq!(bytes.len(), msg.encoded_len());
        assert_eq!(QueryCountersResponse::decode(&bytes).ok(), Some(msg));
    }
    let _ = Counter::decode(data);
    let _ = QueryParamsResponse::decode(data);
});

#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use tokio_util::codec::Decoder;
use zktx_codec::messages::Counter;
use zktx_codec::DelimitedCodec;

fuzz_target!(|data: &[u8]| {
    // Drain a buffer of arbitrary frames until it errors or runs dry
    let mut codec = DelimitedCodec::<Counter>::new();
    let mut buf = BytesMut::from(data);
    while let Ok(Some(_)) = codec.decode(&mut buf) {}
});

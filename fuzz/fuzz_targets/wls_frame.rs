#![no_main]

use arbitrary::Arbitrary;
use fieldlog_analyzer::wls::{WlsProtocol, parse_payload_bytes};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct FrameInput<'a> {
    payload: &'a str,
    raw: Vec<u8>,
    relaxed_offset: Option<u8>,
}

fuzz_target!(|input: FrameInput<'_>| {
    let protocol = match input.relaxed_offset {
        Some(offset) => WlsProtocol::relaxed(offset as usize),
        None => WlsProtocol::standard(),
    };

    // 텍스트 페이로드와 원시 바이트 모두 패닉 없이 검증되어야 한다
    if let Some(bytes) = parse_payload_bytes(input.payload) {
        assert!(!bytes.is_empty());
        let _ = protocol.decode(&bytes);
    }

    if let Ok(value) = protocol.decode(&input.raw)
        && input.relaxed_offset.is_none()
    {
        assert_eq!(input.raw.len(), 11);
        assert_eq!(u16::from_be_bytes([input.raw[4], input.raw[5]]), value);
    }
});

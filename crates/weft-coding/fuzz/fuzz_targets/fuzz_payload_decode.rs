#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use weft_coding::feedback::FeedbackMessage;
use weft_coding::wire::Payload;

/// Fuzz the wire-format parsers with arbitrary bytes.
///
/// This target exercises:
/// - Payload::decode across several generation shapes
/// - FeedbackMessage::decode (rank + decoded bitmap)
/// - re-encode stability: decode → encode → decode is a fixed point
///
/// The parsers must never panic; short or malformed input yields `None`.
fuzz_target!(|data: &[u8]| {
    for (symbols, symbol_size) in [(1, 1), (8, 16), (32, 1200), (130, 7)] {
        let mut buf = data;
        if let Some(payload) = Payload::decode(&mut buf, symbols, symbol_size) {
            let mut encoded = BytesMut::new();
            payload.encode(&mut encoded);
            let back = Payload::decode(&mut &encoded[..], symbols, symbol_size)
                .expect("re-decode of an encoded payload");
            assert_eq!(back, payload);
        }

        let mut buf = data;
        if let Some(msg) = FeedbackMessage::decode(&mut buf, symbols) {
            let mut encoded = BytesMut::new();
            msg.encode(&mut encoded);
            let back = FeedbackMessage::decode(&mut &encoded[..], symbols)
                .expect("re-decode of an encoded message");
            assert_eq!(back, msg);
        }
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_coding::config::CodingConfig;
use weft_coding::encoder::{Encoder, SlidingWindowEncoder};
use weft_coding::feedback::{FeedbackMessage, FeedbackSink};

/// Fuzz window retirement with arbitrary feedback bitmaps.
///
/// This target exercises:
/// - FeedbackMessage::decode on raw bytes
/// - prefix retirement against windows in every admission state
/// - the window invariant low <= high under hostile feedback
///
/// Whatever the peer claims, the encoder must neither panic nor emit a
/// payload referencing a retired symbol.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let symbols = (data[0] as usize % 64) + 1;
    let config = CodingConfig {
        max_symbols: symbols,
        max_symbol_size: 4,
    };
    let mut enc = SlidingWindowEncoder::new(config, u64::from(data[1]));

    let admit = data[1] as usize % (symbols + 1);
    for i in 0..admit {
        enc.set_const_symbol(i, &[i as u8; 4])
            .expect("index inside the generation");
    }

    let mut rest = &data[2..];
    while let Some(msg) = FeedbackMessage::decode(&mut rest, symbols) {
        let low_before = enc.window().start;
        enc.read_feedback(&msg);
        let window = enc.window();
        assert!(window.start >= low_before, "window low went backwards");
        assert!(window.start <= window.end, "window inverted");

        let payload = enc.write_payload();
        for bit in payload.coefficients.ones() {
            assert!(bit >= window.start, "payload references a retired symbol");
        }
    }
});

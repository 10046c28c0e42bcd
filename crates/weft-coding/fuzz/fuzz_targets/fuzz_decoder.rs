#![no_main]

use libfuzzer_sys::fuzz_target;
use weft_coding::config::CodingConfig;
use weft_coding::decoder::{Decoder, FullVectorDecoder};
use weft_coding::wire::Payload;

/// Fuzz the decoder state machine with arbitrary payload bytes.
///
/// This target exercises:
/// - Payload::decode on attacker-shaped chunks
/// - echelon absorption (pivot search, elimination, back-reduction)
/// - rank bookkeeping and the copy accessors mid-decode
///
/// The decoder must never panic, whatever combination of bits arrives.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let config = CodingConfig {
        max_symbols: (data[0] as usize % 64) + 1,
        max_symbol_size: (data[1] as usize % 32) + 1,
    };
    let chunk = Payload::encoded_len(config.max_symbols, config.max_symbol_size);
    let mut dec = FullVectorDecoder::new(config);

    let mut rest = &data[2..];
    while rest.len() >= chunk {
        let (head, tail) = rest.split_at(chunk);
        if let Some(payload) =
            Payload::decode(&mut &head[..], config.max_symbols, config.max_symbol_size)
        {
            let before = dec.rank();
            dec.read_payload(payload)
                .expect("correctly sized payloads are admissible");
            assert!(dec.rank() >= before, "rank went backwards");
            assert!(dec.rank() <= config.max_symbols, "rank overflow");
        }
        rest = tail;
    }

    // Probe the accessors, including one index past the end.
    let probe = data[0] as usize % (config.max_symbols + 1);
    let _ = dec.is_symbol_uncoded(probe);
    let _ = dec.copy_from_symbol(probe);
    let _ = dec.copy_from_symbols();
});

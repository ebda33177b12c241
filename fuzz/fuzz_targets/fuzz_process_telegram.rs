#![no_main]

use libfuzzer_sys::fuzz_target;
use p1_rs::p1::{verify, TelegramAssembler};
use p1_rs::{decode_line, TelegramFrame, TelegramProcessor};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a whole frame: must never panic
    let _ = verify(data);
    let processor = TelegramProcessor::default();
    let _ = processor.process(&TelegramFrame::new(data.to_vec()));

    // Same bytes as a serial stream
    let mut assembler = TelegramAssembler::new();
    for frame in assembler.push_bytes(data) {
        let _ = processor.process(&frame);
    }

    if let Ok(text) = std::str::from_utf8(data) {
        for line in text.lines() {
            let _ = decode_line(line);
        }
    }
});

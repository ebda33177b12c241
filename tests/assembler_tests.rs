//! Tests for the streaming telegram assembler.


use p1_rs::p1::{AssemblerConfig, AssemblerState, TelegramAssembler};
use proptest::prelude::*;
use telegram_support::{telegram_bytes, FLUVIUS_LINES, MIXED_LINES};

fn feed(assembler: &mut TelegramAssembler, lines: &[&str]) -> Vec<Vec<u8>> {
    lines
        .iter()
        .filter_map(|line| assembler.push(line.as_bytes()))
        .map(|frame| frame.as_bytes().to_vec())
        .collect()
}

#[test]
fn test_single_telegram() {
    let mut assembler = TelegramAssembler::new();
    let frames = feed(&mut assembler, FLUVIUS_LINES);
    assert_eq!(frames, vec![telegram_bytes(FLUVIUS_LINES)]);
    assert_eq!(assembler.state(), AssemblerState::Idle);
    assert_eq!(assembler.stats().frames_emitted, 1);
}

#[test]
fn test_terminators_normalized() {
    let with_crlf: Vec<String> = FLUVIUS_LINES.iter().map(|l| format!("{l}\r\n")).collect();
    let with_lf: Vec<String> = FLUVIUS_LINES.iter().map(|l| format!("{l}\n")).collect();

    let mut a = TelegramAssembler::new();
    let mut b = TelegramAssembler::new();
    let from_crlf: Vec<_> = with_crlf.iter().filter_map(|l| a.push(l.as_bytes())).collect();
    let from_lf: Vec<_> = with_lf.iter().filter_map(|l| b.push(l.as_bytes())).collect();

    assert_eq!(from_crlf.len(), 1);
    assert_eq!(from_crlf, from_lf);
    assert_eq!(from_crlf[0].as_bytes(), telegram_bytes(FLUVIUS_LINES).as_slice());
}

#[test]
fn test_noise_before_first_telegram_is_ignored() {
    let mut assembler = TelegramAssembler::new();
    let mut lines = vec!["1-0:1.8.1(000000.034*kWh)", "!1234", "garbage"];
    lines.extend_from_slice(MIXED_LINES);

    let frames = feed(&mut assembler, &lines);
    assert_eq!(frames, vec![telegram_bytes(MIXED_LINES)]);
    assert_eq!(assembler.stats().chunks_ignored, 3);
}

#[test]
fn test_start_marker_restarts_telegram() {
    let mut assembler = TelegramAssembler::new();
    // Sender restarts halfway through a telegram
    let mut lines = FLUVIUS_LINES[..10].to_vec();
    lines.extend_from_slice(MIXED_LINES);

    let frames = feed(&mut assembler, &lines);
    assert_eq!(frames, vec![telegram_bytes(MIXED_LINES)]);
    assert_eq!(assembler.stats().frames_restarted, 1);
}

#[test]
fn test_back_to_back_telegrams() {
    let mut assembler = TelegramAssembler::new();
    let mut lines = MIXED_LINES.to_vec();
    lines.extend_from_slice(FLUVIUS_LINES);
    lines.extend_from_slice(MIXED_LINES);

    let frames = feed(&mut assembler, &lines);
    assert_eq!(
        frames,
        vec![
            telegram_bytes(MIXED_LINES),
            telegram_bytes(FLUVIUS_LINES),
            telegram_bytes(MIXED_LINES),
        ]
    );
}

#[test]
fn test_lines_after_end_marker_are_ignored() {
    let mut assembler = TelegramAssembler::new();
    feed(&mut assembler, MIXED_LINES);
    assert!(assembler.push(b"1-0:1.8.1(000001.000*kWh)").is_none());
    assert_eq!(assembler.state(), AssemblerState::Idle);
    assert_eq!(assembler.buffered_len(), 0);
}

#[test]
fn test_reset_drops_partial_telegram() {
    let mut assembler = TelegramAssembler::new();
    feed(&mut assembler, &FLUVIUS_LINES[..5]);
    assert_eq!(assembler.state(), AssemblerState::Accumulating);
    assert!(assembler.buffered_len() > 0);

    assembler.reset();
    assert_eq!(assembler.state(), AssemblerState::Idle);
    assert!(assembler.push(b"!D03E").is_none());
}

#[test]
fn test_single_line_telegram() {
    let mut assembler = TelegramAssembler::new();
    let frame = assembler.push(b"/X!1234").unwrap();
    assert_eq!(frame.as_bytes(), b"/X!1234\r\n");
}

#[test]
fn test_push_bytes_arbitrary_split() {
    let stream = telegram_bytes(FLUVIUS_LINES);
    let mut assembler = TelegramAssembler::new();
    let mut frames = Vec::new();
    for chunk in stream.chunks(7) {
        frames.extend(assembler.push_bytes(chunk));
    }
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].as_bytes(), stream.as_slice());
}

#[test]
fn test_push_bytes_overlong_line_drops_open_telegram() {
    let config = AssemblerConfig { max_frame_len: 256 };
    let mut assembler = TelegramAssembler::with_config(config);

    assert!(assembler.push_bytes(&telegram_bytes(&MIXED_LINES[..3])).is_empty());
    assert_eq!(assembler.state(), AssemblerState::Accumulating);

    // A line that never ends, delivered in several reads
    for _ in 0..3 {
        assert!(assembler.push_bytes(&[b'7'; 200]).is_empty());
    }
    assert_eq!(assembler.state(), AssemblerState::Idle);
    assert_eq!(assembler.buffered_len(), 0);
    assert_eq!(assembler.stats().frames_overflowed, 1);

    // The rest of the interrupted telegram, end marker included, is ignored
    let mut rest = b"\r\n".to_vec();
    rest.extend(telegram_bytes(&MIXED_LINES[3..]));
    assert!(assembler.push_bytes(&rest).is_empty());

    let frames = assembler.push_bytes(&telegram_bytes(MIXED_LINES));
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].as_bytes(), telegram_bytes(MIXED_LINES).as_slice());
    assert_eq!(assembler.stats().frames_overflowed, 1);
    assert_eq!(assembler.stats().frames_emitted, 1);
}

proptest! {
    #[test]
    fn prop_one_frame_per_telegram(
        layout in proptest::collection::vec((0usize..3, 0usize..4), 1..8)
    ) {
        // Each entry: which telegram to send, and how many noise lines before it
        let telegrams = [FLUVIUS_LINES, MIXED_LINES, &FLUVIUS_LINES[..3]];
        let mut lines: Vec<&str> = Vec::new();
        let mut expected = Vec::new();
        for (which, noise) in &layout {
            for _ in 0..*noise {
                lines.push("0-0:96.14.0(0001)");
            }
            lines.extend_from_slice(telegrams[*which]);
            // The truncated telegram has no end marker and never completes
            if *which != 2 {
                expected.push(telegram_bytes(telegrams[*which]));
            }
        }

        let mut assembler = TelegramAssembler::new();
        let frames = feed(&mut assembler, &lines);
        prop_assert_eq!(frames, expected);
    }

    #[test]
    fn prop_chunking_does_not_matter(split in 1usize..64) {
        let mut stream = telegram_bytes(MIXED_LINES);
        stream.extend(telegram_bytes(FLUVIUS_LINES));

        let mut assembler = TelegramAssembler::new();
        let mut frames = Vec::new();
        for chunk in stream.chunks(split) {
            frames.extend(assembler.push_bytes(chunk).into_iter().map(|f| f.as_bytes().to_vec()));
        }
        prop_assert_eq!(frames, vec![telegram_bytes(MIXED_LINES), telegram_bytes(FLUVIUS_LINES)]);
    }
}

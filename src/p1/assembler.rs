//! # Telegram Assembler
//!
//! Folds the line stream of a P1 port into complete telegrams. The meter sends
//! one telegram at a time, so the assembler only tracks the telegram currently
//! being received:
//!
//! - a line containing `/` discards whatever was buffered and opens a new
//!   telegram, starting at the `/`;
//! - while a telegram is open every line is appended;
//! - the line containing `!` is appended and the telegram is emitted;
//! - lines arriving while no telegram is open are ignored.
//!
//! Every line is stored with a canonical `\r\n` terminator regardless of how
//! the transport delivered it, because the CRC covers those bytes.
//!
//! ```rust
//! use p1_rs::p1::TelegramAssembler;
//!
//! let mut assembler = TelegramAssembler::new();
//! assert!(assembler.push(b"/ISK5\\2M550T-1012\n").is_none());
//! assert!(assembler.push(b"1-0:1.8.1(000001.000*kWh)").is_none());
//! let frame = assembler.push(b"!ABCD\r\n").unwrap();
//! assert!(frame.as_bytes().ends_with(b"!ABCD\r\n"));
//! ```

use crate::constants::{P1_END_MARKER, P1_LINE_TERMINATOR, P1_MAX_FRAME_LEN, P1_START_MARKER};
use crate::p1::frame::TelegramFrame;
use bytes::BytesMut;
use log::{debug, warn};

/// Whether a telegram is currently open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblerState {
    Idle,
    Accumulating,
}

/// Limits applied while assembling.
#[derive(Debug, Clone)]
pub struct AssemblerConfig {
    /// A telegram growing past this many bytes is dropped.
    pub max_frame_len: usize,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        AssemblerConfig {
            max_frame_len: P1_MAX_FRAME_LEN,
        }
    }
}

/// Counters for monitoring the line stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssemblerStats {
    pub frames_emitted: u64,
    /// Open telegrams discarded because a new `/` arrived.
    pub frames_restarted: u64,
    /// Telegrams or lines dropped for exceeding `max_frame_len`.
    pub frames_overflowed: u64,
    /// Lines received while idle.
    pub chunks_ignored: u64,
}

/// Streaming telegram assembler.
#[derive(Debug)]
pub struct TelegramAssembler {
    buffer: BytesMut,
    /// Bytes of an incomplete line seen by `push_bytes`.
    pending: BytesMut,
    state: AssemblerState,
    /// Set while the rest of an over-long line is still arriving.
    overlong: bool,
    config: AssemblerConfig,
    stats: AssemblerStats,
}

impl Default for TelegramAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl TelegramAssembler {
    pub fn new() -> Self {
        Self::with_config(AssemblerConfig::default())
    }

    pub fn with_config(config: AssemblerConfig) -> Self {
        TelegramAssembler {
            buffer: BytesMut::with_capacity(2048),
            pending: BytesMut::new(),
            state: AssemblerState::Idle,
            overlong: false,
            config,
            stats: AssemblerStats::default(),
        }
    }

    pub fn state(&self) -> AssemblerState {
        self.state
    }

    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    pub fn config(&self) -> &AssemblerConfig {
        &self.config
    }

    /// Bytes buffered for the telegram currently open.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drops any partial telegram and partial line.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending.clear();
        self.state = AssemblerState::Idle;
        self.overlong = false;
    }

    /// Drops a line that grew past `max_frame_len` before its terminator,
    /// together with the telegram it belonged to.
    ///
    /// The assembler returns to Idle, so the tail of the line is ignored when
    /// it arrives. Repeated calls for the same line count once.
    pub fn discard_overlong_line(&mut self) {
        if !self.overlong {
            warn!(
                "Line exceeds {} bytes without terminator, discarding",
                self.config.max_frame_len
            );
            self.stats.frames_overflowed += 1;
            self.overlong = true;
        }
        self.buffer.clear();
        self.pending.clear();
        self.state = AssemblerState::Idle;
    }

    /// Feeds one line, with or without its terminator.
    ///
    /// Returns the completed telegram when the line carries the end marker.
    pub fn push(&mut self, chunk: &[u8]) -> Option<TelegramFrame> {
        let line = strip_line_terminator(chunk);
        self.overlong = false;

        let appended = if let Some(start) = find(line, P1_START_MARKER) {
            if self.state == AssemblerState::Accumulating {
                self.stats.frames_restarted += 1;
                debug!(
                    "Start marker while accumulating, dropping {} buffered bytes",
                    self.buffer.len()
                );
            }
            self.buffer.clear();
            self.state = AssemblerState::Accumulating;
            &line[start..]
        } else if self.state == AssemblerState::Accumulating {
            line
        } else {
            self.stats.chunks_ignored += 1;
            return None;
        };

        self.buffer.extend_from_slice(appended);
        self.buffer.extend_from_slice(P1_LINE_TERMINATOR);

        if self.buffer.len() > self.config.max_frame_len {
            warn!(
                "Telegram exceeds {} bytes without end marker, discarding",
                self.config.max_frame_len
            );
            self.stats.frames_overflowed += 1;
            self.buffer.clear();
            self.state = AssemblerState::Idle;
            return None;
        }

        if find(appended, P1_END_MARKER).is_some() {
            self.state = AssemblerState::Idle;
            self.stats.frames_emitted += 1;
            let data = self.buffer.split().freeze();
            debug!("Telegram complete ({} bytes)", data.len());
            return Some(TelegramFrame::new(data));
        }

        None
    }

    /// Feeds raw bytes split at arbitrary points, e.g. straight from a serial
    /// read. Complete lines are passed to [`push`](Self::push); a trailing
    /// partial line is kept until the rest arrives, unless it grows past
    /// `max_frame_len` (see [`discard_overlong_line`](Self::discard_overlong_line)).
    pub fn push_bytes(&mut self, data: &[u8]) -> Vec<TelegramFrame> {
        let mut frames = Vec::new();
        self.pending.extend_from_slice(data);

        while let Some(newline) = find(&self.pending, b'\n') {
            let line = self.pending.split_to(newline + 1);
            if let Some(frame) = self.push(&line) {
                frames.push(frame);
            }
        }

        if self.pending.len() > self.config.max_frame_len {
            self.discard_overlong_line();
        }

        frames
    }
}

fn find(haystack: &[u8], needle: u8) -> Option<usize> {
    haystack.iter().position(|&b| b == needle)
}

fn strip_line_terminator(chunk: &[u8]) -> &[u8] {
    let mut end = chunk.len();
    while end > 0 && matches!(chunk[end - 1], b'\r' | b'\n') {
        end -= 1;
    }
    &chunk[..end]
}

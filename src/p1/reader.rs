//! # Telegram Reader
//!
//! Pulls lines from any buffered async source (a serial port, a file with a
//! captured P1 log, an in-memory buffer in tests) and feeds them through a
//! [`TelegramAssembler`].

use crate::error::P1Error;
use crate::p1::assembler::{AssemblerConfig, TelegramAssembler};
use crate::p1::frame::TelegramFrame;
use crate::p1::telegram::{DecodedTelegram, TelegramProcessor};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Line-driven telegram source.
#[derive(Debug)]
pub struct TelegramReader<R> {
    reader: R,
    assembler: TelegramAssembler,
    /// Current line; kept across a timed-out read so no bytes are lost. Never
    /// grows past the assembler's `max_frame_len`.
    line: Vec<u8>,
    read_timeout: Option<Duration>,
}

impl<R: AsyncBufRead + Unpin> TelegramReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_assembler_config(reader, AssemblerConfig::default())
    }

    pub fn with_assembler_config(reader: R, config: AssemblerConfig) -> Self {
        TelegramReader {
            reader,
            assembler: TelegramAssembler::with_config(config),
            line: Vec::with_capacity(128),
            read_timeout: None,
        }
    }

    /// Fails a read with `ReadTimeout` when no complete line arrives in time.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn assembler(&self) -> &TelegramAssembler {
        &self.assembler
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Bytes of the line currently being received.
    pub fn buffered_line_len(&self) -> usize {
        self.line.len()
    }

    /// Reads up to the next `\n` into `self.line`. Returns `false` at end of
    /// input with nothing buffered.
    async fn read_line(&mut self) -> Result<bool, P1Error> {
        match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fill_line())
                .await
                .map_err(|_| P1Error::ReadTimeout(limit))?,
            None => self.fill_line().await,
        }
    }

    async fn fill_line(&mut self) -> Result<bool, P1Error> {
        let max_len = self.assembler.config().max_frame_len;
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                return Ok(!self.line.is_empty());
            }

            let (used, complete) = match available.iter().position(|&b| b == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (available.len(), false),
            };
            if self.line.len() + used > max_len {
                self.line.clear();
                self.assembler.discard_overlong_line();
            } else {
                self.line.extend_from_slice(&available[..used]);
            }
            self.reader.consume(used);

            if complete {
                return Ok(true);
            }
        }
    }

    /// Next complete telegram, or `None` once the source is exhausted.
    pub async fn next_frame(&mut self) -> Result<Option<TelegramFrame>, P1Error> {
        loop {
            if !self.read_line().await? {
                return Ok(None);
            }
            let frame = self.assembler.push(&self.line);
            self.line.clear();
            if frame.is_some() {
                return Ok(frame);
            }
        }
    }

    /// Next telegram, verified and decoded.
    ///
    /// Checksum and framing failures are returned as errors but leave the
    /// reader positioned after the bad telegram, so the caller can log them and
    /// call again (see [`P1Error::is_telegram_local`]).
    pub async fn next_telegram(
        &mut self,
        processor: &TelegramProcessor<'_>,
    ) -> Result<Option<DecodedTelegram>, P1Error> {
        match self.next_frame().await? {
            Some(frame) => processor.process(&frame).map(Some),
            None => Ok(None),
        }
    }
}

/// Telegram reader over a captured P1 log file.
pub type P1FileReader = TelegramReader<BufReader<tokio::fs::File>>;

impl TelegramReader<BufReader<tokio::fs::File>> {
    /// Replays a captured P1 log.
    pub async fn open_file(path: impl AsRef<Path>) -> Result<P1FileReader, P1Error> {
        let file = tokio::fs::File::open(path).await?;
        Ok(TelegramReader::new(BufReader::new(file)))
    }
}

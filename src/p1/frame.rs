use crate::constants::P1_START_MARKER;
use bytes::Bytes;

/// One complete telegram as received, from the leading `/` through the
/// `!XXXX` trailer line. Every line ends in `\r\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramFrame {
    data: Bytes,
}

impl TelegramFrame {
    /// Wraps bytes that already form a telegram. Frames built by
    /// [`TelegramAssembler`](crate::p1::TelegramAssembler) always satisfy the
    /// framing invariants; hand-built frames are checked by the processor.
    pub fn new(data: impl Into<Bytes>) -> Self {
        TelegramFrame { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Lines without their terminators. Blank lines are included.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        let data: &[u8] = &self.data;
        let data = data.strip_suffix(b"\n").unwrap_or(data);
        data.split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
    }

    /// Meter identification from the header line (`/FLU5\253769484_A` gives
    /// `FLU5\253769484_A`).
    pub fn identification(&self) -> Option<String> {
        let first = self.lines().next()?;
        let ident = first.strip_prefix(&[P1_START_MARKER])?;
        Some(String::from_utf8_lossy(ident).into_owned())
    }
}

impl AsRef<[u8]> for TelegramFrame {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_strip_terminators() {
        let frame = TelegramFrame::new(&b"/ISK5\\2M550T\r\n\r\n1-0:1.8.1(1*kWh)\r\n!0000\r\n"[..]);
        let lines: Vec<&[u8]> = frame.lines().collect();
        assert_eq!(
            lines,
            vec![
                &b"/ISK5\\2M550T"[..],
                &b""[..],
                &b"1-0:1.8.1(1*kWh)"[..],
                &b"!0000"[..]
            ]
        );
    }

    #[test]
    fn test_identification() {
        let frame = TelegramFrame::new(&b"/FLU5\\253769484_A\r\n!0000\r\n"[..]);
        assert_eq!(frame.identification().as_deref(), Some("FLU5\\253769484_A"));

        let headless = TelegramFrame::new(&b"1-0:1.8.1(1*kWh)\r\n"[..]);
        assert_eq!(headless.identification(), None);
    }
}

//! Bounded capture of a managed command's output
//!
//! stdout and stderr are appended into one shared buffer in arrival order.
//! Once the cap is reached further output is dropped, but the pipes keep
//! being drained so the child never blocks on a full pipe.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Read chunk size for pipe draining
const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Default)]
struct Captured {
    text: String,
    chars: usize,
}

/// Shared, capped output buffer
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    inner: Arc<Mutex<Captured>>,
    cap: usize,
}

impl OutputBuffer {
    /// Buffer that keeps at most `cap` characters
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Captured::default())),
            cap,
        }
    }

    /// Append as much of `chunk` as still fits. Returns the number of
    /// characters kept.
    pub fn append(&self, chunk: &str) -> usize {
        let mut captured = self.inner.lock();
        let room = self.cap.saturating_sub(captured.chars);
        if room == 0 {
            return 0;
        }
        let mut kept = 0;
        for c in chunk.chars().take(room) {
            captured.text.push(c);
            kept += 1;
        }
        captured.chars += kept;
        kept
    }

    /// Whether the cap has been reached
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.inner.lock().chars >= self.cap
    }

    /// Copy of everything captured so far
    #[must_use]
    pub fn snapshot(&self) -> String {
        self.inner.lock().text.clone()
    }

    /// Read `reader` to EOF, appending into the buffer. Read errors end the
    /// drain quietly.
    pub async fn drain<R>(&self, mut reader: R)
    where
        R: AsyncRead + Unpin,
    {
        let mut chunk = vec![0u8; CHUNK_SIZE];
        let mut pending = Vec::new();
        loop {
            match reader.read(&mut chunk).await {
                Ok(0) => break,
                Ok(n) => {
                    if self.is_full() {
                        continue;
                    }
                    pending.extend_from_slice(&chunk[..n]);
                    self.append(&decode_complete(&mut pending));
                }
                Err(e) => {
                    log::debug!("output pipe closed with error: {e}");
                    break;
                }
            }
        }
        if !pending.is_empty() {
            self.append(&String::from_utf8_lossy(&pending));
        }
    }
}

/// Decode every complete character in `bytes`, leaving a trailing partial
/// sequence in place for the next read. Invalid sequences become U+FFFD.
fn decode_complete(bytes: &mut Vec<u8>) -> String {
    let mut decoded = String::new();
    let mut rest = bytes.as_slice();
    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                decoded.push_str(valid);
                rest = &[];
                break;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                decoded.push_str(&String::from_utf8_lossy(valid));
                match e.error_len() {
                    Some(bad) => {
                        decoded.push(char::REPLACEMENT_CHARACTER);
                        rest = &after[bad..];
                    }
                    None => {
                        rest = after;
                        break;
                    }
                }
            }
        }
    }
    let consumed = bytes.len() - rest.len();
    bytes.drain(..consumed);
    decoded
}

//! Streaming decoder (Bytes -> typed NDJSON records)
//!
//! Ollama streams one JSON object per line. Network reads split lines arbitrarily, so
//! bytes are buffered until a `\n` completes a line.
//!
//! Known limitation: data after the last `\n` when the body ends is discarded, not
//! parsed. A well-formed NDJSON body always ends with a newline.

use crate::client::CancelHandle;
use crate::{BoxStream, Error};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;
use tracing::warn;

/// Push-based line decoder holding a single byte buffer.
///
/// Buffering bytes rather than text keeps multi-byte UTF-8 characters intact when a
/// read ends in the middle of one.
pub struct NdjsonDecoder<T> {
    buf: Vec<u8>,
    _record: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> NdjsonDecoder<T> {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            _record: PhantomData,
        }
    }

    /// Append a chunk and decode every line it completes.
    ///
    /// Blank lines are ignored. A line that is not valid JSON for `T` is logged and
    /// skipped; it never stops the lines after it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<T> {
        self.buf.extend_from_slice(chunk);
        let Some(last_newline) = self.buf.iter().rposition(|b| *b == b'\n') else {
            return Vec::new();
        };

        let rest = self.buf.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buf, rest);

        complete
            .split(|b| *b == b'\n')
            .filter_map(Self::decode_line)
            .collect()
    }

    /// Bytes of the current unterminated line.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// End of input: drop whatever unterminated data is left, returning its size.
    pub fn finish(self) -> usize {
        let leftover = self.buf.len();
        if self.buf.iter().any(|b| !b.is_ascii_whitespace()) {
            warn!(
                bytes = leftover,
                "discarding unterminated data at end of NDJSON stream"
            );
        }
        leftover
    }

    fn decode_line(line: &[u8]) -> Option<T> {
        let text = match std::str::from_utf8(line) {
            Ok(t) => t.trim(),
            Err(e) => {
                warn!(error = %e, "skipping NDJSON line with invalid UTF-8");
                return None;
            }
        };
        if text.is_empty() {
            return None;
        }
        match serde_json::from_str::<T>(text) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, line = text, "skipping malformed NDJSON line");
                None
            }
        }
    }
}

impl<T: DeserializeOwned> Default for NdjsonDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

enum DecodeState {
    Open,
    Exhausted,
}

struct StreamState<T> {
    input: BoxStream<'static, Bytes>,
    decoder: Option<NdjsonDecoder<T>>,
    ready: VecDeque<T>,
    cancel: Option<CancelHandle>,
    state: DecodeState,
}

enum Pulled {
    Item(Option<crate::Result<Bytes>>),
    Cancelled,
}

/// Pull-based record stream over a byte stream.
///
/// Records come out in line order, one per pull. The stream ends after upstream EOF,
/// after the first transport error, or with [`Error::Cancelled`] once `cancel` fires;
/// cancellation is checked before every item and while waiting for the next chunk.
pub fn decode_stream<T>(
    input: BoxStream<'static, Bytes>,
    cancel: Option<CancelHandle>,
) -> BoxStream<'static, T>
where
    T: DeserializeOwned + Send + 'static,
{
    let init = StreamState {
        input,
        decoder: Some(NdjsonDecoder::new()),
        ready: VecDeque::new(),
        cancel,
        state: DecodeState::Open,
    };

    let stream = stream::unfold(init, |mut st| async move {
        loop {
            if let DecodeState::Exhausted = st.state {
                return None;
            }

            if st.cancel.as_ref().is_some_and(|c| c.is_cancelled()) {
                st.ready.clear();
                st.state = DecodeState::Exhausted;
                return Some((Err(Error::Cancelled), st));
            }

            if let Some(record) = st.ready.pop_front() {
                return Some((Ok(record), st));
            }

            let pulled = match &st.cancel {
                Some(cancel) => tokio::select! {
                    biased;
                    _ = cancel.cancelled() => Pulled::Cancelled,
                    item = st.input.next() => Pulled::Item(item),
                },
                None => Pulled::Item(st.input.next().await),
            };

            match pulled {
                // Re-checked at the top of the loop.
                Pulled::Cancelled => continue,
                Pulled::Item(Some(Ok(chunk))) => {
                    if let Some(decoder) = st.decoder.as_mut() {
                        st.ready.extend(decoder.push(&chunk));
                    }
                }
                Pulled::Item(Some(Err(e))) => {
                    st.state = DecodeState::Exhausted;
                    return Some((Err(e), st));
                }
                Pulled::Item(None) => {
                    if let Some(decoder) = st.decoder.take() {
                        decoder.finish();
                    }
                    if st.ready.is_empty() {
                        st.state = DecodeState::Exhausted;
                        return None;
                    }
                }
            }
        }
    });

    Box::pin(stream)
}

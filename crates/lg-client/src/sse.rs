//! Line-oriented Server-Sent Events reader.
//!
//! The concierge backend writes one event per line as `data: <json>\n`
//! with no `event:` fields and no blank-line framing, so this reader yields
//! the payload of every `data: ` line as soon as its newline arrives.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::Stream;

const DATA_PREFIX: &str = "data: ";

/// Reader state: bytes of the unfinished trailing line, complete payloads
/// not yet handed out, and whether the inner stream has ended.
#[derive(Default)]
struct LineState {
    line_buf: Vec<u8>,
    pending: VecDeque<String>,
    finished: bool,
}

impl LineState {
    /// Split a chunk into lines, keeping the trailing partial line buffered.
    ///
    /// Lines are split on raw bytes so a multi-byte character cut across two
    /// chunks is decoded only once it is whole.
    fn feed(&mut self, chunk: &[u8]) {
        for &byte in chunk {
            if byte == b'\n' {
                let line = std::mem::take(&mut self.line_buf);
                self.push_line(&line);
            } else {
                self.line_buf.push(byte);
            }
        }
    }

    /// Flush the trailing line when the stream closes without a newline.
    fn flush(&mut self) {
        if !self.line_buf.is_empty() {
            let line = std::mem::take(&mut self.line_buf);
            self.push_line(&line);
        }
        self.finished = true;
    }

    fn push_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if let Some(payload) = line.strip_prefix(DATA_PREFIX) {
            self.pending.push_back(payload.to_string());
        }
    }
}

/// Stream adapter turning a byte stream into `data: ` line payloads.
pub struct DataLineStream<S> {
    inner: S,
    state: LineState,
}

impl<S> DataLineStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            state: LineState::default(),
        }
    }
}

impl<S, E> Stream for DataLineStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<String, E>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;

        loop {
            if let Some(payload) = this.state.pending.pop_front() {
                return Poll::Ready(Some(Ok(payload)));
            }
            if this.state.finished {
                return Poll::Ready(None);
            }

            match Pin::new(&mut this.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => this.state.feed(&bytes),
                Poll::Ready(Some(Err(e))) => {
                    this.state.finished = true;
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => this.state.flush(),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Wrap a byte stream in a [`DataLineStream`].
pub fn data_lines<S, E>(stream: S) -> DataLineStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    DataLineStream::new(stream)
}

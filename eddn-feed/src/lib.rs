//! Streaming client for the upstream archive feed.
//!
//! Given a day and a dataset file basename, [`ArchiveFeed::lines`] opens an
//! HTTP GET against the bz2-compressed daily archive and yields a lazy
//! stream of complete text lines, one candidate JSON envelope per line,
//! without ever buffering the whole (possibly multi-gigabyte) archive in
//! memory.

use std::collections::VecDeque;
use std::pin::Pin;

use bytes::Bytes;
use bzip2::{Decompress, Status};
use chrono::NaiveDate;
use futures::{Stream, StreamExt, stream};
use log::debug;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ArchiveStreamError {
    #[error("error building archive request")]
    RequestBuildError(#[source] reqwest::Error),

    #[error("error executing archive request")]
    RequestExecuteError(#[source] reqwest::Error),

    #[error("archive host reported a non-2xx response")]
    StatusError(#[source] reqwest::Error),

    #[error("error reading archive response body")]
    BodyStreamError(#[source] reqwest::Error),

    #[error("bz2 decompression failed")]
    DecompressError(#[source] bzip2::Error),

    #[error("background fetch task exited abnormally")]
    JoinFailure(#[source] tokio::task::JoinError),
}

/// One dataset's daily archive: `https://<host>/<year-month>/<file>-<date>.jsonl.bz2`.
#[derive(Debug, Clone)]
pub struct ArchiveRequest {
    pub base_url: String,
    pub file_base: String,
    pub date: NaiveDate,
}

impl ArchiveRequest {
    pub fn url(&self) -> String {
        format!(
            "{}/{}/{}-{}.jsonl.bz2",
            self.base_url.trim_end_matches('/'),
            self.date.format("%Y-%m"),
            self.file_base,
            self.date.format("%Y-%m-%d"),
        )
    }
}

pub struct ArchiveFeed {
    client: reqwest::Client,
}

impl ArchiveFeed {
    pub fn new() -> Self {
        Self {
            // Open-ended timeout: these archives can take a long time to
            // stream in full, and the reader must not be torn down mid-line.
            client: reqwest::Client::builder()
                .timeout(None)
                .build()
                .expect("reqwest client with no timeout always builds"),
        }
    }

    /// Stream every complete, non-empty, JSON-object-shaped line of the
    /// archive named by `request`.
    pub fn lines(
        &self,
        request: ArchiveRequest,
    ) -> impl Stream<Item = Result<String, ArchiveStreamError>> {
        let client = self.client.clone();
        let url = request.url();

        stream::once(async move { open_archive(client, url).await }).flat_map(|opened| {
            match opened {
                Ok(byte_stream) => {
                    let state = LineDecoderState {
                        byte_stream: Box::pin(byte_stream),
                        decompress: Decompress::new(false),
                        decoded: Vec::new(),
                        pending: VecDeque::new(),
                        body_done: false,
                        stream_ended: false,
                    };
                    stream::unfold(Some(state), next_line).left_stream()
                }
                Err(err) => stream::once(async move { Err(err) }).right_stream(),
            }
        })
    }
}

impl Default for ArchiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

struct LineDecoderState {
    byte_stream: ByteStream,
    decompress: Decompress,
    /// Decompressed bytes not yet split into a complete line.
    decoded: Vec<u8>,
    /// Complete lines ready to be yielded, in order.
    pending: VecDeque<String>,
    /// The compressed HTTP body has been fully consumed.
    body_done: bool,
    /// The decompressor has reported logical end-of-stream.
    stream_ended: bool,
}

async fn open_archive(
    client: reqwest::Client,
    url: String,
) -> Result<impl Stream<Item = reqwest::Result<Bytes>>, ArchiveStreamError> {
    debug!("opening archive stream at {url}");

    let request = client
        .get(&url)
        .build()
        .map_err(ArchiveStreamError::RequestBuildError)?;

    let response = client
        .execute(request)
        .await
        .map_err(ArchiveStreamError::RequestExecuteError)?
        .error_for_status()
        .map_err(ArchiveStreamError::StatusError)?;

    Ok(response.bytes_stream())
}

/// Advance the decoder state machine until either a complete line is ready
/// to yield, an error occurs, or the stream is fully drained.
async fn next_line(
    state: Option<LineDecoderState>,
) -> Option<(Result<String, ArchiveStreamError>, Option<LineDecoderState>)> {
    let mut state = state?;

    loop {
        if let Some(line) = state.pending.pop_front() {
            return Some((Ok(line), Some(state)));
        }

        if state.stream_ended {
            return None;
        }

        if state.body_done {
            // No more compressed input is coming; flush whatever text is
            // left in the decode buffer as the final, possibly partial, line.
            drain_decoded_into_lines(&mut state, true);
            state.stream_ended = true;
            continue;
        }

        match state.byte_stream.next().await {
            Some(Ok(chunk)) => {
                if let Err(err) = feed_chunk(&mut state, &chunk) {
                    state.stream_ended = true;
                    return Some((Err(err), Some(state)));
                }
                drain_decoded_into_lines(&mut state, false);
            }
            Some(Err(err)) => {
                state.stream_ended = true;
                return Some((Err(ArchiveStreamError::BodyStreamError(err)), Some(state)));
            }
            None => {
                state.body_done = true;
            }
        }
    }
}

/// Feed one chunk of compressed bytes through the incremental decompressor,
/// appending all produced output onto `state.decoded`.
fn feed_chunk(state: &mut LineDecoderState, chunk: &[u8]) -> Result<(), ArchiveStreamError> {
    let mut offset = 0usize;

    loop {
        let before_in = state.decompress.total_in();
        let before_out = state.decompress.total_out();

        let status = state
            .decompress
            .decompress_vec(&chunk[offset..], &mut state.decoded)
            .map_err(ArchiveStreamError::DecompressError)?;

        let consumed = (state.decompress.total_in() - before_in) as usize;
        let produced = state.decompress.total_out() - before_out;
        offset += consumed;

        if matches!(status, Status::StreamEnd) {
            return Ok(());
        }

        if offset >= chunk.len() && produced == 0 {
            // Decompressor is waiting for more compressed bytes than this
            // chunk provided.
            return Ok(());
        }

        if offset >= chunk.len() {
            return Ok(());
        }
        // Otherwise the decompressor stopped early despite remaining input
        // (output buffer growth boundary); loop to keep feeding it.
    }
}

/// Split `state.decoded` on LF, moving every complete line into `pending`
/// and keeping any trailing partial line in the buffer. When `flush` is
/// true (EOF reached), the remaining buffer content is treated as a final
/// line even without a trailing LF.
fn drain_decoded_into_lines(state: &mut LineDecoderState, flush: bool) {
    let mut start = 0usize;

    while let Some(rel_newline) = state.decoded[start..].iter().position(|&b| b == b'\n') {
        let end = start + rel_newline;
        push_if_valid(state, start, end);
        start = end + 1;
    }

    if flush && start < state.decoded.len() {
        let end = state.decoded.len();
        push_if_valid(state, start, end);
        start = end;
    }

    state.decoded.drain(0..start);
}

fn push_if_valid(state: &mut LineDecoderState, start: usize, end: usize) {
    let raw = &state.decoded[start..end];
    if raw.is_empty() || raw[0] != b'{' {
        // Malformed or empty lines are silently dropped; a JSON object line
        // always begins with `{`.
        return;
    }

    match std::str::from_utf8(raw) {
        Ok(text) => state.pending.push_back(text.to_owned()),
        Err(_) => {
            // Not valid UTF-8: also silently dropped, same as any other
            // malformed line.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_format() {
        let request = ArchiveRequest {
            base_url: "https://example.test/archives".to_string(),
            file_base: "Journal.FSDJump".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 7, 28).unwrap(),
        };

        assert_eq!(
            request.url(),
            "https://example.test/archives/2026-07/Journal.FSDJump-2026-07-28.jsonl.bz2"
        );
    }

    #[test]
    fn push_if_valid_drops_malformed_and_empty_lines() {
        let mut state = LineDecoderState {
            byte_stream: Box::pin(stream::empty()),
            decompress: Decompress::new(false),
            decoded: b"not json\n{\"event\":\"FSDJump\"}\n\n".to_vec(),
            pending: VecDeque::new(),
            body_done: false,
            stream_ended: false,
        };

        drain_decoded_into_lines(&mut state, false);

        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.pending[0], r#"{"event":"FSDJump"}"#);
    }

    #[test]
    fn trailing_partial_line_is_retained_until_flush() {
        let mut state = LineDecoderState {
            byte_stream: Box::pin(stream::empty()),
            decompress: Decompress::new(false),
            decoded: b"{\"event\":\"Scan\"}\n{\"event\":\"parti".to_vec(),
            pending: VecDeque::new(),
            body_done: false,
            stream_ended: false,
        };

        drain_decoded_into_lines(&mut state, false);
        assert_eq!(state.pending.len(), 1);
        assert_eq!(state.decoded, b"{\"event\":\"parti");

        drain_decoded_into_lines(&mut state, true);
        assert_eq!(state.pending.len(), 2);
        assert_eq!(state.pending[1], r#"{"event":"parti"#);
    }
}

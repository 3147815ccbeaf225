//! One open streaming connection and its line reader.

use crate::config::StreamConfig;
use crate::error::StreamError;
use bytes::Bytes;
use flowbot_proto::LineCodec;
use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::ACCEPT;
use std::io;
use tokio_util::codec::FramedRead;
use tokio_util::io::StreamReader;

type BodyReader = StreamReader<BoxStream<'static, io::Result<Bytes>>, Bytes>;

/// The response body of one authenticated stream request, framed into lines.
///
/// Owned by a single dispatcher run and dropped (closing the connection)
/// when the run ends.
pub(super) struct StreamSession {
    lines: FramedRead<BodyReader, LineCodec>,
}

impl StreamSession {
    /// Send the stream request and check the response status.
    pub(super) async fn open(
        client: &reqwest::Client,
        config: &StreamConfig,
    ) -> Result<Self, StreamError> {
        let request = client
            .get(&config.url)
            .basic_auth(&config.username, Some(config.password.expose()))
            .header(ACCEPT, "application/json")
            .send();

        let response = match tokio::time::timeout(config.connect_timeout, request).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(StreamError::Connect(e)),
            Err(_) => return Err(StreamError::Timeout(config.connect_timeout)),
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StreamError::Rejected { status, body });
        }

        let body = response.bytes_stream().map_err(io::Error::other).boxed();
        let lines = FramedRead::new(
            StreamReader::new(body),
            LineCodec::with_max_len(config.max_line_len),
        );

        Ok(Self { lines })
    }

    /// Wait for the next complete line.
    ///
    /// Cancel-safe: dropping the future loses no buffered data.
    pub(super) async fn next_line(&mut self) -> Result<Bytes, StreamError> {
        match self.lines.next().await {
            Some(Ok(line)) => Ok(line),
            Some(Err(e)) => Err(StreamError::Read(e)),
            None => Err(StreamError::Ended),
        }
    }
}

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::ChatRequest;
use crate::core::stream_decoder::{parse_record, RecordDecoder, RecordEvent};
use crate::utils::url::construct_api_url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMessage {
    /// The backend accepted the request; streamed tokens follow.
    Opened,
    Token(String),
    /// A complete canned reply produced in demo mode.
    Reply(String),
    Failed(String),
    End,
}

pub struct StreamParams {
    pub client: reqwest::Client,
    pub base_url: String,
    pub model: String,
    pub message: String,
    pub cancel_token: CancellationToken,
    pub stream_id: u64,
}

pub struct DemoReplyParams {
    pub reply: String,
    pub delay: Duration,
    pub cancel_token: CancellationToken,
    pub stream_id: u64,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StreamStats {
    pub records: usize,
    pub tokens: usize,
    pub malformed: usize,
    /// Most recent in-band `error` record from the backend.
    pub server_error: Option<String>,
}

type StreamSender = mpsc::UnboundedSender<(StreamMessage, u64)>;

fn handle_record(record: &str, tx: &StreamSender, stream_id: u64, stats: &mut StreamStats) {
    stats.records += 1;
    match parse_record(record) {
        RecordEvent::Token(token) => {
            stats.tokens += 1;
            let _ = tx.send((StreamMessage::Token(token), stream_id));
        }
        RecordEvent::Malformed(err) => {
            stats.malformed += 1;
            warn!(stream_id, error = %err, record, "discarding malformed stream record");
        }
        RecordEvent::ServerError(message) => {
            warn!(stream_id, %message, "backend reported a stream error");
            stats.server_error = Some(message);
        }
        RecordEvent::Done | RecordEvent::Ignored => {}
    }
}

/// Run one `/chat/stream` request to completion, reporting through `tx`.
/// Every path ends with [`StreamMessage::End`].
pub async fn run_stream(params: StreamParams, tx: StreamSender) {
    let StreamParams {
        client,
        base_url,
        model,
        message,
        stream_id,
        ..
    } = params;

    let request = ChatRequest { message, model };
    let chat_url = construct_api_url(&base_url, "chat/stream");

    let response = match client.post(chat_url).json(&request).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!(stream_id, error = %e, "chat request failed");
            let _ = tx.send((StreamMessage::Failed(e.to_string()), stream_id));
            let _ = tx.send((StreamMessage::End, stream_id));
            return;
        }
    };

    if !response.status().is_success() {
        let status = response.status();
        warn!(stream_id, %status, "chat request rejected");
        let _ = tx.send((
            StreamMessage::Failed(format!("backend responded with status {status}")),
            stream_id,
        ));
        let _ = tx.send((StreamMessage::End, stream_id));
        return;
    }

    let _ = tx.send((StreamMessage::Opened, stream_id));

    let mut stream = response.bytes_stream();
    let mut decoder = RecordDecoder::new();
    let mut stats = StreamStats::default();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                for record in decoder.push(&bytes) {
                    handle_record(&record, &tx, stream_id, &mut stats);
                }
            }
            Err(e) => {
                warn!(stream_id, error = %e, tokens = stats.tokens, "chat stream broke off");
                let _ = tx.send((StreamMessage::Failed(e.to_string()), stream_id));
                let _ = tx.send((StreamMessage::End, stream_id));
                return;
            }
        }
    }

    for record in decoder.finish() {
        handle_record(&record, &tx, stream_id, &mut stats);
    }

    debug!(
        stream_id,
        records = stats.records,
        tokens = stats.tokens,
        malformed = stats.malformed,
        "chat stream finished"
    );

    // The backend reports upstream failures in-band and then closes the body.
    if stats.tokens == 0 {
        if let Some(message) = stats.server_error {
            let _ = tx.send((StreamMessage::Failed(message), stream_id));
        }
    }
    let _ = tx.send((StreamMessage::End, stream_id));
}

pub async fn run_demo_reply(params: DemoReplyParams, tx: StreamSender) {
    tokio::time::sleep(params.delay).await;
    let _ = tx.send((StreamMessage::Reply(params.reply), params.stream_id));
    let _ = tx.send((StreamMessage::End, params.stream_id));
}

#[derive(Clone)]
pub struct ChatStreamService {
    tx: StreamSender,
}

impl ChatStreamService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(StreamMessage, u64)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn spawn_stream(&self, params: StreamParams) {
        let tx = self.tx.clone();
        let cancel_token = params.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = run_stream(params, tx) => {}
                _ = cancel_token.cancelled() => {}
            }
        });
    }

    pub fn spawn_demo_reply(&self, params: DemoReplyParams) {
        let tx = self.tx.clone();
        let cancel_token = params.cancel_token.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = run_demo_reply(params, tx) => {}
                _ = cancel_token.cancelled() => {}
            }
        });
    }

    #[cfg(test)]
    pub fn send_for_test(&self, message: StreamMessage, stream_id: u64) {
        let _ = self.tx.send((message, stream_id));
    }
}

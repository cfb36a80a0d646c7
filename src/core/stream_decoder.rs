//! Incremental decoding of the `/chat/stream` response body.
//!
//! Bytes arrive in arbitrary chunks. [`Utf8StreamDecoder`] turns them into
//! text while holding back an incomplete multi-byte sequence at the end of a
//! chunk until the rest of it arrives. [`RecordDecoder`] then cuts the text
//! into newline-delimited records, carrying a partial line over to the next
//! chunk. [`parse_record`] interprets a single record.

use memchr::memchr;

use crate::api::StreamRecord;

pub const DATA_PREFIX: &str = "data: ";

#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    residual: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `residual + chunk` as forms complete characters.
    /// Invalid sequences become U+FFFD.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.residual);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut input = bytes.as_slice();
        loop {
            match std::str::from_utf8(input) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&input[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            input = &input[valid + invalid..];
                        }
                        None => {
                            self.residual = input[valid..].to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush at end of stream. A dangling partial sequence decodes to U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.residual.is_empty() {
            return String::new();
        }
        self.residual.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }

    pub fn has_residual(&self) -> bool {
        !self.residual.is_empty()
    }
}

/// Splits the decoded body into non-blank records.
#[derive(Debug, Default)]
pub struct RecordDecoder {
    utf8: Utf8StreamDecoder,
    pending: String,
}

impl RecordDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one body chunk and return the records it completed.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        self.pending.push_str(&text);

        let mut records = Vec::new();
        while let Some(newline_pos) = memchr(b'\n', self.pending.as_bytes()) {
            let line: String = self.pending.drain(..=newline_pos).collect();
            push_record(&mut records, &line[..newline_pos]);
        }
        records
    }

    /// Flush the trailing record that had no terminating newline.
    pub fn finish(&mut self) -> Vec<String> {
        let tail = self.utf8.finish();
        self.pending.push_str(&tail);
        let line = std::mem::take(&mut self.pending);

        let mut records = Vec::new();
        push_record(&mut records, &line);
        records
    }
}

fn push_record(records: &mut Vec<String>, line: &str) {
    let line = line.strip_suffix('\r').unwrap_or(line);
    if !line.trim().is_empty() {
        records.push(line.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordEvent {
    Token(String),
    Done,
    ServerError(String),
    /// Not a `data: ` record, or a payload with nothing to act on.
    Ignored,
    Malformed(String),
}

pub fn parse_record(record: &str) -> RecordEvent {
    let Some(payload) = record.strip_prefix(DATA_PREFIX) else {
        return RecordEvent::Ignored;
    };

    match serde_json::from_str::<StreamRecord>(payload) {
        Ok(StreamRecord {
            token: Some(token), ..
        }) if !token.is_empty() => RecordEvent::Token(token),
        Ok(StreamRecord {
            error: Some(error), ..
        }) => RecordEvent::ServerError(error),
        Ok(StreamRecord {
            done: Some(true), ..
        }) => RecordEvent::Done,
        Ok(_) => RecordEvent::Ignored,
        Err(err) => RecordEvent::Malformed(err.to_string()),
    }
}

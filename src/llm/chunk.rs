//! Streamed completion chunks and reply accumulation
//!
//! Providers do not agree on where a chunk keeps its text. Each chunk is
//! resolved into one [`StreamChunk`] shape up front and the accumulator matches
//! on it; chunks that carry no text are logged and skipped.

use super::LlmError;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use std::pin::Pin;

/// Stream of chunks produced by one completion call
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, LlmError>> + Send>>;

/// Lazily produced chunk text
pub type TextAccessor = Box<dyn Fn() -> String + Send + Sync>;

/// One streamed piece of a completion
pub enum StreamChunk {
    /// Text is produced by calling an accessor
    TextFn(TextAccessor),
    /// Text is a plain field on the chunk
    TextField(String),
    /// Text is nested under `candidates[0].content.parts[*].text`
    Candidates(Vec<Candidate>),
    /// Nothing recognizable; kept for logging
    Unrecognized(Value),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl StreamChunk {
    /// Resolve the shape of a raw JSON chunk
    pub fn from_json(value: Value) -> Self {
        if let Some(text) = value.get("text").and_then(Value::as_str) {
            return StreamChunk::TextField(text.to_string());
        }

        if let Some(candidates) = value.get("candidates") {
            if let Ok(candidates) = serde_json::from_value::<Vec<Candidate>>(candidates.clone()) {
                return StreamChunk::Candidates(candidates);
            }
        }

        StreamChunk::Unrecognized(value)
    }

    /// Text carried by this chunk, `None` if the shape holds none
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            StreamChunk::TextFn(accessor) => Some(Cow::Owned(accessor())),
            StreamChunk::TextField(text) => Some(Cow::Borrowed(text)),
            StreamChunk::Candidates(candidates) => {
                let parts = &candidates.first()?.content.as_ref()?.parts;
                let mut texts = parts.iter().filter_map(|p| p.text.as_deref());
                let first = texts.next()?;
                match texts.next() {
                    None => Some(Cow::Borrowed(first)),
                    Some(second) => {
                        let mut joined = format!("{first}{second}");
                        texts.for_each(|t| joined.push_str(t));
                        Some(Cow::Owned(joined))
                    }
                }
            }
            StreamChunk::Unrecognized(_) => None,
        }
    }

    /// Short shape name for logs
    pub fn shape(&self) -> &'static str {
        match self {
            StreamChunk::TextFn(_) => "text_fn",
            StreamChunk::TextField(_) => "text_field",
            StreamChunk::Candidates(_) => "candidates",
            StreamChunk::Unrecognized(_) => "unrecognized",
        }
    }
}

impl fmt::Debug for StreamChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamChunk::TextFn(_) => f.write_str("TextFn(..)"),
            StreamChunk::TextField(text) => f.debug_tuple("TextField").field(text).finish(),
            StreamChunk::Candidates(c) => f.debug_tuple("Candidates").field(c).finish(),
            StreamChunk::Unrecognized(v) => f.debug_tuple("Unrecognized").field(v).finish(),
        }
    }
}

/// Drain a chunk stream into the full reply text.
///
/// A stream error at any point fails the whole reply. If no chunk carried text
/// the reply is the empty string.
pub async fn collect_reply(mut stream: ChunkStream) -> Result<String, LlmError> {
    let mut reply = String::new();
    let mut index = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        match chunk.text() {
            Some(text) => reply.push_str(&text),
            None => {
                if let StreamChunk::Unrecognized(raw) = &chunk {
                    tracing::warn!(chunk_index = index, raw = %raw, "Skipping unrecognized stream chunk");
                } else {
                    tracing::debug!(chunk_index = index, shape = chunk.shape(), "Stream chunk carried no text");
                }
            }
        }
        index += 1;
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;

    fn chunks(items: Vec<Result<StreamChunk, LlmError>>) -> ChunkStream {
        Box::pin(stream::iter(items))
    }

    #[test]
    fn test_resolves_text_field() {
        let chunk = StreamChunk::from_json(json!({ "text": "Hello" }));
        assert!(matches!(chunk, StreamChunk::TextField(ref t) if t == "Hello"));
        assert_eq!(chunk.text().as_deref(), Some("Hello"));
    }

    #[test]
    fn test_resolves_candidate_path() {
        let chunk = StreamChunk::from_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Tell me " }, { "text": "more." }] }
            }]
        }));
        assert_eq!(chunk.shape(), "candidates");
        assert_eq!(chunk.text().as_deref(), Some("Tell me more."));
    }

    #[test]
    fn test_candidate_without_parts_has_no_text() {
        let chunk = StreamChunk::from_json(json!({
            "candidates": [{ "finishReason": "STOP" }],
            "usageMetadata": { "promptTokenCount": 3 }
        }));
        assert_eq!(chunk.shape(), "candidates");
        assert!(chunk.text().is_none());
    }

    #[test]
    fn test_unknown_shape_is_unrecognized() {
        let chunk = StreamChunk::from_json(json!({ "delta": { "content": "x" } }));
        assert!(matches!(chunk, StreamChunk::Unrecognized(_)));
        assert!(chunk.text().is_none());

        let chunk = StreamChunk::from_json(json!({ "text": 42 }));
        assert!(matches!(chunk, StreamChunk::Unrecognized(_)));
    }

    #[test]
    fn test_text_fn_is_invoked() {
        let chunk = StreamChunk::TextFn(Box::new(|| "lazy".to_string()));
        assert_eq!(chunk.text().as_deref(), Some("lazy"));
        assert_eq!(format!("{chunk:?}"), "TextFn(..)");
    }

    #[tokio::test]
    async fn test_collects_mixed_shapes_and_skips_unrecognized() {
        let stream = chunks(vec![
            Ok(StreamChunk::TextFn(Box::new(|| "What ".to_string()))),
            Ok(StreamChunk::Unrecognized(json!({ "ping": true }))),
            Ok(StreamChunk::TextField("is your ".to_string())),
            Ok(StreamChunk::from_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "experience?" }] } }]
            }))),
        ]);

        assert_eq!(collect_reply(stream).await.unwrap(), "What is your experience?");
    }

    #[tokio::test]
    async fn test_all_unrecognized_yields_empty_reply() {
        let stream = chunks(vec![
            Ok(StreamChunk::Unrecognized(json!({}))),
            Ok(StreamChunk::Unrecognized(json!([1, 2]))),
        ]);

        assert_eq!(collect_reply(stream).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_error_mid_stream_fails_reply() {
        let stream = chunks(vec![
            Ok(StreamChunk::TextField("partial".to_string())),
            Err(LlmError::network("connection reset")),
        ]);

        let err = collect_reply(stream).await.unwrap_err();
        assert_eq!(err.message, "connection reset");
    }
}

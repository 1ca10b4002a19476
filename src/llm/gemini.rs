//! Google Gemini provider implementation
//!
//! Uses `streamGenerateContent` with `alt=sse`, so every `data:` line of the
//! response body is one JSON chunk.

use super::chunk::{ChunkStream, StreamChunk};
use super::types::LlmRequest;
use super::{LlmError, LlmService};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    url: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(api_key: String, model: &str, base_url: Option<&str>) -> Result<Self, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:streamGenerateContent?alt=sse",
            base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/'),
            model
        );

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            url,
            model_id: model.to_string(),
        })
    }

    fn translate_request(request: &LlmRequest) -> GeminiRequest {
        let system_instruction = if request.system.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: request
                        .system
                        .iter()
                        .map(|s| s.text.as_str())
                        .collect::<Vec<_>>()
                        .join("\n\n"),
                }],
            })
        };

        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(msg.role.as_str().to_string()),
                parts: msg
                    .content
                    .iter()
                    .map(|text| GeminiPart { text: text.clone() })
                    .collect(),
            })
            .collect();

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: request.max_tokens.map(|max| GeminiGenerationConfig {
                max_output_tokens: Some(max),
            }),
        }
    }
}

/// Parse one SSE line into a chunk, if it is a data line.
///
/// Malformed JSON becomes an unrecognized chunk rather than an error; a
/// provider error object becomes an error.
fn parse_sse_line(line: &str) -> Option<Result<StreamChunk, LlmError>> {
    let data = line.strip_prefix("data:")?.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    let value: Value = match serde_json::from_str(data) {
        Ok(value) => value,
        Err(_) => return Some(Ok(StreamChunk::Unrecognized(Value::String(data.to_string())))),
    };

    if let Some(error) = value.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown stream error");
        return Some(Err(LlmError::server_error(format!("Stream error: {message}"))));
    }

    Some(Ok(StreamChunk::from_json(value)))
}

fn map_send_error(e: &reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::network(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        LlmError::network(format!("Connection failed: {e}"))
    } else {
        LlmError::unknown(format!("Request failed: {e}"))
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn stream(&self, request: &LlmRequest) -> Result<ChunkStream, LlmError> {
        let gemini_request = Self::translate_request(request);

        let response = self
            .client
            .post(&self.url)
            .header("x-goog-api-key", &self.api_key)
            .json(&gemini_request)
            .send()
            .await
            .map_err(|e| map_send_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| LlmError::network(format!("Failed to read response: {e}")))?;
            let message = serde_json::from_str::<GeminiErrorResponse>(&body)
                .map_or(body, |resp| resp.error.message);
            return Err(LlmError::from_status(status.as_u16(), &message));
        }

        let mut bytes = response.bytes_stream();
        let chunks = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();

            while let Some(piece) = bytes.next().await {
                let piece = match piece {
                    Ok(piece) => piece,
                    Err(e) => {
                        yield Err(LlmError::network(format!("Stream interrupted: {e}")));
                        return;
                    }
                };
                buffer.extend_from_slice(&piece);

                // Split on complete lines only so multi-byte characters never straddle a read
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    if let Some(chunk) = parse_sse_line(line.trim_end()) {
                        let failed = chunk.is_err();
                        yield chunk;
                        if failed {
                            return;
                        }
                    }
                }
            }

            let rest = String::from_utf8_lossy(&buffer);
            if let Some(chunk) = parse_sse_line(rest.trim_end()) {
                yield chunk;
            }
        };

        Ok(Box::pin(chunks))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

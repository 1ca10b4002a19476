//! LLM provider abstraction
//!
//! Providers expose a streaming completion call; the reply is assembled from
//! the chunk stream by [`collect_reply`].

mod chunk;
mod error;
mod gemini;
mod types;

pub use chunk::{collect_reply, ChunkStream, StreamChunk};
pub use error::{LlmError, LlmErrorKind};
pub use gemini::{GeminiService, DEFAULT_MODEL};
pub use types::*;

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Open a streaming completion for the request.
    ///
    /// Errors returned here happen before any chunk was produced.
    async fn stream(&self, request: &LlmRequest) -> Result<ChunkStream, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn stream(&self, request: &LlmRequest) -> Result<ChunkStream, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.stream(request).await;

        match result {
            Ok(chunks) => {
                tracing::debug!(
                    model = %self.model_id,
                    messages = request.messages.len(),
                    first_byte_ms = %start.elapsed().as_millis(),
                    "LLM stream opened"
                );

                let model_id = self.model_id.clone();
                let mut count = 0usize;
                let logged = chunks.inspect(move |item| {
                    count += 1;
                    match item {
                        Ok(_) => tracing::trace!(model = %model_id, chunk = count, "LLM chunk"),
                        Err(e) => tracing::error!(
                            model = %model_id,
                            chunk = count,
                            duration_ms = %start.elapsed().as_millis(),
                            error = %e.message,
                            retryable = e.kind.is_retryable(),
                            "LLM stream failed"
                        ),
                    }
                });
                Ok(Box::pin(logged))
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %start.elapsed().as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
                Err(e)
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

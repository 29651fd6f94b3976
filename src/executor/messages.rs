//! Message walking with oversized-message chunking.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::{BatchExecutor, OnProgress};
use crate::chunking::TextChunks;
use crate::constants::{DEFAULT_MESSAGE_CHUNK_SIZE, MESSAGE_YIELD_INTERVAL};

/// A message whose text can be read and replaced.
pub trait MessageText: Clone {
    fn text(&self) -> &str;

    /// Returns a copy of `self` carrying `text` instead of the original text.
    fn with_text(&self, text: String) -> Self;
}

impl MessageText for String {
    fn text(&self) -> &str {
        self
    }

    fn with_text(&self, text: String) -> Self {
        text
    }
}

/// Chat message with its text plus any host-defined fields, carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            extra: Map::new(),
        }
    }
}

impl MessageText for ChatMessage {
    fn text(&self) -> &str {
        &self.text
    }

    fn with_text(&self, text: String) -> Self {
        Self {
            text,
            extra: self.extra.clone(),
        }
    }
}

/// One output entry: either a source message unchanged or one chunk of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageEntry<M> {
    pub message: M,
    pub is_chunk: bool,
    /// Index of the source message in the input.
    pub original_index: usize,
    /// Position of this chunk within its source message (`0` for unchunked messages).
    pub chunk_index: usize,
}

pub struct MessageOptions<'a, M> {
    /// Messages longer than this many characters are chunked; `0` disables chunking.
    pub chunk_size: usize,
    pub on_progress: Option<OnProgress<'a>>,
    /// Called for every chunk entry produced.
    pub on_chunk: Option<&'a (dyn Fn(&MessageEntry<M>) + Send + Sync)>,
}

impl<M> Default for MessageOptions<'_, M> {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_MESSAGE_CHUNK_SIZE,
            on_progress: None,
            on_chunk: None,
        }
    }
}

impl<'a, M> MessageOptions<'a, M> {
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            ..Default::default()
        }
    }
}

impl BatchExecutor {
    /// Walks `messages` in order, splitting any message longer than `chunk_size` characters.
    ///
    /// Chunk entries keep the source message's other fields and point back to it through
    /// `original_index`. Yields to the scheduler every few messages.
    pub async fn process_messages<M: MessageText>(
        &self,
        messages: &[M],
        options: MessageOptions<'_, M>,
    ) -> Vec<MessageEntry<M>> {
        let total = messages.len();
        let mut entries = Vec::with_capacity(total);
        let mut chunked_messages = 0usize;

        for (index, message) in messages.iter().enumerate() {
            let text = message.text();
            let oversized = options.chunk_size > 0 && text.chars().count() > options.chunk_size;

            if oversized {
                chunked_messages += 1;
                for (chunk_index, chunk) in TextChunks::new(text, options.chunk_size).enumerate() {
                    let entry = MessageEntry {
                        message: message.with_text(chunk.to_string()),
                        is_chunk: true,
                        original_index: index,
                        chunk_index,
                    };
                    if let Some(on_chunk) = options.on_chunk {
                        on_chunk(&entry);
                    }
                    entries.push(entry);
                }
            } else {
                entries.push(MessageEntry {
                    message: message.clone(),
                    is_chunk: false,
                    original_index: index,
                    chunk_index: 0,
                });
            }

            let processed = index + 1;
            if let Some(report) = options.on_progress {
                report(processed, total);
            }
            if processed % MESSAGE_YIELD_INTERVAL == 0 && processed < total {
                tokio::task::yield_now().await;
            }
        }

        debug!(
            messages = total,
            entries = entries.len(),
            chunked_messages,
            "Message chunking complete"
        );
        entries
    }
}

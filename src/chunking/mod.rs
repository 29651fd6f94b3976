//! Boundary-aware text chunking.
//!
//! Oversized text is cut into pieces of at most `chunk_size` characters. Each cut prefers the
//! nearest period, newline or space within [`CHUNK_BOUNDARY_WINDOW`] characters before the hard
//! limit and falls back to a hard cut when none is found. Chunks are slices of the input, so
//! concatenating them in order always reproduces the input exactly.

use std::iter::FusedIterator;

use crate::constants::CHUNK_BOUNDARY_WINDOW;


/// Splits `text` into ordered chunks of at most `chunk_size` characters.
///
/// A `chunk_size` of zero disables splitting and yields the whole text as one chunk.
pub fn split_text_into_chunks(text: &str, chunk_size: usize) -> Vec<&str> {
    TextChunks::new(text, chunk_size).collect()
}

/// Lazy, restartable chunk iterator (clone it to restart from the current position).
#[derive(Debug, Clone)]
pub struct TextChunks<'a> {
    rest: &'a str,
    chunk_size: usize,
    window: usize,
    done: bool,
}

impl<'a> TextChunks<'a> {
    pub fn new(text: &'a str, chunk_size: usize) -> Self {
        Self::with_window(text, chunk_size, CHUNK_BOUNDARY_WINDOW)
    }

    /// Creates an iterator with a custom backward search window.
    pub fn with_window(text: &'a str, chunk_size: usize, window: usize) -> Self {
        Self {
            rest: text,
            chunk_size,
            window,
            done: false,
        }
    }

    /// Remaining, not yet yielded text.
    pub fn remainder(&self) -> &'a str {
        if self.done { "" } else { self.rest }
    }

    fn split_point(&self, hard_end: usize) -> usize {
        self.rest[..hard_end]
            .char_indices()
            .rev()
            .take(self.window)
            .find(|(_, c)| is_soft_boundary(*c))
            .map(|(idx, c)| idx + c.len_utf8())
            .unwrap_or(hard_end)
    }
}

impl<'a> Iterator for TextChunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let hard_end = if self.chunk_size == 0 {
            None
        } else {
            self.rest
                .char_indices()
                .nth(self.chunk_size)
                .map(|(idx, _)| idx)
        };

        match hard_end {
            None => {
                self.done = true;
                Some(self.rest)
            }
            Some(hard_end) => {
                let (chunk, tail) = self.rest.split_at(self.split_point(hard_end));
                self.rest = tail;
                Some(chunk)
            }
        }
    }
}

impl FusedIterator for TextChunks<'_> {}

#[inline]
fn is_soft_boundary(c: char) -> bool {
    matches!(c, '.' | '\n' | ' ')
}

//! Bounded buffer of finalized spoken words.

use ringbuf::traits::{Consumer, Observer, RingBuffer};
use ringbuf::HeapRb;

/// Fixed-capacity FIFO of normalized words. Pushing into a full buffer
/// evicts the oldest word.
pub struct SpokenHistory {
    words: HeapRb<String>,
}

impl SpokenHistory {
    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            words: HeapRb::new(capacity.max(1)),
        }
    }

    pub fn extend<I>(&mut self, words: I)
    where
        I: IntoIterator<Item = String>,
    {
        for word in words {
            self.words.push_overwrite(word);
        }
    }

    /// Words from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.occupied_len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.words.capacity().get()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Rebuild with a new capacity, keeping the newest words that fit.
    pub fn resize(&mut self, capacity: usize) {
        if capacity.max(1) == self.capacity() {
            return;
        }
        let mut resized = Self::with_capacity(capacity);
        resized.extend(self.words.pop_iter());
        *self = resized;
    }
}

impl std::fmt::Debug for SpokenHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpokenHistory")
            .field("capacity", &self.capacity())
            .field("words", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

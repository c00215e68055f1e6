use std::collections::VecDeque;

/// FIFO buffer of rendered messages awaiting a file write.
///
/// This is a write-ahead buffer, not a cache: there is no eviction. The
/// maximum queue length is a soft cap owned by the [`Logger`](crate::Logger),
/// which checks it after every insertion and triggers a flush when reached.
#[derive(Debug, Default)]
pub struct MessageQueue {
    messages: VecDeque<String>,
}

impl MessageQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rendered message and return the new queue length.
    pub fn push(&mut self, message: String) -> usize {
        self.messages.push_back(message);
        self.messages.len()
    }

    /// Remove and return all messages in insertion order.
    pub fn drain_all(&mut self) -> Vec<String> {
        self.messages.drain(..).collect()
    }

    /// Number of buffered messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the queue holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

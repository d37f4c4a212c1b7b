//! Deferred replies.
//!
//! A memorable decomposition does not answer right away: its rendered reply
//! is queued here and handed out later, oldest first, when a transform finds
//! nothing better to say.

use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub(crate) struct Memory {
    queue: VecDeque<String>,
}

impl Memory {
    pub fn remember(&mut self, reply: String) {
        self.queue.push_back(reply);
    }

    pub fn recall(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

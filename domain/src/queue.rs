use std::collections::VecDeque;

use crate::PlayerId;

/// FIFO of players looking for an opponent. Insertion order is pairing order.
#[derive(Default, Clone, Debug)]
pub struct WaitingQueue {
    queue: VecDeque<PlayerId>,
}

impl WaitingQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the tail. Returns `false` without touching the queue if the id is already waiting.
    pub fn enqueue(
        &mut self,
        player_id: PlayerId,
    ) -> bool {
        if self.contains(&player_id) {
            return false;
        }
        self.queue.push_back(player_id);
        true
    }

    pub fn dequeue_oldest(&mut self) -> Option<PlayerId> {
        self.queue.pop_front()
    }

    pub fn remove(
        &mut self,
        player_id: &PlayerId,
    ) -> bool {
        if let Some(pos) = self.queue.iter().position(|pid| pid == player_id) {
            self.queue.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(
        &self,
        player_id: &PlayerId,
    ) -> bool {
        self.queue.contains(player_id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerId> {
        self.queue.iter()
    }
}

use std::collections::BTreeMap;

use crate::callback::FrameCallback;

/// Pending callbacks ordered by due time, FIFO among equal due times.
#[derive(Debug, Default)]
pub(crate) struct CallbackQueue {
    entries: BTreeMap<(u64, u64), FrameCallback>,
    next_seq: u64,
}

impl CallbackQueue {
    pub fn insert(&mut self, due_nanos: u64, callback: FrameCallback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due_nanos, seq), callback);
    }

    /// Drops every posting of `callback`; returns how many were pending.
    pub fn remove(&mut self, callback: &FrameCallback) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, pending| !pending.same_as(callback));
        before - self.entries.len()
    }

    pub fn contains(&self, callback: &FrameCallback) -> bool {
        self.entries.values().any(|pending| pending.same_as(callback))
    }

    pub fn next_due(&self) -> Option<u64> {
        self.entries.keys().next().map(|&(due, _)| due)
    }

    /// Sequence number the next insert will receive.
    ///
    /// Captured before a dispatch batch so entries posted during the batch wait.
    pub fn seq_mark(&self) -> u64 {
        self.next_seq
    }

    /// Removes the earliest entry due at `now` that was posted before `seq_limit`.
    pub fn pop_due(&mut self, now: u64, seq_limit: u64) -> Option<FrameCallback> {
        let key = self
            .entries
            .keys()
            .take_while(|&&(due, _)| due <= now)
            .find(|&&(_, seq)| seq < seq_limit)
            .copied()?;
        self.entries.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cb() -> FrameCallback {
        FrameCallback::new(|_| {})
    }

    #[test]
    fn pops_in_due_order_then_fifo() {
        let (a, b, c) = (cb(), cb(), cb());
        let mut q = CallbackQueue::default();
        q.insert(20, b.clone());
        q.insert(10, a.clone());
        q.insert(20, c.clone());

        let limit = q.seq_mark();
        assert_eq!(q.pop_due(30, limit), Some(a));
        assert_eq!(q.pop_due(30, limit), Some(b));
        assert_eq!(q.pop_due(30, limit), Some(c));
        assert_eq!(q.pop_due(30, limit), None);
    }

    #[test]
    fn entries_after_the_mark_are_held_back() {
        let mut q = CallbackQueue::default();
        let limit = q.seq_mark();
        q.insert(0, cb());
        assert!(q.pop_due(100, limit).is_none());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn future_entries_are_not_due() {
        let mut q = CallbackQueue::default();
        q.insert(50, cb());
        assert!(q.pop_due(49, q.seq_mark()).is_none());
        assert_eq!(q.next_due(), Some(50));
    }

    #[test]
    fn remove_drops_every_posting_of_a_callback() {
        let (a, b) = (cb(), cb());
        let mut q = CallbackQueue::default();
        q.insert(1, a.clone());
        q.insert(2, b.clone());
        q.insert(3, a.clone());
        assert_eq!(q.remove(&a), 2);
        assert!(!q.contains(&a));
        assert!(q.contains(&b));
        assert_eq!(q.remove(&a), 0);
    }
}

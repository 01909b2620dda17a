//! Platform-agnostic core logic for the push channel client.
//!
//! Free of any runtime / platform dependencies (tokio, web-sys, etc).
//! Platform clients (desktop/wasm) own the actual socket and call into this
//! core for reconnection counting and pre-join buffering.

use std::collections::VecDeque;

use super::shared::{ReconnectPolicy, OUTBOX_CAPACITY};

/// Fixed-delay reconnect counter.
///
/// The counter resets once a connection is re-established, so every outage
/// gets the full number of attempts.
#[derive(Debug, Clone, Copy)]
pub struct ReconnectState {
    policy: ReconnectPolicy,
    attempts: u32,
}

impl ReconnectState {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            attempts: 0,
        }
    }

    pub fn reset(&mut self) {
        self.attempts = 0;
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn max_attempts(&self) -> u32 {
        self.policy.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempts >= self.policy.max_attempts
    }

    /// Advance to the next attempt.
    ///
    /// Returns the delay to wait *before* performing this attempt, or `None`
    /// once the attempts are used up.
    pub fn next_delay_and_advance(&mut self) -> Option<u64> {
        if self.is_exhausted() {
            return None;
        }
        self.attempts += 1;
        Some(self.policy.delay_ms)
    }
}

/// How one push session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Closed on request, or the server removed us from the namespace
    Closed,
    /// The server refused the namespace join
    Rejected,
    /// The transport dropped; `established` tells whether the namespace was joined
    Dropped { established: bool },
}

/// Encoded frames waiting for the namespace join.
///
/// While closed, frames are queued (oldest dropped past capacity). Opening
/// drains the queue in emit order; later frames pass straight through.
#[derive(Debug, Default)]
pub struct Outbox {
    open: bool,
    pending: VecDeque<String>,
}

impl Outbox {
    /// Queue `frame`, or hand it back when it can be written right away.
    pub fn queue_or_pass(&mut self, frame: String) -> Option<String> {
        if self.open {
            return Some(frame);
        }
        if self.pending.len() >= OUTBOX_CAPACITY {
            if let Some(dropped) = self.pending.pop_front() {
                tracing::warn!(frame = %dropped, "Push outbox full, dropping oldest frame");
            }
        }
        self.pending.push_back(frame);
        None
    }

    /// Mark the namespace joined and take everything queued so far.
    pub fn open(&mut self) -> Vec<String> {
        self.open = true;
        self.pending.drain(..).collect()
    }

    /// Transport lost; queue again until the next join.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconnect_gives_up_after_max_attempts() {
        let mut state = ReconnectState::new(ReconnectPolicy::default());
        let delays: Vec<u64> = std::iter::from_fn(|| state.next_delay_and_advance()).collect();

        assert_eq!(delays, vec![1_000; 5]);
        assert!(state.is_exhausted());
        assert_eq!(state.attempts(), 5);
    }

    #[test]
    fn reconnect_counter_resets_after_success() {
        let mut state = ReconnectState::new(ReconnectPolicy {
            max_attempts: 2,
            delay_ms: 10,
        });
        state.next_delay_and_advance();
        state.next_delay_and_advance();
        assert!(state.is_exhausted());

        state.reset();
        assert_eq!(state.next_delay_and_advance(), Some(10));
    }

    #[test]
    fn outbox_buffers_until_open_then_passes_through() {
        let mut outbox = Outbox::default();
        assert_eq!(outbox.queue_or_pass("a".into()), None);
        assert_eq!(outbox.queue_or_pass("b".into()), None);
        assert_eq!(outbox.len(), 2);

        assert_eq!(outbox.open(), vec!["a".to_string(), "b".to_string()]);
        assert!(outbox.is_empty());
        assert_eq!(outbox.queue_or_pass("c".into()), Some("c".to_string()));

        outbox.close();
        assert_eq!(outbox.queue_or_pass("d".into()), None);
        assert_eq!(outbox.open(), vec!["d".to_string()]);
    }

    #[test]
    fn outbox_drops_oldest_past_capacity() {
        let mut outbox = Outbox::default();
        for i in 0..=OUTBOX_CAPACITY {
            outbox.queue_or_pass(i.to_string());
        }
        let drained = outbox.open();
        assert_eq!(drained.len(), OUTBOX_CAPACITY);
        assert_eq!(drained[0], "1");
    }
}

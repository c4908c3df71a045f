//! Mutable engine state
//!
//! Lives behind the engine's mutex; nothing reads it outside the lock.

/// Timestamp, sequence and drift bookkeeping of one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct EngineState {
    /// Elapsed units used for the last minted id; ahead of the wall clock
    /// while drift is borrowing. -1 until the first id.
    pub(crate) last_timestamp: i64,
    /// Highest wall-clock reading seen, in elapsed units
    pub(crate) last_wall_timestamp: i64,
    pub(crate) current_sequence: u32,
    /// Units borrowed ahead of the wall clock in the current over-cost term
    pub(crate) over_cost_count: u32,
    /// Ids minted during the current over-cost term
    pub(crate) term_count: u32,
    /// Set while the wall clock reads behind `last_wall_timestamp`
    pub(crate) clock_behind: bool,
    pub(crate) issued: u64,
    pub(crate) clock_backward_events: u64,
    pub(crate) over_cost_terms: u64,
}

impl EngineState {
    pub(crate) const fn new(min_seq_number: u32) -> Self {
        Self {
            last_timestamp: -1,
            last_wall_timestamp: 0,
            current_sequence: min_seq_number,
            over_cost_count: 0,
            term_count: 0,
            clock_behind: false,
            issued: 0,
            clock_backward_events: 0,
            over_cost_terms: 0,
        }
    }

    /// Move to a fresh time unit
    #[inline(always)]
    pub(crate) fn start_unit(&mut self, timestamp: i64, min_seq_number: u32) {
        self.last_timestamp = timestamp;
        self.current_sequence = min_seq_number;
    }

    #[inline(always)]
    pub(crate) fn in_over_cost_term(&self) -> bool {
        self.over_cost_count > 0
    }

    #[inline(always)]
    pub(crate) fn end_over_cost_term(&mut self) {
        self.over_cost_count = 0;
        self.term_count = 0;
    }
}

//! Packing algorithms
//!
//! Both methods share the reset-on-new-unit behaviour and differ in what
//! happens once the sequence of the current unit is used up: classic waits
//! for the next unit, drift borrows future units up to a limit first.

use tracing::debug;

use super::state::EngineState;
use crate::config::{GeneratorOptions, Layout, Method};
use crate::error::{Error, Result};

/// Outcome of one attempt under the lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Ready(i64),
    /// Sequence exhausted; retry once the clock reaches `until` units
    Pending { until: i64 },
}

/// Per-variant exhaustion handling
pub(crate) trait Strategy {
    /// Advance `state` for a clock reading of `now` units, already clamped
    /// against backward jumps
    fn advance(&self, state: &mut EngineState, now: i64) -> Result<Step>;
}

/// Everything needed to mint, fixed at construction
#[derive(Debug, Clone, Copy)]
pub(crate) struct Fields {
    layout: Layout,
    worker_id: u16,
    data_center_id: u16,
    min_seq: u32,
    max_seq: u32,
    looped: bool,
}

impl Fields {
    fn for_options(options: &GeneratorOptions) -> Self {
        Self {
            layout: options.layout(),
            worker_id: options.worker_id(),
            data_center_id: options.data_center_id(),
            min_seq: options.min_seq_number(),
            max_seq: options.max_seq_number(),
            looped: options.looped_sequence(),
        }
    }

    #[inline(always)]
    fn mint(&self, timestamp: i64, data_center_id: u16, sequence: u32) -> Result<Step> {
        let max = self.layout.max_timestamp();
        if timestamp > max {
            return Err(Error::TimestampOverflow { timestamp, max });
        }
        Ok(Step::Ready(self.layout.pack(
            timestamp,
            data_center_id,
            self.worker_id,
            sequence,
        )))
    }

    /// Shared prefix of both methods. Returns `None` when the sequence of
    /// the current unit is exhausted and looping is off.
    #[inline(always)]
    fn next_sequence(&self, state: &mut EngineState, now: i64) -> Option<u32> {
        if now > state.last_timestamp {
            state.start_unit(now, self.min_seq);
            return Some(state.current_sequence);
        }
        if state.current_sequence < self.max_seq {
            state.current_sequence += 1;
            return Some(state.current_sequence);
        }
        if self.looped {
            state.current_sequence = self.min_seq;
            return Some(state.current_sequence);
        }
        None
    }
}

/// Twitter-style: wait for the next unit on exhaustion
#[derive(Debug, Clone, Copy)]
pub(crate) struct Classic {
    fields: Fields,
}

impl Strategy for Classic {
    fn advance(&self, state: &mut EngineState, now: i64) -> Result<Step> {
        match self.fields.next_sequence(state, now) {
            Some(seq) => {
                self.fields
                    .mint(state.last_timestamp, self.fields.data_center_id, seq)
            }
            None => Ok(Step::Pending {
                until: state.last_timestamp + 1,
            }),
        }
    }
}

/// Borrows up to `top_over_cost_count` units ahead of the clock before
/// falling back to the classic wait
#[derive(Debug, Clone, Copy)]
pub(crate) struct Drift {
    fields: Fields,
    top_over_cost_count: u32,
}

impl Strategy for Drift {
    fn advance(&self, state: &mut EngineState, now: i64) -> Result<Step> {
        if state.in_over_cost_term() && now >= state.last_timestamp {
            debug!(
                borrowed = state.over_cost_count,
                minted = state.term_count,
                "Clock caught up with borrowed time, over-cost term ended"
            );
            state.end_over_cost_term();
        }

        let seq = match self.fields.next_sequence(state, now) {
            Some(seq) => seq,
            None if state.over_cost_count < self.top_over_cost_count => {
                if !state.in_over_cost_term() {
                    state.over_cost_terms += 1;
                    debug!(
                        timestamp = state.last_timestamp,
                        "Sequence exhausted, borrowing future time units"
                    );
                }
                state.over_cost_count += 1;
                state.start_unit(state.last_timestamp + 1, self.fields.min_seq);
                state.current_sequence
            }
            None => {
                return Ok(Step::Pending {
                    until: state.last_timestamp + 1,
                })
            }
        };

        if state.in_over_cost_term() {
            state.term_count += 1;
        }
        self.fields.mint(state.last_timestamp, 0, seq)
    }
}

/// The two methods as a closed set, chosen once per engine
#[derive(Debug, Clone, Copy)]
pub(crate) enum Algorithm {
    Classic(Classic),
    Drift(Drift),
}

impl Algorithm {
    pub(crate) fn for_options(options: &GeneratorOptions) -> Self {
        let fields = Fields::for_options(options);
        match options.method() {
            Method::Classic => Algorithm::Classic(Classic { fields }),
            Method::Drift => Algorithm::Drift(Drift {
                fields,
                top_over_cost_count: options.top_over_cost_count(),
            }),
        }
    }

    pub(crate) fn method(&self) -> Method {
        match self {
            Algorithm::Classic(_) => Method::Classic,
            Algorithm::Drift(_) => Method::Drift,
        }
    }
}

impl Strategy for Algorithm {
    #[inline]
    fn advance(&self, state: &mut EngineState, now: i64) -> Result<Step> {
        match self {
            Algorithm::Classic(a) => a.advance(state, now),
            Algorithm::Drift(a) => a.advance(state, now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorOptions;

    fn options(method: Method, top_over_cost_count: u32, looped: bool) -> GeneratorOptions {
        GeneratorOptions::builder()
            .method(method)
            .worker_id(3)
            .unwrap()
            .data_center_id(2)
            .unwrap()
            .seq_bit_length(3)
            .unwrap()
            .min_seq_number(5)
            .unwrap()
            .top_over_cost_count(top_over_cost_count)
            .unwrap()
            .looped_sequence(looped)
            .build()
            .unwrap()
    }

    fn ready(step: Step) -> i64 {
        match step {
            Step::Ready(id) => id,
            Step::Pending { until } => panic!("expected an id, got pending until {until}"),
        }
    }

    #[test]
    fn test_classic_waits_when_exhausted() {
        let opts = options(Method::Classic, 0, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);

        // Sequences 5, 6, 7 fit in 3 bits
        for expected in 5..=7 {
            let id = ready(algo.advance(&mut state, 100).unwrap());
            assert_eq!(id & 0x7, expected);
        }
        assert_eq!(
            algo.advance(&mut state, 100).unwrap(),
            Step::Pending { until: 101 }
        );

        let id = ready(algo.advance(&mut state, 101).unwrap());
        assert_eq!(id & 0x7, 5);
        assert_eq!(state.last_timestamp, 101);
    }

    #[test]
    fn test_classic_packs_data_center() {
        let opts = options(Method::Classic, 0, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);

        let id = ready(algo.advance(&mut state, 7).unwrap());
        // seq 3 bits, worker 6 bits, data center 5 bits
        assert_eq!((id >> 3) & 0x3F, 3);
        assert_eq!((id >> 9) & 0x1F, 2);
        assert_eq!(id >> 14, 7);
    }

    #[test]
    fn test_drift_borrows_then_waits() {
        let opts = options(Method::Drift, 2, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);

        for _ in 5..=7 {
            ready(algo.advance(&mut state, 100).unwrap());
        }
        // Two borrowed units, three ids each
        for borrowed in 1..=2u32 {
            for _ in 5..=7 {
                let id = ready(algo.advance(&mut state, 100).unwrap());
                assert_eq!(id >> 9, 100 + borrowed as i64);
            }
            assert_eq!(state.over_cost_count, borrowed);
        }
        assert_eq!(state.term_count, 6);
        assert_eq!(state.over_cost_terms, 1);
        assert_eq!(
            algo.advance(&mut state, 100).unwrap(),
            Step::Pending { until: 103 }
        );
    }

    #[test]
    fn test_drift_term_ends_when_clock_catches_up() {
        let opts = options(Method::Drift, 10, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);

        for _ in 0..4 {
            ready(algo.advance(&mut state, 100).unwrap());
        }
        assert_eq!(state.last_timestamp, 101);
        assert_eq!(state.over_cost_count, 1);

        // Clock reaches the borrowed unit: term ends, sequence keeps going
        let id = ready(algo.advance(&mut state, 101).unwrap());
        assert_eq!(state.over_cost_count, 0);
        assert_eq!(state.term_count, 0);
        assert_eq!(id & 0x7, 6);
    }

    #[test]
    fn test_drift_has_no_data_center_field() {
        let opts = options(Method::Drift, 10, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);

        let id = ready(algo.advance(&mut state, 7).unwrap());
        assert_eq!((id >> 3) & 0x3F, 3);
        assert_eq!(id >> 9, 7);
    }

    #[test]
    fn test_looped_wraps_without_waiting() {
        for method in [Method::Classic, Method::Drift] {
            let opts = options(method, 10, true);
            let algo = Algorithm::for_options(&opts);
            let mut state = EngineState::new(5);

            let seqs: Vec<i64> = (0..5)
                .map(|_| ready(algo.advance(&mut state, 100).unwrap()) & 0x7)
                .collect();
            assert_eq!(seqs, vec![5, 6, 7, 5, 6]);
            assert_eq!(state.last_timestamp, 100);
            assert_eq!(state.over_cost_count, 0);
        }
    }

    #[test]
    fn test_timestamp_overflow() {
        let opts = options(Method::Drift, 10, false);
        let algo = Algorithm::for_options(&opts);
        let mut state = EngineState::new(5);
        let max = opts.layout().max_timestamp();

        assert!(algo.advance(&mut state, max).is_ok());
        assert_eq!(
            algo.advance(&mut state, max + 1),
            Err(Error::TimestampOverflow {
                timestamp: max + 1,
                max
            })
        );
    }
}

//! Cancellable async variants
//!
//! Same minting path as the blocking methods, but an exhausted sequence
//! parks the task on the tokio timer instead of the thread. Cancellation is
//! checked before every id and while parked; a cancelled call returns
//! [`Error::Cancelled`] and drops whatever it already minted.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use super::algorithm::Step;
use super::generate::{batch_buffer, checked_count};
use super::SnowflakeEngine;
use crate::error::{Error, Result};

impl SnowflakeEngine {
    /// Async version of [`next_id`](Self::next_id)
    pub async fn next_id_async(&self, cancel: &CancellationToken) -> Result<i64> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            match self.try_next_id()? {
                Step::Ready(id) => return Ok(id),
                Step::Pending { until } => {
                    let delay = self.delay_until(until);
                    trace!(until, ?delay, "Sequence exhausted, parking task");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(Error::Cancelled),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }
    }

    /// Async version of [`next_ids`](Self::next_ids)
    pub async fn next_ids_async(&self, count: i64, cancel: &CancellationToken) -> Result<Vec<i64>> {
        let count = checked_count(count)?;
        let mut ids = batch_buffer(count);
        for _ in 0..count {
            ids.push(self.next_id_async(cancel).await?);
        }
        Ok(ids)
    }

    /// Async version of [`next_id_string`](Self::next_id_string)
    pub async fn next_id_string_async(&self, cancel: &CancellationToken) -> Result<String> {
        let id = self.next_id_async(cancel).await?;
        self.formatter.format(id)
    }

    /// Async version of [`next_id_strings`](Self::next_id_strings)
    pub async fn next_id_strings_async(
        &self,
        count: i64,
        cancel: &CancellationToken,
    ) -> Result<Vec<String>> {
        let count = checked_count(count)?;
        let mut ids = batch_buffer(count);
        for _ in 0..count {
            ids.push(self.next_id_string_async(cancel).await?);
        }
        Ok(ids)
    }

    /// Time left until the clock reaches `until` units, at least 1ms
    fn delay_until(&self, until: i64) -> Duration {
        let remaining = self
            .time_base
            .to_unix_millis(until)
            .saturating_sub(self.clock.unix_millis());
        Duration::from_millis(remaining.clamp(1, i64::from(u32::MAX)) as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{GeneratorOptions, Method};
    use crate::generator::ManualClock;

    const BASE_MS: i64 = 1_582_165_202_020;

    fn classic_engine(clock: Arc<ManualClock>) -> SnowflakeEngine {
        let options = GeneratorOptions::builder()
            .method(Method::Classic)
            .seq_bit_length(3)
            .unwrap()
            .min_seq_number(5)
            .unwrap()
            .build()
            .unwrap();
        SnowflakeEngine::with_clock(options, clock).unwrap()
    }

    #[tokio::test]
    async fn test_next_id_async() {
        let engine = SnowflakeEngine::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();

        let ids = engine.next_ids_async(100, &cancel).await.unwrap();
        assert_eq!(ids.len(), 100);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));

        let strings = engine.next_id_strings_async(3, &cancel).await.unwrap();
        assert_eq!(strings.len(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let engine = SnowflakeEngine::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(engine.next_id_async(&cancel).await, Err(Error::Cancelled));
        assert_eq!(engine.next_ids_async(5, &cancel).await, Err(Error::Cancelled));
        assert_eq!(engine.stats().issued, 0);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_returns_no_partial_batch() {
        // The clock never moves, so the fourth id waits forever
        let clock = Arc::new(ManualClock::new(BASE_MS + 1_000));
        let engine = Arc::new(classic_engine(clock));
        let cancel = CancellationToken::new();

        let task = {
            let engine = engine.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { engine.next_ids_async(10, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();

        let result = task.await.unwrap();
        assert_eq!(result, Err(Error::Cancelled));
        assert_eq!(engine.stats().issued, 3);
    }

    #[tokio::test]
    async fn test_async_waits_for_clock() {
        let clock = Arc::new(ManualClock::new(BASE_MS + 1_000));
        let engine = Arc::new(classic_engine(clock.clone()));
        let cancel = CancellationToken::new();

        let task = {
            let engine = engine.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { engine.next_ids_async(4, &cancel).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        clock.advance(1);

        let ids = task.await.unwrap().unwrap();
        assert_eq!(engine.extract.timestamp(ids[3]), 1_001);
        assert_eq!(engine.extract.sequence(ids[3]), 5);
    }

    #[tokio::test]
    async fn test_async_rejects_bad_count() {
        let engine = SnowflakeEngine::new(GeneratorOptions::default()).unwrap();
        let cancel = CancellationToken::new();
        assert_eq!(
            engine.next_id_strings_async(-3, &cancel).await,
            Err(Error::InvalidCount { count: -3 })
        );
    }
}

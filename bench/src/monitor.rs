//! Traffic monitor
//!
//! Polls a container's stats until its outbound network traffic stops.
//!
//! The loop is a two-state machine:
//!
//! - `Polling { last }`: a snapshot that is still transmitting (network data
//!   present, `tx_bytes != 0`) replaces `last`, then the monitor waits one
//!   interval and polls again.
//! - `Done(last)`: reached on the first idle snapshot (no network data or
//!   `tx_bytes == 0`). The idle snapshot itself is discarded and `last` is
//!   the result, so the reported counters always trail the end of traffic by
//!   one polling interval. `Done` is terminal.
//!
//! Polling is unbounded unless a poll limit is configured; a workload that
//! never stops transmitting keeps the monitor polling forever.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::error::MonitorError;
use crate::runtime::stats::StatsSnapshot;
use crate::runtime::StatsSource;

/// Delay between two stats queries
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(300);

/// State of one monitoring run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorState {
    Polling { last: Option<StatsSnapshot> },
    Done(Option<StatsSnapshot>),
}

impl Default for MonitorState {
    fn default() -> Self {
        MonitorState::Polling { last: None }
    }
}

impl MonitorState {
    /// Apply one observed snapshot
    pub fn advance(self, snapshot: StatsSnapshot) -> Self {
        match self {
            MonitorState::Polling { last } => {
                if snapshot.is_transmitting() {
                    MonitorState::Polling {
                        last: Some(snapshot),
                    }
                } else {
                    MonitorState::Done(last)
                }
            }
            done @ MonitorState::Done(_) => done,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, MonitorState::Done(_))
    }

    /// Last transmitting snapshot recorded so far
    pub fn last(&self) -> Option<&StatsSnapshot> {
        match self {
            MonitorState::Polling { last } | MonitorState::Done(last) => last.as_ref(),
        }
    }
}

/// Watches a stats source until network transmission stops
#[derive(Debug, Clone)]
pub struct TrafficMonitor {
    interval: Duration,
    max_polls: Option<u32>,
}

impl Default for TrafficMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl TrafficMonitor {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_polls: None,
        }
    }

    /// Give up with [`MonitorError::PollLimit`] after `max_polls` queries that
    /// all saw active traffic
    pub fn with_max_polls(mut self, max_polls: Option<u32>) -> Self {
        self.max_polls = max_polls;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_polls(&self) -> Option<u32> {
        self.max_polls
    }

    /// Poll `source` until it reports idle network traffic
    ///
    /// Returns the last snapshot that was still transmitting, or `None` when
    /// the very first query is already idle (in which case no delay happens).
    /// A failed query ends the loop with [`MonitorError::Query`].
    #[instrument(skip_all, fields(interval_ms = self.interval.as_millis() as u64))]
    pub async fn observe_until_idle<S>(
        &self,
        source: &S,
    ) -> Result<Option<StatsSnapshot>, MonitorError>
    where
        S: StatsSource + ?Sized,
    {
        let mut state = MonitorState::default();
        let mut polls: u32 = 0;

        loop {
            let snapshot = source.stats().await?;
            polls = polls.saturating_add(1);
            debug!(
                poll = polls,
                tx_bytes = ?snapshot.tx_bytes(),
                rx_bytes = ?snapshot.rx_bytes(),
                "polled stats"
            );

            state = match state.advance(snapshot) {
                MonitorState::Done(result) => {
                    info!(polls, tx_bytes = ?result.as_ref().and_then(|s| s.tx_bytes()), "network idle");
                    return Ok(result);
                }
                polling => polling,
            };

            if let Some(limit) = self.max_polls {
                if polls >= limit {
                    warn!(polls, "poll limit reached with traffic still active");
                    return Err(MonitorError::PollLimit {
                        polls,
                        last: state.last().cloned(),
                    });
                }
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{RuntimeError, RuntimeResult};
    use async_trait::async_trait;
    use bench_common::CliError;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Replays a fixed list of snapshots, then fails like a removed container
    struct Scripted {
        snapshots: Mutex<VecDeque<StatsSnapshot>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(snapshots: Vec<StatsSnapshot>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatsSource for Scripted {
        async fn stats(&self) -> RuntimeResult<StatsSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.snapshots.lock().unwrap().pop_front().ok_or_else(|| {
                RuntimeError::Cli(CliError::CommandFailed {
                    program: "fake".to_string(),
                    code: 1,
                    stderr: "No such container".to_string(),
                })
            })
        }
    }

    /// Always transmitting
    struct Endless {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl StatsSource for Endless {
        async fn stats(&self) -> RuntimeResult<StatsSnapshot> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as u64;
            Ok(StatsSnapshot::with_network(100 + n, 10))
        }
    }

    fn tx(tx_bytes: u64) -> StatsSnapshot {
        StatsSnapshot::with_network(tx_bytes, tx_bytes * 2)
    }

    #[test]
    fn test_state_machine_transitions() {
        let state = MonitorState::default();
        assert!(!state.is_done());

        let state = state.advance(tx(100));
        assert_eq!(state.last(), Some(&tx(100)));

        let state = state.advance(tx(0));
        assert_eq!(state, MonitorState::Done(Some(tx(100))));

        // Done is terminal
        let state = state.advance(tx(999));
        assert_eq!(state, MonitorState::Done(Some(tx(100))));
    }

    #[test]
    fn test_idle_first_snapshot_is_done_with_nothing() {
        let state = MonitorState::default().advance(StatsSnapshot::without_network());
        assert_eq!(state, MonitorState::Done(None));
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_snapshot_before_idle() {
        let source = Scripted::new(vec![tx(100), tx(250), tx(0)]);
        let started = Instant::now();

        let result = TrafficMonitor::default()
            .observe_until_idle(&source)
            .await
            .unwrap();

        assert_eq!(result, Some(tx(250)));
        assert_eq!(source.calls(), 3);
        // one wait after each transmitting snapshot
        let elapsed = started.elapsed();
        assert!(elapsed >= DEFAULT_POLL_INTERVAL * 2, "elapsed {elapsed:?}");
        assert!(elapsed < DEFAULT_POLL_INTERVAL * 3, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_transmitting_run_then_idle() {
        let monitor = TrafficMonitor::default();

        for n in 0..=8u32 {
            let mut script: Vec<_> = (1..=n).map(|i| tx(u64::from(i) * 100)).collect();
            script.push(StatsSnapshot::with_network(0, 64));
            let source = Scripted::new(script);
            let started = Instant::now();

            let result = monitor.observe_until_idle(&source).await.unwrap();

            let expected = (n > 0).then(|| tx(u64::from(n) * 100));
            assert_eq!(result, expected, "n = {n}");
            assert_eq!(source.calls(), n as usize + 1, "n = {n}");
            assert_eq!(started.elapsed(), DEFAULT_POLL_INTERVAL * n, "n = {n}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_first_returns_none_without_delay() {
        let source = Scripted::new(vec![tx(0), tx(500)]);
        let started = Instant::now();

        let result = TrafficMonitor::default()
            .observe_until_idle(&source)
            .await
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(source.calls(), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_network_ends_like_zero_tx() {
        let source = Scripted::new(vec![tx(50), StatsSnapshot::without_network()]);

        let result = TrafficMonitor::default()
            .observe_until_idle(&source)
            .await
            .unwrap();

        assert_eq!(result, Some(tx(50)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_snapshot_with_received_bytes_is_not_recorded() {
        let source = Scripted::new(vec![tx(10), StatsSnapshot::with_network(0, 4096)]);

        let result = TrafficMonitor::default()
            .observe_until_idle(&source)
            .await
            .unwrap();

        assert_eq!(result, Some(tx(10)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_failure_is_an_error() {
        // Source runs dry while traffic is still active
        let source = Scripted::new(vec![tx(100), tx(200)]);

        let err = TrafficMonitor::default()
            .observe_until_idle(&source)
            .await
            .unwrap_err();

        assert!(matches!(err, MonitorError::Query(RuntimeError::Cli(_))));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_by_default() {
        let source = Endless {
            calls: AtomicUsize::new(0),
        };
        let monitor = TrafficMonitor::default();

        let outcome =
            tokio::time::timeout(Duration::from_secs(30), monitor.observe_until_idle(&source))
                .await;

        assert!(outcome.is_err(), "monitor should still be polling");
        assert!(source.calls.load(Ordering::SeqCst) >= 90);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_limit_is_opt_in() {
        let source = Endless {
            calls: AtomicUsize::new(0),
        };
        let monitor = TrafficMonitor::default().with_max_polls(Some(4));

        let err = monitor.observe_until_idle(&source).await.unwrap_err();

        match err {
            MonitorError::PollLimit { polls, last } => {
                assert_eq!(polls, 4);
                assert_eq!(last.and_then(|s| s.tx_bytes()), Some(103));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_does_not_hide_idle_result() {
        let source = Scripted::new(vec![tx(7), tx(0)]);
        let monitor = TrafficMonitor::default().with_max_polls(Some(2));

        let result = monitor.observe_until_idle(&source).await.unwrap();
        assert_eq!(result, Some(tx(7)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_calls_do_not_share_state() {
        let monitor = TrafficMonitor::default();
        let first = Scripted::new(vec![tx(100), tx(0)]);
        let second = Scripted::new(vec![tx(0)]);

        assert_eq!(monitor.observe_until_idle(&first).await.unwrap(), Some(tx(100)));
        assert_eq!(monitor.observe_until_idle(&second).await.unwrap(), None);
    }
}

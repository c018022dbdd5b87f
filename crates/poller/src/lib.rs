//! Deadline-bounded condition polling for the rollup ops harness.
//!
//! Every wait in the harness is expressed as a cheap, repeatable probe driven
//! on a fixed tick until it reports ready or its deadline elapses. There is no
//! backoff: probes are read-only RPC calls and the polled systems converge in
//! seconds, so a fixed interval keeps the timing behavior predictable.

use std::{future::Future, time::Duration};
use tokio::time::Instant;

/// The default tick interval used by pollers across the harness.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// The cadence and bound of a polling loop.
///
/// The first tick fires one full `interval` after the poll starts, never
/// immediately, so a probe is not hammered right after a start command
/// returns. A spec with `deadline < interval` is not rejected: it times out on
/// the first tick past the deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSpec {
    /// Time between consecutive probe invocations.
    pub interval: Duration,
    /// Total time budget for the poll, measured from its start.
    pub deadline: Duration,
}

impl PollSpec {
    /// Returns a new [`PollSpec`] with the given interval and deadline.
    pub const fn new(interval: Duration, deadline: Duration) -> Self {
        Self { interval, deadline }
    }

    /// Returns a [`PollSpec`] ticking at [`DEFAULT_INTERVAL`] with the given
    /// deadline.
    pub const fn with_deadline(deadline: Duration) -> Self {
        Self { interval: DEFAULT_INTERVAL, deadline }
    }
}

/// The deadline of a poll elapsed before its condition was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("condition not satisfied after {elapsed:?} (deadline {deadline:?})")]
pub struct TimeoutExpired {
    /// Time spent polling when the loop gave up.
    pub elapsed: Duration,
    /// The configured deadline.
    pub deadline: Duration,
}

/// An error returned by [`poll`] or [`poll_until`].
#[derive(Debug, thiserror::Error)]
pub enum PollError<E> {
    /// The deadline elapsed with the condition never becoming true.
    #[error(transparent)]
    Timeout(#[from] TimeoutExpired),
    /// The probe itself failed. An error is not "not yet ready": it is
    /// propagated immediately without further retries.
    #[error(transparent)]
    Probe(E),
}

impl<E> PollError<E> {
    /// Returns true if the poll failed on its deadline rather than on a probe
    /// error.
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Drives `probe` on the fixed tick of `spec.interval` until it yields a
/// value, errors, or `spec.deadline` elapses.
///
/// The probe contract mirrors the boolean form of [`poll`]: `Ok(None)` means
/// "not ready yet, keep polling", `Ok(Some(value))` completes the poll, and
/// `Err` aborts it immediately. The deadline is checked before each probe
/// invocation, so a probe is never run once the budget is exhausted.
pub async fn poll_until<T, E, F, Fut>(spec: PollSpec, mut probe: F) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
{
    let started = Instant::now();
    loop {
        tokio::time::sleep(spec.interval).await;

        let elapsed = started.elapsed();
        if elapsed > spec.deadline {
            return Err(PollError::Timeout(TimeoutExpired { elapsed, deadline: spec.deadline }));
        }

        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                tracing::trace!(target: "ops::poller", ?elapsed, deadline = ?spec.deadline, "condition not yet satisfied")
            }
            Err(err) => return Err(PollError::Probe(err)),
        }
    }
}

/// Drives a boolean probe until it reports satisfied or the deadline elapses.
///
/// `Ok(false)` means "not ready yet"; `Err` is a genuine probe failure and is
/// propagated without retrying.
pub async fn poll<E, F, Fut>(spec: PollSpec, mut probe: F) -> Result<(), PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
{
    poll_until(spec, || {
        let fut = probe();
        async move { fut.await.map(|ready| ready.then_some(())) }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    #[derive(Debug, thiserror::Error)]
    #[error("probe exploded")]
    struct ProbeFailure;

    #[tokio::test(start_paused = true)]
    async fn succeeds_on_first_tick() -> eyre::Result<()> {
        let spec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(30));
        let started = Instant::now();

        poll(spec, || async { Ok::<_, ProbeFailure>(true) }).await?;

        // one tick, not a full deadline.
        assert_eq!(started.elapsed(), Duration::from_secs(1));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_interval() {
        let spec = PollSpec::new(Duration::from_secs(3), Duration::from_secs(30));
        let started = Instant::now();

        let _ = poll(spec, || async { Ok::<_, ProbeFailure>(true) }).await;

        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_shorter_than_interval_never_probes() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(Duration::from_secs(2), Duration::from_secs(1));

        let counter = calls.clone();
        let result = poll(spec, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ProbeFailure>(true) }
        })
        .await;

        assert!(matches!(result, Err(PollError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn probe_error_aborts_immediately() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(30));

        let counter = calls.clone();
        let result = poll(spec, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<bool, _>(ProbeFailure) }
        })
        .await;

        assert!(matches!(result, Err(PollError::Probe(ProbeFailure))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn polls_until_value_is_produced() -> eyre::Result<()> {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(30));

        let counter = calls.clone();
        let value = poll_until(spec, move || {
            let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
            async move { Ok::<_, ProbeFailure>((attempt == 4).then_some(attempt)) }
        })
        .await?;

        assert_eq!(value, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_on_first_tick_past_the_deadline() {
        let calls = Arc::new(AtomicU32::new(0));
        let spec = PollSpec::new(Duration::from_secs(1), Duration::from_secs(5));
        let started = Instant::now();

        let counter = calls.clone();
        let result = poll(spec, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, ProbeFailure>(false) }
        })
        .await;

        let Err(PollError::Timeout(timeout)) = result else { panic!("expected timeout") };
        assert_eq!(timeout.deadline, Duration::from_secs(5));
        // ticks at 1s..=5s probe, the 6s tick trips the deadline check.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
        assert_eq!(started.elapsed(), Duration::from_secs(6));
    }
}

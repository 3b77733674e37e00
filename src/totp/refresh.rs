//! Refresh subscription — keeps a displayed code in sync with wall-clock
//! time for as long as a consumer holds the handle.
//!
//! Each subscription owns exactly one recurring one-second timer, running in
//! a spawned tokio task. The current `TotpState` is published over a
//! `tokio::sync::watch` channel; changing the credential string re-parses it,
//! resets the timer, and publishes the new state immediately. Dropping (or
//! `stop`ping) the handle aborts the task, so no timer can outlive its
//! subscriber — credential popups are short-lived and leaked timers would
//! keep recomputing codes for UI that no longer exists.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::{mpsc, watch};
use tokio::time::{interval, Duration, MissedTickBehavior};

use crate::totp::core;
use crate::totp::types::{OtpParameters, TotpState};
use crate::totp::uri;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Clock
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Source of unix time, abstracted so tests can drive a simulated clock.
pub trait Clock: Send + Sync + 'static {
    /// Current unix time in whole seconds.
    fn unix_now(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Subscription handle
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Handle to a running refresh subscription.
///
/// Owns the timer task; dropping the handle tears the timer down.
pub struct CodeSubscription {
    input_tx: mpsc::UnboundedSender<String>,
    state_rx: watch::Receiver<TotpState>,
    generation: Arc<AtomicU64>,
    task: tokio::task::JoinHandle<()>,
}

impl CodeSubscription {
    /// Start refreshing codes for a secret-or-URI string, on wall-clock time.
    pub fn start(input: impl Into<String>) -> Self {
        Self::start_with_clock(input, SystemClock)
    }

    /// Start with an explicit clock (used by tests with a simulated clock).
    pub fn start_with_clock<C: Clock>(input: impl Into<String>, clock: C) -> Self {
        let input = input.into();
        let mut params = uri::parse_otp(&input);
        let generation = Arc::new(AtomicU64::new(0));

        // Publish the initial state synchronously so the first read after
        // subscribing never sees a stale or missing code.
        let (state_tx, state_rx) = watch::channel(state_for(&params, clock.unix_now()));
        let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

        let task_generation = Arc::clone(&generation);
        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_secs(1));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of a fresh interval fires immediately; the
            // initial state is already out, so swallow it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    changed = input_rx.recv() => {
                        let Some(raw) = changed else { break };
                        // A newer input may already be queued behind this
                        // one; skip straight to it rather than publishing a
                        // state the caller has already replaced.
                        let generation_seen = task_generation.load(Ordering::Acquire);
                        params = uri::parse_otp(&raw);
                        let state = state_for(&params, clock.unix_now());
                        if task_generation.load(Ordering::Acquire) != generation_seen {
                            log::debug!("discarding code computed for superseded input");
                            continue;
                        }
                        ticker.reset();
                        if state_tx.send(state).is_err() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        if state_tx.send(state_for(&params, clock.unix_now())).is_err() {
                            break;
                        }
                    }
                }
            }
        });

        Self {
            input_tx,
            state_rx,
            generation,
            task,
        }
    }

    /// Snapshot of the most recently published state.
    pub fn state(&self) -> TotpState {
        self.state_rx.borrow().clone()
    }

    /// A receiver that resolves on every published tick.
    pub fn watch(&self) -> watch::Receiver<TotpState> {
        self.state_rx.clone()
    }

    /// Replace the credential string. The previous cycle is cancelled and
    /// the state for the new input is published immediately.
    pub fn set_input(&self, raw: impl Into<String>) {
        self.generation.fetch_add(1, Ordering::Release);
        // Send only fails once the task is gone, at which point there is
        // nobody left to deliver to.
        let _ = self.input_tx.send(raw.into());
    }

    /// Stop refreshing. Equivalent to dropping the handle.
    pub fn stop(self) {}
}

impl Drop for CodeSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Compute the display state for a parameter set at a point in time.
fn state_for(params: &OtpParameters, unix_now: u64) -> TotpState {
    let code = match &params.secret {
        Some(key) => match core::totp_at(key, params.period, params.digits, unix_now) {
            Ok(code) => code,
            Err(err) => {
                // Environment defect, not a credential problem; say so
                // instead of silently showing zeros.
                log::error!("OTP generation failed: {err}");
                core::placeholder_code(params.digits)
            }
        },
        None => core::placeholder_code(params.digits),
    };

    TotpState {
        code,
        remaining_seconds: core::seconds_remaining_at(unix_now, params.period),
        progress: core::progress_at(unix_now, params.period),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::totp::base32;

    const SECRET_B32: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    /// Simulated clock driven by the tests.
    #[derive(Clone, Default)]
    struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        fn at(seconds: u64) -> Self {
            Self(Arc::new(AtomicU64::new(seconds)))
        }

        fn set(&self, seconds: u64) {
            self.0.store(seconds, Ordering::Release);
        }
    }

    impl Clock for ManualClock {
        fn unix_now(&self) -> u64 {
            self.0.load(Ordering::Acquire)
        }
    }

    fn expected_code(unix: u64, digits: u8) -> String {
        core::totp_at(&base32::decode_lenient(SECRET_B32), 30, digits, unix).unwrap()
    }

    // ── Initial publication ──────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn publishes_initial_state_synchronously() {
        let clock = ManualClock::at(59);
        let sub = CodeSubscription::start_with_clock(SECRET_B32, clock);
        let state = sub.state();
        assert_eq!(state.code, expected_code(59, 6));
        assert_eq!(state.remaining_seconds, 1);
        assert!((state.progress - 29.0 / 30.0).abs() < 1e-9);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_publishes_placeholder() {
        let sub = CodeSubscription::start_with_clock("", ManualClock::at(0));
        assert_eq!(sub.state().code, "000000");
    }

    #[tokio::test(start_paused = true)]
    async fn eight_digit_placeholder_for_eight_digit_uri() {
        let sub = CodeSubscription::start_with_clock(
            "otpauth://totp/x?digits=8",
            ManualClock::at(0),
        );
        assert_eq!(sub.state().code, "00000000");
    }

    // ── Tick behaviour across a period ───────────────────────────

    #[tokio::test(start_paused = true)]
    async fn code_stable_within_period_then_rolls() {
        let clock = ManualClock::at(0);
        let sub = CodeSubscription::start_with_clock(SECRET_B32, clock.clone());
        let step0 = sub.state().code.clone();
        let mut rx = sub.watch();

        let mut last_progress = sub.state().progress;
        for t in [7u64, 15, 29] {
            clock.set(t);
            rx.changed().await.unwrap();
            let state = rx.borrow_and_update().clone();
            assert_eq!(state.code, step0, "code changed mid-period at t={t}");
            assert!(state.progress >= last_progress, "progress regressed at t={t}");
            last_progress = state.progress;
        }

        clock.set(30);
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert_ne!(state.code, step0);
        assert_eq!(state.code, expected_code(30, 6));
        assert!(state.progress < last_progress, "progress did not reset at the boundary");
    }

    // ── Input changes ────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn changing_input_publishes_new_state() {
        let clock = ManualClock::at(59);
        let sub = CodeSubscription::start_with_clock("", clock);
        assert_eq!(sub.state().code, "000000");

        let mut rx = sub.watch();
        sub.set_input(format!("otpauth://totp/x?secret={SECRET_B32}&digits=8"));
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.code, expected_code(59, 8));
        assert_eq!(state.code, "94287082");
    }

    // ── Teardown ─────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_stops_publication() {
        let clock = ManualClock::at(0);
        let sub = CodeSubscription::start_with_clock(SECRET_B32, clock.clone());
        let mut rx = sub.watch();

        clock.set(5);
        rx.changed().await.unwrap();

        sub.stop();
        clock.set(45);
        // The timer task is gone, so the sender side is dropped and no
        // further state can ever arrive.
        assert!(rx.changed().await.is_err());
    }
}

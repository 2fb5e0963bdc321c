use std::time::Duration;

use tokio::time::Instant;

use crate::probe::ProbeResult;

/// Mutable state of one poll session.
///
/// Exclusively owned by the poll controller for the lifetime of a single
/// `wait` call; never shared across invocations.
#[derive(Debug)]
pub struct PollSession {
    started: Instant,
    deadline: Duration,
    attempts: u32,
    last: Option<ProbeResult>,
}

impl PollSession {
    pub fn begin(deadline: Duration) -> Self {
        Self {
            started: Instant::now(),
            deadline,
            attempts: 0,
            last: None,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn last(&self) -> Option<&ProbeResult> {
        self.last.as_ref()
    }

    pub(crate) fn record(&mut self, result: ProbeResult) {
        self.attempts += 1;
        self.last = Some(result);
    }
}

/// Scheduler decision for the next probe attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Wait(Duration),
    Stop,
}

/// Capped exponential inter-attempt delay.
///
/// The delay doubles per attempt up to `cap`; `Stop` is returned once
/// the session's elapsed time reaches its deadline, which makes the
/// poll loop total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffPolicy {
    pub initial: Duration,
    pub cap: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            cap: Duration::from_secs(5),
        }
    }
}

impl BackoffPolicy {
    /// Constant inter-attempt delay.
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial: delay,
            cap: delay,
        }
    }

    /// Decide whether another attempt fits inside the session budget.
    pub fn next(&self, session: &PollSession) -> Decision {
        self.decide(session.elapsed(), session.deadline(), session.attempts())
    }

    /// Pure form of [`next`](Self::next).
    ///
    /// Monotonic in `elapsed`: once `Stop` is returned for a given
    /// elapsed value it is returned for every greater one with the same
    /// deadline.
    pub fn decide(&self, elapsed: Duration, deadline: Duration, attempt: u32) -> Decision {
        if elapsed >= deadline {
            return Decision::Stop;
        }
        let exp = attempt.saturating_sub(1).min(16);
        let delay = self
            .initial
            .saturating_mul(2u32.saturating_pow(exp))
            .min(self.cap);
        // Never sleep past the deadline; the next wake lands on it exactly.
        Decision::Wait(delay.min(deadline - elapsed))
    }
}

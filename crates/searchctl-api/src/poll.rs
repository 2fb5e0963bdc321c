use std::time::Duration;

use tracing::{debug, info};

use crate::backoff::{BackoffPolicy, Decision, PollSession};
use crate::client::ApiError;
use crate::endpoint::{Endpoint, ResolveError, ServiceKind, Targets};
use crate::probe::{HttpProbe, Probe, ProbeResult};

/// Default wall-clock budget for one [`wait_for_service`] call.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Default bound on a single probe attempt, distinct from the session
/// deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Terminal verdict of one poll session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service answered healthy at least once.
    Ready,
    /// The budget ran out while the service was reachable but not ready.
    TimedOut,
    /// The budget ran out without the service ever answering; carries
    /// the last observed transport failure.
    Failed(String),
}

/// Outcome plus how the session got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: Outcome,
    pub attempts: u32,
    pub elapsed: Duration,
}

/// Evaluator step: keep polling or end the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    Terminal(Outcome),
}

/// Interpret a single probe result.
///
/// `Healthy` ends the session immediately; both `Unhealthy` and
/// `Unreachable` keep the loop polling until the scheduler stops it.
pub fn evaluate(result: &ProbeResult) -> Step {
    match result {
        ProbeResult::Healthy => Step::Terminal(Outcome::Ready),
        ProbeResult::Unhealthy(_) | ProbeResult::Unreachable(_) => Step::Continue,
    }
}

/// Terminal verdict for an exhausted attempt budget.
///
/// A session that never got past transport failures reports `Failed`
/// with the last cause, so callers can tell "never came up" apart from
/// "came up but stayed unhealthy", which reports `TimedOut`.
fn exhausted(last: Option<&ProbeResult>) -> Outcome {
    match last {
        Some(ProbeResult::Unreachable(cause)) => Outcome::Failed(cause.clone()),
        _ => Outcome::TimedOut,
    }
}

/// Poll controller: the single blocking boundary callers go through.
#[derive(Debug, Clone)]
pub struct Poller<P> {
    probe: P,
    policy: BackoffPolicy,
    deadline: Duration,
}

impl<P: Probe> Poller<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            policy: BackoffPolicy::default(),
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Poll `endpoint` until it reports ready or the budget runs out.
    ///
    /// Owns the session for the whole call and always returns exactly
    /// one terminal verdict.
    pub async fn wait(&self, endpoint: &Endpoint) -> Verdict {
        let mut session = PollSession::begin(self.deadline);
        let outcome = loop {
            let result = self.probe.check(endpoint).await;
            session.record(result.clone());
            match &result {
                ProbeResult::Healthy => {}
                ProbeResult::Unhealthy(reason) => {
                    debug!(attempt = session.attempts(), %reason, "service not ready yet");
                }
                ProbeResult::Unreachable(cause) => {
                    debug!(attempt = session.attempts(), %cause, "service unreachable");
                }
            }
            if let Step::Terminal(outcome) = evaluate(&result) {
                break outcome;
            }
            match self.policy.next(&session) {
                Decision::Stop => break exhausted(session.last()),
                Decision::Wait(delay) => tokio::time::sleep(delay).await,
            }
            // The wait itself may have consumed the rest of the budget.
            if self.policy.next(&session) == Decision::Stop {
                break exhausted(session.last());
            }
        };
        Verdict {
            outcome,
            attempts: session.attempts(),
            elapsed: session.elapsed(),
        }
    }
}

/// Block until `kind` is ready, with the default probe, backoff policy,
/// and session deadline.
///
/// Resolver failures propagate immediately; no probe is issued for an
/// unconfigured service.
pub async fn wait_for_service(
    kind: ServiceKind,
    targets: &Targets,
) -> Result<Verdict, StatusError> {
    let endpoint = targets.resolve(kind)?;
    info!(service = %kind, url = %endpoint.url, "waiting for service");
    let probe = HttpProbe::new(DEFAULT_ATTEMPT_TIMEOUT)?;
    Ok(Poller::new(probe).wait(&endpoint).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_is_terminal_ready() {
        assert_eq!(
            evaluate(&ProbeResult::Healthy),
            Step::Terminal(Outcome::Ready)
        );
    }

    #[test]
    fn unhealthy_and_unreachable_continue() {
        assert_eq!(
            evaluate(&ProbeResult::Unhealthy("503".to_string())),
            Step::Continue
        );
        assert_eq!(
            evaluate(&ProbeResult::Unreachable("refused".to_string())),
            Step::Continue
        );
    }

    #[test]
    fn exhausted_unreachable_surfaces_the_cause() {
        let last = ProbeResult::Unreachable("connection refused".to_string());
        assert_eq!(
            exhausted(Some(&last)),
            Outcome::Failed("connection refused".to_string())
        );
    }

    #[test]
    fn exhausted_unhealthy_is_timed_out() {
        let last = ProbeResult::Unhealthy("still initializing (503)".to_string());
        assert_eq!(exhausted(Some(&last)), Outcome::TimedOut);
        assert_eq!(exhausted(None), Outcome::TimedOut);
    }
}

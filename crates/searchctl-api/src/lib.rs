//! Client-side readiness checks for searchctl services.
//!
//! The blocking poll loop lives in [`poll`]; [`probe`] issues single
//! bounded HTTP checks, [`endpoint`] maps logical service kinds onto
//! concrete URLs, and [`backoff`] decides when the next attempt happens.

pub mod backoff;
pub mod client;
pub mod endpoint;
pub mod poll;
pub mod probe;

pub use backoff::{BackoffPolicy, Decision, PollSession};
pub use client::{ApiError, HttpClient};
pub use endpoint::{Endpoint, ResolveError, ServiceKind, Targets};
pub use poll::{Outcome, Poller, StatusError, Step, Verdict, evaluate, wait_for_service};
pub use probe::{HttpProbe, Probe, ProbeResult};

use std::fmt;
use std::str::FromStr;

use url::Url;

/// Default base URL for the query/document container.
const DEFAULT_CONTAINER_TARGET: &str = "http://127.0.0.1:8080";
/// Default base URL for the deploy (config) server.
const DEFAULT_DEPLOY_TARGET: &str = "http://127.0.0.1:19071";

/// Readiness path served by both the container and the config server.
const STATUS_PATH: &str = "/ApplicationStatus";

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("unknown service {0:?} (expected query, document, or deploy)")]
    UnknownService(String),
    #[error("invalid target URL: {0}")]
    InvalidTarget(#[from] url::ParseError),
}

/// Logical service role being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Query,
    Document,
    Deploy,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Query => "query",
            ServiceKind::Document => "document",
            ServiceKind::Deploy => "deploy",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ServiceKind::Query),
            "document" => Ok(ServiceKind::Document),
            "deploy" => Ok(ServiceKind::Deploy),
            other => Err(ResolveError::UnknownService(other.to_string())),
        }
    }
}

/// Resolved probe target for one service kind.
///
/// Derived once per poll session and never mutated while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: ServiceKind,
    pub url: Url,
}

/// Base URLs the resolver maps service kinds onto.
///
/// Query and document checks share the container target; deploy checks
/// go to the config server. A kind whose target is unset resolves to
/// [`ResolveError::UnknownService`] without any I/O.
#[derive(Debug, Clone)]
pub struct Targets {
    pub container: Option<Url>,
    pub deploy: Option<Url>,
}

impl Default for Targets {
    fn default() -> Self {
        // The defaults are compile-time constants; parsing them cannot fail.
        Self {
            container: Some(Url::parse(DEFAULT_CONTAINER_TARGET).expect("valid default target")),
            deploy: Some(Url::parse(DEFAULT_DEPLOY_TARGET).expect("valid default target")),
        }
    }
}

impl Targets {
    /// Build targets from explicit base URLs.
    pub fn new(container: &str, deploy: &str) -> Result<Self, ResolveError> {
        Ok(Self {
            container: Some(Url::parse(container)?),
            deploy: Some(Url::parse(deploy)?),
        })
    }

    /// Defaults overridden by `SEARCHCTL_TARGET` and
    /// `SEARCHCTL_DEPLOY_TARGET` when set.
    pub fn from_env() -> Result<Self, ResolveError> {
        let mut targets = Self::default();
        if let Ok(container) = std::env::var("SEARCHCTL_TARGET") {
            targets.container = Some(Url::parse(&container)?);
        }
        if let Ok(deploy) = std::env::var("SEARCHCTL_DEPLOY_TARGET") {
            targets.deploy = Some(Url::parse(&deploy)?);
        }
        Ok(targets)
    }

    /// Map a service kind to its readiness endpoint. Pure; no I/O.
    pub fn resolve(&self, kind: ServiceKind) -> Result<Endpoint, ResolveError> {
        let base = match kind {
            ServiceKind::Query | ServiceKind::Document => self.container.as_ref(),
            ServiceKind::Deploy => self.deploy.as_ref(),
        }
        .ok_or_else(|| ResolveError::UnknownService(kind.name().to_string()))?;
        let url = base.join(STATUS_PATH)?;
        Ok(Endpoint { kind, url })
    }
}

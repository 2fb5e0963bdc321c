use std::time::Duration;

use searchctl_api::{
    HttpProbe, Probe, ProbeResult, ResolveError, ServiceKind, StatusError, Targets,
    wait_for_service,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

async fn probe_against(server: &MockServer, kind: ServiceKind) -> ProbeResult {
    let targets = Targets::new(&server.uri(), &server.uri()).unwrap();
    let endpoint = targets.resolve(kind).unwrap();
    HttpProbe::new(ATTEMPT_TIMEOUT).unwrap().check(&endpoint).await
}

// ---------------------------------------------------------------------------
// HttpProbe classification
// ---------------------------------------------------------------------------

mod http_probe {
    use super::*;

    #[tokio::test]
    async fn status_up_is_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": {"code": "up"}})),
            )
            .mount(&server)
            .await;

        let result = probe_against(&server, ServiceKind::Query).await;
        assert_eq!(result, ProbeResult::Healthy);
    }

    #[tokio::test]
    async fn plain_200_without_status_block_is_healthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .mount(&server)
            .await;

        let result = probe_against(&server, ServiceKind::Deploy).await;
        assert_eq!(result, ProbeResult::Healthy);
    }

    #[tokio::test]
    async fn status_down_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": {"code": "down"}})),
            )
            .mount(&server)
            .await;

        let result = probe_against(&server, ServiceKind::Query).await;
        match result {
            ProbeResult::Unhealthy(reason) => assert!(reason.contains("down"), "{reason}"),
            other => panic!("expected Unhealthy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initializing_503_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = probe_against(&server, ServiceKind::Document).await;
        match result {
            ProbeResult::Unhealthy(reason) => assert!(reason.contains("503"), "{reason}"),
            other => panic!("expected Unhealthy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_status_is_unhealthy() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = probe_against(&server, ServiceKind::Query).await;
        match result {
            ProbeResult::Unhealthy(reason) => assert!(reason.contains("404"), "{reason}"),
            other => panic!("expected Unhealthy, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refused_connection_is_unreachable() {
        // Grab a live port, then free it so the connection is refused.
        // (A dropped wiremock MockServer returns to a pool and keeps
        // listening, so bind a plain listener instead.)
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let targets = Targets::new(&uri, &uri).unwrap();
        let endpoint = targets.resolve(ServiceKind::Query).unwrap();
        let result = HttpProbe::new(ATTEMPT_TIMEOUT)
            .unwrap()
            .check(&endpoint)
            .await;
        assert!(
            matches!(result, ProbeResult::Unreachable(_)),
            "expected Unreachable, got {result:?}"
        );
    }

    #[tokio::test]
    async fn slow_response_is_unreachable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let targets = Targets::new(&server.uri(), &server.uri()).unwrap();
        let endpoint = targets.resolve(ServiceKind::Query).unwrap();
        let result = HttpProbe::new(Duration::from_millis(50))
            .unwrap()
            .check(&endpoint)
            .await;
        match result {
            ProbeResult::Unreachable(cause) => {
                assert!(cause.contains("timed out"), "{cause}");
            }
            other => panic!("expected Unreachable, got {other:?}"),
        }
    }
}

// ---------------------------------------------------------------------------
// wait_for_service end to end
// ---------------------------------------------------------------------------

mod wait {
    use super::*;

    #[tokio::test]
    async fn ready_service_resolves_in_one_attempt() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ApplicationStatus"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"status": {"code": "up"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let targets = Targets::new(&server.uri(), &server.uri()).unwrap();
        let verdict = wait_for_service(ServiceKind::Query, &targets).await.unwrap();
        assert_eq!(verdict.outcome, searchctl_api::Outcome::Ready);
        assert_eq!(verdict.attempts, 1);
    }

    #[tokio::test]
    async fn unconfigured_service_never_probes() {
        let server = MockServer::start().await;
        let mut targets = Targets::new(&server.uri(), &server.uri()).unwrap();
        targets.deploy = None;

        let err = wait_for_service(ServiceKind::Deploy, &targets)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StatusError::Resolve(ResolveError::UnknownService(_))
        ));
        assert!(
            server.received_requests().await.unwrap().is_empty(),
            "resolver failure must not reach the network"
        );
    }
}

// Profile channel client against an in-process WebSocket service: reply,
// error, timeout and connect-failure paths, connection reuse.

mod common;

use common::{spawn_profile_service, ProfileReply};
use crm_edge::clients::ProfileSocketClient;
use crm_edge::crm::ProfileSource;
use crm_edge::error::AppError;
use std::sync::atomic::Ordering;
use std::time::Duration;

#[tokio::test]
async fn resolves_profile_by_customer_route() {
    let service = spawn_profile_service(|_| ProfileReply::Data).await;
    let client = ProfileSocketClient::new(service.addr.clone(), Duration::from_secs(2));

    let profile = client.profile_for_customer(1).await.expect("profile");
    assert_eq!(profile.id, 10);
    assert_eq!(profile.customer_id, 1);
}

#[tokio::test]
async fn sequential_requests_reuse_one_connection() {
    let service = spawn_profile_service(|_| ProfileReply::Data).await;
    let client = ProfileSocketClient::new(service.addr.clone(), Duration::from_secs(2));

    for customer_id in 1..=3 {
        let profile = client
            .profile_for_customer(customer_id)
            .await
            .expect("profile");
        assert_eq!(profile.customer_id, customer_id);
    }

    assert_eq!(service.connections.load(Ordering::SeqCst), 1);
    assert_eq!(service.requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn error_reply_surfaces_as_upstream_error() {
    let service = spawn_profile_service(|_| ProfileReply::Error).await;
    let client = ProfileSocketClient::new(service.addr.clone(), Duration::from_secs(2));

    let err = client
        .profile_for_customer(5)
        .await
        .expect_err("explicit error reply should fail the call");
    assert!(matches!(err, AppError::UpstreamError(_)), "got {:?}", err);
}

#[tokio::test]
async fn silent_service_surfaces_as_upstream_timeout() {
    let service = spawn_profile_service(|_| ProfileReply::Silent).await;
    let client = ProfileSocketClient::new(service.addr.clone(), Duration::from_millis(200));

    let err = client
        .profile_for_customer(1)
        .await
        .expect_err("silent service should time the call out");
    assert!(matches!(err, AppError::UpstreamTimeout(_)), "got {:?}", err);
}

#[tokio::test]
async fn refused_connection_surfaces_as_upstream_unavailable() {
    // Grab a free port, then close the listener so nothing accepts
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = format!(
        "127.0.0.1:{}",
        listener.local_addr().expect("local addr").port()
    );
    drop(listener);

    let client = ProfileSocketClient::new(addr, Duration::from_secs(1));
    let err = client
        .profile_for_customer(1)
        .await
        .expect_err("connect should be refused");
    assert!(
        matches!(err, AppError::UpstreamUnavailable(_)),
        "got {:?}",
        err
    );
}

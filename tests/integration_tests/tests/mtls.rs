use std::time::Duration;

use greeter::{ChannelFactory, CredentialRole, Error, SecretsDir, SecurityMode};
use integration_tests::TestServer;
use tokio::net::TcpListener;

#[tokio::test]
async fn mutually_authenticated_round_trip() {
    integration_tests::trace_init();

    let server = TestServer::spawn(SecurityMode::MutuallyAuthenticated).await;

    let message = ChannelFactory::default()
        .greet(
            server.endpoint(),
            SecurityMode::MutuallyAuthenticated,
            &integration_tests::secrets(),
            "python client",
        )
        .await
        .unwrap();

    assert_eq!(message, "Hello python client");

    server.stop().await;
}

#[tokio::test]
async fn server_rejects_client_without_certificate() {
    let server = TestServer::spawn(SecurityMode::MutuallyAuthenticated).await;

    let err = ChannelFactory::default()
        .greet(
            server.endpoint(),
            SecurityMode::ServerAuthenticated,
            &integration_tests::secrets(),
            "anonymous",
        )
        .await
        .unwrap_err();

    assert!(err.status().is_some(), "{:?}", err);

    server.stop().await;
}

#[tokio::test]
async fn missing_secrets_fail_before_connecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dir = SecretsDir::new("/this/path/does/not/exist");

    let err = ChannelFactory::default()
        .open_channel(
            addr.to_string().into(),
            SecurityMode::MutuallyAuthenticated,
            &dir,
        )
        .await
        .unwrap_err();

    match err {
        Error::CredentialLoad(e) => {
            assert_eq!(e.role(), CredentialRole::RootCertificate);
            assert_eq!(e.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected credential load error, got {:?}", other),
    }

    let accepted = tokio::time::timeout(Duration::from_millis(100), listener.accept()).await;
    assert!(accepted.is_err(), "no connection should have been made");
}

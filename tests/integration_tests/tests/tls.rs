use greeter::{ChannelFactory, ChannelOptions, SecurityMode};
use integration_tests::TestServer;

#[tokio::test]
async fn server_authenticated_round_trip() {
    integration_tests::trace_init();

    let server = TestServer::spawn(SecurityMode::ServerAuthenticated).await;

    let message = ChannelFactory::default()
        .greet(
            server.endpoint(),
            SecurityMode::ServerAuthenticated,
            &integration_tests::secrets(),
            "python client",
        )
        .await
        .unwrap();

    assert_eq!(message, "Hello python client");

    server.stop().await;
}

#[tokio::test]
async fn verifies_against_domain_name_override() {
    let server = TestServer::spawn(SecurityMode::ServerAuthenticated).await;

    let factory =
        ChannelFactory::default().options(ChannelOptions::default().domain_name("localhost"));

    let message = factory
        .greet(
            server.endpoint(),
            SecurityMode::ServerAuthenticated,
            &integration_tests::secrets(),
            "localhost",
        )
        .await
        .unwrap();

    assert_eq!(message, "Hello localhost");

    server.stop().await;
}

#[tokio::test]
async fn wrong_domain_name_fails_the_call() {
    let server = TestServer::spawn(SecurityMode::ServerAuthenticated).await;

    let factory = ChannelFactory::default()
        .options(ChannelOptions::default().domain_name("not-the-server.example"));

    let err = factory
        .greet(
            server.endpoint(),
            SecurityMode::ServerAuthenticated,
            &integration_tests::secrets(),
            "nobody",
        )
        .await
        .unwrap_err();

    assert!(err.status().is_some(), "{:?}", err);

    server.stop().await;
}

#[tokio::test]
async fn tls_client_against_plaintext_server_fails() {
    let server = TestServer::spawn(SecurityMode::Plaintext).await;

    let err = ChannelFactory::default()
        .greet(
            server.endpoint(),
            SecurityMode::ServerAuthenticated,
            &integration_tests::secrets(),
            "nobody",
        )
        .await
        .unwrap_err();

    assert!(err.status().is_some(), "{:?}", err);

    server.stop().await;
}

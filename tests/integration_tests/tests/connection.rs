use std::time::Duration;

use greeter::{pb::HelloRequest, ChannelFactory, ChannelOptions, SecurityMode};
use integration_tests::{NoCredentials, TestServer};
use tonic::Code;

#[tokio::test]
async fn call_after_server_stopped_is_unavailable() {
    let server = TestServer::spawn(SecurityMode::Plaintext).await;

    let mut channel = ChannelFactory::default()
        .open_channel(server.endpoint(), SecurityMode::Plaintext, &NoCredentials)
        .await
        .unwrap();

    channel
        .invoke(HelloRequest {
            name: "first".into(),
        })
        .await
        .unwrap();

    server.stop().await;
    tokio::time::sleep(Duration::from_millis(100)).await;

    let err = channel
        .invoke(HelloRequest {
            name: "second".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.status().map(|s| s.code()), Some(Code::Unavailable));
}

#[tokio::test]
async fn open_channel_does_not_connect() {
    let factory = ChannelFactory::default()
        .options(ChannelOptions::default().connect_timeout(Duration::from_millis(500)));

    // Nothing listens on this port, opening still succeeds.
    let channel = factory
        .open_channel(
            "127.0.0.1:1".into(),
            SecurityMode::Plaintext,
            &NoCredentials,
        )
        .await;

    assert!(channel.is_ok());
}

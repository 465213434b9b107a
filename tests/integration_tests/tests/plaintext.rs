use greeter::{pb::HelloRequest, ChannelFactory, ChannelState, SecurityMode};
use integration_tests::{NoCredentials, TestServer};

#[tokio::test]
async fn plaintext_round_trip_loads_no_credentials() {
    integration_tests::trace_init();

    let server = TestServer::spawn(SecurityMode::Plaintext).await;

    let message = ChannelFactory::default()
        .greet(
            server.endpoint(),
            SecurityMode::Plaintext,
            &NoCredentials,
            "python client",
        )
        .await
        .unwrap();

    assert_eq!(message, "Hello python client");

    server.stop().await;
}

#[tokio::test]
async fn channel_serves_several_calls_until_closed() {
    let server = TestServer::spawn(SecurityMode::Plaintext).await;

    let mut channel = ChannelFactory::default()
        .open_channel(server.endpoint(), SecurityMode::Plaintext, &NoCredentials)
        .await
        .unwrap();

    for name in ["first", "second"] {
        let reply = channel
            .invoke(HelloRequest { name: name.into() })
            .await
            .unwrap();
        assert_eq!(reply.message, format!("Hello {}", name));
    }

    channel.close();
    assert_eq!(channel.state(), ChannelState::Closed);

    let err = channel
        .invoke(HelloRequest {
            name: "third".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, greeter::Error::UseAfterClose));

    server.stop().await;
}

#[tokio::test]
async fn scheme_in_url_is_ignored() {
    let server = TestServer::spawn(SecurityMode::Plaintext).await;

    let message = ChannelFactory::default()
        .greet(
            format!("https://{}", server.addr()).into(),
            SecurityMode::Plaintext,
            &NoCredentials,
            "scheme",
        )
        .await
        .unwrap();

    assert_eq!(message, "Hello scheme");

    server.stop().await;
}

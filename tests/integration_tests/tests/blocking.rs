use greeter::{blocking, ChannelFactory, SecurityMode};
use integration_tests::TestServer;
use tokio::runtime::Runtime;

#[test]
fn blocking_greet_from_plain_thread() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(TestServer::spawn(SecurityMode::MutuallyAuthenticated));
    let endpoint = server.endpoint();

    let message = std::thread::spawn(move || {
        blocking::greet(
            &ChannelFactory::default(),
            endpoint,
            SecurityMode::MutuallyAuthenticated,
            &integration_tests::secrets(),
            "blocking client",
        )
    })
    .join()
    .unwrap()
    .unwrap();

    assert_eq!(message, "Hello blocking client");

    rt.block_on(server.stop());
}

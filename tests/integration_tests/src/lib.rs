use std::net::SocketAddr;

use greeter::{
    server, CredentialRole, CredentialSource, Endpoint, Error, FileAccessError, SecretsDir,
    SecurityMode, TracingSink,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// The fixture PKI checked in next to the `greeter` crate.
pub fn secrets() -> SecretsDir {
    SecretsDir::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../greeter/data/secrets"
    ))
}

pub fn trace_init() {
    let _ = tracing_subscriber::fmt::try_init();
}

/// A credential source that must never be read from.
#[derive(Debug)]
pub struct NoCredentials;

impl CredentialSource for NoCredentials {
    fn load(&self, role: CredentialRole) -> Result<Vec<u8>, FileAccessError> {
        panic!("unexpected read of {}", role);
    }
}

/// A greeter server running on an ephemeral local port.
#[derive(Debug)]
pub struct TestServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl TestServer {
    pub async fn spawn(mode: SecurityMode) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let secrets = secrets();
            server::serve(listener, mode, &secrets, &TracingSink, async {
                drop(rx.await)
            })
            .await
        });

        TestServer {
            addr,
            shutdown,
            handle,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.addr.to_string())
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap().unwrap();
    }
}

//! The greeter service and a server for it.

use std::future::Future;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::{
    transport::{Certificate, Identity, Server, ServerTlsConfig},
    Request, Response, Status,
};

use crate::{
    credentials::{check_certificates, check_private_key, CredentialRole, CredentialSource},
    error::Error,
    event::{Event, EventSink},
    pb::{
        greeter_server::{Greeter, GreeterServer},
        HelloReply, HelloRequest,
    },
    security::SecurityMode,
};

/// Answers `SayHello` with `Hello <name>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreeterService;

#[tonic::async_trait]
impl Greeter for GreeterService {
    async fn say_hello(&self, request: Request<HelloRequest>) -> Result<Response<HelloReply>, Status> {
        tracing::info!(remote = ?request.remote_addr(), "Greeter.SayHello");

        let reply = HelloReply {
            message: format!("Hello {}", request.into_inner().name),
        };

        Ok(Response::new(reply))
    }
}

/// Load the server side TLS settings for `mode`.
///
/// Server-authenticated TLS needs the server certificate and key; mutual TLS
/// additionally requires clients to present a certificate signed by the root
/// certificate. Plaintext returns `None` without reading anything.
pub fn tls_config<S>(mode: SecurityMode, source: &S) -> Result<Option<ServerTlsConfig>, Error>
where
    S: CredentialSource + ?Sized,
{
    if !mode.is_tls() {
        return Ok(None);
    }

    let certificate = source.load(CredentialRole::ServerCertificate)?;
    let private_key = source.load(CredentialRole::ServerPrivateKey)?;
    let client_ca = match mode {
        SecurityMode::MutuallyAuthenticated => Some(source.load(CredentialRole::RootCertificate)?),
        _ => None,
    };

    check_certificates(CredentialRole::ServerCertificate, &certificate)
        .and_then(|()| check_private_key(CredentialRole::ServerPrivateKey, &private_key))
        .and_then(|()| match &client_ca {
            Some(ca) => check_certificates(CredentialRole::RootCertificate, ca),
            None => Ok(()),
        })
        .map_err(|e| Error::construction("server", e))?;

    let mut tls = ServerTlsConfig::new().identity(Identity::from_pem(certificate, private_key));
    if let Some(ca) = client_ca {
        tls = tls.client_ca_root(Certificate::from_pem(ca));
    }

    Ok(Some(tls))
}

/// Serve [`GreeterService`] on `listener` until `shutdown` completes.
pub async fn serve<S, F>(
    listener: TcpListener,
    mode: SecurityMode,
    source: &S,
    sink: &dyn EventSink,
    shutdown: F,
) -> Result<(), Error>
where
    S: CredentialSource + ?Sized,
    F: Future<Output = ()>,
{
    let address = match listener.local_addr() {
        Ok(addr) => addr.to_string(),
        Err(_) => String::from("<unknown>"),
    };

    let mut builder = Server::builder();
    if let Some(tls) = tls_config(mode, source)? {
        builder = builder
            .tls_config(tls)
            .map_err(|e| Error::construction(address.as_str(), e))?;
    }

    sink.emit(&Event::Listening { address, mode });

    builder
        .add_service(GreeterServer::new(GreeterService))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown)
        .await
        .map_err(Error::Serve)
}

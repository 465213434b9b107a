//! Channel construction and the `SayHello` call.
//!
//! [`ChannelFactory::open_channel`] loads the credentials a [`SecurityMode`]
//! needs, builds the transport and hands back a [`GreeterChannel`] owned by
//! the caller. The channel connects lazily, so opening it never touches the
//! network; the first [`GreeterChannel::invoke`] does.

use std::{fmt, sync::Arc, time::Duration};

use tonic::transport::{Certificate, Channel, ClientTlsConfig, Identity};

use crate::{
    credentials::{check_certificates, check_private_key, CredentialBundle, CredentialRole, CredentialSource},
    error::Error,
    event::{Event, EventSink, TracingSink},
    pb::{greeter_client::GreeterClient, HelloReply, HelloRequest},
    security::SecurityMode,
};

/// Network address of the greeter service.
///
/// Given as `host:port`. A leading `http://` or `https://` is accepted and
/// ignored, the scheme always follows the [`SecurityMode`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(String);

impl Endpoint {
    /// Create an endpoint from an address such as `localhost:8080`.
    pub fn new(address: impl Into<String>) -> Self {
        Endpoint(address.into())
    }

    /// The address as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn authority(&self) -> &str {
        let address = match self.0.split_once("://") {
            Some((_, rest)) => rest,
            None => &self.0,
        };
        address.trim_end_matches('/')
    }

    fn transport(&self, mode: SecurityMode) -> Result<tonic::transport::Endpoint, Error> {
        let uri = format!("{}://{}", mode.scheme(), self.authority());
        tonic::transport::Endpoint::from_shared(uri).map_err(|e| Error::construction(self.as_str(), e))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Endpoint {
    fn from(address: &str) -> Self {
        Endpoint::new(address)
    }
}

impl From<String> for Endpoint {
    fn from(address: String) -> Self {
        Endpoint::new(address)
    }
}

/// Optional transport settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelOptions {
    connect_timeout: Option<Duration>,
    domain_name: Option<String>,
}

impl ChannelOptions {
    /// Bound the time spent establishing the connection. Unbounded by default.
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        ChannelOptions {
            connect_timeout: Some(timeout),
            ..self
        }
    }

    /// Verify the server certificate against `domain_name` instead of the
    /// endpoint host.
    pub fn domain_name(self, domain_name: impl Into<String>) -> Self {
        ChannelOptions {
            domain_name: Some(domain_name.into()),
            ..self
        }
    }
}

/// Builds [`GreeterChannel`]s and reports what it does to an [`EventSink`].
#[derive(Clone)]
pub struct ChannelFactory {
    sink: Arc<dyn EventSink>,
    options: ChannelOptions,
}

impl ChannelFactory {
    /// Create a factory reporting to `sink`.
    pub fn new(sink: impl EventSink) -> Self {
        Self::with_sink(Arc::new(sink))
    }

    /// Create a factory reporting to a shared `sink`.
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        ChannelFactory {
            sink,
            options: ChannelOptions::default(),
        }
    }

    /// Apply `options` to every channel built by this factory.
    pub fn options(self, options: ChannelOptions) -> Self {
        ChannelFactory { options, ..self }
    }

    /// Open a channel to `endpoint` secured according to `mode`.
    ///
    /// Only the credentials `mode` requires are read from `source`, and they
    /// are all read before any transport is built: a missing file is always
    /// reported as [`Error::CredentialLoad`].
    pub async fn open_channel<S>(
        &self,
        endpoint: Endpoint,
        mode: SecurityMode,
        source: &S,
    ) -> Result<GreeterChannel, Error>
    where
        S: CredentialSource + ?Sized,
    {
        let credentials = CredentialBundle::load(mode, source)?;
        let channel = self.connect_lazy(&endpoint, mode, credentials)?;

        self.sink.emit(&Event::ChannelOpened {
            endpoint: endpoint.to_string(),
            mode,
        });

        Ok(GreeterChannel {
            endpoint,
            mode,
            sink: self.sink.clone(),
            client: Some(GreeterClient::new(channel)),
        })
    }

    /// Open a channel, send one `SayHello` for `name` and release the channel.
    ///
    /// Returns the greeting sent back by the server.
    pub async fn greet<S>(
        &self,
        endpoint: Endpoint,
        mode: SecurityMode,
        source: &S,
        name: impl Into<String>,
    ) -> Result<String, Error>
    where
        S: CredentialSource + ?Sized,
    {
        let mut channel = self.open_channel(endpoint, mode, source).await?;
        let reply = channel.invoke(HelloRequest { name: name.into() }).await?;
        Ok(reply.message)
    }

    fn connect_lazy(
        &self,
        endpoint: &Endpoint,
        mode: SecurityMode,
        credentials: CredentialBundle,
    ) -> Result<Channel, Error> {
        let mut transport = endpoint.transport(mode)?;

        if let Some(timeout) = self.options.connect_timeout {
            transport = transport.connect_timeout(timeout);
        }

        let tls = match credentials {
            CredentialBundle::Empty => None,
            CredentialBundle::RootOnly { root } => {
                Some(ClientTlsConfig::new().ca_certificate(root_certificate(endpoint, root)?))
            }
            CredentialBundle::Mutual {
                root,
                certificate,
                private_key,
            } => Some(
                ClientTlsConfig::new()
                    .ca_certificate(root_certificate(endpoint, root)?)
                    .identity(client_identity(endpoint, certificate, private_key)?),
            ),
        };

        if let Some(mut tls) = tls {
            if let Some(domain_name) = &self.options.domain_name {
                tls = tls.domain_name(domain_name.clone());
            }
            transport = transport
                .tls_config(tls)
                .map_err(|e| Error::construction(endpoint.as_str(), e))?;
        }

        Ok(transport.connect_lazy())
    }
}

impl Default for ChannelFactory {
    fn default() -> Self {
        Self::new(TracingSink)
    }
}

impl fmt::Debug for ChannelFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelFactory")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn root_certificate(endpoint: &Endpoint, pem: Vec<u8>) -> Result<Certificate, Error> {
    check_certificates(CredentialRole::RootCertificate, &pem)
        .map_err(|e| Error::construction(endpoint.as_str(), e))?;
    Ok(Certificate::from_pem(pem))
}

fn client_identity(
    endpoint: &Endpoint,
    certificate: Vec<u8>,
    private_key: Vec<u8>,
) -> Result<Identity, Error> {
    check_certificates(CredentialRole::ClientCertificate, &certificate)
        .and_then(|()| check_private_key(CredentialRole::ClientPrivateKey, &private_key))
        .map_err(|e| Error::construction(endpoint.as_str(), e))?;
    Ok(Identity::from_pem(certificate, private_key))
}

/// Lifecycle state of a [`GreeterChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// Calls may be made.
    Open,
    /// The channel was released, calls fail with [`Error::UseAfterClose`].
    Closed,
}

/// An open channel to the greeter service.
///
/// The channel is released by [`GreeterChannel::close`] or when it is
/// dropped, whichever comes first.
pub struct GreeterChannel {
    endpoint: Endpoint,
    mode: SecurityMode,
    sink: Arc<dyn EventSink>,
    client: Option<GreeterClient<Channel>>,
}

impl GreeterChannel {
    /// The endpoint this channel is bound to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// How this channel is secured.
    pub fn mode(&self) -> SecurityMode {
        self.mode
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        if self.client.is_some() {
            ChannelState::Open
        } else {
            ChannelState::Closed
        }
    }

    /// Send `request` and wait for the reply.
    ///
    /// No deadline is applied to the call.
    pub async fn invoke(&mut self, request: HelloRequest) -> Result<HelloReply, Error> {
        let client = self.client.as_mut().ok_or(Error::UseAfterClose)?;

        self.sink.emit(&Event::RequestSent {
            endpoint: self.endpoint.to_string(),
        });

        let response = client.say_hello(request).await.map_err(Error::RemoteCall)?;

        self.sink.emit(&Event::ResponseReceived {
            endpoint: self.endpoint.to_string(),
        });

        Ok(response.into_inner())
    }

    /// Release the channel. Closing twice is a no-op.
    pub fn close(&mut self) {
        if self.client.take().is_some() {
            self.sink.emit(&Event::ChannelClosed {
                endpoint: self.endpoint.to_string(),
            });
        }
    }
}

impl Drop for GreeterChannel {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for GreeterChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreeterChannel")
            .field("endpoint", &self.endpoint)
            .field("mode", &self.mode)
            .field("state", &self.state())
            .finish()
    }
}

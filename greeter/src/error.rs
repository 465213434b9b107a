use crate::credentials::FileAccessError;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while building a channel, calling the service or serving it.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A credential file required by the security mode could not be read.
    #[error("failed to load credentials: {0}")]
    CredentialLoad(#[source] FileAccessError),

    /// The endpoint or the credential material was rejected while building
    /// the transport.
    #[error("failed to construct channel to {endpoint}: {source}")]
    ChannelConstruction {
        /// Endpoint the channel was being built for.
        endpoint: String,
        /// Underlying cause.
        #[source]
        source: BoxError,
    },

    /// The remote call did not complete.
    #[error("remote call failed: {0}")]
    RemoteCall(#[source] tonic::Status),

    /// The channel was already closed.
    #[error("channel is closed")]
    UseAfterClose,

    /// The server transport failed.
    #[error("server error: {0}")]
    Serve(#[source] tonic::transport::Error),

    /// A runtime for the blocking client could not be created.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl Error {
    pub(crate) fn construction(endpoint: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::ChannelConstruction {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Returns the gRPC status of a failed remote call.
    pub fn status(&self) -> Option<&tonic::Status> {
        match self {
            Error::RemoteCall(status) => Some(status),
            _ => None,
        }
    }

    /// Returns `true` if a credential file could not be read.
    pub fn is_credential_load(&self) -> bool {
        matches!(self, Error::CredentialLoad(_))
    }

    /// Returns `true` if the transport could not be built.
    pub fn is_channel_construction(&self) -> bool {
        matches!(self, Error::ChannelConstruction { .. })
    }
}

impl From<FileAccessError> for Error {
    fn from(err: FileAccessError) -> Self {
        Error::CredentialLoad(err)
    }
}

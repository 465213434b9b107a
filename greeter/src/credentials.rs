//! Certificate and key material.
//!
//! Credentials live under a base directory (`/secrets` by default) in a fixed
//! layout:
//!
//! | role                | path                         |
//! |---------------------|------------------------------|
//! | root certificate    | `root/public/ca.cert`        |
//! | client certificate  | `client/public/service.pem`  |
//! | client private key  | `client/private/service.key` |
//! | server certificate  | `server/public/service.pem`  |
//! | server private key  | `server/private/service.key` |
//!
//! Nothing is cached, every channel reads its files again.

use std::{
    fmt, io,
    path::{Path, PathBuf},
};

use crate::{error::BoxError, security::SecurityMode};

/// A credential artifact and its place in the secrets layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialRole {
    /// Root of trust used to verify the peer's certificate.
    RootCertificate,
    /// Certificate chain the client presents under mTLS.
    ClientCertificate,
    /// Private key matching [`CredentialRole::ClientCertificate`].
    ClientPrivateKey,
    /// Certificate chain the server presents.
    ServerCertificate,
    /// Private key matching [`CredentialRole::ServerCertificate`].
    ServerPrivateKey,
}

impl CredentialRole {
    /// Path of this artifact relative to the base directory.
    pub const fn relative_path(self) -> &'static str {
        match self {
            CredentialRole::RootCertificate => "root/public/ca.cert",
            CredentialRole::ClientCertificate => "client/public/service.pem",
            CredentialRole::ClientPrivateKey => "client/private/service.key",
            CredentialRole::ServerCertificate => "server/public/service.pem",
            CredentialRole::ServerPrivateKey => "server/private/service.key",
        }
    }
}

impl fmt::Display for CredentialRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CredentialRole::RootCertificate => "root certificate",
            CredentialRole::ClientCertificate => "client certificate",
            CredentialRole::ClientPrivateKey => "client private key",
            CredentialRole::ServerCertificate => "server certificate",
            CredentialRole::ServerPrivateKey => "server private key",
        };
        f.write_str(name)
    }
}

/// A credential file was missing or unreadable.
#[derive(Debug, thiserror::Error)]
#[error("unable to read {role} at {}", .path.display())]
pub struct FileAccessError {
    role: CredentialRole,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl FileAccessError {
    /// Create a new error for `role` read from `path`.
    pub fn new(role: CredentialRole, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            role,
            path: path.into(),
            source,
        }
    }

    /// The artifact that failed to load.
    pub fn role(&self) -> CredentialRole {
        self.role
    }

    /// The path that was read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The kind of the underlying I/O error.
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}

/// Something credentials can be read from.
pub trait CredentialSource {
    /// Returns the raw bytes of the artifact for `role`.
    fn load(&self, role: CredentialRole) -> Result<Vec<u8>, FileAccessError>;
}

impl<T: CredentialSource + ?Sized> CredentialSource for &T {
    fn load(&self, role: CredentialRole) -> Result<Vec<u8>, FileAccessError> {
        (**self).load(role)
    }
}

/// Reads credentials from the fixed layout under a base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretsDir {
    base: PathBuf,
}

impl SecretsDir {
    /// Uses `base` as the root of the layout.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The base directory.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of the artifact for `role`.
    pub fn path_of(&self, role: CredentialRole) -> PathBuf {
        self.base.join(role.relative_path())
    }
}

impl Default for SecretsDir {
    fn default() -> Self {
        Self::new(crate::DEFAULT_SECRETS_PATH)
    }
}

impl CredentialSource for SecretsDir {
    fn load(&self, role: CredentialRole) -> Result<Vec<u8>, FileAccessError> {
        let path = self.path_of(role);
        std::fs::read(&path).map_err(|e| FileAccessError::new(role, path, e))
    }
}

/// The credentials a client needs for one [`SecurityMode`].
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialBundle {
    /// Plaintext, nothing to load.
    Empty,
    /// Server-authenticated TLS.
    RootOnly {
        /// PEM encoded root certificate.
        root: Vec<u8>,
    },
    /// Mutual TLS.
    Mutual {
        /// PEM encoded root certificate.
        root: Vec<u8>,
        /// PEM encoded client certificate chain.
        certificate: Vec<u8>,
        /// PEM encoded client private key.
        private_key: Vec<u8>,
    },
}

impl CredentialBundle {
    /// Reads exactly the artifacts `mode` requires from `source`.
    pub fn load<S>(mode: SecurityMode, source: &S) -> Result<Self, FileAccessError>
    where
        S: CredentialSource + ?Sized,
    {
        let bundle = match mode {
            SecurityMode::Plaintext => CredentialBundle::Empty,
            SecurityMode::ServerAuthenticated => CredentialBundle::RootOnly {
                root: source.load(CredentialRole::RootCertificate)?,
            },
            SecurityMode::MutuallyAuthenticated => CredentialBundle::Mutual {
                root: source.load(CredentialRole::RootCertificate)?,
                certificate: source.load(CredentialRole::ClientCertificate)?,
                private_key: source.load(CredentialRole::ClientPrivateKey)?,
            },
        };

        Ok(bundle)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no PEM encoded {0} found")]
pub(crate) struct MissingPem(pub(crate) CredentialRole);

/// Checks that `pem` holds at least one certificate.
pub(crate) fn check_certificates(role: CredentialRole, pem: &[u8]) -> Result<(), BoxError> {
    let mut reader = pem;
    let result = match rustls_pemfile::certs(&mut reader).next() {
        Some(Ok(_)) => Ok(()),
        Some(Err(e)) => Err(e.into()),
        None => Err(MissingPem(role).into()),
    };
    result
}

/// Checks that `pem` holds a private key.
pub(crate) fn check_private_key(role: CredentialRole, pem: &[u8]) -> Result<(), BoxError> {
    let mut reader = pem;
    match rustls_pemfile::private_key(&mut reader)? {
        Some(_) => Ok(()),
        None => Err(MissingPem(role).into()),
    }
}

impl fmt::Debug for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialBundle::Empty => f.write_str("Empty"),
            CredentialBundle::RootOnly { root } => f
                .debug_struct("RootOnly")
                .field("root", &format_args!("{} bytes", root.len()))
                .finish(),
            CredentialBundle::Mutual {
                root, certificate, ..
            } => f
                .debug_struct("Mutual")
                .field("root", &format_args!("{} bytes", root.len()))
                .field("certificate", &format_args!("{} bytes", certificate.len()))
                .field("private_key", &"<redacted>")
                .finish(),
        }
    }
}

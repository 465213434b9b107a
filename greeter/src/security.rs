//! Transport security selection.

use std::fmt;

use crate::credentials::CredentialRole;

/// How a channel is secured.
///
/// The mode is decided once, usually from command line flags through
/// [`SecurityMode::from_flags`], and decides which credentials are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityMode {
    /// Unencrypted HTTP/2. Reads no credentials.
    Plaintext,
    /// TLS where only the server presents a certificate, verified against the
    /// root certificate.
    ServerAuthenticated,
    /// TLS where the client also presents its certificate and private key.
    MutuallyAuthenticated,
}

impl SecurityMode {
    /// Combines the `plaintext` and `mutual` flags into a mode.
    ///
    /// `plaintext` wins when both are set.
    pub fn from_flags(plaintext: bool, mutual: bool) -> Self {
        match (plaintext, mutual) {
            (true, _) => SecurityMode::Plaintext,
            (false, true) => SecurityMode::MutuallyAuthenticated,
            (false, false) => SecurityMode::ServerAuthenticated,
        }
    }

    /// Credentials a client needs for this mode, in load order.
    pub fn client_roles(self) -> &'static [CredentialRole] {
        match self {
            SecurityMode::Plaintext => &[],
            SecurityMode::ServerAuthenticated => &[CredentialRole::RootCertificate],
            SecurityMode::MutuallyAuthenticated => &[
                CredentialRole::RootCertificate,
                CredentialRole::ClientCertificate,
                CredentialRole::ClientPrivateKey,
            ],
        }
    }

    /// Credentials a server needs for this mode, in load order.
    pub fn server_roles(self) -> &'static [CredentialRole] {
        match self {
            SecurityMode::Plaintext => &[],
            SecurityMode::ServerAuthenticated => &[
                CredentialRole::ServerCertificate,
                CredentialRole::ServerPrivateKey,
            ],
            SecurityMode::MutuallyAuthenticated => &[
                CredentialRole::ServerCertificate,
                CredentialRole::ServerPrivateKey,
                CredentialRole::RootCertificate,
            ],
        }
    }

    /// Returns `true` for the two TLS modes.
    pub fn is_tls(self) -> bool {
        !matches!(self, SecurityMode::Plaintext)
    }

    pub(crate) fn scheme(self) -> &'static str {
        if self.is_tls() {
            "https"
        } else {
            "http"
        }
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecurityMode::Plaintext => f.write_str("plaintext"),
            SecurityMode::ServerAuthenticated => f.write_str("server-authenticated TLS"),
            SecurityMode::MutuallyAuthenticated => f.write_str("mTLS"),
        }
    }
}

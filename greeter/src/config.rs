//! Command line configuration for the `greeter-client` and `greeter-server`
//! binaries.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    channel::{ChannelOptions, Endpoint},
    credentials::SecretsDir,
    security::SecurityMode,
};

/// Environment variable holding the log filter.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Example greeter client application.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "greeter-client")]
pub struct ClientArgs {
    /// Service endpoint URL.
    #[arg(long, default_value = "localhost:8080")]
    pub url: String,

    /// Use plaintext, not TLS (insecure).
    #[arg(long)]
    pub plaintext: bool,

    /// Use mutual authentication instead of server authentication.
    #[arg(long = "mtls", alias = "mTLS", env = "USE_MTLS")]
    pub mtls: bool,

    /// Directory where certificates are stored.
    #[arg(long = "secrets-path", alias = "secretsPath", default_value = crate::DEFAULT_SECRETS_PATH)]
    pub secrets_path: PathBuf,

    /// Name sent in the greeting.
    #[arg(long, default_value = "rust client")]
    pub name: String,

    /// Seconds to wait for the connection to be established.
    #[arg(long = "connect-timeout")]
    pub connect_timeout: Option<u64>,

    /// Name to verify the server certificate against, instead of the URL host.
    #[arg(long = "domain-name")]
    pub domain_name: Option<String>,
}

impl ClientArgs {
    /// The security mode selected by `--plaintext` and `--mtls`.
    pub fn mode(&self) -> SecurityMode {
        SecurityMode::from_flags(self.plaintext, self.mtls)
    }

    /// Returns `true` when `--mtls` is ignored because `--plaintext` was given.
    pub fn mtls_ignored(&self) -> bool {
        self.plaintext && self.mtls
    }

    /// The service endpoint.
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.url.clone())
    }

    /// Where credentials are read from.
    pub fn secrets(&self) -> SecretsDir {
        SecretsDir::new(self.secrets_path.clone())
    }

    /// Transport options.
    pub fn channel_options(&self) -> ChannelOptions {
        let mut options = ChannelOptions::default();
        if let Some(secs) = self.connect_timeout {
            options = options.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(domain_name) = &self.domain_name {
            options = options.domain_name(domain_name.clone());
        }
        options
    }
}

/// Example greeter server application.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "greeter-server")]
pub struct ServerArgs {
    /// Port to listen on.
    #[arg(long, default_value_t = 8080)]
    pub port: u16,

    /// Serve plaintext, not TLS (insecure).
    #[arg(long)]
    pub plaintext: bool,

    /// Require clients to authenticate with a certificate.
    #[arg(long = "mtls", alias = "mTLS", env = "USE_MTLS")]
    pub mtls: bool,

    /// Directory where certificates are stored.
    #[arg(long = "secrets-path", alias = "secretsPath", default_value = crate::DEFAULT_SECRETS_PATH)]
    pub secrets_path: PathBuf,
}

impl ServerArgs {
    /// The security mode selected by `--plaintext` and `--mtls`.
    pub fn mode(&self) -> SecurityMode {
        SecurityMode::from_flags(self.plaintext, self.mtls)
    }

    /// Address to bind, all interfaces on `--port`.
    pub fn address(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    /// Where credentials are read from.
    pub fn secrets(&self) -> SecretsDir {
        SecretsDir::new(self.secrets_path.clone())
    }
}

/// Install a `fmt` subscriber filtered by `LOG_LEVEL`, `debug` by default.
pub fn trace_init() {
    let filter = EnvFilter::try_from_env(LOG_LEVEL_ENV).unwrap_or_else(|_| EnvFilter::new("debug"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

//! A `tonic` based client (and matching server) for the `greeter.v1.Greeter`
//! service, over plaintext, server-authenticated TLS or mutual TLS.
//!
//! # Example
//!
//! ```no_run
//! use greeter::{ChannelFactory, Endpoint, SecretsDir, SecurityMode};
//! use greeter::pb::HelloRequest;
//!
//! # async fn run() -> Result<(), greeter::Error> {
//! let factory = ChannelFactory::default();
//! let secrets = SecretsDir::new("/secrets");
//!
//! let mut channel = factory
//!     .open_channel(
//!         Endpoint::new("localhost:8080"),
//!         SecurityMode::ServerAuthenticated,
//!         &secrets,
//!     )
//!     .await?;
//!
//! let reply = channel
//!     .invoke(HelloRequest {
//!         name: "rust client".into(),
//!     })
//!     .await?;
//!
//! println!("{}", reply.message);
//! # Ok(())
//! # }
//! ```
//!
//! Credentials are read from a fixed layout under a base directory, see
//! [`CredentialRole`]. Channel lifecycle events are reported to an injected
//! [`EventSink`]; [`TracingSink`] forwards them to `tracing`.

#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    unreachable_pub
)]
#![doc(test(no_crate_inject, attr(deny(rust_2018_idioms))))]

/// Generated protobuf types from the `greeter.v1` package.
pub mod pb {
    #![allow(unreachable_pub, missing_docs)]
    include!("generated/greeter.v1.rs");
}

pub mod blocking;
pub mod channel;
pub mod config;
pub mod credentials;
mod error;
pub mod event;
pub mod security;
pub mod server;

#[cfg(test)]
mod test_util;

pub use channel::{ChannelFactory, ChannelOptions, ChannelState, Endpoint, GreeterChannel};
pub use credentials::{CredentialBundle, CredentialRole, CredentialSource, FileAccessError, SecretsDir};
pub use error::Error;
pub use event::{Event, EventSink, TracingSink};
pub use security::SecurityMode;

/// Default base directory holding the credential layout.
pub const DEFAULT_SECRETS_PATH: &str = "/secrets";

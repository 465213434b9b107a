//! Observability events emitted by channels and the server.

use std::fmt;

use tracing::Level;

use crate::security::SecurityMode;

/// Something worth reporting while opening or using a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Event {
    /// A channel was opened.
    ChannelOpened {
        /// Target of the channel.
        endpoint: String,
        /// How it is secured.
        mode: SecurityMode,
    },
    /// A request is about to be sent.
    RequestSent {
        /// Target of the request.
        endpoint: String,
    },
    /// A response arrived.
    ResponseReceived {
        /// Target of the request.
        endpoint: String,
    },
    /// A channel was closed.
    ChannelClosed {
        /// Target of the channel.
        endpoint: String,
    },
    /// The server started accepting connections.
    Listening {
        /// Local address of the listener.
        address: String,
        /// How connections are secured.
        mode: SecurityMode,
    },
}

impl Event {
    /// The level this event should be reported at.
    ///
    /// Opening a plaintext channel is a warning, everything else is
    /// informational or debug output.
    pub fn level(&self) -> Level {
        match self {
            Event::ChannelOpened {
                mode: SecurityMode::Plaintext,
                ..
            } => Level::WARN,
            Event::ChannelOpened { .. } | Event::Listening { .. } => Level::INFO,
            Event::RequestSent { .. }
            | Event::ResponseReceived { .. }
            | Event::ChannelClosed { .. } => Level::DEBUG,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ChannelOpened {
                endpoint,
                mode: SecurityMode::Plaintext,
            } => write!(f, "Using plaintext channel to {}", endpoint),
            Event::ChannelOpened { endpoint, mode } => write!(f, "Using {} to {}", mode, endpoint),
            Event::RequestSent { endpoint } => write!(f, "sending gRPC Hello request to {}", endpoint),
            Event::ResponseReceived { endpoint } => {
                write!(f, "received response from gRPC server {}", endpoint)
            }
            Event::ChannelClosed { endpoint } => write!(f, "closed channel to {}", endpoint),
            Event::Listening { address, mode } => {
                write!(f, "Listening for TCP on {} using {}", address, mode)
            }
        }
    }
}

/// Receives [`Event`]s.
///
/// A sink is handed to [`ChannelFactory`](crate::ChannelFactory) and to the
/// server instead of relying on process wide logger state.
pub trait EventSink: Send + Sync + 'static {
    /// Report `event`.
    fn emit(&self, event: &Event);
}

/// An [`EventSink`] that forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &Event) {
        let level = event.level();
        if level == Level::WARN {
            tracing::warn!("{}", event);
        } else if level == Level::INFO {
            tracing::info!("{}", event);
        } else {
            tracing::debug!("{}", event);
        }
    }
}

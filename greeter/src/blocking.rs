//! A blocking wrapper around [`GreeterChannel`].
//!
//! Each [`BlockingChannel`] drives its own current-thread runtime, so it can
//! be used from code that is not running inside one. It must not be used
//! from within an async context.

use tokio::runtime::{Builder, Runtime};

use crate::{
    channel::{ChannelFactory, ChannelState, Endpoint, GreeterChannel},
    credentials::CredentialSource,
    error::Error,
    pb::{HelloReply, HelloRequest},
    security::SecurityMode,
};

/// A [`GreeterChannel`] whose calls block the current thread.
#[derive(Debug)]
pub struct BlockingChannel {
    // Declared before `rt` so the channel is released while the runtime is
    // still alive.
    channel: GreeterChannel,
    rt: Runtime,
}

impl BlockingChannel {
    /// Open a channel, see [`ChannelFactory::open_channel`].
    pub fn open<S>(
        factory: &ChannelFactory,
        endpoint: Endpoint,
        mode: SecurityMode,
        source: &S,
    ) -> Result<Self, Error>
    where
        S: CredentialSource + ?Sized,
    {
        let rt = runtime()?;
        let channel = rt.block_on(factory.open_channel(endpoint, mode, source))?;
        Ok(Self { channel, rt })
    }

    /// Send `request` and block until the reply arrives.
    pub fn invoke(&mut self, request: HelloRequest) -> Result<HelloReply, Error> {
        self.rt.block_on(self.channel.invoke(request))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ChannelState {
        self.channel.state()
    }

    /// Release the channel.
    pub fn close(&mut self) {
        self.channel.close();
    }
}

/// Blocking version of [`ChannelFactory::greet`].
pub fn greet<S>(
    factory: &ChannelFactory,
    endpoint: Endpoint,
    mode: SecurityMode,
    source: &S,
    name: impl Into<String>,
) -> Result<String, Error>
where
    S: CredentialSource + ?Sized,
{
    let mut channel = BlockingChannel::open(factory, endpoint, mode, source)?;
    let reply = channel.invoke(HelloRequest { name: name.into() })?;
    Ok(reply.message)
}

fn runtime() -> Result<Runtime, Error> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(Error::Runtime)
}

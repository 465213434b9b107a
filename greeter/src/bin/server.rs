use clap::Parser;
use greeter::{config::ServerArgs, server, TracingSink};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    greeter::config::trace_init();

    let args = ServerArgs::parse();
    let addr = args.address();

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to listen for TCP on {}", addr);
        e
    })?;

    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutting down");
    };

    server::serve(listener, args.mode(), &args.secrets(), &TracingSink, shutdown).await?;

    Ok(())
}

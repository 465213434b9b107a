use clap::Parser;
use greeter::{blocking, config::ClientArgs, ChannelFactory};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    greeter::config::trace_init();

    let args = ClientArgs::parse();
    tracing::info!(
        url = %args.url,
        plaintext = args.plaintext,
        mtls = args.mtls,
        secrets_path = %args.secrets_path.display(),
        "starting greeter client"
    );

    if args.mtls_ignored() {
        tracing::warn!("--plaintext given, ignoring --mtls");
    }

    let factory = ChannelFactory::default().options(args.channel_options());

    match blocking::greet(
        &factory,
        args.endpoint(),
        args.mode(),
        &args.secrets(),
        args.name.clone(),
    ) {
        Ok(message) => {
            tracing::info!("Greeter responded with: {}", message);
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "greeter call failed");
            Err(e.into())
        }
    }
}

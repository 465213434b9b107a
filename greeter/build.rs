// The protobuf code is checked in under `src/generated` so that building this
// crate does not require `protoc`. It is only regenerated with the
// `gen-proto` feature enabled.

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "gen-proto")]
    tonic_build::configure()
        .out_dir("src/generated")
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/greeter/v1/greeter.proto"], &["proto/"])?;

    Ok(())
}

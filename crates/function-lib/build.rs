//! Build script for generating protobuf code
//!
//! Code generation only runs with the `proto-gen` feature. Without it the
//! hand-maintained types in `src/proto` are compiled instead.

use std::path::PathBuf;
use std::process::Command;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=../../proto/crossplane/fn/v1/run_function.proto");

    if std::env::var("CARGO_FEATURE_PROTO_GEN").is_err() {
        return Ok(());
    }

    // Check if protoc is available
    let protoc_available =
        std::env::var("PROTOC").is_ok() || Command::new("protoc").arg("--version").output().is_ok();

    if !protoc_available {
        println!("cargo:warning=protoc not found, skipping proto generation");
        println!("cargo:warning=Install protoc or set PROTOC env var to generate proto code");
        return Ok(());
    }

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    // The function only serves RunFunction; the host is the client
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .out_dir(&out_dir)
        .compile(
            &["../../proto/crossplane/fn/v1/run_function.proto"],
            &["../../proto"],
        )?;

    Ok(())
}

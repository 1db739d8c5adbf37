//! Build script for spotshare.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory, next to where the server looks for its `.env` file.
//!
//! - Linux: `~/.local/share/spotshare/.env.example`
//! - macOS: `~/Library/Application Support/spotshare/.env.example`
//! - Windows: `%LOCALAPPDATA%/spotshare/.env.example`
//!
//! A missing template only produces a cargo warning.

use std::{env, fs, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("spotshare");

    if env_example_path.is_file() {
        // Read-only build environments should not fail the build.
        if let Err(e) = fs::create_dir_all(&out_dir)
            .and_then(|_| fs::copy(&env_example_path, out_dir.join(".env.example")))
        {
            println!("cargo:warning=could not copy .env.example: {e}");
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}

//! # Deskview CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, and this file
//! only invokes `cli::run()` and handles process termination. Everything from
//! `api.rs` inward is UI agnostic and lives in the `deskview` library.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

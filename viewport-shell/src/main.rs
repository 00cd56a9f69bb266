//! viewport-shell CLI binary
//!
//! Usage: viewport-shell [--config <path.toml>] [--width W] [--height H]

use clap::Parser;
use viewport_shell::ShellOptions;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = ShellOptions::parse();
    if let Err(e) = viewport_shell::run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Offline config diff: compare a saved running configuration with a
//! candidate file, the way `compare_config` would against a live switch.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example config_diff -- --running running.cfg --candidate new.cfg
//! ```
//!
//! Add `--merge` to stage the candidate as a merge (additions only) instead
//! of a replace.

use std::env;
use std::fs;
use std::path::PathBuf;

use fastiron::{DriverBuilder, Result, Session};

/// Session that answers `show running-config` from a saved file.
struct SavedSession {
    running_config: String,
    open: bool,
}

impl Session for SavedSession {
    async fn send_command(&mut self, command: &str) -> Result<String> {
        log::debug!("replaying '{command}'");
        Ok(match command {
            "show running-config" => self.running_config.clone(),
            _ => String::new(),
        })
    }

    fn is_connected(&self) -> bool {
        self.open
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.open = false;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (set RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let (Some(running), Some(candidate)) = (args.running, args.candidate) else {
        Args::print_help();
        std::process::exit(1);
    };

    let session = SavedSession {
        running_config: fs::read_to_string(&running)?,
        open: true,
    };
    let mut driver = DriverBuilder::new("offline").build(session);

    if args.merge {
        driver.load_merge_candidate(Some(candidate.as_path()), None)?;
    } else {
        driver.load_replace_candidate(Some(candidate.as_path()), None)?;
    }

    let diff = driver.compare_config().await?;
    if diff.is_empty() {
        println!("No changes.");
    } else {
        print!("{diff}");
    }

    driver.close().await?;
    Ok(())
}

/// Simple argument parser
struct Args {
    running: Option<PathBuf>,
    candidate: Option<PathBuf>,
    merge: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut running = None;
        let mut candidate = None;
        let mut merge = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--running" | "-r" => {
                    i += 1;
                    if i < args.len() {
                        running = Some(PathBuf::from(&args[i]));
                    }
                }
                "--candidate" | "-c" => {
                    i += 1;
                    if i < args.len() {
                        candidate = Some(PathBuf::from(&args[i]));
                    }
                }
                "--merge" | "-m" => merge = true,
                "--help" => {
                    Self::print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                }
            }
            i += 1;
        }

        Self {
            running,
            candidate,
            merge,
        }
    }

    fn print_help() {
        println!(
            r#"fastiron config_diff example

USAGE:
    cargo run --example config_diff -- [OPTIONS]

OPTIONS:
    -r, --running <PATH>     Saved running configuration
    -c, --candidate <PATH>   Candidate configuration
    -m, --merge              Stage as merge candidate (additions only)
    --help                   Print this help message
"#
        );
    }
}

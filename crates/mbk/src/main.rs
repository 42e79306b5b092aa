//! Multi-Backend Kit - demo binary
//!
//! Loads configuration, registers the enabled backends, waits for every
//! provider to become ready and optionally plays one rewarded ad.

// Force-link mbk-providers to ensure linkme catalog registrations are included
extern crate mbk_providers;

use clap::Parser;
use mbk::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    run(Cli::parse()).await
}

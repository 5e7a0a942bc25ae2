//! Huddle TUI entry point.

use std::path::PathBuf;

use clap::Parser;
use huddle_core::{ParticipantId, Space, SpaceId, UserProfile};
use huddle_harness::SimPlatform;
use huddle_tui::Runtime;
use tracing_subscriber::EnvFilter;

/// Huddle terminal conference client
#[derive(Parser, Debug)]
#[command(name = "huddle-tui")]
#[command(about = "Terminal UI for the Huddle conference client (simulation mode)")]
#[command(version)]
struct Args {
    /// Display name for the simulated account
    #[arg(short, long, default_value = "Demo User")]
    user: String,

    /// Write tracing output to this file (the terminal is taken over by the
    /// UI, so logs never go to stdout)
    #[arg(short, long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    if let Some(path) = &args.log_file {
        init_tracing(path)?;
    }

    let profile = UserProfile {
        id: ParticipantId::new(format!("u-{:08x}", rand::random::<u32>())),
        display_name: args.user,
        company: Some("Huddle Demo".to_string()),
        avatar: None,
    };

    let platform = SimPlatform::new(profile)
        .with_space(Space::new(SpaceId::new("product-team"), "Product Team"), true)
        .with_space(Space::new(SpaceId::new("all-hands"), "All Hands"), true)
        .with_space(Space::new(SpaceId::new("design-crew"), "Design Crew"), false);

    let runtime = Runtime::new(platform)?;
    Ok(runtime.run().await?)
}

mod api;
mod app;
mod config;
mod data;
mod state;

use anyhow::Context;
use clap::Parser;

use config::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // Everything is loaded before the listener exists; a bad file stops startup.
    let registry = data::loader::load_folder(&args.data)
        .with_context(|| format!("loading datasets from {}", args.data.display()))?;

    app::run(registry, args.server_config()).await
}

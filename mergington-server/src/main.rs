mod http;
mod state;

use crate::state::State;
use anyhow::{Context, Result};
use clap::Parser;
use std::{fs, net::SocketAddrV4, path::PathBuf, sync::Arc};

/// Command line arguments for mergington-server.
#[derive(Parser, Debug)]
struct MergingtonOptions {
    /// Directory containing the optional `config.yaml` and the `static/` front-end.
    #[clap(short, long, default_value = "./storage")]
    storage_dir: PathBuf,
    /// Address to listen on, overrides `http.listen_on` from `config.yaml`.
    #[clap(short, long)]
    listen_on: Option<SocketAddrV4>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut options = MergingtonOptions::parse();

    options.storage_dir = fs::canonicalize(&options.storage_dir)
        .with_context(|| format!("storage dir is invalid: {}", options.storage_dir.display()))?;

    let mut state = State::load(options.storage_dir)?;
    if let Some(listen_on) = options.listen_on {
        state.config.http.listen_on = listen_on;
    }

    let index = state.static_dir().join("index.html");
    if !index.is_file() {
        log::warn!("{} not found, the front-end will not be served", index.display());
    }

    let activities = state.list();
    log::info!(
        "Loaded {} activities with {} participants",
        activities.len(),
        activities
            .values()
            .map(|a| a.participants.len())
            .sum::<usize>()
    );

    http::main(Arc::new(state)).await
}

//! The in-memory registry for mergington-server.
//!
//! Structure of the storage directory:
//! - `config.yaml`: optional configuration file, also holds the seed activities.
//! - `static/`: directory containing the static files for the web front-end.
//!
//! Nothing is written back to the storage directory: signups live until the process exits.

#![warn(clippy::unwrap_used)]

mod activities;

use anyhow::{ensure, Context, Result};
use mergington_shared::{Activities, Config};
use std::{
    collections::HashSet,
    fs::File,
    path::PathBuf,
};
use tokio::sync::watch;

pub use activities::RegistryError;

const CONFIG_YAML: &str = "config.yaml";
const STATIC_DIR: &str = "static";
/// Path segment of the update stream, it would shadow an activity with the same name.
pub const STREAM_SEGMENT: &str = "stream";

/// Checks that the seed activities respect the registry invariants.
fn validate_activities(activities: &Activities) -> Result<()> {
    for (name, record) in activities {
        ensure!(!name.trim().is_empty(), "activity with an empty name");
        ensure!(
            name != STREAM_SEGMENT,
            "activity name {name:?} is reserved for /activities/{STREAM_SEGMENT}"
        );
        ensure!(
            record.participants.len() <= record.max_participants,
            "activity {name:?} has {} participants but only {} places",
            record.participants.len(),
            record.max_participants,
        );
        let mut seen = HashSet::new();
        for email in &record.participants {
            ensure!(
                seen.insert(email.as_str()),
                "activity {name:?} lists {email} more than once"
            );
        }
    }
    Ok(())
}

/// See [the module-level documentation][self].
#[derive(Debug)]
pub struct State {
    /// The storage_dir received by command line arguments.
    pub storage_dir: PathBuf,
    /// The config parsed from the config file, without the seed activities.
    pub config: Config,

    activities: watch::Sender<Activities>,
}

impl State {
    /// Builds a [`State`] whose registry is seeded from `config.activities`.
    ///
    /// The seed is moved into the registry, so [`State::list`] is the only view of the activities.
    pub fn new(storage_dir: PathBuf, mut config: Config) -> Result<Self> {
        let seed = std::mem::take(&mut config.activities);
        validate_activities(&seed).context("invalid seed activities")?;
        let activities = watch::Sender::new(seed);
        Ok(Self {
            storage_dir,
            config,
            activities,
        })
    }

    /// Loads the [`State`] from the given path.
    ///
    /// A missing `config.yaml` is not an error: the default [`Config`] is used instead.
    pub fn load(storage_dir: PathBuf) -> Result<Self> {
        let path = storage_dir.join(CONFIG_YAML);
        let config: Config = if path.exists() {
            let file = File::open(&path)
                .with_context(|| format!("open config file: {}", path.display()))?;
            serde_yaml::from_reader(file)
                .with_context(|| format!("deserialize config from {}", path.display()))?
        } else {
            log::info!("{} not found, using the default config", path.display());
            Config::default()
        };

        Self::new(storage_dir, config)
    }

    /// Directory served under `/static`.
    pub fn static_dir(&self) -> PathBuf {
        self.storage_dir.join(STATIC_DIR)
    }
}

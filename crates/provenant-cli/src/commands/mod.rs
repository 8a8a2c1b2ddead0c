//! Subcommand implementations.

pub mod audit;
pub mod init;
pub mod log;
pub mod mutate;
pub mod query;

use crate::config::{Config, DEFAULT_JOURNAL};
use anyhow::{anyhow, Context as _, Result};
use provenant_core::{Identity, MemorySink, Registry, RegistryConfig, SystemClock};
use provenant_journal::{load_registry, JournalReader, JournalSink, ReadMode};
use std::path::{Path, PathBuf};

/// Settings shared by every subcommand, after merging flags, environment
/// and the config file.
pub struct Context {
    pub journal: PathBuf,
    pub identity: Option<Identity>,
    pub registry: RegistryConfig,
    pub json: bool,
}

impl Context {
    pub fn new(
        journal: Option<PathBuf>,
        identity: Option<Identity>,
        config_path: Option<&Path>,
        json: bool,
    ) -> Result<Self> {
        let config = Config::load(config_path)?;
        let identity = match identity {
            Some(identity) => Some(identity),
            None => config
                .identity
                .map(Identity::parse)
                .transpose()
                .context("invalid identity in config file")?,
        };
        Ok(Self {
            journal: journal
                .or(config.journal)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_JOURNAL)),
            identity,
            registry: config.registry,
            json,
        })
    }

    /// Identity performing a mutation.
    pub fn caller(&self) -> Result<&Identity> {
        self.identity
            .as_ref()
            .ok_or_else(|| anyhow!("no identity given; pass --as or set PROVENANT_IDENTITY"))
    }

    /// Loads the registry for writing.
    pub fn open(&self) -> Result<Registry<JournalSink>> {
        load_registry(&self.journal, self.registry.clone())
            .with_context(|| format!("cannot open registry {}", self.journal.display()))
    }

    /// Loads a read-only copy of the registry.
    pub fn snapshot(&self) -> Result<Registry> {
        let events = self.reader()?.read_all()?;
        Ok(Registry::replay(
            events,
            self.registry.clone(),
            Box::new(SystemClock),
            MemorySink::new(),
        )?)
    }

    pub fn reader(&self) -> Result<JournalReader> {
        JournalReader::open(&self.journal, ReadMode::Strict)
            .with_context(|| format!("cannot open journal {}", self.journal.display()))
    }
}

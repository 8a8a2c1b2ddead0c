use crate::errors::JournalError;
use crate::reader::{JournalReader, ReadMode};
use crate::writer::{JournalWriter, WriteOptions};
use provenant_canonical::Identity;
use provenant_core::{
    Clock, EventSink, Registry, RegistryConfig, RegistryEvent, SinkError, SystemClock,
    VerifierSet,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// [`EventSink`] that appends every event to a journal file.
pub struct JournalSink {
    writer: JournalWriter,
    path: PathBuf,
}

impl JournalSink {
    /// Opens `path` for appending, syncing after every event.
    ///
    /// The journal stays exclusively locked for the sink's lifetime.
    pub fn open<P: AsRef<Path>>(path: P, create: bool) -> Result<Self, JournalError> {
        let path = path.as_ref().to_path_buf();
        let writer = JournalWriter::open(&path, WriteOptions { sync: true, create })?;
        Ok(Self { writer, path })
    }

    /// Journal file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JournalSink {
    fn record(&mut self, event: &RegistryEvent) -> Result<(), SinkError> {
        self.writer
            .append_event(event)
            .map_err(|e| SinkError::new(event.seq, e))
    }
}

/// Creates a journal at `path` holding a new registry administered by `admin`.
///
/// Fails with [`JournalError::AlreadyInitialized`] if the file already
/// holds events. A rejected administrator leaves no file behind.
pub fn init_registry<P: AsRef<Path>>(
    path: P,
    admin: Identity,
    config: RegistryConfig,
) -> Result<Registry<JournalSink>, JournalError> {
    init_registry_with_clock(path, admin, config, Box::new(SystemClock))
}

/// [`init_registry`] with an explicit clock.
pub fn init_registry_with_clock<P: AsRef<Path>>(
    path: P,
    admin: Identity,
    config: RegistryConfig,
    clock: Box<dyn Clock>,
) -> Result<Registry<JournalSink>, JournalError> {
    VerifierSet::check_admin(&admin)?;
    let path = path.as_ref();
    let created = !path.exists();
    let sink = JournalSink::open(path, true)?;
    let existing = JournalReader::open(path, ReadMode::Permissive)?.count() as u64;
    if existing > 0 {
        return Err(JournalError::AlreadyInitialized { events: existing });
    }
    let registry = match Registry::create(admin, config, clock, sink) {
        Ok(registry) => registry,
        Err(err) => {
            if created {
                let _ = std::fs::remove_file(path);
            }
            return Err(err.into());
        }
    };
    info!(path = %path.display(), "journal initialized");
    Ok(registry)
}

/// Rebuilds the registry recorded in the journal at `path`.
///
/// The journal is read strictly: a torn final frame is an error here rather
/// than silently dropped, since new events would be appended after it.
/// The journal is locked before it is read, so the registry cannot be
/// rebuilt from a file another writer is still extending.
pub fn load_registry<P: AsRef<Path>>(
    path: P,
    config: RegistryConfig,
) -> Result<Registry<JournalSink>, JournalError> {
    load_registry_with_clock(path, config, Box::new(SystemClock))
}

/// [`load_registry`] with an explicit clock.
pub fn load_registry_with_clock<P: AsRef<Path>>(
    path: P,
    config: RegistryConfig,
    clock: Box<dyn Clock>,
) -> Result<Registry<JournalSink>, JournalError> {
    let path = path.as_ref();
    let sink = JournalSink::open(path, false)?;
    let events = JournalReader::open(path, ReadMode::Strict)?.read_all()?;
    if events.is_empty() {
        return Err(JournalError::Empty);
    }
    let count = events.len();
    let registry = Registry::replay(events, config, clock, sink)?;
    debug!(path = %path.display(), events = count, "journal loaded");
    Ok(registry)
}

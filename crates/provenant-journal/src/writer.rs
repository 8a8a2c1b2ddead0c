use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use fs4::fs_std::FileExt;
use provenant_core::RegistryEvent;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Options for journal writing.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Whether to fsync after each append (default: false).
    pub sync: bool,
    /// Whether to create the file if it doesn't exist (default: true).
    pub create: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: false,
            create: true,
        }
    }
}

/// Append-only writer for journal files.
///
/// A new or empty file receives a header on open. An existing file must
/// start with a valid header; frames are appended after its current end.
///
/// The writer holds an exclusive advisory lock on the file until it is
/// dropped. A second writer on the same file fails with
/// [`JournalError::Locked`]. Before each append the on-disk length is
/// compared with the length this writer last wrote, so bytes added behind
/// its back surface as [`JournalError::Diverged`] instead of being
/// interleaved with new frames.
///
/// Each frame is written with a single `write_all`. If that fails the file
/// is cut back to its previous length so a failed append leaves no partial
/// frame behind.
///
/// # Example
///
/// ```rust
/// use provenant_canonical::{Identity, Timestamp};
/// use provenant_core::{ChainTip, EventPayload};
/// use provenant_journal::{JournalWriter, WriteOptions};
///
/// let dir = tempfile::tempdir()?;
/// let admin = Identity::parse("org:registry")?;
/// let genesis = ChainTip::default().next(
///     Timestamp::parse("2024-01-01T00:00:00Z")?,
///     admin.clone(),
///     EventPayload::RegistryCreated { admin },
/// )?;
///
/// let mut writer = JournalWriter::open(dir.path().join("registry.pvj"), WriteOptions::default())?;
/// writer.append_event(&genesis)?;
/// writer.finish()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalWriter {
    file: File,
    sync: bool,
    len: u64,
}

impl JournalWriter {
    /// Opens or creates a journal file for appending.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError::Locked`] if another writer holds the file,
    /// or another [`JournalError`] if the file cannot be opened or is
    /// non-empty and does not begin with a valid journal header.
    pub fn open<P: AsRef<Path>>(path: P, options: WriteOptions) -> Result<Self, JournalError> {
        let mut file = OpenOptions::new()
            .create(options.create)
            .read(true)
            .write(true)
            .open(path)?;
        // Lock before reading the length so two openers cannot both write a header.
        if !FileExt::try_lock_exclusive(&file)? {
            return Err(JournalError::Locked);
        }

        let len = file.metadata()?.len();
        let mut writer = if len == 0 {
            let bytes = JournalHeader::default().to_bytes();
            file.write_all(&bytes)?;
            Self {
                file,
                sync: options.sync,
                len: HEADER_SIZE as u64,
            }
        } else if len < HEADER_SIZE as u64 {
            return Err(JournalError::FileNotEmpty);
        } else {
            let mut header = [0u8; HEADER_SIZE];
            file.seek(SeekFrom::Start(0))?;
            file.read_exact(&mut header)?;
            JournalHeader::from_bytes(&header)?;
            Self {
                file,
                sync: options.sync,
                len,
            }
        };
        writer.file.seek(SeekFrom::End(0))?;
        writer.flush()?;
        Ok(writer)
    }

    /// Appends a registry event as an event frame.
    pub fn append_event(&mut self, event: &RegistryEvent) -> Result<(), JournalError> {
        let payload = serde_json::to_vec(event)?;
        self.append_raw(FrameKind::Event, &payload)
    }

    /// Appends a raw frame with the given kind and payload.
    pub fn append_raw(&mut self, kind: FrameKind, payload: &[u8]) -> Result<(), JournalError> {
        let header = FrameHeader::new(kind, payload.len())?;

        let found = self.file.metadata()?.len();
        if found != self.len {
            return Err(JournalError::Diverged {
                expected: self.len,
                found,
            });
        }

        let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());
        frame.extend_from_slice(&header.to_bytes());
        frame.extend_from_slice(payload);

        if let Err(err) = self.file.write_all(&frame).and_then(|_| self.flush_io()) {
            // Best effort: the original error is what the caller needs.
            let _ = self.file.set_len(self.len);
            let _ = self.file.seek(SeekFrom::Start(self.len));
            return Err(err.into());
        }
        self.len += frame.len() as u64;
        Ok(())
    }

    /// Current file length in bytes.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Returns true if the journal holds no frames.
    pub fn is_empty(&self) -> bool {
        self.len == HEADER_SIZE as u64
    }

    /// Flushes and closes the file.
    pub fn finish(mut self) -> Result<(), JournalError> {
        self.flush()
    }

    fn flush(&mut self) -> Result<(), JournalError> {
        Ok(self.flush_io()?)
    }

    fn flush_io(&mut self) -> std::io::Result<()> {
        self.file.flush()?;
        if self.sync {
            self.file.sync_all()?;
        }
        Ok(())
    }
}

impl Drop for JournalWriter {
    fn drop(&mut self) {
        let _ = self.flush_io();
    }
}

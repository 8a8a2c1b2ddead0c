use crate::errors::JournalError;
use crate::frame::{FrameHeader, FrameKind, JournalHeader, FRAME_HEADER_SIZE, HEADER_SIZE};
use provenant_core::RegistryEvent;
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Read mode for handling truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Truncated frames are errors.
    Strict,
    /// A truncated final frame is treated as end-of-file.
    Permissive,
}

/// Sequential reader for journal files.
///
/// # Example
///
/// ```rust,no_run
/// use provenant_journal::{JournalReader, ReadMode};
///
/// let mut reader = JournalReader::open("registry.pvj", ReadMode::Strict)?;
/// while let Some(event) = reader.read_event()? {
///     println!("{} {}", event.seq, event.kind());
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct JournalReader {
    file: BufReader<File>,
    mode: ReadMode,
    position: u64,
    len: u64,
}

impl JournalReader {
    /// Opens a journal file and validates its header.
    ///
    /// # Errors
    ///
    /// Returns [`JournalError`] if the file cannot be opened or its header
    /// is missing or invalid.
    pub fn open<P: AsRef<Path>>(path: P, mode: ReadMode) -> Result<Self, JournalError> {
        let mut file = File::open(path)?;
        let len = file.metadata()?.len();
        if len < HEADER_SIZE as u64 {
            return Err(JournalError::InvalidHeader(format!(
                "file too short: {} bytes",
                len
            )));
        }

        let mut header = [0u8; HEADER_SIZE];
        file.seek(SeekFrom::Start(0))?;
        file.read_exact(&mut header)?;
        JournalHeader::from_bytes(&header)?;

        Ok(Self {
            file: BufReader::new(file),
            mode,
            position: HEADER_SIZE as u64,
            len,
        })
    }

    /// Byte offset of the next frame.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` at end-of-file, or at a truncated frame in
    /// permissive mode.
    pub fn read_frame(&mut self) -> Result<Option<(FrameKind, Vec<u8>)>, JournalError> {
        if self.position >= self.len {
            return Ok(None);
        }
        let offset = self.position;

        let mut header = [0u8; FRAME_HEADER_SIZE];
        if !self.read_exact_or_truncated(&mut header, offset)? {
            return Ok(None);
        }
        let frame = FrameHeader::from_bytes(&header, offset)?;

        let mut payload = vec![0u8; frame.len as usize];
        if !self.read_exact_or_truncated(&mut payload, offset)? {
            return Ok(None);
        }

        self.position += (FRAME_HEADER_SIZE + payload.len()) as u64;
        Ok(Some((frame.kind, payload)))
    }

    /// Reads the next event frame as untyped JSON, skipping unknown kinds.
    pub fn read_value(&mut self) -> Result<Option<Value>, JournalError> {
        match self.next_event_payload()? {
            Some(payload) => Ok(Some(serde_json::from_str(std::str::from_utf8(&payload)?)?)),
            None => Ok(None),
        }
    }

    /// Reads the next registry event, skipping unknown frame kinds.
    pub fn read_event(&mut self) -> Result<Option<RegistryEvent>, JournalError> {
        match self.next_event_payload()? {
            Some(payload) => Ok(Some(serde_json::from_str(std::str::from_utf8(&payload)?)?)),
            None => Ok(None),
        }
    }

    /// Reads every remaining event.
    pub fn read_all(&mut self) -> Result<Vec<RegistryEvent>, JournalError> {
        let mut events = Vec::new();
        while let Some(event) = self.read_event()? {
            events.push(event);
        }
        Ok(events)
    }

    fn next_event_payload(&mut self) -> Result<Option<Vec<u8>>, JournalError> {
        loop {
            match self.read_frame()? {
                None => return Ok(None),
                Some((FrameKind::Event, payload)) => return Ok(Some(payload)),
                Some((FrameKind::Unknown(kind), _)) => {
                    tracing::debug!(kind, "skipping unknown frame kind");
                }
            }
        }
    }

    fn read_exact_or_truncated(&mut self, buf: &mut [u8], offset: u64) -> Result<bool, JournalError> {
        match self.file.read_exact(buf) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => match self.mode {
                ReadMode::Permissive => {
                    tracing::warn!(offset, "truncated frame treated as end of journal");
                    self.position = self.len;
                    Ok(false)
                }
                ReadMode::Strict => Err(JournalError::TruncatedFrame { offset }),
            },
            Err(e) => Err(e.into()),
        }
    }
}

impl Iterator for JournalReader {
    type Item = Result<RegistryEvent, JournalError>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.read_event();
        if next.is_err() {
            // Stop after the first error.
            self.position = self.len;
        }
        next.transpose()
    }
}

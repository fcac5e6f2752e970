//! Struct archiving functionality
//!
//! Archives are CSV files stored in the session's `arch` directory, with one
//! row written per serialised record.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
pub struct Archiver {
    writer: Writer<File>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Cannot create the archive file: {0}")]
    CreateError(std::io::Error),

    #[error("Cannot write the archive record: {0}")]
    WriteError(csv::Error),

    #[error("Cannot flush the archive: {0}")]
    FlushError(std::io::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(session: &Session, path: P) -> Result<Self, ArchiveError> {
        Self::create(session.arch_root.join(path))
    }

    /// Create a new archiver writing to the given file, truncating it if it
    /// already exists.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, ArchiveError> {
        let file = File::create(path).map_err(ArchiveError::CreateError)?;

        let writer = WriterBuilder::new().has_headers(true).from_writer(file);

        Ok(Self { writer })
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(&mut self, record: T) -> Result<(), ArchiveError> {
        self.writer
            .serialize(record)
            .map_err(ArchiveError::WriteError)
    }

    /// Flush any buffered records to disk.
    pub fn flush(&mut self) -> Result<(), ArchiveError> {
        self.writer.flush().map_err(ArchiveError::FlushError)
    }
}

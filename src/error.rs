//! Error types for validating and uploading chord libraries.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use uuid::Uuid;

/// A document that does not follow the chord-list file format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input is not JSON at all.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The top-level value is not an array of chord lists.
    #[error("expected an array of chord lists at the top level, found {found}")]
    NotAnArray { found: &'static str },

    /// One chord list is malformed.
    #[error("chord list {index}{}: {issue}", list_label(.name))]
    InvalidList {
        index: usize,
        name: Option<String>,
        issue: ListIssue,
    },
}

fn list_label(name: &Option<String>) -> String {
    match name {
        Some(name) => format!(" ('{name}')"),
        None => String::new(),
    }
}

/// What is wrong with a single `[name, config]` entry.
///
/// Positions count the elements of `config`, so the mode tag is position 0
/// and the first chord or beat is position 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListIssue {
    #[error("expected a [name, config] pair")]
    NotAPair,

    #[error("name must be a string")]
    NameNotString,

    #[error("config must be an array")]
    ConfigNotArray,

    #[error("config is empty, expected a mode tag (\"R\", \"S\" or \"M\")")]
    MissingMode,

    #[error("unknown mode '{0}', expected \"R\", \"S\" or \"M\"")]
    UnknownMode(String),

    #[error("chord at position {position} must be a non-empty string")]
    InvalidChord { position: usize },

    #[error("beat at position {position} must be a [chord, strum] pair")]
    InvalidBeat { position: usize },

    #[error("beat at position {position} has an empty or non-string chord")]
    InvalidBeatChord { position: usize },

    #[error("beat at position {position} has unknown strum '{marker}', expected \"D\", \"U\" or \"-\"")]
    UnknownStrum { position: usize, marker: String },
}

/// A failure reported by the wireless backend.
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("bluetooth: {0}")]
    Ble(#[from] btleplug::Error),

    #[error("no bluetooth adapter available")]
    NoAdapter,

    #[error("device does not expose characteristic {0}")]
    MissingCharacteristic(Uuid),

    #[error("device is not connected")]
    NotConnected,

    #[error("scan ended before a device was found")]
    ScanEnded,
}

/// No compatible device could be found.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no device named '{name}' found within {}s", .timeout.as_secs_f32())]
    Timeout { name: String, timeout: Duration },

    #[error("scan failed: {0}")]
    Link(#[source] LinkError),
}

/// A device was found but the library did not make it across.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("could not connect: {0}")]
    Connect(#[source] LinkError),

    #[error("could not write to device: {0}")]
    Write(#[source] LinkError),

    #[error("could not read reply: {0}")]
    Receive(#[source] LinkError),

    #[error("device did not acknowledge within {}s", .0.as_secs_f32())]
    AckTimeout(Duration),

    #[error("device disconnected before acknowledging")]
    Disconnected,

    #[error("device is busy; return it to the menu and try again")]
    Busy,

    #[error("device rejected the upload: {0}")]
    Rejected(String),

    #[error("unexpected reply from device: {0:?}")]
    UnexpectedReply(String),

    #[error("device stored {stored} lists but {sent} were sent")]
    CountMismatch { sent: usize, stored: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("frame_size must be at least 1 byte")]
    ZeroFrameSize,
}

/// Everything the command line tool can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Config(_) | Error::Read { .. } | Error::Io(_) => 1,
            Error::Format(_) => 2,
            Error::Discovery(_) => 3,
            Error::Upload(_) => 4,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

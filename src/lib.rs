//! Chord practice lists for the Guitar Trainer, and the tool that uploads them.
//!
//! A chord file is a JSON array of `[name, config]` pairs:
//!
//! ```json
//! [
//!   ["Pop Progression", ["R", "C", "G", "Am", "F"]],
//!   ["Simple Down Up", ["M", ["C", "D"], ["C", "U"], ["G", "D"], ["G", "U"]]]
//! ]
//! ```
//!
//! [`library::parse_library`] validates such a document into a
//! [`ChordLibrary`], and [`transport::Uploader`] sends it to the device, which
//! replaces every list it currently holds.

pub mod config;
pub mod error;
pub mod interactive;
pub mod library;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use library::{Beat, ChordLibrary, ChordList, ListContent, Mode, Strum};

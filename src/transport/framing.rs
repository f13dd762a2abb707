//! Frames exchanged with the device over the UART characteristics.
//!
//! An upload is `BEGIN:<bytes>:<lists>`, the JSON payload cut into chunks of
//! at most `frame_size` bytes, then `END`. The device answers with a single
//! notification: `OK:<lists>`, `BUSY` or `ERR:<reason>`.

use crate::error::UploadError;
use crate::library::ChordLibrary;

const BEGIN: &str = "BEGIN";
const END: &[u8] = b"END";

/// Split an upload into characteristic writes.
///
/// `frame_size` must be non-zero; [`Config::validate`](crate::Config::validate)
/// rejects 0 before an upload is built.
///
/// # Panics
///
/// Panics if `frame_size` is 0.
pub fn encode_frames(library: &ChordLibrary, frame_size: usize) -> Result<Vec<Vec<u8>>, serde_json::Error> {
    let payload = library.to_json()?;
    let mut frames = Vec::with_capacity(payload.len() / frame_size + 3);

    frames.push(format!("{BEGIN}:{}:{}", payload.len(), library.len()).into_bytes());
    frames.extend(payload.as_bytes().chunks(frame_size).map(<[u8]>::to_vec));
    frames.push(END.to_vec());

    Ok(frames)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The device replaced its lists and now holds this many.
    Stored(usize),
    Busy,
    Rejected(String),
}

impl Reply {
    pub fn parse(raw: &[u8]) -> Result<Reply, UploadError> {
        let text = String::from_utf8_lossy(raw);
        let text = text.trim();

        if text == "BUSY" {
            return Ok(Reply::Busy);
        }
        if let Some(reason) = text.strip_prefix("ERR:") {
            return Ok(Reply::Rejected(reason.trim().to_string()));
        }
        if let Some(count) = text.strip_prefix("OK:") {
            if let Ok(count) = count.trim().parse() {
                return Ok(Reply::Stored(count));
            }
        }

        Err(UploadError::UnexpectedReply(text.to_string()))
    }

    /// Check the reply against the number of lists sent.
    pub fn into_result(self, sent: usize) -> Result<(), UploadError> {
        match self {
            Reply::Stored(stored) if stored == sent => Ok(()),
            Reply::Stored(stored) => Err(UploadError::CountMismatch { sent, stored }),
            Reply::Busy => Err(UploadError::Busy),
            Reply::Rejected(reason) => Err(UploadError::Rejected(reason)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::parse_library;

    #[test]
    fn test_frames_wrap_payload() {
        let library = parse_library(r#"[["Pop Progression", ["R", "C", "G", "Am", "F"]]]"#).unwrap();
        let payload = library.to_json().unwrap();

        let frames = encode_frames(&library, 20).unwrap();

        assert_eq!(frames.first().unwrap(), format!("BEGIN:{}:1", payload.len()).as_bytes());
        assert_eq!(frames.last().unwrap(), b"END");

        let body = &frames[1..frames.len() - 1];
        assert!(body.iter().all(|f| !f.is_empty() && f.len() <= 20));
        assert_eq!(body.concat(), payload.as_bytes());
    }

    #[test]
    fn test_empty_library_still_framed() {
        let frames = encode_frames(&ChordLibrary::default(), 20).unwrap();
        assert_eq!(frames, vec![b"BEGIN:2:0".to_vec(), b"[]".to_vec(), b"END".to_vec()]);
    }

    #[test]
    fn test_parse_replies() {
        assert_eq!(Reply::parse(b"OK:3\r\n").unwrap(), Reply::Stored(3));
        assert_eq!(Reply::parse(b"BUSY").unwrap(), Reply::Busy);
        assert_eq!(
            Reply::parse(b"ERR: bad json").unwrap(),
            Reply::Rejected("bad json".to_string())
        );
        assert!(matches!(
            Reply::parse(b"OK:many"),
            Err(UploadError::UnexpectedReply(text)) if text == "OK:many"
        ));
    }

    #[test]
    fn test_reply_count_checked() {
        assert!(Reply::Stored(2).into_result(2).is_ok());
        assert!(matches!(
            Reply::Stored(1).into_result(2),
            Err(UploadError::CountMismatch { sent: 2, stored: 1 })
        ));
        assert!(matches!(Reply::Busy.into_result(2), Err(UploadError::Busy)));
    }
}

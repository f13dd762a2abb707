//! Validation of the chord-list file format.
//!
//! A document is a JSON array of `[name, config]` pairs where `config[0]` is
//! the mode tag. Random (`"R"`) and Sequential (`"S"`) lists follow the tag
//! with chord names; Metronome (`"M"`) lists follow it with `[chord, strum]`
//! beats. Validation is all-or-nothing: the first problem found is reported
//! and no partial library is returned.

use std::path::Path;

use serde_json::Value;
use tracing::warn;

use super::model::{
    Beat, ChordLibrary, ChordList, ListContent, Mode, RECOMMENDED_CHORD_LEN, RECOMMENDED_ENTRIES,
    RECOMMENDED_NAME_LEN, Strum,
};
use crate::error::{Error, FormatError, ListIssue};

/// Parse and validate a chord library from JSON text.
pub fn parse_library(json: &str) -> Result<ChordLibrary, FormatError> {
    let value: Value = serde_json::from_str(json)?;
    parse_library_value(&value)
}

/// Read and validate a chord library file.
pub fn load_library(path: &Path) -> Result<ChordLibrary, Error> {
    let json = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_library(&json)?)
}

/// Validate an already-parsed JSON document.
pub fn parse_library_value(value: &Value) -> Result<ChordLibrary, FormatError> {
    let entries = value.as_array().ok_or(FormatError::NotAnArray {
        found: json_kind(value),
    })?;

    let lists = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            parse_list(entry).map_err(|issue| FormatError::InvalidList {
                index,
                name: entry_name(entry),
                issue,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (index, list) in lists.iter().enumerate() {
        check_recommended_sizes(index, list);
    }

    Ok(ChordLibrary::new(lists))
}

fn parse_list(entry: &Value) -> Result<ChordList, ListIssue> {
    let [name, config] = entry.as_array().map(Vec::as_slice).unwrap_or_default() else {
        return Err(ListIssue::NotAPair);
    };
    let name = name.as_str().ok_or(ListIssue::NameNotString)?;
    let config = config.as_array().ok_or(ListIssue::ConfigNotArray)?;

    let (tag, items) = config.split_first().ok_or(ListIssue::MissingMode)?;
    let mode = tag
        .as_str()
        .and_then(Mode::from_tag)
        .ok_or_else(|| ListIssue::UnknownMode(display_value(tag)))?;

    let content = match mode {
        Mode::Random => ListContent::Random(parse_chords(items)?),
        Mode::Sequential => ListContent::Sequential(parse_chords(items)?),
        Mode::Metronome => ListContent::Metronome(parse_beats(items)?),
    };

    Ok(ChordList::new(name, content))
}

fn parse_chords(items: &[Value]) -> Result<Vec<String>, ListIssue> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item.as_str() {
            Some(chord) if !chord.is_empty() => Ok(chord.to_string()),
            _ => Err(ListIssue::InvalidChord { position: i + 1 }),
        })
        .collect()
}

fn parse_beats(items: &[Value]) -> Result<Vec<Beat>, ListIssue> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| parse_beat(item, i + 1))
        .collect()
}

fn parse_beat(item: &Value, position: usize) -> Result<Beat, ListIssue> {
    let (chord, strum) = match item.as_array().map(Vec::as_slice) {
        Some([chord]) => (chord, None),
        Some([chord, strum]) => (chord, Some(strum)),
        _ => return Err(ListIssue::InvalidBeat { position }),
    };

    let chord = match chord.as_str() {
        Some(chord) if !chord.is_empty() => chord,
        _ => return Err(ListIssue::InvalidBeatChord { position }),
    };

    let strum = match strum {
        None | Some(Value::Null) => Strum::Rest,
        Some(marker) => marker
            .as_str()
            .and_then(Strum::from_marker)
            .ok_or_else(|| ListIssue::UnknownStrum {
                position,
                marker: display_value(marker),
            })?,
    };

    Ok(Beat::new(chord, strum))
}

fn check_recommended_sizes(index: usize, list: &ChordList) {
    if list.name.chars().count() > RECOMMENDED_NAME_LEN {
        warn!(index, name = %list.name, "list name is longer than {RECOMMENDED_NAME_LEN} characters");
    }
    if list.content.is_empty() {
        warn!(index, name = %list.name, "list has no chords");
    }
    if list.content.len() > RECOMMENDED_ENTRIES {
        warn!(
            index,
            name = %list.name,
            entries = list.content.len(),
            "list has more than {RECOMMENDED_ENTRIES} entries"
        );
    }
    for chord in list.content.chords() {
        if chord.chars().count() > RECOMMENDED_CHORD_LEN {
            warn!(index, name = %list.name, chord, "chord name is longer than {RECOMMENDED_CHORD_LEN} characters");
        }
    }
}

fn entry_name(entry: &Value) -> Option<String> {
    entry
        .as_array()
        .and_then(|pair| pair.first())
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

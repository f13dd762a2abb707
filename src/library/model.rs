use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Longest list name the device shows without clipping.
pub const RECOMMENDED_NAME_LEN: usize = 20;
/// Longest chord name the device shows without clipping.
pub const RECOMMENDED_CHORD_LEN: usize = 10;
/// Most chords or beats per list the device handles comfortably.
pub const RECOMMENDED_ENTRIES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Random,
    Sequential,
    Metronome,
}

impl Mode {
    pub fn tag(self) -> &'static str {
        match self {
            Mode::Random => "R",
            Mode::Sequential => "S",
            Mode::Metronome => "M",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Mode> {
        match tag {
            "R" => Some(Mode::Random),
            "S" => Some(Mode::Sequential),
            "M" => Some(Mode::Metronome),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Mode::Random => "Random",
            Mode::Sequential => "Sequential",
            Mode::Metronome => "Metronome",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strum {
    Down,
    Up,
    Rest,
}

impl Strum {
    pub const REST_MARKER: &'static str = "-";

    pub fn marker(self) -> &'static str {
        match self {
            Strum::Down => "D",
            Strum::Up => "U",
            Strum::Rest => Self::REST_MARKER,
        }
    }

    pub fn from_marker(marker: &str) -> Option<Strum> {
        match marker {
            "D" => Some(Strum::Down),
            "U" => Some(Strum::Up),
            Self::REST_MARKER => Some(Strum::Rest),
            _ => None,
        }
    }
}

/// One metronome step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Beat {
    pub chord: String,
    pub strum: Strum,
}

impl Beat {
    pub fn new(chord: impl Into<String>, strum: Strum) -> Self {
        Beat {
            chord: chord.into(),
            strum,
        }
    }
}

/// The chords of a list, tagged with how the device plays them back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListContent {
    Random(Vec<String>),
    Sequential(Vec<String>),
    Metronome(Vec<Beat>),
}

impl ListContent {
    pub fn mode(&self) -> Mode {
        match self {
            ListContent::Random(_) => Mode::Random,
            ListContent::Sequential(_) => Mode::Sequential,
            ListContent::Metronome(_) => Mode::Metronome,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ListContent::Random(chords) | ListContent::Sequential(chords) => chords.len(),
            ListContent::Metronome(beats) => beats.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Chord names in playing order, repeated for metronome beats.
    pub fn chords(&self) -> Vec<&str> {
        match self {
            ListContent::Random(chords) | ListContent::Sequential(chords) => {
                chords.iter().map(String::as_str).collect()
            }
            ListContent::Metronome(beats) => beats.iter().map(|b| b.chord.as_str()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordList {
    pub name: String,
    pub content: ListContent,
}

impl ChordList {
    pub fn new(name: impl Into<String>, content: ListContent) -> Self {
        ChordList {
            name: name.into(),
            content,
        }
    }

    /// Build a Random or Sequential list from chord names.
    pub fn from_chords<I, S>(name: impl Into<String>, mode: Mode, chords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let chords: Vec<String> = chords.into_iter().map(Into::into).collect();
        let content = match mode {
            Mode::Random => ListContent::Random(chords),
            Mode::Sequential => ListContent::Sequential(chords),
            // Plain chord names become downstrokes, one per beat.
            Mode::Metronome => ListContent::Metronome(
                chords.into_iter().map(|c| Beat::new(c, Strum::Down)).collect(),
            ),
        };
        ChordList::new(name, content)
    }

    pub fn mode(&self) -> Mode {
        self.content.mode()
    }
}

/// Summary line, as printed before an upload.
impl fmt::Display for ChordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.content {
            ListContent::Random(chords) | ListContent::Sequential(chords) => {
                write!(f, "{} ({}): {}", self.name, self.mode(), chords.join(", "))
            }
            ListContent::Metronome(beats) => {
                write!(f, "{} ({}): {} beats", self.name, self.mode(), beats.len())
            }
        }
    }
}

/// The full set of lists sent in one upload. Order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordLibrary {
    pub lists: Vec<ChordList>,
}

impl ChordLibrary {
    pub fn new(lists: Vec<ChordList>) -> Self {
        ChordLibrary { lists }
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChordList> {
        self.lists.iter()
    }

    /// Compact JSON in the chord-list file format.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'a> IntoIterator for &'a ChordLibrary {
    type Item = &'a ChordList;
    type IntoIter = std::slice::Iter<'a, ChordList>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.iter()
    }
}

impl FromIterator<ChordList> for ChordLibrary {
    fn from_iter<T: IntoIterator<Item = ChordList>>(iter: T) -> Self {
        ChordLibrary::new(iter.into_iter().collect())
    }
}

// The file format is positional, so serialization writes arrays by hand
// instead of deriving a map-shaped representation.

impl Serialize for ChordLibrary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.lists)
    }
}

impl Serialize for ChordList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.name)?;
        seq.serialize_element(&self.content)?;
        seq.end()
    }
}

impl Serialize for ListContent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len() + 1))?;
        seq.serialize_element(self.mode().tag())?;
        match self {
            ListContent::Random(chords) | ListContent::Sequential(chords) => {
                for chord in chords {
                    seq.serialize_element(chord)?;
                }
            }
            ListContent::Metronome(beats) => {
                for beat in beats {
                    seq.serialize_element(beat)?;
                }
            }
        }
        seq.end()
    }
}

impl Serialize for Beat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.chord)?;
        seq.serialize_element(self.strum.marker())?;
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_positional_format() {
        let library = ChordLibrary::new(vec![
            ChordList::from_chords("Jazz ii-V-I", Mode::Sequential, ["Dm7", "G7", "Cmaj7"]),
            ChordList::new(
                "Rests",
                ListContent::Metronome(vec![Beat::new("Em", Strum::Down), Beat::new("Em", Strum::Rest)]),
            ),
        ]);

        assert_eq!(
            library.to_json().unwrap(),
            r#"[["Jazz ii-V-I",["S","Dm7","G7","Cmaj7"]],["Rests",["M",["Em","D"],["Em","-"]]]]"#
        );
    }

    #[test]
    fn test_summary_line() {
        let random = ChordList::from_chords("Blues in E", Mode::Random, ["E7", "A7", "B7"]);
        assert_eq!(random.to_string(), "Blues in E (Random): E7, A7, B7");

        let metronome = ChordList::from_chords("Strums", Mode::Metronome, ["C", "G"]);
        assert_eq!(metronome.to_string(), "Strums (Metronome): 2 beats");
    }

    #[test]
    fn test_mode_tags() {
        for mode in [Mode::Random, Mode::Sequential, Mode::Metronome] {
            assert_eq!(Mode::from_tag(mode.tag()), Some(mode));
        }
        assert_eq!(Mode::from_tag("H"), None);
        assert_eq!(Strum::from_marker("-"), Some(Strum::Rest));
        assert_eq!(Strum::from_marker("d"), None);
    }
}

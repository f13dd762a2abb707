use super::model::{Beat, ChordList, ListContent, Mode, Strum};

/// Lists offered by the interactive menu.
pub fn builtin_lists() -> Vec<ChordList> {
    vec![
        ChordList::from_chords("Pop Progression", Mode::Random, ["C", "G", "Am", "F"]),
        ChordList::from_chords("Blues in E", Mode::Random, ["E7", "A7", "B7"]),
        ChordList::from_chords("Jazz ii-V-I", Mode::Sequential, ["Dm7", "G7", "Cmaj7"]),
        ChordList::from_chords("Country Basic", Mode::Random, ["G", "C", "D", "Em"]),
        ChordList::new(
            "Simple Down Up",
            ListContent::Metronome(vec![
                Beat::new("C", Strum::Down),
                Beat::new("C", Strum::Up),
                Beat::new("G", Strum::Down),
                Beat::new("G", Strum::Up),
            ]),
        ),
    ]
}

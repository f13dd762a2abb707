pub mod model;
pub mod parse;
pub mod presets;

pub use model::{Beat, ChordLibrary, ChordList, ListContent, Mode, Strum};
pub use parse::{load_library, parse_library, parse_library_value};

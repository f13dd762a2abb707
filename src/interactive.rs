//! Menu shown when no chord file is given.

use std::io::{self, BufRead, Write};

use crate::library::model::RECOMMENDED_NAME_LEN;
use crate::library::{ChordLibrary, ChordList, Mode};

/// Menu over `input`/`output`, offering `presets`.
pub struct Menu<'a, R, W> {
    input: R,
    output: W,
    presets: &'a [ChordList],
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    pub fn new(input: R, output: W, presets: &'a [ChordList]) -> Self {
        Menu {
            input,
            output,
            presets,
        }
    }

    /// Ask until the user picks something to upload. `None` means quit.
    pub fn run(&mut self) -> io::Result<Option<ChordLibrary>> {
        self.print_options()?;

        loop {
            let Some(choice) = self.prompt("\nYour choice: ")? else {
                return Ok(None);
            };

            match choice.to_uppercase().as_str() {
                "Q" => return Ok(None),
                "A" => return Ok(Some(self.presets.iter().cloned().collect())),
                "C" => match self.build_custom()? {
                    Some(list) => return Ok(Some(ChordLibrary::new(vec![list]))),
                    None => writeln!(self.output, "Invalid input")?,
                },
                digits => match digits.parse::<usize>().ok().and_then(|n| n.checked_sub(1)) {
                    Some(i) if i < self.presets.len() => {
                        return Ok(Some(ChordLibrary::new(vec![self.presets[i].clone()])));
                    }
                    _ => writeln!(self.output, "Invalid choice")?,
                },
            }
        }
    }

    fn print_options(&mut self) -> io::Result<()> {
        writeln!(self.output, "Available chord lists:")?;
        for (i, list) in self.presets.iter().enumerate() {
            writeln!(self.output, "{}. {list}", i + 1)?;
        }
        writeln!(self.output)?;
        writeln!(self.output, "Options:")?;
        writeln!(self.output, "1-{}: Upload a single list", self.presets.len())?;
        writeln!(self.output, "A: Upload all")?;
        writeln!(self.output, "C: Create custom list")?;
        writeln!(self.output, "Q: Quit")?;
        writeln!(
            self.output,
            "Uploading replaces every list currently on the device."
        )
    }

    fn build_custom(&mut self) -> io::Result<Option<ChordList>> {
        let Some(name) = self.prompt(&format!("List name (max {RECOMMENDED_NAME_LEN} chars): "))?
        else {
            return Ok(None);
        };
        let name: String = name.chars().take(RECOMMENDED_NAME_LEN).collect();

        let Some(mode) = self.prompt("Mode (R=Random, S=Sequential): ")? else {
            return Ok(None);
        };
        let mode = match mode.to_uppercase().as_str() {
            "S" => Mode::Sequential,
            _ => Mode::Random,
        };

        let Some(chords) = self.prompt("Chords (comma-separated, e.g., C,G,Am,F): ")? else {
            return Ok(None);
        };
        let chords: Vec<&str> = chords
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();

        if name.is_empty() || chords.is_empty() {
            return Ok(None);
        }
        Ok(Some(ChordList::from_chords(name, mode, chords)))
    }

    /// One trimmed line, or `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::ListContent;
    use crate::library::presets::builtin_lists;

    fn run(input: &str) -> (Option<ChordLibrary>, String) {
        let presets = builtin_lists();
        let mut output = Vec::new();
        let result = Menu::new(input.as_bytes(), &mut output, &presets).run().unwrap();
        (result, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_lists_presets() {
        let (result, output) = run("q\n");
        assert!(result.is_none());
        assert!(output.contains("1. Pop Progression (Random): C, G, Am, F"));
        assert!(output.contains("5. Simple Down Up (Metronome): 4 beats"));
    }

    #[test]
    fn test_pick_single_preset() {
        let (result, _) = run("3\n");
        let library = result.unwrap();
        assert_eq!(library.len(), 1);
        assert_eq!(library.lists[0].name, "Jazz ii-V-I");
        assert_eq!(library.lists[0].mode(), Mode::Sequential);
    }

    #[test]
    fn test_upload_all() {
        let (result, _) = run("a\n");
        let expected: ChordLibrary = builtin_lists().into_iter().collect();
        assert_eq!(result.unwrap(), expected);
    }

    #[test]
    fn test_invalid_choice_reprompts() {
        let (result, output) = run("9\nx\n1\n");
        assert_eq!(output.matches("Invalid choice").count(), 2);
        assert_eq!(result.unwrap().lists[0].name, "Pop Progression");
    }

    #[test]
    fn test_custom_list() {
        let (result, _) = run("c\nMy Very Long Practice List Name\ns\n C, G ,, Am,F \n");
        let list = &result.unwrap().lists[0];
        assert_eq!(list.name, "My Very Long Practic");
        assert_eq!(
            list.content,
            ListContent::Sequential(vec!["C".into(), "G".into(), "Am".into(), "F".into()])
        );
    }

    #[test]
    fn test_custom_list_defaults_to_random() {
        let (result, _) = run("c\nWarmup\nM\nE,A\n");
        assert_eq!(result.unwrap().lists[0].mode(), Mode::Random);
    }

    #[test]
    fn test_custom_list_without_chords_rejected() {
        let (result, output) = run("c\nEmpty\nR\n , \nq\n");
        assert!(result.is_none());
        assert!(output.contains("Invalid input"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let (result, _) = run("");
        assert!(result.is_none());
    }
}

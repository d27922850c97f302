use std::io::{BufRead, Write};

use crate::loader::image_selection::ImageSelection;

const QUESTION: &str = "\
This file possibly contains ARM7 *and* ARM9 code.
Choose \"Yes\" to load the ARM9 executable,
\"No\" to load the ARM7 executable,
or \"Cancel\" to abort.

Do you want to load the ARM9 code? [Y/n/c] ";

// Asks which image to load. Yes (the default) is ARM9, No is ARM7. None means the user cancelled
// or the input ended, in which case nothing should be loaded.
pub fn ask_selection(mut input: impl BufRead, mut output: impl Write) -> Result<Option<ImageSelection>, String> {
    loop {
        write!(output, "{QUESTION}").map_err(|err| err.to_string())?;
        output.flush().map_err(|err| err.to_string())?;

        let mut answer = String::new();
        let read = input.read_line(&mut answer).map_err(|err| err.to_string())?;
        if read == 0 {
            return Ok(None);
        }

        match answer.trim().to_lowercase().as_str() {
            "" | "y" | "yes" => return Ok(Some(ImageSelection::Arm9)),
            "n" | "no" => return Ok(Some(ImageSelection::Arm7)),
            "c" | "cancel" => return Ok(None),
            other => writeln!(output, "Unrecognized answer '{other}'.").map_err(|err| err.to_string())?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn ask(answers: &str) -> Option<ImageSelection> {
        let mut output = Vec::new();
        ask_selection(Cursor::new(answers), &mut output).unwrap()
    }

    #[test]
    fn default_is_arm9() {
        assert_eq!(ask("\n"), Some(ImageSelection::Arm9));
        assert_eq!(ask("YES\n"), Some(ImageSelection::Arm9));
    }

    #[test]
    fn no_is_arm7() {
        assert_eq!(ask("n\n"), Some(ImageSelection::Arm7));
    }

    #[test]
    fn cancel_and_end_of_input() {
        assert_eq!(ask("cancel\n"), None);
        assert_eq!(ask(""), None);
    }

    #[test]
    fn reasks_after_nonsense() {
        let mut output = Vec::new();
        let selection = ask_selection(Cursor::new("maybe\nno\n"), &mut output).unwrap();
        assert_eq!(selection, Some(ImageSelection::Arm7));
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output.matches("[Y/n/c]").count(), 2);
        assert!(output.contains("Unrecognized answer 'maybe'."));
    }
}

// Interactive confirmation

use std::io::{self, BufRead, Write};

use bulkfs_history::{Confirm, FsChange};

use crate::output::OutputStyle;

/// Lists the planned changes on `output`, asks, and reads one answer line
/// from `input`.
///
/// Only `y` or `Y` proceeds; anything else, including end of input or a read
/// error, declines. With `assume_yes` nothing is listed or read.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
    style: OutputStyle,
    assume_yes: bool,
}

impl PromptConfirm<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the terminal
    pub fn stdio(style: OutputStyle, assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), style, assume_yes)
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W, style: OutputStyle, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            style,
            assume_yes,
        }
    }

    fn ask(&mut self, question: &str, planned: &[FsChange]) -> io::Result<bool> {
        if self.assume_yes {
            writeln!(self.output, "{}y", self.style.prompt(&format!("{} [y/N]", question)))?;
            return Ok(true);
        }

        writeln!(self.output, "{}", self.style.section("Planned changes"))?;
        for change in planned {
            writeln!(self.output, "{}", self.style.list_item(&change.to_string()))?;
        }
        write!(self.output, "{}", self.style.prompt(&format!("{} [y/N]", question)))?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, question: &str, planned: &[FsChange]) -> bool {
        self.ask(question, planned).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "confirmation prompt failed");
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(input: &str, assume_yes: bool) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = PromptConfirm::new(
            input.as_bytes(),
            &mut output,
            OutputStyle::plain(),
            assume_yes,
        )
        .confirm(
            "Delete 2 folders in /tmp/x?",
            &[
                FsChange::RemoveFolder("10_".into()),
                FsChange::RemoveFolder("precious".into()),
            ],
        );
        (confirmed, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_yes_answers() {
        assert!(answer("y\n", false).0);
        assert!(answer("Y\n", false).0);
        assert!(answer("  y  \n", false).0);
    }

    #[test]
    fn test_other_answers_decline() {
        assert!(!answer("n\n", false).0);
        assert!(!answer("yes\n", false).0);
        assert!(!answer("\n", false).0);
    }

    #[test]
    fn test_end_of_input_declines() {
        assert!(!answer("", false).0);
    }

    #[test]
    fn test_planned_changes_listed_before_question() {
        let (_, printed) = answer("n\n", false);
        assert_eq!(
            printed,
            "\nPlanned changes\n───────────────\n  • - 10_\n  • - precious\nDelete 2 folders in /tmp/x? [y/N] "
        );
    }

    #[test]
    fn test_assume_yes_skips_input() {
        let (confirmed, printed) = answer("", true);
        assert!(confirmed);
        assert_eq!(printed, "Delete 2 folders in /tmp/x? [y/N] y\n");
    }
}

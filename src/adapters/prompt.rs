use std::io::{self, BufRead, StdinLock, Stderr, Write};

use crate::domain::deployment::{
    ClassifyError, DeploymentChoice, DeploymentClassifier, DeploymentScope,
};

/// Single-select deployment prompt on a line-oriented terminal.
///
/// Choices are listed with their numbers; the operator answers with either
/// the number or the choice name. End of input aborts.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<StdinLock<'static>, Stderr> {
    /// Prompt on stderr so stdout stays reserved for the command result.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_answer(&mut self) -> Result<Option<String>, ClassifyError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> DeploymentClassifier for TerminalPrompt<R, W> {
    fn classify(&mut self, scope: &DeploymentScope<'_>) -> Result<DeploymentChoice, ClassifyError> {
        writeln!(
            self.output,
            "? Select the type of environment for {}",
            scope.label()
        )?;
        for (index, choice) in DeploymentChoice::ALL.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, choice.label())?;
        }

        loop {
            write!(self.output, "Enter choice [1-{}]: ", DeploymentChoice::ALL.len())?;
            self.output.flush()?;
            let Some(answer) = self.read_answer()? else {
                return Err(ClassifyError::Aborted);
            };
            if let Some(choice) = parse_answer(&answer) {
                return Ok(choice);
            }
            writeln!(
                self.output,
                "Please answer with a number or one of: None, Test, Staging, Production."
            )?;
        }
    }
}

fn parse_answer(answer: &str) -> Option<DeploymentChoice> {
    if let Ok(index) = answer.parse::<usize>() {
        return index
            .checked_sub(1)
            .and_then(|index| DeploymentChoice::ALL.get(index))
            .copied();
    }
    answer.parse().ok()
}

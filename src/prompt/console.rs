use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Stdin, Stdout, Write};

use super::source::ChoiceSource;
use crate::analyzers::types::CohortAssignment;

/// Asks on a terminal (or any reader/writer pair).
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String> {
        self.output.flush()?;
        let mut line = String::new();
        self.input
            .read_line(&mut line)
            .context("failed to read from console")?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> ChoiceSource for ConsolePrompt<R, W> {
    fn program_choice(&mut self, cohorts: &CohortAssignment) -> Result<String> {
        writeln!(self.output, "\nWould you like to filter by program?")?;
        for cohort in cohorts.cohorts() {
            writeln!(self.output, "  {}. {}", cohort.number, cohort.label)?;
        }
        writeln!(self.output, "  0. All programs")?;
        write!(self.output, "\nEnter program number (or press Enter for all): ")?;
        self.read_line()
    }

    fn starting_name(&mut self) -> Result<String> {
        write!(
            self.output,
            "Enter the name of the student to start from\n(or press Enter to check all students): "
        )?;
        self.read_line()
    }
}

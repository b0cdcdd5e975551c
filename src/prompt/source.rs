use anyhow::Result;

use crate::analyzers::types::CohortAssignment;

/// Supplies the two run-time choices: which program to grade and which
/// respondent to start from. Answers are raw text; blank means "all".
pub trait ChoiceSource {
    fn program_choice(&mut self, cohorts: &CohortAssignment) -> Result<String>;
    fn starting_name(&mut self) -> Result<String>;
}

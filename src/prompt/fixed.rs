use anyhow::Result;

use super::source::ChoiceSource;
use crate::analyzers::types::CohortAssignment;

/// Pre-set answers. Anything not set answers blank.
#[derive(Debug, Clone, Default)]
pub struct FixedChoices {
    program: Option<String>,
    start: Option<String>,
}

impl FixedChoices {
    pub fn new(program: Option<String>, start: Option<String>) -> Self {
        Self { program, start }
    }
}

impl ChoiceSource for FixedChoices {
    fn program_choice(&mut self, _cohorts: &CohortAssignment) -> Result<String> {
        Ok(self.program.clone().unwrap_or_default())
    }

    fn starting_name(&mut self) -> Result<String> {
        Ok(self.start.clone().unwrap_or_default())
    }
}

/// Pre-set answers that defer to another source for anything not set.
pub struct Preset<C> {
    program: Option<String>,
    start: Option<String>,
    fallback: C,
}

impl<C: ChoiceSource> Preset<C> {
    pub fn new(program: Option<String>, start: Option<String>, fallback: C) -> Self {
        Self {
            program,
            start,
            fallback,
        }
    }
}

impl<C: ChoiceSource> ChoiceSource for Preset<C> {
    fn program_choice(&mut self, cohorts: &CohortAssignment) -> Result<String> {
        match &self.program {
            Some(program) => Ok(program.clone()),
            None => self.fallback.program_choice(cohorts),
        }
    }

    fn starting_name(&mut self) -> Result<String> {
        match &self.start {
            Some(start) => Ok(start.clone()),
            None => self.fallback.starting_name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_defaults_to_blank() {
        let mut choices = FixedChoices::default();
        let cohorts = CohortAssignment::default();
        assert_eq!(choices.program_choice(&cohorts).unwrap(), "");
        assert_eq!(choices.starting_name().unwrap(), "");
    }

    #[test]
    fn test_preset_falls_back() {
        let fallback = FixedChoices::new(Some("2".into()), Some("Jane Doe".into()));
        let mut choices = Preset::new(Some("1".into()), None, fallback);
        let cohorts = CohortAssignment::default();
        assert_eq!(choices.program_choice(&cohorts).unwrap(), "1");
        assert_eq!(choices.starting_name().unwrap(), "Jane Doe");
    }
}

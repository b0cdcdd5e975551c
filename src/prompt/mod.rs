//! Run-time choices: program filter and starting respondent.
//!
//! [`ChoiceSource`] is the trait the pipeline asks; [`ConsolePrompt`] reads
//! from a terminal, [`FixedChoices`] and [`Preset`] answer from settings.

mod console;
mod fixed;
mod source;

pub use console::ConsolePrompt;
pub use fixed::{FixedChoices, Preset};
pub use source::ChoiceSource;

use tracing::warn;

use crate::analyzers::types::CohortAssignment;

/// Turns a raw program answer into a cohort filter. Blank or `0` means all
/// programs; anything that is not a detected program number also means all.
pub fn resolve_program(raw: &str, cohorts: &CohortAssignment) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "0" {
        return None;
    }

    match raw.parse::<usize>() {
        Ok(number) if cohorts.get(number).is_some() => Some(number),
        Ok(number) => {
            warn!(number, "Invalid program number; processing all programs");
            None
        }
        Err(_) => {
            warn!(input = raw, "Invalid input; processing all programs");
            None
        }
    }
}

/// Blank answers mean "start from the first respondent".
pub fn resolve_starting_name(raw: &str) -> Option<String> {
    let raw = raw.trim();
    (!raw.is_empty()).then(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::cohort::cluster_by_date;
    use crate::analyzers::types::Submission;

    fn two_programs() -> CohortAssignment {
        let subs: Vec<Submission> = ["1/1/2024", "3/1/2024"]
            .iter()
            .enumerate()
            .map(|(row, ts)| Submission {
                row,
                name: format!("Student {row}"),
                timestamp: Some(ts.to_string()),
                answers: vec![],
            })
            .collect();
        cluster_by_date(&subs, 2)
    }

    #[test]
    fn test_resolve_program() {
        let cohorts = two_programs();
        assert_eq!(resolve_program("2", &cohorts), Some(2));
        assert_eq!(resolve_program(" 1 ", &cohorts), Some(1));
        assert_eq!(resolve_program("", &cohorts), None);
        assert_eq!(resolve_program("0", &cohorts), None);
        assert_eq!(resolve_program("3", &cohorts), None);
        assert_eq!(resolve_program("first", &cohorts), None);
        assert_eq!(resolve_program("-1", &cohorts), None);
    }

    #[test]
    fn test_resolve_starting_name() {
        assert_eq!(resolve_starting_name("   "), None);
        assert_eq!(resolve_starting_name(" Jane Doe "), Some("Jane Doe".to_string()));
    }
}

//! Grading of each respondent's latest submission against the answer key.

use std::collections::HashMap;
use tracing::debug;

use crate::analyzers::names::{names_match, normalize_name};
use crate::analyzers::types::{AnswerKey, CohortAssignment, GradingResult, Outcome, Submission};

/// Name fragments that mark the answer key row.
pub const ANSWER_KEY_KEYWORDS: &[&str] = &["testing", "answer", "key"];

/// Which submissions take part in grading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradingScope {
    /// Rows before this index are ignored.
    pub start_row: usize,
    /// Only respondents in this program are graded.
    pub cohort: Option<usize>,
}

/// Finds the first row whose name contains one of `keywords`, case-insensitively.
pub fn find_answer_key<S: AsRef<str>>(
    submissions: &[Submission],
    keywords: &[S],
) -> Option<AnswerKey> {
    submissions
        .iter()
        .find(|s| {
            let name = s.name.trim().to_lowercase();
            keywords
                .iter()
                .any(|k| name.contains(&k.as_ref().to_lowercase()))
        })
        .map(AnswerKey::from_submission)
}

/// Finds the first row whose name fuzzily matches `name`.
pub fn find_start_row(submissions: &[Submission], name: &str, threshold: f64) -> Option<usize> {
    submissions
        .iter()
        .find(|s| names_match(s.name.trim(), name, threshold))
        .map(|s| s.row)
}

/// Row index of each respondent's last submission at or after `start_row`,
/// in ascending row order. The answer key row and blank names are skipped.
///
/// "Last" is row order, not parsed timestamp.
pub fn latest_submissions(
    submissions: &[Submission],
    key_row: usize,
    start_row: usize,
) -> Vec<usize> {
    let mut latest: HashMap<String, usize> = HashMap::new();

    for s in submissions.iter().filter(|s| s.row >= start_row) {
        let name = s.name.trim();
        if name.is_empty() || s.row == key_row {
            continue;
        }
        let entry = latest.entry(normalize_name(name)).or_insert(s.row);
        *entry = (*entry).max(s.row);
    }

    let mut rows: Vec<usize> = latest.into_values().collect();
    rows.sort_unstable();
    rows
}

/// 1-based numbers of questions whose trimmed answer differs from the key.
pub fn missed_questions(answers: &[String], key: &AnswerKey) -> Vec<usize> {
    key.answers
        .iter()
        .enumerate()
        .filter(|(idx, expected)| {
            let given = answers.get(*idx).map(|a| a.trim()).unwrap_or("");
            given != expected.as_str()
        })
        .map(|(idx, _)| idx + 1)
        .collect()
}

/// Grades every respondent in scope, in row order of their latest submission.
pub fn grade_submissions(
    submissions: &[Submission],
    key: &AnswerKey,
    cohorts: &CohortAssignment,
    scope: GradingScope,
) -> Vec<GradingResult> {
    let by_row: HashMap<usize, &Submission> = submissions.iter().map(|s| (s.row, s)).collect();

    let results: Vec<GradingResult> = latest_submissions(submissions, key.row, scope.start_row)
        .into_iter()
        .filter_map(|row| by_row.get(&row).copied())
        .filter_map(|s| {
            let cohort = cohorts.cohort_of(s.row);
            if scope.cohort.is_some() && cohort != scope.cohort {
                return None;
            }

            let missed = missed_questions(&s.answers, key);
            let outcome = if missed.is_empty() {
                Outcome::AllCorrect
            } else {
                Outcome::Missed(missed)
            };

            Some(GradingResult {
                name: s.name.trim().to_string(),
                row: s.row,
                cohort,
                outcome,
            })
        })
        .collect();

    debug!(
        graded = results.len(),
        start_row = scope.start_row,
        cohort = ?scope.cohort,
        "Graded submissions"
    );
    results
}

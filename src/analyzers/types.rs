//! Data types shared by the clustering and grading stages.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single data row of the submissions file, reduced to the sniffed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// 0-based data row index (the header line is not counted).
    pub row: usize,
    pub name: String,
    pub timestamp: Option<String>,
    /// Answers in question-column order.
    pub answers: Vec<String>,
}

impl Submission {
    /// The row number a spreadsheet application would show for this record.
    pub fn sheet_row(&self) -> usize {
        self.row + 2
    }
}

/// A cluster of submissions whose consecutive timestamps lie within the gap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cohort {
    pub number: usize,
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub count: usize,
    /// Member rows in timestamp order.
    pub rows: Vec<usize>,
}

impl Cohort {
    /// `MM/DD/YYYY to MM/DD/YYYY`
    pub fn period(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%m/%d/%Y"),
            self.end.format("%m/%d/%Y")
        )
    }
}

/// Row to cohort projection produced by the clusterer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CohortAssignment {
    by_row: BTreeMap<usize, usize>,
    cohorts: Vec<Cohort>,
}

impl CohortAssignment {
    pub fn new(cohorts: Vec<Cohort>) -> Self {
        let by_row = cohorts
            .iter()
            .flat_map(|c| c.rows.iter().map(move |row| (*row, c.number)))
            .collect();
        Self { by_row, cohorts }
    }

    pub fn cohort_of(&self, row: usize) -> Option<usize> {
        self.by_row.get(&row).copied()
    }

    pub fn get(&self, number: usize) -> Option<&Cohort> {
        self.cohorts.iter().find(|c| c.number == number)
    }

    pub fn cohorts(&self) -> &[Cohort] {
        &self.cohorts
    }

    pub fn is_empty(&self) -> bool {
        self.cohorts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cohorts.len()
    }
}

/// The submission treated as ground truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerKey {
    pub row: usize,
    pub name: String,
    /// Trimmed answers in question-column order.
    pub answers: Vec<String>,
}

impl AnswerKey {
    pub fn from_submission(submission: &Submission) -> Self {
        Self {
            row: submission.row,
            name: submission.name.trim().to_string(),
            answers: submission
                .answers
                .iter()
                .map(|a| a.trim().to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "missed")]
pub enum Outcome {
    AllCorrect,
    /// 1-based question numbers, ascending.
    Missed(Vec<usize>),
}

/// Grading of one respondent's latest submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradingResult {
    pub name: String,
    pub row: usize,
    pub cohort: Option<usize>,
    pub outcome: Outcome,
}

impl fmt::Display for GradingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::AllCorrect => write!(f, "{}: All correct!", self.name),
            Outcome::Missed(questions) => {
                let list: Vec<String> = questions.iter().map(|q| q.to_string()).collect();
                write!(f, "{}: {}", self.name, list.join(", "))
            }
        }
    }
}

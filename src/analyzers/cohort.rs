//! Program detection by clustering submission timestamps.
//!
//! Submissions are sorted by parsed timestamp and split wherever two
//! neighbours lie more than `gap_weeks * 7` whole days apart.

use crate::analyzers::types::{Cohort, CohortAssignment, Submission};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use tracing::debug;

/// Default gap between programs, in weeks.
pub const DEFAULT_GAP_WEEKS: u32 = 2;

const DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d"];

/// Parses a submission timestamp, trying full date-times before bare dates.
/// Bare dates resolve to midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Groups submissions into programs. Rows without a parseable timestamp are
/// left unassigned.
pub fn cluster_by_date(submissions: &[Submission], gap_weeks: u32) -> CohortAssignment {
    let mut dated: Vec<(NaiveDateTime, usize)> = submissions
        .iter()
        .filter_map(|s| {
            s.timestamp
                .as_deref()
                .and_then(parse_timestamp)
                .map(|ts| (ts, s.row))
        })
        .collect();

    if dated.is_empty() {
        return CohortAssignment::default();
    }

    // stable: identical timestamps keep row order
    dated.sort_by_key(|(ts, _)| *ts);

    let gap_days = i64::from(gap_weeks) * 7;
    let mut runs: Vec<Vec<(NaiveDateTime, usize)>> = Vec::new();
    let mut current = vec![dated[0]];

    for pair in dated.windows(2) {
        let (prev, next) = (pair[0], pair[1]);
        if (next.0 - prev.0).num_days() > gap_days {
            runs.push(std::mem::take(&mut current));
        }
        current.push(next);
    }
    runs.push(current);

    let cohorts: Vec<Cohort> = runs
        .into_iter()
        .enumerate()
        .map(|(idx, run)| {
            let start = run[0].0;
            let end = run[run.len() - 1].0;
            Cohort {
                number: idx + 1,
                label: program_label(start, end),
                start,
                end,
                count: run.len(),
                rows: run.into_iter().map(|(_, row)| row).collect(),
            }
        })
        .collect();

    debug!(
        dated = dated.len(),
        cohorts = cohorts.len(),
        gap_days,
        "Clustered submissions"
    );

    CohortAssignment::new(cohorts)
}

/// `January 2024 Program` within one month, `Jan-Feb 2024 Program` across months.
pub fn program_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    if start.year() == end.year() && start.month() == end.month() {
        format!("{} Program", start.format("%B %Y"))
    } else {
        format!("{}-{} Program", start.format("%b"), end.format("%b %Y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(row: usize, timestamp: &str) -> Submission {
        Submission {
            row,
            name: format!("Student {row}"),
            timestamp: Some(timestamp.to_string()),
            answers: vec![],
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 7, 24)
            .unwrap()
            .and_hms_opt(14, 9, 43)
            .unwrap();
        assert_eq!(parse_timestamp("7/24/2024 14:09:43"), Some(expected));
        assert_eq!(parse_timestamp("2024-07-24 14:09:43"), Some(expected));
        assert_eq!(parse_timestamp(" 07/24/2024 "), Some(date(2024, 7, 24)));
        assert_eq!(parse_timestamp("2024-07-24"), Some(date(2024, 7, 24)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp("24.07.2024"), None);
    }

    #[test]
    fn test_gap_splits_programs() {
        let subs = vec![
            submission(0, "1/1/2024"),
            submission(1, "1/10/2024"),
            submission(2, "3/1/2024"),
        ];
        let assignment = cluster_by_date(&subs, 2);

        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.cohort_of(0), Some(1));
        assert_eq!(assignment.cohort_of(1), Some(1));
        assert_eq!(assignment.cohort_of(2), Some(2));

        let first = assignment.get(1).unwrap();
        assert_eq!(first.count, 2);
        assert_eq!(first.label, "January 2024 Program");
        assert_eq!(first.period(), "01/01/2024 to 01/10/2024");
    }

    #[test]
    fn test_gap_is_exclusive() {
        // exactly 14 days stays together, 15 splits
        let together = vec![submission(0, "2024-01-01"), submission(1, "2024-01-15")];
        assert_eq!(cluster_by_date(&together, 2).len(), 1);

        let apart = vec![submission(0, "2024-01-01"), submission(1, "2024-01-16")];
        assert_eq!(cluster_by_date(&apart, 2).len(), 2);
    }

    #[test]
    fn test_partial_days_are_truncated() {
        let subs = vec![
            submission(0, "2024-01-01 08:00:00"),
            submission(1, "2024-01-15 23:00:00"),
        ];
        assert_eq!(cluster_by_date(&subs, 2).len(), 1);
    }

    #[test]
    fn test_invariant_to_row_order() {
        let ordered = vec![
            submission(0, "1/1/2024"),
            submission(1, "1/10/2024"),
            submission(2, "3/1/2024"),
            submission(3, "3/5/2024"),
        ];
        let shuffled = vec![
            submission(0, "3/5/2024"),
            submission(1, "1/10/2024"),
            submission(2, "3/1/2024"),
            submission(3, "1/1/2024"),
        ];

        let a = cluster_by_date(&ordered, 2);
        let b = cluster_by_date(&shuffled, 2);

        assert_eq!(a.len(), b.len());
        let sizes = |x: &CohortAssignment| x.cohorts().iter().map(|c| c.count).collect::<Vec<_>>();
        assert_eq!(sizes(&a), sizes(&b));
        assert_eq!(b.cohort_of(3), Some(1));
        assert_eq!(b.cohort_of(1), Some(1));
        assert_eq!(b.cohort_of(0), Some(2));
        assert_eq!(b.cohort_of(2), Some(2));
    }

    #[test]
    fn test_ties_keep_row_order() {
        let subs = vec![
            submission(0, "2024-02-01"),
            submission(1, "2024-01-01"),
            submission(2, "2024-01-01"),
        ];
        let assignment = cluster_by_date(&subs, 2);
        assert_eq!(assignment.len(), 2);
        assert_eq!(assignment.get(1).unwrap().rows, vec![1, 2]);
    }

    #[test]
    fn test_unparseable_rows_unassigned() {
        let mut subs = vec![submission(0, "2024-01-01"), submission(1, "not a date")];
        subs.push(Submission {
            timestamp: None,
            ..submission(2, "")
        });

        let assignment = cluster_by_date(&subs, 2);
        assert_eq!(assignment.len(), 1);
        assert_eq!(assignment.cohort_of(1), None);
        assert_eq!(assignment.cohort_of(2), None);
    }

    #[test]
    fn test_no_timestamps_no_cohorts() {
        let subs = vec![submission(0, "n/a")];
        assert!(cluster_by_date(&subs, 2).is_empty());
    }

    #[test]
    fn test_label_spanning_months() {
        assert_eq!(
            program_label(date(2024, 1, 25), date(2024, 2, 3)),
            "Jan-Feb 2024 Program"
        );
        assert_eq!(
            program_label(date(2023, 12, 28), date(2024, 1, 4)),
            "Dec-Jan 2024 Program"
        );
        // same month number, different year
        assert_eq!(
            program_label(date(2023, 3, 1), date(2024, 3, 1)),
            "Mar-Mar 2024 Program"
        );
    }
}

//! Header sniffing: decides which column holds respondent names, which holds
//! submission timestamps, and which hold question answers.

use anyhow::{Result, bail};
use tracing::{info, warn};

const NAME_KEYWORD: &str = "name";
const NAME_PREFERRED: &[&str] = &["first", "last"];
const TIMESTAMP_KEYWORDS: &[&str] = &["timestamp", "date", "time", "submitted"];
const NON_QUESTION_KEYWORDS: &[&str] = &[
    "timestamp", "score", "group", "private", "name", "email", "date", "time",
];

/// The role a header plays in the submissions file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Name,
    Timestamp,
    Question,
    Unclassified,
}

/// Resolved column positions for one submissions file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub headers: Vec<String>,
    pub name: usize,
    pub timestamp: Option<usize>,
    pub questions: Vec<usize>,
}

fn contains_any(header: &str, keywords: &[&str]) -> bool {
    let lower = header.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

fn detect_name(headers: &[String]) -> Option<usize> {
    let candidates: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.to_lowercase().contains(NAME_KEYWORD))
        .map(|(idx, _)| idx)
        .collect();

    candidates
        .iter()
        .copied()
        .find(|idx| contains_any(&headers[*idx], NAME_PREFERRED))
        .or_else(|| candidates.first().copied())
}

fn detect_timestamp(headers: &[String], name: usize) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .find(|(idx, h)| *idx != name && contains_any(h, TIMESTAMP_KEYWORDS))
        .map(|(idx, _)| idx)
}

impl ColumnLayout {
    /// Classifies `headers`, giving each column exactly one tag.
    ///
    /// The timestamp column is never the name column, and once chosen it is
    /// not also a question, so a header such as `Submitted` is a timestamp
    /// only.
    ///
    /// # Errors
    ///
    /// Fails when no name column or no question column can be found.
    pub fn detect(headers: &[String]) -> Result<Self> {
        let Some(name) = detect_name(headers) else {
            bail!(
                "could not find a name column; available columns: {:?}",
                headers
            );
        };

        let timestamp = detect_timestamp(headers, name);

        let questions: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(idx, h)| Some(*idx) != timestamp && !contains_any(h, NON_QUESTION_KEYWORDS))
            .map(|(idx, _)| idx)
            .collect();

        if questions.is_empty() {
            bail!("could not find any question columns; available columns: {:?}", headers);
        }

        let layout = Self {
            headers: headers.to_vec(),
            name,
            timestamp,
            questions,
        };

        info!(column = %layout.name_header(), "Detected name column");
        match layout.timestamp_header() {
            Some(column) => info!(column, "Detected timestamp column"),
            None => warn!("Could not detect a timestamp column; program detection disabled"),
        }
        info!(
            count = layout.questions.len(),
            first = %layout.headers[layout.questions[0]],
            last = %layout.headers[layout.questions[layout.questions.len() - 1]],
            "Detected question columns"
        );

        Ok(layout)
    }

    /// Tag for the column at `idx`.
    pub fn kind(&self, idx: usize) -> ColumnKind {
        if idx == self.name {
            ColumnKind::Name
        } else if Some(idx) == self.timestamp {
            ColumnKind::Timestamp
        } else if self.questions.contains(&idx) {
            ColumnKind::Question
        } else {
            ColumnKind::Unclassified
        }
    }

    /// Tags for every column, in header order.
    pub fn kinds(&self) -> Vec<ColumnKind> {
        (0..self.headers.len()).map(|idx| self.kind(idx)).collect()
    }

    pub fn name_header(&self) -> &str {
        &self.headers[self.name]
    }

    pub fn timestamp_header(&self) -> Option<&str> {
        self.timestamp.map(|idx| self.headers[idx].as_str())
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_typical_form_export() {
        let h = headers(&["Timestamp", "Score", "Full Name", "Email Address", "Q1", "Q2", "Q3"]);
        let layout = ColumnLayout::detect(&h).unwrap();

        assert_eq!(layout.name, 2);
        assert_eq!(layout.timestamp, Some(0));
        assert_eq!(layout.questions, vec![4, 5, 6]);
        assert_eq!(
            layout.kinds(),
            vec![
                ColumnKind::Timestamp,
                ColumnKind::Unclassified,
                ColumnKind::Name,
                ColumnKind::Unclassified,
                ColumnKind::Question,
                ColumnKind::Question,
                ColumnKind::Question,
            ]
        );
    }

    #[test]
    fn test_prefers_first_last_name() {
        let h = headers(&["Nickname", "First and Last Name", "Q1"]);
        let layout = ColumnLayout::detect(&h).unwrap();
        assert_eq!(layout.name_header(), "First and Last Name");
    }

    #[test]
    fn test_falls_back_to_first_name_column() {
        let h = headers(&["Team name", "Student Name", "Q1"]);
        let layout = ColumnLayout::detect(&h).unwrap();
        assert_eq!(layout.name, 0);
    }

    #[test]
    fn test_case_insensitive() {
        let h = headers(&["DATE SUBMITTED", "NAME", "What is 2+2?"]);
        let layout = ColumnLayout::detect(&h).unwrap();
        assert_eq!(layout.name, 1);
        assert_eq!(layout.timestamp_header(), Some("DATE SUBMITTED"));
        assert_eq!(layout.questions, vec![2]);
    }

    #[test]
    fn test_submitted_column_is_not_a_question() {
        let h = headers(&["Name", "Submitted", "Q1"]);
        let layout = ColumnLayout::detect(&h).unwrap();
        assert_eq!(layout.timestamp, Some(1));
        assert_eq!(layout.questions, vec![2]);
        assert_eq!(layout.kind(1), ColumnKind::Timestamp);
    }

    #[test]
    fn test_missing_timestamp_is_recoverable() {
        let h = headers(&["Name", "Q1"]);
        let layout = ColumnLayout::detect(&h).unwrap();
        assert_eq!(layout.timestamp, None);
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let h = headers(&["Timestamp", "Q1"]);
        let err = ColumnLayout::detect(&h).unwrap_err();
        assert!(err.to_string().contains("name column"));
    }

    #[test]
    fn test_missing_questions_is_fatal() {
        let h = headers(&["Timestamp", "Name", "Email", "Group"]);
        let err = ColumnLayout::detect(&h).unwrap_err();
        assert!(err.to_string().contains("question columns"));
    }
}

//! Group roster loading and membership lookup.
//!
//! The roster is a plain text file:
//!
//! ```text
//! Group 1:
//! Jane Doe
//! Smith, John
//!
//! PRIVATE 2
//! Mary Jones
//! ```

use anyhow::{Context, Result};
use std::cmp::Ordering;
use std::path::Path;
use tracing::{debug, warn};

use crate::analyzers::names::names_match;

/// Label for respondents that match no roster entry.
pub const UNGROUPED: &str = "Ungrouped";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub label: String,
    pub members: Vec<String>,
}

/// Groups in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    groups: Vec<Group>,
}

fn is_group_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.starts_with("group ") || lower.starts_with("private ")
}

impl Roster {
    /// Parses roster text. Lines before the first header are ignored. A
    /// repeated header empties the group it names, which keeps its first
    /// position in declaration order.
    pub fn parse(text: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut open: Option<usize> = None;

        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if is_group_header(line) {
                let label = line.trim_end_matches(':').trim().to_string();
                open = match groups.iter().position(|g| g.label == label) {
                    Some(idx) => {
                        groups[idx].members.clear();
                        Some(idx)
                    }
                    None => {
                        groups.push(Group {
                            label,
                            members: Vec::new(),
                        });
                        Some(groups.len() - 1)
                    }
                };
            } else if let Some(idx) = open {
                groups[idx].members.push(line.to_string());
            }
        }

        Self { groups }
    }

    /// Loads the roster at `path`. A missing file yields an empty roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let roster = Self::parse(&text);
                debug!(path = %path.display(), groups = roster.len(), "Loaded roster");
                Ok(roster)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "Roster not found; grouping disabled");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    /// Label of the first group holding a member that matches `name`.
    pub fn group_for(&self, name: &str, threshold: f64) -> &str {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| names_match(name, m, threshold)))
            .map(|g| g.label.as_str())
            .unwrap_or(UNGROUPED)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Ordering class and trailing number of a group label.
fn group_rank(label: &str) -> (u8, Option<u64>) {
    let lower = label.to_lowercase();
    let class = if lower.starts_with("group ") {
        0
    } else if lower.starts_with("private ") {
        1
    } else {
        2
    };
    let number = lower
        .split_whitespace()
        .last()
        .and_then(|tok| tok.parse::<u64>().ok());
    (class, number)
}

/// Report order: `group N` ascending, then `private N` ascending, then
/// anything else (`Ungrouped`). Unnumbered labels follow their numbered peers.
pub fn compare_group_labels(a: &str, b: &str) -> Ordering {
    let (class_a, num_a) = group_rank(a);
    let (class_b, num_b) = group_rank(b);

    class_a
        .cmp(&class_b)
        .then_with(|| match (num_a, num_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.cmp(b))
}

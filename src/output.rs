//! Report rendering and persistence for grading results.
//!
//! Results are partitioned by roster group, by detected program, or not at
//! all, then rendered identically to the console and to the results file.
//! A JSON copy can be written alongside.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{CohortAssignment, GradingResult};
use crate::roster::{Roster, compare_group_labels};

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Summary lines written at the top of the results file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunHeader {
    pub name_column: String,
    pub question_count: usize,
    /// Label of the program the run was restricted to.
    pub program_filter: Option<String>,
    /// The starting name as typed.
    pub starting_name: Option<String>,
    pub total: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Groups,
    Programs,
    Flat,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub label: String,
    pub period: Option<String>,
    pub results: Vec<GradingResult>,
}

/// A fully partitioned report, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub header: RunHeader,
    pub partition: Partition,
    pub sections: Vec<Section>,
}

/// Groups win over programs; programs apply only when no program filter is set.
pub fn choose_partition(
    roster: &Roster,
    cohorts: &CohortAssignment,
    program_filter: Option<usize>,
    results: &[GradingResult],
) -> Partition {
    if !roster.is_empty() && !results.is_empty() {
        Partition::Groups
    } else if !cohorts.is_empty() && program_filter.is_none() {
        Partition::Programs
    } else {
        Partition::Flat
    }
}

fn group_sections(results: Vec<GradingResult>, roster: &Roster, threshold: f64) -> Vec<Section> {
    let mut sections: Vec<Section> = Vec::new();

    for result in results {
        let label = roster.group_for(&result.name, threshold);
        match sections.iter_mut().find(|s| s.label == label) {
            Some(section) => section.results.push(result),
            None => sections.push(Section {
                label: label.to_string(),
                period: None,
                results: vec![result],
            }),
        }
    }

    sections.sort_by(|a, b| compare_group_labels(&a.label, &b.label));
    sections
}

fn program_sections(results: Vec<GradingResult>, cohorts: &CohortAssignment) -> Vec<Section> {
    let mut sections: Vec<Section> = cohorts
        .cohorts()
        .iter()
        .map(|c| Section {
            label: c.label.clone(),
            period: Some(c.period()),
            results: Vec::new(),
        })
        .collect();

    // Respondents without a program are counted in the header only.
    for result in results {
        let idx = result
            .cohort
            .and_then(|n| cohorts.cohorts().iter().position(|c| c.number == n));
        if let Some(idx) = idx {
            sections[idx].results.push(result);
        }
    }

    sections.retain(|s| !s.results.is_empty());
    sections
}

/// Partitions `results` and attaches the run header.
pub fn build_report(
    header: RunHeader,
    results: Vec<GradingResult>,
    roster: &Roster,
    cohorts: &CohortAssignment,
    program_filter: Option<usize>,
    threshold: f64,
) -> Report {
    let partition = choose_partition(roster, cohorts, program_filter, &results);
    let sections = match partition {
        Partition::Groups => group_sections(results, roster, threshold),
        Partition::Programs => program_sections(results, cohorts),
        Partition::Flat => vec![Section {
            label: String::new(),
            period: None,
            results,
        }],
    };
    debug!(?partition, sections = sections.len(), "Built report");

    Report {
        header,
        partition,
        sections,
    }
}

impl Report {
    fn render_sections(&self, out: &mut String) {
        for section in &self.sections {
            if self.partition != Partition::Flat {
                let _ = writeln!(out);
                let _ = writeln!(out, "{}", rule());
                let _ = writeln!(out, "{}", section.label);
                if let Some(period) = &section.period {
                    let _ = writeln!(out, "Period: {}", period);
                }
                let _ = writeln!(out, "Students: {}", section.results.len());
                let _ = writeln!(out, "{}", rule());
                let _ = writeln!(out);
            }
            for result in &section.results {
                let _ = writeln!(out, "{}", result);
            }
        }
    }

    /// Contents of the results file.
    pub fn render_file(&self) -> String {
        let header = &self.header;
        let mut out = String::new();

        let _ = writeln!(out, "=== Exam Results ===");
        let _ = writeln!(out, "Name column: {}", header.name_column);
        let _ = writeln!(out, "Number of questions: {}", header.question_count);
        if let Some(program) = &header.program_filter {
            let _ = writeln!(out, "Filtered by: {}", program);
        }
        if let Some(name) = &header.starting_name {
            let _ = writeln!(out, "Starting from: {}", name);
        }
        let _ = writeln!(out, "Total students checked: {}", header.total);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out);

        self.render_sections(&mut out);
        out
    }

    /// Console transcript of the results, ending with where they were saved.
    pub fn render_console(&self, saved_to: &Path) -> String {
        let mut out = String::new();

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "RESULTS");
        let _ = writeln!(out, "{}", rule());

        self.render_sections(&mut out);

        let _ = writeln!(out);
        let _ = writeln!(out, "{}", rule());
        let _ = writeln!(out, "Total students checked: {}", self.header.total);
        let _ = writeln!(out, "Results saved to: {}", saved_to.display());
        let _ = writeln!(out, "{}", rule());
        out
    }
}

/// Writes the rendered report to `path`, replacing any previous file.
pub fn write_report(path: &Path, report: &Report) -> Result<()> {
    std::fs::write(path, report.render_file())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), total = report.header.total, "Results written");
    Ok(())
}

/// Writes the report as pretty-printed JSON to `path`.
pub fn write_json(path: &Path, report: &Report) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "JSON results written");
    Ok(())
}

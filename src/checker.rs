//! End-to-end checker run: load, detect, ask, grade, report.

use anyhow::{Result, bail};
use tracing::{info, warn};

use crate::analyzers::cohort::cluster_by_date;
use crate::analyzers::grade::{GradingScope, find_answer_key, find_start_row, grade_submissions};
use crate::analyzers::types::{CohortAssignment, Submission};
use crate::columns::ColumnLayout;
use crate::config::CheckerConfig;
use crate::output::{Report, RunHeader, build_report, write_json, write_report};
use crate::parser::read_submissions;
use crate::prompt::{ChoiceSource, resolve_program, resolve_starting_name};
use crate::roster::Roster;

/// Submissions with their sniffed layout and detected programs.
#[derive(Debug, Clone)]
pub struct LoadedSubmissions {
    pub layout: ColumnLayout,
    pub submissions: Vec<Submission>,
    pub cohorts: CohortAssignment,
}

/// Reads the answers file, classifies its columns and clusters programs.
#[tracing::instrument(skip_all, fields(path = %config.answers_path.display()))]
pub fn load_submissions(config: &CheckerConfig) -> Result<LoadedSubmissions> {
    let table = read_submissions(&config.answers_path)?;
    let layout = ColumnLayout::detect(&table.headers)?;
    let submissions = table.submissions(&layout);

    let cohorts = if layout.timestamp.is_some() {
        cluster_by_date(&submissions, config.gap_weeks)
    } else {
        CohortAssignment::default()
    };

    if !cohorts.is_empty() {
        info!(count = cohorts.len(), "Detected programs");
        for cohort in cohorts.cohorts() {
            info!(
                number = cohort.number,
                label = %cohort.label,
                period = %cohort.period(),
                students = cohort.count,
                "Program"
            );
        }
    }

    Ok(LoadedSubmissions {
        layout,
        submissions,
        cohorts,
    })
}

/// Loads the roster and logs what it found.
pub fn load_roster(config: &CheckerConfig) -> Result<Roster> {
    let roster = Roster::load(&config.groups_path)?;
    if roster.is_empty() {
        info!("No group definitions loaded; results will not be grouped");
    } else {
        info!(count = roster.len(), "Loaded groups");
        for group in roster.groups() {
            info!(group = %group.label, students = group.members.len(), "Group");
        }
    }
    Ok(roster)
}

/// Runs the whole check and writes the results file (and JSON, if set).
///
/// # Errors
///
/// Fails when the answers file is missing or empty, when no name, question
/// or answer key can be identified, or when an output cannot be written.
#[tracing::instrument(skip_all, fields(answers = %config.answers_path.display()))]
pub fn run_check(config: &CheckerConfig, choices: &mut dyn ChoiceSource) -> Result<Report> {
    let LoadedSubmissions {
        layout,
        submissions,
        cohorts,
    } = load_submissions(config)?;

    let Some(key) = find_answer_key(&submissions, &config.answer_key_keywords) else {
        bail!(
            "could not find the answer key row; looking for a name containing one of {:?}",
            config.answer_key_keywords
        );
    };
    info!(name = %key.name, row = key.row + 2, "Answer key found");

    let roster = load_roster(config)?;

    let program_filter = if cohorts.is_empty() {
        None
    } else {
        resolve_program(&choices.program_choice(&cohorts)?, &cohorts)
    };

    let starting_name = resolve_starting_name(&choices.starting_name()?);
    let start_row = match &starting_name {
        Some(name) => match find_start_row(&submissions, name, config.name_threshold) {
            Some(row) => {
                info!(
                    name = %submissions[row].name.trim(),
                    row = row + 2,
                    "Found starting student; processing from there"
                );
                row
            }
            None => {
                warn!(name = %name, "Starting student not found; processing all students");
                0
            }
        },
        None => 0,
    };

    let scope = GradingScope {
        start_row,
        cohort: program_filter,
    };
    let results = grade_submissions(&submissions, &key, &cohorts, scope);

    let header = RunHeader {
        name_column: layout.name_header().to_string(),
        question_count: layout.question_count(),
        program_filter: program_filter
            .and_then(|n| cohorts.get(n))
            .map(|c| c.label.clone()),
        starting_name,
        total: results.len(),
    };

    let report = build_report(
        header,
        results,
        &roster,
        &cohorts,
        program_filter,
        config.name_threshold,
    );

    write_report(&config.output_path, &report)?;
    if let Some(json_path) = &config.json_path {
        write_json(json_path, &report)?;
    }

    Ok(report)
}

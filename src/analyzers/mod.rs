//! Respondent matching, program detection and answer grading.
//!
//! This module reconciles free-text names, clusters submission timestamps
//! into programs, and compares each respondent's latest answers with the
//! answer key.

pub mod cohort;
pub mod grade;
pub mod names;
pub mod types;
pub mod utility;

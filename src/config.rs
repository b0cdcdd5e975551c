use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::analyzers::cohort::DEFAULT_GAP_WEEKS;
use crate::analyzers::grade::ANSWER_KEY_KEYWORDS;
use crate::analyzers::names::DEFAULT_NAME_THRESHOLD;

/// Settings for one checker run.
///
/// Every field is optional in the JSON file; missing ones keep their default:
/// ```json
/// {
///   "answers_path": "answers.csv",
///   "groups_path": "grouporder.txt",
///   "output_path": "results.txt",
///   "gap_weeks": 2,
///   "name_threshold": 0.8,
///   "answer_key_keywords": ["testing", "answer", "key"]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub answers_path: PathBuf,
    pub groups_path: PathBuf,
    pub output_path: PathBuf,
    pub json_path: Option<PathBuf>,
    pub gap_weeks: u32,
    pub name_threshold: f64,
    pub answer_key_keywords: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            answers_path: PathBuf::from("answers.csv"),
            groups_path: PathBuf::from("grouporder.txt"),
            output_path: PathBuf::from("results.txt"),
            json_path: None,
            gap_weeks: DEFAULT_GAP_WEEKS,
            name_threshold: DEFAULT_NAME_THRESHOLD,
            answer_key_keywords: ANSWER_KEY_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub answers_path: Option<PathBuf>,
    pub groups_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub gap_weeks: Option<u32>,
    pub name_threshold: Option<f64>,
}

impl CheckerConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Defaults, then the optional config file, then `overrides`.
    pub fn resolve(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let base = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(overrides))
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(p) = overrides.answers_path {
            self.answers_path = p;
        }
        if let Some(p) = overrides.groups_path {
            self.groups_path = p;
        }
        if let Some(p) = overrides.output_path {
            self.output_path = p;
        }
        if overrides.json_path.is_some() {
            self.json_path = overrides.json_path;
        }
        if let Some(weeks) = overrides.gap_weeks {
            self.gap_weeks = weeks;
        }
        if let Some(threshold) = overrides.name_threshold {
            self.name_threshold = threshold;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckerConfig::default();
        assert_eq!(config.answers_path, PathBuf::from("answers.csv"));
        assert_eq!(config.gap_weeks, 2);
        assert_eq!(config.name_threshold, 0.8);
        assert_eq!(config.answer_key_keywords, vec!["testing", "answer", "key"]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            CheckerConfig::from_json(r#"{"gap_weeks": 3, "answer_key_keywords": ["teacher"]}"#)
                .unwrap();
        assert_eq!(config.gap_weeks, 3);
        assert_eq!(config.answer_key_keywords, vec!["teacher"]);
        assert_eq!(config.output_path, PathBuf::from("results.txt"));
    }

    #[test]
    fn test_invalid_json() {
        assert!(CheckerConfig::from_json("{gap_weeks: }").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = CheckerConfig::from_json(r#"{"gap_weeks": 3, "output_path": "a.txt"}"#)
            .unwrap()
            .with_overrides(Overrides {
                gap_weeks: Some(1),
                json_path: Some(PathBuf::from("out.json")),
                ..Default::default()
            });
        assert_eq!(config.gap_weeks, 1);
        assert_eq!(config.output_path, PathBuf::from("a.txt"));
        assert_eq!(config.json_path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join("exam_checker_test_config.json");
        std::fs::write(&path, r#"{"name_threshold": 0.9}"#).unwrap();
        let config = CheckerConfig::resolve(Some(&path), Overrides::default()).unwrap();
        assert_eq!(config.name_threshold, 0.9);
        std::fs::remove_file(&path).unwrap();
    }
}

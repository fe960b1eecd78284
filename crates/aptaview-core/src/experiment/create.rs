//! Experiment creation payload and its client-side validation.
//!
//! The serialized shape matches the backend's creation DTO; read files
//! are carried as local paths and never serialized (uploads send them
//! as separate multipart parts).

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AptaError;
use crate::experiment::model::{FileFormat, ReadType};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExperiment {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub sequencing: Sequencing,
    pub selection_cycles: Vec<CreateCycle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sequencing {
    pub is_demultiplexed: bool,
    pub read_type: ReadType,
    pub file_format: FileFormat,
    pub primers: Primers,
    pub randomized_region: RandomizedRegion,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primers {
    pub five_prime: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub three_prime: Option<String>,
}

/// Randomized-region constraint, tagged on the wire by `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RandomizedRegion {
    #[serde(rename_all = "camelCase")]
    Exact { exact_length: u32 },
    Range { min: u32, max: u32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCycle {
    pub round_number: u32,
    pub round_name: String,
    #[serde(default)]
    pub is_control: bool,
    #[serde(default)]
    pub is_counter_selection: bool,
    /// Local read files; excluded from the JSON body.
    #[serde(skip)]
    pub files: CycleFiles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleFiles {
    pub forward: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reverse: Option<PathBuf>,
}

/// One violated creation rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    #[error("experiment name is required")]
    NameRequired,
    #[error("5' primer is required")]
    FivePrimePrimerRequired,
    #[error("an exact randomized region length is required")]
    ExactLengthRequired,
    #[error("randomized region range is invalid (min {min}, max {max})")]
    InvalidRange { min: u32, max: u32 },
    #[error("at least one selection cycle is required")]
    NoCycles,
    #[error("round name is required for cycle {index}")]
    RoundNameRequired { index: usize },
    #[error("duplicate round name '{name}'")]
    DuplicateRoundName { name: String },
    #[error("round numbers must run sequentially from 1 (cycle {index} has round {round})")]
    NonSequentialRound { index: usize, round: u32 },
    #[error("cycle '{round_name}' is missing its forward read file")]
    MissingForwardFile { round_name: String },
    #[error("cycle '{round_name}' needs a reverse read file for paired-end data")]
    MissingReverseFile { round_name: String },
    #[error("file '{file}' does not match the {format} format")]
    WrongFileExtension { file: String, format: FileFormat },
}

impl CreateExperiment {
    /// Checks every creation rule and returns all violations.
    ///
    /// Name uniqueness against the live list is not checked here; the
    /// store does that with its cache.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(ValidationIssue::NameRequired);
        }
        if self.sequencing.primers.five_prime.trim().is_empty() {
            issues.push(ValidationIssue::FivePrimePrimerRequired);
        }

        let has_three_prime = self
            .sequencing
            .primers
            .three_prime
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        match self.sequencing.randomized_region {
            RandomizedRegion::Exact { exact_length } => {
                if exact_length == 0 {
                    issues.push(ValidationIssue::ExactLengthRequired);
                }
            }
            RandomizedRegion::Range { min, max } => {
                // Without a 3' primer only an exact length can anchor the region.
                if !has_three_prime {
                    issues.push(ValidationIssue::ExactLengthRequired);
                } else if min == 0 || max == 0 || min >= max {
                    issues.push(ValidationIssue::InvalidRange { min, max });
                }
            }
        }

        if self.selection_cycles.is_empty() {
            issues.push(ValidationIssue::NoCycles);
        }

        let mut seen_names = BTreeSet::new();
        for (index, cycle) in self.selection_cycles.iter().enumerate() {
            let round_name = cycle.round_name.trim();
            if round_name.is_empty() {
                issues.push(ValidationIssue::RoundNameRequired { index });
            } else if !seen_names.insert(round_name.to_lowercase()) {
                issues.push(ValidationIssue::DuplicateRoundName {
                    name: cycle.round_name.clone(),
                });
            }

            let expected = (index + 1) as u32;
            if cycle.round_number != expected {
                issues.push(ValidationIssue::NonSequentialRound {
                    index,
                    round: cycle.round_number,
                });
            }

            if cycle.files.forward.as_os_str().is_empty() {
                issues.push(ValidationIssue::MissingForwardFile {
                    round_name: cycle.round_name.clone(),
                });
            }
            if self.sequencing.read_type == ReadType::PairedEnd && cycle.files.reverse.is_none() {
                issues.push(ValidationIssue::MissingReverseFile {
                    round_name: cycle.round_name.clone(),
                });
            }

            for path in [Some(&cycle.files.forward), cycle.files.reverse.as_ref()]
                .into_iter()
                .flatten()
            {
                if let Some(file) = path.file_name().and_then(|n| n.to_str())
                    && !self.sequencing.file_format.matches_file_name(file)
                {
                    issues.push(ValidationIssue::WrongFileExtension {
                        file: file.to_string(),
                        format: self.sequencing.file_format,
                    });
                }
            }
        }

        issues
    }

    /// Validation as a `Result`, collapsing all issues into one error.
    pub fn ensure_valid(&self) -> crate::Result<()> {
        let issues = self.validate();
        if issues.is_empty() {
            return Ok(());
        }
        let message = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(AptaError::validation(message))
    }
}

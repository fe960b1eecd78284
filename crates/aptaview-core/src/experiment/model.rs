//! Experiment summary and status models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Lifecycle status of an experiment on the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExperimentStatus {
    Draft,
    Running,
    Completed,
    Error,
}

/// Sequencing layout of the uploaded read files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ReadType {
    SingleEnd,
    PairedEnd,
}

/// File format of the uploaded read files.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FileFormat {
    Fastq,
    Fasta,
}

impl FileFormat {
    /// File name suffixes accepted for this format (gzip included).
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Fastq => &[".fastq", ".fq", ".fastq.gz", ".fq.gz"],
            Self::Fasta => &[".fasta", ".fa", ".fna", ".fasta.gz", ".fa.gz"],
        }
    }

    /// Case-insensitive suffix check against `allowed_extensions`.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.allowed_extensions()
            .iter()
            .any(|ext| lower.ends_with(ext))
    }
}

/// One entry of the experiment list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ExperimentStatus,
    pub created_at: DateTime<Utc>,
}

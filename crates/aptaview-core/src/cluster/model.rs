//! Cluster analyses produced by AptaCluster runs on the backend.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AptaError, Result};

/// Parameters of one AptaCluster run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AptaClusterConfiguration {
    pub randomized_region_size: u32,
    /// Dimension of the locality sensitive hash, at most the region
    /// size.
    pub lsh_dimension: u32,
    pub edit_distance: u32,
    pub lsh_iterations: u32,
    pub kmer_size: u32,
    pub kmer_cutoff_iterations: u32,
}

impl AptaClusterConfiguration {
    /// Defaults for a given randomized region size. The LSH dimension
    /// tracks the region size at 75%, floored, never below 1.
    pub fn for_region_size(randomized_region_size: u32) -> Self {
        Self {
            randomized_region_size,
            lsh_dimension: default_lsh_dimension(randomized_region_size),
            edit_distance: 5,
            lsh_iterations: 5,
            kmer_size: 3,
            kmer_cutoff_iterations: 10_000,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.randomized_region_size == 0 {
            return Err(AptaError::validation("randomized region size must be at least 1"));
        }
        if self.lsh_dimension == 0 || self.lsh_dimension > self.randomized_region_size {
            return Err(AptaError::validation(format!(
                "LSH dimension must be between 1 and the region size ({})",
                self.randomized_region_size
            )));
        }
        if self.lsh_iterations == 0 {
            return Err(AptaError::validation("LSH iterations must be at least 1"));
        }
        if self.kmer_size == 0 {
            return Err(AptaError::validation("k-mer size must be at least 1"));
        }
        Ok(())
    }
}

pub fn default_lsh_dimension(randomized_region_size: u32) -> u32 {
    ((randomized_region_size as f64 * 0.75).floor() as u32).max(1)
}

/// One completed clustering run for an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterAnalysis {
    pub id: String,
    pub experiment_id: String,
    pub request_config: AptaClusterConfiguration,
    /// Aptamer id to the cluster it was assigned to.
    #[serde(default)]
    pub aptamer_to_cluster: BTreeMap<u64, u64>,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Sorts newest first, stably. Analyses without a timestamp count as
/// the Unix epoch and end up last.
pub fn sort_newest_first(analyses: &mut [ClusterAnalysis]) {
    analyses.sort_by_key(|a| std::cmp::Reverse(a.created_at.unwrap_or(DateTime::UNIX_EPOCH)));
}

/// The analysis to display: the explicit selection when it still
/// exists in the list, otherwise the newest one.
pub fn active_analysis<'a>(
    sorted: &'a [ClusterAnalysis],
    selected_id: Option<&str>,
) -> Option<&'a ClusterAnalysis> {
    if let Some(id) = selected_id
        && let Some(found) = sorted.iter().find(|a| a.id == id)
    {
        return Some(found);
    }
    sorted.first()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn analysis(id: &str, created_at: Option<DateTime<Utc>>) -> ClusterAnalysis {
        ClusterAnalysis {
            id: id.to_string(),
            experiment_id: "exp-1".to_string(),
            request_config: AptaClusterConfiguration::for_region_size(40),
            aptamer_to_cluster: BTreeMap::new(),
            duration_ms: 1200,
            created_at,
        }
    }

    #[test]
    fn defaults_follow_region_size() {
        let config = AptaClusterConfiguration::for_region_size(40);
        assert_eq!(config.lsh_dimension, 30);
        assert_eq!(config.lsh_iterations, 5);
        assert_eq!(config.edit_distance, 5);
        assert_eq!(config.kmer_size, 3);
        assert_eq!(config.kmer_cutoff_iterations, 10_000);

        // Tiny regions still get a usable dimension.
        assert_eq!(default_lsh_dimension(1), 1);
    }

    #[test]
    fn validate_rejects_oversized_dimension() {
        let mut config = AptaClusterConfiguration::for_region_size(20);
        assert!(config.validate().is_ok());

        config.lsh_dimension = 21;
        assert!(config.validate().is_err());
    }

    #[test]
    fn analyses_sort_newest_first() {
        let ts = |day| Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        let mut list = vec![
            analysis("old", Some(ts(1))),
            analysis("untimed", None),
            analysis("new", Some(ts(9))),
        ];
        sort_newest_first(&mut list);
        let ids: Vec<_> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "untimed"]);
    }

    #[test]
    fn active_analysis_prefers_valid_selection() {
        let ts = |day| Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
        let mut list = vec![analysis("a", Some(ts(1))), analysis("b", Some(ts(5)))];
        sort_newest_first(&mut list);

        assert_eq!(active_analysis(&list, None).unwrap().id, "b");
        assert_eq!(active_analysis(&list, Some("a")).unwrap().id, "a");
        // Stale selection falls back to the newest.
        assert_eq!(active_analysis(&list, Some("gone")).unwrap().id, "b");
        assert!(active_analysis(&[], Some("a")).is_none());
    }

    #[test]
    fn wire_json_round_trips() {
        let json = r#"{
            "id": "an-1",
            "experimentId": "exp-1",
            "requestConfig": {
                "randomizedRegionSize": 40,
                "lshDimension": 30,
                "editDistance": 5,
                "lshIterations": 5,
                "kmerSize": 3,
                "kmerCutoffIterations": 10000
            },
            "aptamerToCluster": {"7": 0, "11": 0, "23": 2},
            "durationMs": 5310,
            "createdAt": "2024-03-09T12:00:00Z"
        }"#;
        let analysis: ClusterAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.request_config.lsh_dimension, 30);
        assert_eq!(analysis.aptamer_to_cluster[&23], 2);
        assert!(analysis.created_at.is_some());
    }
}

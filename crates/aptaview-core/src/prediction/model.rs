//! Secondary structure predictions computed by the backend for a
//! single sequence.

use serde::{Deserialize, Serialize};

/// Minimum free energy structure of a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MfePrediction {
    /// Dot-bracket notation, same length as the sequence.
    pub structure: String,
    /// Free energy in kcal/mol.
    pub mfe: f64,
}

/// Base pair probability matrix of a sequence.
///
/// Row `i` holds the pairing probabilities of position `i` with the
/// positions downstream of it: `matrix[i][j]` pairs `i` with
/// `i + 1 + j`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Bppm {
    #[serde(default)]
    pub matrix: Vec<Vec<f64>>,
}

impl Bppm {
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }
}

/// Per-position probabilities of the six structural contexts.
///
/// The vectors are index-aligned; a malformed response may leave them
/// at different lengths, in which case consumers pad with zero.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextProbabilities {
    pub hairpin: Vec<f64>,
    pub bulge: Vec<f64>,
    pub internal: Vec<f64>,
    pub multi: Vec<f64>,
    pub dangling: Vec<f64>,
    pub paired: Vec<f64>,
}

impl ContextProbabilities {
    /// Number of positions covered, the longest of the six vectors.
    pub fn position_count(&self) -> usize {
        [
            &self.hairpin,
            &self.bulge,
            &self.internal,
            &self.multi,
            &self.dangling,
            &self.paired,
        ]
        .iter()
        .map(|v| v.len())
        .max()
        .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bppm_wire_shape() {
        let bppm: Bppm = serde_json::from_str(r#"{"matrix": [[0.1, 0.9], [0.5]]}"#).unwrap();
        assert_eq!(bppm.matrix.len(), 2);
        assert_eq!(bppm.matrix[0][1], 0.9);
        assert!(!bppm.is_empty());
    }

    #[test]
    fn parses_context_wire_shape() {
        let json = r#"{
            "hairpin": [0.1, 0.2],
            "bulge": [0.0, 0.0],
            "internal": [0.05, 0.05],
            "multi": [0.0, 0.0],
            "dangling": [0.15, 0.05],
            "paired": [0.7, 0.7, 0.6]
        }"#;
        let context: ContextProbabilities = serde_json::from_str(json).unwrap();
        assert_eq!(context.position_count(), 3);
    }

    #[test]
    fn missing_context_fields_default_to_empty() {
        let context: ContextProbabilities = serde_json::from_str(r#"{"paired": [1.0]}"#).unwrap();
        assert_eq!(context.position_count(), 1);
        assert!(context.hairpin.is_empty());
    }
}

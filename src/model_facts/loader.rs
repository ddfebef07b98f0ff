//! One-shot startup loading of classifier facts from collaborator files.

use std::fs;

use thiserror::Error;
use tracing::{info, warn};

use crate::chat::config::FactsConfig;

use super::facts::{FeatureImportance, ModelFacts};

/// Errors raised while loading classifier facts.
#[derive(Debug, Error)]
pub enum FactsError {
    /// A collaborator file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// A CSV row did not match the `feature,importance` shape.
    #[error("malformed importance row {line}: {content:?}")]
    MalformedRow {
        /// 1-based line number of the offending row.
        line: usize,
        /// The row as read from the file.
        content: String,
    },
    /// The importance file held no data rows.
    #[error("importance file contains no data rows")]
    Empty,
}

/// Load facts, degrading to `None` when a collaborator is unavailable.
///
/// Dependent features (prompt context enrichment, the model-info endpoint)
/// run with empty facts instead of taking the whole service down.
#[must_use]
pub fn load_or_degrade(config: &FactsConfig, top_n: usize) -> Option<ModelFacts> {
    match load(config, top_n) {
        Ok(facts) => {
            info!(
                features = facts.top_features.len(),
                "classifier facts loaded"
            );
            Some(facts)
        }
        Err(err) => {
            warn!("classifier facts unavailable, continuing with empty context: {err}");
            None
        }
    }
}

/// Load and parse both collaborator files.
///
/// # Errors
/// Returns an error if either file cannot be read or the CSV is malformed.
pub fn load(config: &FactsConfig, top_n: usize) -> Result<ModelFacts, FactsError> {
    // The serialized classifier is opaque here; only its presence matters.
    fs::metadata(&config.artifact_path)?;

    let raw = fs::read_to_string(&config.importance_path)?;
    let top_features = parse_importance_csv(&raw, top_n)?;

    Ok(ModelFacts {
        accuracy_percent: config.accuracy_percent,
        recall_percent: config.recall_percent,
        top_features,
    })
}

/// Parse ranked `feature,importance` rows, truncated to `top_n`.
fn parse_importance_csv(raw: &str, top_n: usize) -> Result<Vec<FeatureImportance>, FactsError> {
    let mut rows = Vec::new();

    for (idx, raw_line) in raw.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if idx == 0 && looks_like_header(line) {
            continue;
        }

        let (feature, importance) = line
            .split_once(',')
            .ok_or_else(|| malformed(idx, line))?;
        let importance: f64 = importance
            .trim()
            .parse()
            .map_err(|_| malformed(idx, line))?;

        rows.push(FeatureImportance {
            feature: feature.trim().to_string(),
            importance,
        });
        if rows.len() == top_n {
            break;
        }
    }

    if rows.is_empty() {
        return Err(FactsError::Empty);
    }
    Ok(rows)
}

/// A first line whose second column is not numeric is a header row.
fn looks_like_header(line: &str) -> bool {
    line.split_once(',')
        .is_none_or(|(_, value)| value.trim().parse::<f64>().is_err())
}

fn malformed(idx: usize, line: &str) -> FactsError {
    FactsError::MalformedRow {
        line: idx + 1,
        content: line.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SAMPLE_CSV: &str = "feature,importance\n\
        smart_5_raw,0.1834\n\
        smart_187_raw,0.1512\n\
        smart_197_raw,0.1103\n\
        smart_198_raw,0.0921\n";

    fn fixture(csv: &str) -> (tempfile::TempDir, FactsConfig) {
        let dir = tempfile::tempdir().unwrap();
        let importance_path = dir.path().join("feature_importance.csv");
        let artifact_path = dir.path().join("disk_model.pkl");
        std::fs::write(&importance_path, csv).unwrap();
        std::fs::write(&artifact_path, b"artifact bytes").unwrap();

        let config = FactsConfig {
            importance_path,
            artifact_path,
            ..FactsConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn test_parses_rows_in_rank_order() {
        let (_dir, config) = fixture(SAMPLE_CSV);
        let facts = load(&config, 15).unwrap();

        assert_eq!(facts.top_features.len(), 4);
        assert_eq!(facts.top_features[0].feature, "smart_5_raw");
        assert!((facts.top_features[0].importance - 0.1834).abs() < f64::EPSILON);
        assert_eq!(facts.top_features[3].feature, "smart_198_raw");
        assert!((facts.accuracy_percent - 90.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_truncates_to_top_n() {
        let (_dir, config) = fixture(SAMPLE_CSV);
        let facts = load(&config, 2).unwrap();
        assert_eq!(facts.top_features.len(), 2);
        assert_eq!(facts.top_features[1].feature, "smart_187_raw");
    }

    #[test]
    fn test_missing_importance_file_degrades_to_none() {
        let (_dir, mut config) = fixture(SAMPLE_CSV);
        config.importance_path = PathBuf::from("/nonexistent/feature_importance.csv");
        assert!(load_or_degrade(&config, 15).is_none());
    }

    #[test]
    fn test_missing_artifact_degrades_to_none() {
        let (_dir, mut config) = fixture(SAMPLE_CSV);
        config.artifact_path = PathBuf::from("/nonexistent/disk_model.pkl");
        assert!(load_or_degrade(&config, 15).is_none());
    }

    #[test]
    fn test_malformed_row_is_reported_with_line_number() {
        let (_dir, config) = fixture("feature,importance\nsmart_5_raw,not-a-number\n");
        let err = load(&config, 15).unwrap_err();
        assert!(matches!(err, FactsError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let (_dir, config) = fixture("feature,importance\n");
        let err = load(&config, 15).unwrap_err();
        assert!(matches!(err, FactsError::Empty));
    }
}

//! Static facts describing the trained disk-failure classifier.

use serde::Serialize;

/// One ranked feature-importance row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureImportance {
    /// SMART attribute (or derived feature) name.
    pub feature: String,
    /// Importance score assigned by the classifier.
    pub importance: f64,
}

/// Read-only facts about the classifier, shared across all sessions.
#[derive(Clone, Debug, Serialize)]
pub struct ModelFacts {
    /// Overall accuracy, percent.
    pub accuracy_percent: f64,
    /// Recall on actual failures, percent.
    pub recall_percent: f64,
    /// Ranked importances, truncated to the configured top-N.
    pub top_features: Vec<FeatureImportance>,
}

impl ModelFacts {
    /// Render the importance rows as text lines for prompt context.
    #[must_use]
    pub fn importance_table(&self) -> String {
        let mut out = String::new();
        for row in &self.top_features {
            out.push_str(&row.feature);
            out.push_str("  ");
            out.push_str(&format!("{:.6}", row.importance));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_table_keeps_rank_order() {
        let facts = ModelFacts {
            accuracy_percent: 90.15,
            recall_percent: 86.0,
            top_features: vec![
                FeatureImportance {
                    feature: "smart_5_raw".to_string(),
                    importance: 0.1834,
                },
                FeatureImportance {
                    feature: "smart_187_raw".to_string(),
                    importance: 0.1512,
                },
            ],
        };

        let table = facts.importance_table();
        let first = table.find("smart_5_raw").unwrap();
        let second = table.find("smart_187_raw").unwrap();
        assert!(first < second);
        assert!(table.contains("0.183400"));
    }
}

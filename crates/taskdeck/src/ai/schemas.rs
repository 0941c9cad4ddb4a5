//! Structured response schemas for AI operations.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::entities::{EnergyLevel, TaskPriority};
use crate::errors::{TrackerError, TrackerResult};

/// Deserialize a repaired JSON object into a typed schema.
pub fn parse_object<T: DeserializeOwned>(value: Value) -> TrackerResult<T> {
    serde_json::from_value(value).map_err(|e| TrackerError::RepairFailure {
        reason: format!("response does not match expected schema: {e}"),
    })
}

/// Classification of a new task produced by the analyze step.
///
/// Field values are kept as raw strings because models spell them loosely
/// ("Deep Work", "Critical Hit"); the accessors parse leniently and return
/// `None` for anything unrecognized.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAnalysis {
    #[serde(default)]
    pub energy_level: Option<String>,
    #[serde(default)]
    pub suggested_priority: Option<String>,
}

impl TaskAnalysis {
    /// Parsed energy level, if recognizable.
    pub fn energy(&self) -> Option<EnergyLevel> {
        self.energy_level.as_deref().and_then(|s| s.parse().ok())
    }

    /// Parsed suggested priority, if recognizable.
    pub fn priority(&self) -> Option<TaskPriority> {
        self.suggested_priority
            .as_deref()
            .and_then(|s| s.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_analysis_lenient_parsing() {
        let analysis: TaskAnalysis = parse_object(json!({
            "energyLevel": "Deep Work",
            "suggestedPriority": "Critical Hit"
        }))
        .unwrap();

        assert_eq!(analysis.energy(), Some(EnergyLevel::DeepWork));
        assert_eq!(analysis.priority(), Some(TaskPriority::Critical));
    }

    #[test]
    fn test_analysis_unrecognized_values() {
        let analysis: TaskAnalysis = parse_object(json!({
            "energyLevel": "Mega Focus",
            "suggestedPriority": "ASAP"
        }))
        .unwrap();

        assert_eq!(analysis.energy(), None);
        assert_eq!(analysis.priority(), None);
    }

    #[test]
    fn test_analysis_missing_fields() {
        let analysis: TaskAnalysis = parse_object(json!({})).unwrap();
        assert_eq!(analysis.energy(), None);
        assert_eq!(analysis.priority(), None);
    }

    #[test]
    fn test_parse_object_schema_mismatch() {
        let result: TrackerResult<TaskAnalysis> = parse_object(json!({"energyLevel": 42}));
        assert!(matches!(result, Err(TrackerError::RepairFailure { .. })));
    }
}

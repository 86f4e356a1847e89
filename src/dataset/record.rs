//! Canonical training record.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::generator::GeneratedSample;

/// Where a record came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    #[default]
    Synthetic,
    Real,
}

/// One line of a dataset file.
///
/// `pattern_type` is an open string: hand-authored or real data may carry
/// tags beyond the generated categories. `metadata` is intentionally an open
/// map; generated records carry `template` and `params` there as the
/// reproduction audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingExample {
    pub id: String,
    pub instruction: String,
    pub response: String,
    pub pattern_type: String,
    #[serde(default)]
    pub timeframe: Option<String>,
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub source: RecordSource,
    #[serde(default = "now_iso")]
    pub created_at: String,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

fn default_confidence() -> f64 {
    1.0
}

fn default_language() -> String {
    "en".to_string()
}

impl TrainingExample {
    /// Wraps a generated sample with a fresh id, timestamp and defaults.
    pub fn from_sample(sample: GeneratedSample, seed: u64) -> Self {
        let mut metadata = Map::new();
        metadata.insert(
            "template".to_string(),
            Value::String(sample.metadata.template),
        );
        metadata.insert(
            "params".to_string(),
            Value::Object(sample.metadata.params.into_iter().collect()),
        );

        Self {
            id: Uuid::new_v4().to_string(),
            instruction: sample.instruction,
            response: sample.response,
            pattern_type: sample.pattern_type,
            timeframe: sample.timeframe,
            ticker: None,
            source: RecordSource::Synthetic,
            created_at: now_iso(),
            seed: Some(seed),
            confidence: default_confidence(),
            language: default_language(),
            metadata,
        }
    }

    /// Name of the template that produced this record, if recorded.
    pub fn template_name(&self) -> Option<&str> {
        self.metadata.get("template").and_then(Value::as_str)
    }
}

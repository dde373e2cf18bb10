use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Client-generated, time-derived token correlating an analysis request with its result.
pub type AnalysisId = String;

/// Payload of the outbound `analyze-code` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub code: String,
    pub analysis_id: AnalysisId,
}

/// Payload of the inbound `analysis-complete` event.
///
/// The backend result shape is open; only the echoed `analysisId` is interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub analysis_id: Option<AnalysisId>,
    pub payload: Value,
}

impl AnalysisResult {
    pub fn from_payload(payload: Value) -> Self {
        let analysis_id = payload.get("analysisId").and_then(|id| match id {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });
        Self {
            analysis_id,
            payload,
        }
    }

    /// Short human summary for the activity feed.
    pub fn summary(&self) -> String {
        let issues = self
            .payload
            .get("issues")
            .or_else(|| self.payload.get("bugs"))
            .and_then(Value::as_array)
            .map(Vec::len);
        match (issues, &self.analysis_id) {
            (Some(count), Some(id)) => format!("Analysis {id} complete: {count} issue(s) found"),
            (None, Some(id)) => format!("Analysis {id} complete"),
            (Some(count), None) => format!("Analysis complete: {count} issue(s) found"),
            (None, None) => "Analysis complete".to_string(),
        }
    }
}

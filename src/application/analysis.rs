//! Request tracking for `analyze-code` / `analysis-complete`.
//!
//! Every request gets a fresh id; a completion push is delivered to its request at most once
//! and pushes carrying no known id are ignored.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

use crate::domain::{AnalysisId, AnalysisRequest, AnalysisResult};

/// An analysis awaiting its completion push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnalysis {
    pub id: AnalysisId,
    pub code_len: usize,
    pub started_at: DateTime<Utc>,
}

/// Why a completion push was not matched to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmatched {
    MissingId,
    UnknownId(AnalysisId),
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisTracker {
    pending: HashMap<AnalysisId, PendingAnalysis>,
    last_id: i64,
}

impl AnalysisTracker {
    pub fn begin(&mut self, code: impl Into<String>) -> AnalysisRequest {
        self.begin_at(code, Utc::now())
    }

    /// Registers a request whose id is the start time in milliseconds, bumped when needed so
    /// ids never repeat.
    pub fn begin_at(&mut self, code: impl Into<String>, now: DateTime<Utc>) -> AnalysisRequest {
        let millis = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = millis;

        let code = code.into();
        let id = millis.to_string();
        self.pending.insert(
            id.clone(),
            PendingAnalysis {
                id: id.clone(),
                code_len: code.len(),
                started_at: now,
            },
        );
        AnalysisRequest {
            code,
            analysis_id: id,
        }
    }

    pub fn resolve(&mut self, result: &AnalysisResult) -> Result<PendingAnalysis, Unmatched> {
        let id = result.analysis_id.as_ref().ok_or(Unmatched::MissingId)?;
        self.pending
            .remove(id)
            .ok_or_else(|| Unmatched::UnknownId(id.clone()))
    }

    pub fn cancel(&mut self, id: &str) -> Option<PendingAnalysis> {
        self.pending.remove(id)
    }

    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn resolves_once_per_request() {
        let mut tracker = AnalysisTracker::default();
        let request = tracker.begin("fn main() {}");
        assert!(tracker.is_pending(&request.analysis_id));

        let result =
            AnalysisResult::from_payload(json!({"analysisId": request.analysis_id, "ok": true}));
        let pending = tracker.resolve(&result).unwrap();
        assert_eq!(pending.code_len, 12);
        assert_eq!(tracker.outstanding(), 0);

        assert_eq!(
            tracker.resolve(&result),
            Err(Unmatched::UnknownId(request.analysis_id))
        );
    }

    #[test]
    fn ignores_pushes_without_recognized_id() {
        let mut tracker = AnalysisTracker::default();
        tracker.begin("a");

        let missing = AnalysisResult::from_payload(json!({"issues": []}));
        assert_eq!(tracker.resolve(&missing), Err(Unmatched::MissingId));

        let foreign = AnalysisResult::from_payload(json!({"analysisId": "nope"}));
        assert_eq!(
            tracker.resolve(&foreign),
            Err(Unmatched::UnknownId("nope".into()))
        );
        assert_eq!(tracker.outstanding(), 1);
    }

    #[test]
    fn ids_are_unique_within_a_millisecond() {
        let mut tracker = AnalysisTracker::default();
        let now = Utc.timestamp_millis_opt(1_718_000_000_000).unwrap();
        let a = tracker.begin_at("a", now);
        let b = tracker.begin_at("b", now);
        assert_eq!(a.analysis_id, "1718000000000");
        assert_eq!(b.analysis_id, "1718000000001");
        assert_eq!(tracker.outstanding(), 2);
    }
}

//! Typed view of the backend event contract.

use serde::Deserialize;
use serde_json::Value;

use super::error::{ChannelError, Result};
use super::protocol::{SocketPacket, encode_message};
use crate::domain::{AnalysisRequest, AnalysisResult, ProjectId, ProjectPatch};

pub const JOIN_PROJECT: &str = "join-project";
pub const ANALYZE_CODE: &str = "analyze-code";
pub const ANALYSIS_COMPLETE: &str = "analysis-complete";
pub const DEBUG_RESPONSE: &str = "debug-response";
pub const PROJECT_UPDATE: &str = "project-update";

/// Client → backend. Fire-and-forget, no acknowledgment is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundEvent {
    JoinProject(ProjectId),
    AnalyzeCode(AnalysisRequest),
}

impl OutboundEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::JoinProject(_) => JOIN_PROJECT,
            Self::AnalyzeCode(_) => ANALYZE_CODE,
        }
    }

    pub fn payload(&self) -> Result<Value> {
        let value = match self {
            Self::JoinProject(project_id) => Value::String(project_id.clone()),
            Self::AnalyzeCode(request) => serde_json::to_value(request)?,
        };
        Ok(value)
    }

    /// Complete text frame, e.g. `42["join-project","proj_001"]`.
    pub fn encode(&self) -> Result<String> {
        encode_message(SocketPacket::Event {
            name: self.name().to_string(),
            args: vec![self.payload()?],
            ack: None,
        })
    }
}

/// `debug-response` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DebugResponse {
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// `project-update` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectUpdate {
    pub id: ProjectId,
    #[serde(flatten)]
    pub patch: ProjectPatch,
}

/// Backend → client, plus the channel's own lifecycle signals.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Connected,
    Disconnected,
    AnalysisComplete(AnalysisResult),
    DebugResponse(DebugResponse),
    ProjectUpdate(ProjectUpdate),
}

fn first_arg(name: &str, args: Vec<Value>) -> Result<Value> {
    args.into_iter()
        .next()
        .ok_or_else(|| ChannelError::Protocol(format!("{name} without payload")))
}

/// Maps a received Socket.IO event to a typed event. Unknown event names yield `Ok(None)`.
pub fn decode_inbound(name: &str, args: Vec<Value>) -> Result<Option<InboundEvent>> {
    let event = match name {
        ANALYSIS_COMPLETE => {
            InboundEvent::AnalysisComplete(AnalysisResult::from_payload(first_arg(name, args)?))
        }
        DEBUG_RESPONSE => {
            InboundEvent::DebugResponse(serde_json::from_value(first_arg(name, args)?)?)
        }
        PROJECT_UPDATE => {
            InboundEvent::ProjectUpdate(serde_json::from_value(first_arg(name, args)?)?)
        }
        _ => return Ok(None),
    };
    Ok(Some(event))
}

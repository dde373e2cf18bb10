//! Root application struct.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::infra::api::ProjectsApi;
use crate::infra::app_config::AppConfig;
use crate::infra::realtime::{ConnectionManager, InboundEvent};
use crate::infra::submit::ProjectSubmitter;

use super::state::AppState;
use super::store::Action;

/// Headless DebugFlow client: store, channel and backend adapters.
pub struct DebugFlowApp {
    pub state: AppState,
    pub config: AppConfig,

    pub connection: Arc<ConnectionManager>,
    pub channel_rx: mpsc::UnboundedReceiver<InboundEvent>,

    pub projects_api: Arc<dyn ProjectsApi>,
    pub submitter: Arc<dyn ProjectSubmitter>,

    pub action_tx: mpsc::Sender<Action>,
    pub action_rx: mpsc::Receiver<Action>,

    pub skip_runtime: bool,
}

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::infra::api::{HttpProjectsApi, ProjectsApi, StaticProjectsApi};
use crate::infra::app_config::AppConfig;
use crate::infra::realtime::{ChannelConfig, ChannelError, ConnectionManager};
use crate::infra::submit::{LocalSubmitter, ProjectSubmitter};

use super::DebugFlowApp;
use super::state::AppState;

impl DebugFlowApp {
    /// Builds the client against the backend named by `config`.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let api = HttpProjectsApi::new(&config.api_url(), config.request_timeout())?;
        let submitter = LocalSubmitter::new(config.submit_delay());
        Ok(Self::with_services(config, Arc::new(api), Arc::new(submitter))?)
    }

    pub fn with_services(
        config: AppConfig,
        projects_api: Arc<dyn ProjectsApi>,
        submitter: Arc<dyn ProjectSubmitter>,
    ) -> Result<Self, ChannelError> {
        let (channel_tx, channel_rx) = mpsc::unbounded_channel();
        let connection = ConnectionManager::with_config(
            &config.api_url(),
            ChannelConfig {
                connect_timeout: config.connect_timeout(),
            },
            channel_tx,
        )?;
        let (action_tx, action_rx) = mpsc::channel(32);

        log::debug!(
            "DebugFlow client for {} (socket {})",
            connection.endpoint(),
            connection.socket_url()
        );

        Ok(Self {
            state: AppState::from_config(&config),
            config,
            connection: Arc::new(connection),
            channel_rx,
            projects_api,
            submitter,
            action_tx,
            action_rx,
            skip_runtime: false,
        })
    }

    /// Offline client with the runtime disabled; the endpoint is never contacted.
    pub fn new_for_test() -> Self {
        let config = AppConfig {
            api_url: Some("http://127.0.0.1:9".to_string()),
            submit_delay_ms: 0,
            ..Default::default()
        };
        let mut app = match Self::with_services(
            config,
            Arc::new(StaticProjectsApi::default()),
            Arc::new(LocalSubmitter::new(Duration::ZERO)),
        ) {
            Ok(app) => app,
            Err(err) => panic!("test endpoint must be valid: {err}"),
        };
        app.skip_runtime = true;
        app
    }
}

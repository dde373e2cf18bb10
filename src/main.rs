//! DebugFlow CLI entry point.
//!
//! Connects to the backend channel, joins projects, optionally submits code for analysis and
//! prints the activity feed on exit. `--projects` and `--upload` run once and exit.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use debugflow::app::{
    Action, AnalysisAction, AppView, ConnectionAction, DebugFlowApp, NavigationAction,
    NotificationLevel, ProjectsAction, UploadAction,
};
use debugflow::domain::{DraftFile, Project, ProjectStatus, ProjectType};
use debugflow::infra::app_config::load_config;

#[derive(Parser, Debug)]
#[command(name = "debugflow")]
#[command(version)]
#[command(about = "Realtime client for the DebugFlow debugging backend", long_about = None)]
struct Args {
    /// Backend base URL (overrides DEBUGFLOW_API_URL and the config file)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Project id to join; may be repeated
    #[arg(short, long = "join")]
    join: Vec<String>,

    /// Source file to submit for analysis once connected
    #[arg(short, long)]
    analyze: Option<PathBuf>,

    /// Print the project list and exit
    #[arg(long)]
    projects: bool,

    /// Only list projects with this status (analyzing, in-progress, completed, failed)
    #[arg(long, requires = "projects")]
    status: Option<ProjectStatus>,

    /// Upload local source files as a new project and exit
    #[arg(long, num_args = 1..)]
    upload: Vec<PathBuf>,

    /// Name of the uploaded project
    #[arg(long, requires = "upload")]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = load_config();
    config.endpoint_override = args.endpoint.clone();
    let mut app = DebugFlowApp::new(config).context("failed to set up DebugFlow client")?;

    if args.projects {
        app.dispatch(Action::Projects(ProjectsAction::SetStatusFilter(
            args.status,
        )));
        app.dispatch(Action::Navigation(NavigationAction::SwitchTo(
            AppView::Projects,
        )));
        while app.state.is_loading_projects {
            app.process_next().await;
        }
        for project in app.state.projects.query(&app.state.project_query) {
            print_project(project);
        }
        return Ok(());
    }

    if !args.upload.is_empty() {
        return upload(&mut app, &args.upload, args.name).await;
    }

    let code = match &args.analyze {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };

    for project_id in args.join {
        app.dispatch(Action::Projects(ProjectsAction::Join(project_id)));
    }
    app.dispatch(Action::Connection(ConnectionAction::Connect));

    while app.state.connection.is_connecting {
        app.process_next().await;
    }
    if !app.state.connection.connected {
        let reason = app
            .state
            .connection
            .last_error
            .clone()
            .unwrap_or_else(|| "connection closed".to_string());
        bail!("could not connect to {}: {}", app.config.api_url(), reason);
    }

    if let Some(code) = code {
        app.dispatch(Action::Analysis(AnalysisAction::UpdateCode(code)));
        app.dispatch(Action::Analysis(AnalysisAction::Run));
    }

    let mut shutdown = std::pin::pin!(tokio::signal::ctrl_c());
    while app.state.connection.connected {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("Interrupted, closing channel");
                app.dispatch(Action::Connection(ConnectionAction::Disconnect));
                // drain the final disconnect transition
                let _ = tokio::time::timeout(Duration::from_millis(200), app.process_next()).await;
                break;
            }
            _ = app.process_next() => {}
        }
        print_notifications(&mut app);
    }

    println!("Recent activity:");
    for entry in app.state.feed.iter() {
        println!(
            "  [{}] {:<8} {}",
            entry.timestamp.format("%H:%M:%S"),
            entry.kind.to_string(),
            entry.message
        );
    }
    Ok(())
}

async fn upload(app: &mut DebugFlowApp, paths: &[PathBuf], name: Option<String>) -> Result<()> {
    let files = paths
        .iter()
        .map(|path| {
            DraftFile::from_path(path)
                .with_context(|| format!("failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    app.dispatch(Action::Navigation(NavigationAction::SwitchTo(
        AppView::Upload,
    )));
    app.dispatch(Action::Upload(UploadAction::SelectType(ProjectType::Files)));
    if let Some(name) = name {
        app.dispatch(Action::Upload(UploadAction::SetName(name)));
    }
    app.dispatch(Action::Upload(UploadAction::AddFiles(files)));
    app.dispatch(Action::Upload(UploadAction::Submit));
    print_notifications(app);
    if !app.state.upload.is_submitting() {
        bail!("nothing to upload");
    }

    while app.state.upload.is_submitting() {
        app.process_next().await;
    }
    print_notifications(app);
    // the draft is only reset when the submission was accepted
    if !app.state.upload.draft().is_pristine() {
        bail!("upload failed");
    }
    if let Some(project) = app.state.projects.all().last() {
        print_project(project);
    }
    Ok(())
}

fn print_project(project: &Project) {
    println!(
        "{:<24} {:<28} {:<18} {:<12} {}/{} fixed  {}",
        project.id,
        project.name,
        project.kind.to_string(),
        project.status.as_str(),
        project.bugs_fixed,
        project.bugs_found,
        project.codebase_ref
    );
}

fn print_notifications(app: &mut DebugFlowApp) {
    for notification in app.state.take_notifications() {
        match notification.level {
            NotificationLevel::Error => log::error!("{}", notification.message),
            NotificationLevel::Success | NotificationLevel::Info => {
                log::info!("{}", notification.message)
            }
        }
    }
}

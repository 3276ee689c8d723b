mod clipboard;
mod config;
mod render;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    reports::{fetch_constituencies, fetch_dashboard},
    BudgetSimulationController, ClientEvent, GenerationWorkflow, HttpGateway,
    InsightExpansionController, RequestGateway, ThemeContext,
};
use shared::{
    directory::{filter_records, StatusFilter},
    domain::{DocumentSlot, InsightId, ThemeMode},
    routing::{display_name_from_slug, ActionRoute},
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::{clipboard::SystemClipboard, config::load_settings, render::Renderer};

#[derive(Parser, Debug)]
#[command(name = "transparency", about = "MPLADS transparency dashboard client")]
struct Args {
    /// Config file; defaults to ./desktop.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[arg(long, global = true)]
    theme: Option<ThemeMode>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Searchable constituency directory.
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "All")]
        status: StatusFilter,
    },
    Dashboard {
        slug: String,
    },
    /// Expanded analysis for one insight of a dashboard.
    Insight {
        slug: String,
        insight_id: i64,
    },
    /// Simulated optimal allocation of the constituency fund.
    Budget {
        slug: String,
        #[arg(long)]
        profile: Option<String>,
    },
    /// Draft email to the MP for an Action Hub route.
    Outreach {
        route: String,
    },
    /// Generate RTI, first appeal and PIL drafts for an Action Hub route.
    GenerateDocs {
        route: String,
        #[arg(long)]
        copy: Option<DocumentSlot>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }
    if let Some(theme) = args.theme {
        settings.theme = theme;
    }
    info!(api_url = %settings.api_url, theme = ?settings.theme, "desktop: starting");

    let gateway: Arc<dyn RequestGateway> =
        Arc::new(HttpGateway::new(&settings.api_url, settings.request_timeout())?);
    let renderer = Renderer::new(ThemeContext::new(settings.theme));

    match args.command {
        Command::List { search, status } => {
            let records = fetch_constituencies(gateway.as_ref())
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            let shown = filter_records(&records, &search, status);
            print!("{}", renderer.directory(&records, &shown, status));
        }
        Command::Dashboard { slug } => {
            let report = fetch_dashboard(gateway.as_ref(), &slug)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?;
            match report {
                Some(report) => print!("{}", renderer.dashboard(&report)),
                None => bail!("no report found for {}", display_name_from_slug(&slug)),
            }
        }
        Command::Insight { slug, insight_id } => {
            let report = fetch_dashboard(gateway.as_ref(), &slug)
                .await
                .map_err(|err| anyhow::anyhow!(err.user_message()))?
                .with_context(|| format!("no report found for {}", display_name_from_slug(&slug)))?;
            let insight = report
                .insight(InsightId(insight_id))
                .cloned()
                .with_context(|| format!("insight #{insight_id} is not part of this report"))?;

            let controller = InsightExpansionController::new(gateway.clone());
            log_events(controller.subscribe_events());
            controller.expand(insight).await;
            print!("{}", renderer.insight_detail(&controller.view().await));
        }
        Command::Budget { slug, profile } => {
            let name = match fetch_dashboard(gateway.as_ref(), &slug).await {
                Ok(Some(report)) => report.constituency_name,
                Ok(None) => display_name_from_slug(&slug),
                Err(err) => {
                    warn!(error = %err, "desktop: dashboard lookup failed, using slug name");
                    display_name_from_slug(&slug)
                }
            };
            let profile = profile.unwrap_or(settings.budget_profile);
            let controller = BudgetSimulationController::new(gateway.clone(), name, profile);
            log_events(controller.subscribe_events());

            let allocation = controller
                .generate()
                .await
                .context("budget simulation failed")?;
            let chart = controller.chart().await;
            print!(
                "{}",
                renderer.budget(controller.constituency_name(), &allocation, &chart)
            );
        }
        Command::Outreach { route } => {
            let route = ActionRoute::parse(&route)?;
            let draft = client_core::workflow::outreach_draft(&route);
            print!("{}", renderer.outreach(route.status, &draft));
        }
        Command::GenerateDocs { route, copy } => {
            let route = ActionRoute::parse(&route)?;
            let workflow =
                GenerationWorkflow::new(gateway.clone(), route, Arc::new(SystemClipboard));
            log_events(workflow.subscribe_events());

            let bundle = workflow.generate_documents().await?;
            print!("{}", renderer.documents(&bundle));

            if let Some(slot) = copy {
                workflow.copy_document(slot).await?;
                eprintln!("Copied {} to clipboard", slot.title());
            }
        }
    }

    Ok(())
}

fn log_events(mut events: broadcast::Receiver<ClientEvent>) {
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            debug!(?event, "desktop: client event");
        }
    });
}

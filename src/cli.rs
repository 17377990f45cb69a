use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::Token;
use crate::config::{Config, OutputFormat, ViewType};
use crate::dashboard::load_dashboard;
use crate::enrichment::{EnrichmentFeed, EnrichmentResolver};
use crate::output::{self, PhaseProgress};
use crate::providers::azure_devops::{AzureDevOpsClient, AzureDevOpsLookups};
use crate::report::DashboardReport;

#[derive(Parser)]
#[command(name = "release-dashboard")]
#[command(author, version, about = "Deployment dashboard for Azure DevOps pipelines", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the rendered dashboard to a file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Configuration file (defaults to ./release-dashboard.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the latest deployment of every pipeline in every environment
    Dashboard {
        #[arg(short, long, env = "AZURE_DEVOPS_TOKEN", hide_env_values = true)]
        token: Option<String>,

        #[arg(short = 'u', long, env = "AZURE_DEVOPS_ORG_URL")]
        org_url: Option<String>,

        #[arg(short = 'P', long)]
        project: Option<String>,

        #[arg(long, value_enum)]
        view: Option<ViewType>,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        #[arg(short, long, default_value_t = false)]
        pretty: bool,

        /// Fetch approvals separately for every gated deployment
        #[arg(long, default_value_t = false)]
        no_shared_approvals: bool,

        /// Maximum number of approvals requested per fetch
        #[arg(long)]
        approvals_top: Option<usize>,
    },
}

/// Settings of one dashboard run after merging flags over the config file.
struct DashboardSettings {
    token: Option<Token>,
    organization_url: String,
    project: String,
    view: ViewType,
    format: OutputFormat,
    pretty: bool,
    share_approvals: bool,
    approvals_top: Option<usize>,
    max_concurrent_requests: usize,
}

impl Cli {
    async fn execute_dashboard(&self, settings: DashboardSettings) -> Result<()> {
        info!("Building release dashboard for project: {}", settings.project);

        let client = Arc::new(AzureDevOpsClient::new(
            &settings.organization_url,
            settings.token.clone(),
            settings.max_concurrent_requests,
        )?);

        // Phase 1: deployments per environment
        let progress = PhaseProgress::start_phase_1();
        let dashboard = load_dashboard(&client, &settings.project)
            .await
            .with_context(|| format!("Failed to load deployments for {}", settings.project))?;

        // Phase 2: build labels and approvers
        let progress = progress.finish_phase_1_start_phase_2(dashboard.pipelines.len());
        let lookups =
            AzureDevOpsLookups::new(Arc::clone(&client)).with_approvals_top(settings.approvals_top);
        let resolver =
            EnrichmentResolver::new(lookups).with_shared_approvals(settings.share_approvals);
        let feed = EnrichmentFeed::new();
        let mut updates = feed.subscribe();
        feed.refresh(&resolver, &dashboard.pipelines, &settings.project).await;
        let state = updates.borrow_and_update().clone();

        // Phase 3: rendering
        let progress = progress.finish_phase_2_start_phase_3();
        let rendered = match settings.format {
            OutputFormat::Table => {
                output::render_dashboard(&dashboard, state.snapshot(), settings.view) + "\n"
            }
            OutputFormat::Json => {
                let report = DashboardReport::new(&settings.project, &dashboard, state.snapshot());
                let mut buffer = Vec::new();
                output::export_json(&report, settings.pretty, &mut buffer)?;
                String::from_utf8(buffer)?
            }
        };
        progress.finish_phase_3();
        output::print_summary(&settings.project, &dashboard, state.snapshot());

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, rendered)?;
            info!("Dashboard written to: {}", output_path.display());
        } else {
            print!("{rendered}");
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Dashboard {
                token,
                org_url,
                project,
                view,
                format,
                pretty,
                no_shared_approvals,
                approvals_top,
            } => {
                let organization_url = org_url
                    .clone()
                    .or(config.azure_devops.organization_url)
                    .context(
                        "Organization URL is required (--org-url, AZURE_DEVOPS_ORG_URL or azure-devops.organization-url)",
                    )?;
                let project = project
                    .clone()
                    .or(config.azure_devops.project)
                    .context("Project is required (--project or azure-devops.project)")?;

                let settings = DashboardSettings {
                    token: token
                        .clone()
                        .or(config.azure_devops.token)
                        .map(Token::from),
                    organization_url,
                    project,
                    view: view.unwrap_or(config.output.view),
                    format: format.unwrap_or(config.output.format),
                    pretty: *pretty || config.output.pretty,
                    share_approvals: !*no_shared_approvals && config.enrichment.share_approvals,
                    approvals_top: approvals_top.or(config.enrichment.approvals_top),
                    max_concurrent_requests: config.azure_devops.max_concurrent_requests,
                };

                self.execute_dashboard(settings).await
            }
        }
    }
}

mod exports;
mod progress;
mod render;
mod styling;
mod tables;

pub use exports::export_json;
pub use progress::PhaseProgress;
pub use render::render_dashboard;
use styling::{bright_yellow, cyan, dim, magenta_bold};

use crate::dashboard::Dashboard;
use crate::enrichment::EnrichmentSnapshot;

/// Prints the release dashboard banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        magenta_bold("🚀 Release Dashboard"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("Deployments, builds and approvals across environments")
    );
}

/// Prints a short summary of the run to stderr.
pub fn print_summary(project: &str, dashboard: &Dashboard, snapshot: Option<&EnrichmentSnapshot>) {
    let approved = snapshot.map_or(0, EnrichmentSnapshot::approved_count);
    eprintln!(
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Project:"),
        cyan(project),
        dim("Environments:"),
        bright_yellow(dashboard.environments.len()),
        dim("Pipelines:"),
        bright_yellow(dashboard.pipelines.len()),
        dim("Approved deployments:"),
        bright_yellow(approved),
    );
}

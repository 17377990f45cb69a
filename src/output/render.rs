use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};

use super::tables::{create_table, cyan_header, no_data_cell, result_coded_cell};
use crate::config::ViewType;
use crate::dashboard::{build_folder_tree, flatten, Dashboard, FolderNode, PipelineInstance};
use crate::enrichment::{extract, EnrichmentSnapshot};

/// Renders the dashboard as a table: one row per pipeline, one column per
/// environment.
///
/// In the folder view pipelines are nested under their folders; folder rows
/// carry no deployment data. Each deployment cell shows the build label, the
/// approver (if any) and the finish time, colour coded by result.
pub fn render_dashboard(
    dashboard: &Dashboard,
    snapshot: Option<&EnrichmentSnapshot>,
    view: ViewType,
) -> String {
    if dashboard.pipelines.is_empty() {
        return "No deployments were found in any pipelines".to_string();
    }

    let mut table = create_table();
    let mut header = vec![""];
    header.extend(dashboard.environments.iter().map(String::as_str));
    table.set_header(cyan_header(&header));

    match view {
        ViewType::List => {
            for pipeline in &dashboard.pipelines {
                add_pipeline_row(&mut table, dashboard, pipeline, snapshot, 0);
            }
        }
        ViewType::Folder => {
            let tree = build_folder_tree(&dashboard.pipelines);
            for (depth, node) in flatten(&tree) {
                match node {
                    FolderNode::Folder { name, .. } => {
                        let mut row = vec![Cell::new(format!("{}📁 {name}", indent(depth)))];
                        row.extend(dashboard.environments.iter().map(|_| no_data_cell()));
                        table.add_row(row);
                    }
                    FolderNode::Pipeline(pipeline) => {
                        add_pipeline_row(&mut table, dashboard, pipeline, snapshot, depth);
                    }
                }
            }
        }
    }

    table.to_string()
}

fn add_pipeline_row(
    table: &mut Table,
    dashboard: &Dashboard,
    pipeline: &PipelineInstance,
    snapshot: Option<&EnrichmentSnapshot>,
    depth: usize,
) {
    let mut row = vec![Cell::new(format!("{}{}", indent(depth), pipeline.name))];

    for environment_name in &dashboard.environments {
        let cell = match (
            extract(pipeline, environment_name, snapshot),
            pipeline.environments.get(environment_name),
        ) {
            (Some(labels), Some(instance)) => {
                let mut lines = vec![labels.build_name];
                if let Some(approver) = labels.approval_name {
                    lines.push(format!("Approved by {approver}"));
                }
                if let Some(finish_time) = instance.finish_time {
                    lines.push(format_finish_time(finish_time));
                }
                result_coded_cell(lines.join("\n"), instance.result)
            }
            _ => no_data_cell(),
        };
        row.push(cell);
    }

    table.add_row(row);
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

pub fn format_finish_time(finish_time: DateTime<Utc>) -> String {
    finish_time.format("%-d %b %Y, %I:%M %p").to_string()
}

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};

use crate::providers::azure_devops::DeploymentResult;

/// Table and cell creation helpers
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn cyan_header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|label| Cell::new(*label).fg(TableColor::Cyan))
        .collect()
}

pub fn result_color(result: DeploymentResult) -> Option<TableColor> {
    match result {
        DeploymentResult::Succeeded => Some(TableColor::Green),
        DeploymentResult::SucceededWithIssues => Some(TableColor::Yellow),
        DeploymentResult::Failed => Some(TableColor::Red),
        DeploymentResult::Canceled | DeploymentResult::Abandoned => Some(TableColor::Grey),
        DeploymentResult::Skipped => Some(TableColor::DarkGrey),
        DeploymentResult::Unknown => None,
    }
}

pub fn result_coded_cell(text: String, result: DeploymentResult) -> Cell {
    let cell = Cell::new(text);
    match result_color(result) {
        Some(color) => cell.fg(color),
        None => cell,
    }
}

pub fn no_data_cell() -> Cell {
    Cell::new("-").fg(TableColor::DarkGrey)
}

use cloudkeep_alarms::AlarmFailure;
use cloudkeep_lifecycle::Rule;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

pub fn build_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let cells: Vec<Cell> = headers
        .iter()
        .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(cells);
    table
}

/// One row per rule: position, ID, status, filter and the remaining actions.
pub fn rules_table(rules: &[Rule]) -> Table {
    let mut table = build_table(&["#", "ID", "Status", "Filter", "Actions"]);
    for (i, rule) in rules.iter().enumerate() {
        let status = rule.status().unwrap_or("-");
        let status_cell = match status {
            "Enabled" => Cell::new(status).fg(Color::Green),
            "Disabled" => Cell::new(status).fg(Color::Yellow),
            _ => Cell::new(status),
        };
        let filter = rule
            .body
            .get("Filter")
            .or_else(|| rule.body.get("Prefix"))
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        let actions: Vec<&str> = rule
            .body
            .keys()
            .map(String::as_str)
            .filter(|k| !matches!(*k, "Status" | "Filter" | "Prefix"))
            .collect();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(rule.id.as_deref().unwrap_or("-")),
            status_cell,
            Cell::new(filter),
            Cell::new(actions.join(", ")),
        ]);
    }
    table
}

pub fn failures_table(failures: &[AlarmFailure]) -> Table {
    let mut table = build_table(&["Resource", "Alarm", "Error"]);
    for failure in failures {
        table.add_row(vec![
            Cell::new(&failure.resource_id),
            Cell::new(&failure.alarm_name),
            Cell::new(&failure.error).fg(Color::Red),
        ]);
    }
    table
}

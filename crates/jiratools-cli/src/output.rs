//! Table and detail rendering
//!
//! comfy-table grids for list views, an aligned key/value block for single
//! issues. Descriptions arrive as raw ADF and go through the plain-text
//! renderer.

use comfy_table::{presets, ContentArrangement, Table};
use jiratools_api::{JiraFields, JiraIssue, NamedField};
use jiratools_core::render_text;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.to_vec());
    table
}

/// Search results: Key / Type / Status / Priority / Assignee / Summary.
pub fn print_search_table(issues: &[JiraIssue]) {
    let mut table = new_table(&["Key", "Type", "Status", "Priority", "Assignee", "Summary"]);
    for issue in issues {
        let fields = &issue.fields;
        table.add_row(vec![
            issue.key.clone(),
            named(&fields.issue_type, ""),
            named(&fields.status, ""),
            named(&fields.priority, "None"),
            assignee_name(fields),
            truncate(&fields.summary, 50),
        ]);
    }
    println!("{table}");
}

/// Assigned issues: Key / Status / Priority / Updated / Summary.
pub fn print_assigned_table(issues: &[JiraIssue]) {
    let mut table = new_table(&["Key", "Status", "Priority", "Updated", "Summary"]);
    for issue in issues {
        let fields = &issue.fields;
        table.add_row(vec![
            issue.key.clone(),
            named(&fields.status, ""),
            named(&fields.priority, "None"),
            format_date(fields.updated.as_deref()),
            truncate(&fields.summary, 60),
        ]);
    }
    println!("{table}");
}

/// Recently updated issues: Key / Type / Status / Assignee / Updated / Summary.
pub fn print_recent_table(issues: &[JiraIssue]) {
    let mut table = new_table(&["Key", "Type", "Status", "Assignee", "Updated", "Summary"]);
    for issue in issues {
        let fields = &issue.fields;
        table.add_row(vec![
            issue.key.clone(),
            named(&fields.issue_type, ""),
            named(&fields.status, ""),
            assignee_name(fields),
            format_date(fields.updated.as_deref()),
            truncate(&fields.summary, 50),
        ]);
    }
    println!("{table}");
}

/// Full detail view for a single issue.
pub fn print_issue_details(issue: &JiraIssue) {
    let fields = &issue.fields;

    println!("\n{}", "=".repeat(60));
    println!("🎫 TICKET: {}", issue.key);
    println!("{}", "=".repeat(60));

    let reporter = fields
        .reporter
        .as_ref()
        .and_then(|user| user.display_name.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.add_row(vec!["Type".to_string(), named(&fields.issue_type, "Unknown")]);
    table.add_row(vec!["Status".to_string(), named(&fields.status, "Unknown")]);
    table.add_row(vec!["Priority".to_string(), named(&fields.priority, "None")]);
    table.add_row(vec!["Assignee".to_string(), assignee_name(fields)]);
    table.add_row(vec!["Reporter".to_string(), reporter]);
    table.add_row(vec![
        "Created".to_string(),
        format_date(fields.created.as_deref()),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        format_date(fields.updated.as_deref()),
    ]);
    if let Some(parent) = &fields.parent {
        table.add_row(vec![
            "Parent".to_string(),
            format!("{} - {}", parent.key, parent.fields.summary),
        ]);
    }
    if !fields.labels.is_empty() {
        table.add_row(vec!["Labels".to_string(), fields.labels.join(", ")]);
    }
    println!("{table}");

    println!("\n📋 SUMMARY");
    println!("{}", "-".repeat(40));
    println!("{}", fields.summary);

    if let Some(description) = &fields.description {
        println!("\n📄 DESCRIPTION");
        println!("{}", "-".repeat(40));
        println!("{}", render_text(description));
    }

    if !fields.subtasks.is_empty() {
        println!("\n📝 SUBTASKS");
        println!("{}", "-".repeat(40));
        for subtask in &fields.subtasks {
            println!(
                "  • {}: {} [{}]",
                subtask.key,
                subtask.fields.summary,
                named(&subtask.fields.status, "Unknown"),
            );
        }
    }
}

fn named(field: &Option<NamedField>, fallback: &str) -> String {
    field
        .as_ref()
        .map(|f| f.name.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn assignee_name(fields: &JiraFields) -> String {
    fields
        .assignee
        .as_ref()
        .and_then(|user| user.display_name.clone())
        .unwrap_or_else(|| "Unassigned".to_string())
}

/// `2024-01-15T10:30:00.000+0000` -> `2024-01-15 10:30`. JIRA's offsets
/// lack the RFC 3339 colon, so parse with `%z` first.
pub fn format_date(date: Option<&str>) -> String {
    let Some(raw) = date else {
        return "N/A".to_string();
    };
    chrono::DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3f%z")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(raw))
        .map(|stamp| stamp.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.chars().take(19).collect())
}

/// Truncate to `max` characters, appending "..." when shortened. Safe for
/// multi-byte strings.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

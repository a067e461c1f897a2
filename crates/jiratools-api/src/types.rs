//! JIRA API types
//!
//! Serde models for the payload shapes the tool reads and writes. Unknown
//! issue fields are kept in a flattened map so raw JSON output stays
//! faithful. Timestamps stay as strings: JIRA's `+0000` offsets are not
//! RFC 3339, so parsing is left to the display layer.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JiraIssue {
    pub key: String,
    pub fields: JiraFields,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<Changelog>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
    /// Raw ADF document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<JiraUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<JiraUser>,
    #[serde(rename = "issuetype", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<NamedField>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<JiraIssue>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subtasks: Vec<JiraIssue>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// A `{name: ...}` object (status, priority, issue type, link type).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraUser {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: NamedField,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub issues: Vec<JiraIssue>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Priority {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueType {
    pub name: String,
    #[serde(default)]
    pub subtask: bool,
}

/// Statuses available for one issue type within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusGroup {
    pub name: String,
    #[serde(default)]
    pub statuses: Vec<NamedField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub lead: Option<JiraUser>,
    #[serde(rename = "issueTypes", default)]
    pub issue_types: Vec<IssueType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Changelog {
    #[serde(default)]
    pub histories: Vec<Value>,
}

/// Parameters for creating an issue. Description text is Markdown and is
/// converted to ADF when the request body is built.
#[derive(Debug, Clone)]
pub struct NewIssue {
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub priority: Option<String>,
    /// Assignee email, resolved to an account id at request time
    pub assignee: Option<String>,
    pub parent: Option<String>,
    pub labels: Vec<String>,
    /// Project key override; falls back to the configured default
    pub project: Option<String>,
}

impl NewIssue {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            description: None,
            issue_type: "Story".to_string(),
            priority: Some("Medium".to_string()),
            assignee: None,
            parent: None,
            labels: Vec::new(),
            project: None,
        }
    }
}

/// Fields to change on an existing issue. `None` leaves a field untouched;
/// `labels` replaces the whole set when given.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub assignee: Option<String>,
    pub labels: Option<Vec<String>>,
}

impl IssueUpdate {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.labels.is_none()
    }
}

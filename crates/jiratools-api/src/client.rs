//! JIRA client operations
//!
//! Composes the request executor into the named issue operations: create,
//! update, get, search, transition, assign, link, comment, attach, and the
//! project/metadata lookups. Markdown text for descriptions and comments is
//! converted to ADF before a request body is built, so a document the
//! server would reject fails here with a clear error instead.

use crate::config::JiraConfig;
use crate::error::{Error, Result};
use crate::executor::{ApiRequest, RequestExecutor, RetryPolicy};
use crate::types::{
    CreatedIssue, IssueType, IssueUpdate, JiraIssue, NamedField, NewIssue, Priority, Project,
    SearchResult, StatusGroup, Transition,
};
use jiratools_core::markdown_to_adf;
use serde_json::{json, Map, Value};
use std::path::Path;
use tracing::{debug, info, warn};

/// Fields requested by default when searching.
const SEARCH_FIELDS: &str =
    "summary,status,priority,assignee,reporter,issuetype,created,updated,labels,parent";

pub struct JiraClient {
    config: JiraConfig,
    executor: RequestExecutor,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let executor = RequestExecutor::new(&config)?;
        Ok(Self { config, executor })
    }

    /// Client configured from the environment and `.env` file chain.
    pub fn from_env() -> Result<Self> {
        Self::new(JiraConfig::from_env()?)
    }

    pub fn with_policy(config: JiraConfig, policy: RetryPolicy) -> Result<Self> {
        let executor = RequestExecutor::with_policy(&config, policy)?;
        Ok(Self { config, executor })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// Create a new issue.
    pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue> {
        info!(summary = %issue.summary, "creating issue");
        let project = match &issue.project {
            Some(key) => key.as_str(),
            None => self.config.require_project()?,
        };

        let mut fields = Map::new();
        fields.insert("project".to_string(), json!({"key": project}));
        fields.insert("summary".to_string(), Value::String(issue.summary.clone()));
        if let Some(description) = &issue.description {
            let document = markdown_to_adf(description)?;
            fields.insert("description".to_string(), serde_json::to_value(document)?);
        }
        fields.insert("issuetype".to_string(), json!({"name": issue.issue_type}));
        if let Some(priority) = &issue.priority {
            fields.insert("priority".to_string(), json!({"name": priority}));
        }
        if let Some(email) = &issue.assignee {
            match self.find_account_id(email).await? {
                Some(account_id) => {
                    fields.insert("assignee".to_string(), json!({"accountId": account_id}));
                }
                None => warn!(%email, "assignee not found, creating unassigned"),
            }
        }
        if let Some(parent) = &issue.parent {
            fields.insert("parent".to_string(), json!({"key": parent}));
        }
        if !issue.labels.is_empty() {
            fields.insert("labels".to_string(), serde_json::to_value(&issue.labels)?);
        }

        let request = ApiRequest::post("issue", json!({"fields": fields}));
        let created: CreatedIssue = serde_json::from_value(self.executor.execute(&request).await?)?;
        info!(key = %created.key, "created issue");
        Ok(created)
    }

    /// Update fields on an existing issue.
    pub async fn update_issue(&self, key: &str, update: &IssueUpdate) -> Result<()> {
        if update.is_empty() {
            return Err(Error::Validation("no fields to update".to_string()));
        }
        info!(key, "updating issue");

        let mut fields = Map::new();
        if let Some(summary) = &update.summary {
            fields.insert("summary".to_string(), Value::String(summary.clone()));
        }
        if let Some(description) = &update.description {
            let document = markdown_to_adf(description)?;
            fields.insert("description".to_string(), serde_json::to_value(document)?);
        }
        if let Some(priority) = &update.priority {
            fields.insert("priority".to_string(), json!({"name": priority}));
        }
        if let Some(email) = &update.assignee {
            let account_id = self
                .find_account_id(email)
                .await?
                .ok_or_else(|| Error::NotFound(format!("user {email}")))?;
            fields.insert("assignee".to_string(), json!({"accountId": account_id}));
        }
        if let Some(labels) = &update.labels {
            fields.insert("labels".to_string(), serde_json::to_value(labels)?);
        }

        let request = ApiRequest::put(format!("issue/{key}"), json!({"fields": fields}));
        self.executor.execute(&request).await?;
        Ok(())
    }

    /// Fetch a single issue.
    pub async fn get_issue(&self, key: &str, expand: &[&str]) -> Result<JiraIssue> {
        Ok(serde_json::from_value(self.get_issue_raw(key, expand).await?)?)
    }

    /// Fetch a single issue as raw JSON.
    pub async fn get_issue_raw(&self, key: &str, expand: &[&str]) -> Result<Value> {
        debug!(key, "fetching issue");
        let mut request = ApiRequest::get(format!("issue/{key}"));
        if !expand.is_empty() {
            request = request.query("expand", expand.join(","));
        }
        self.executor.execute(&request).await
    }

    /// Search issues with JQL.
    pub async fn search_issues(
        &self,
        jql: &str,
        max_results: u32,
        fields: Option<&str>,
    ) -> Result<SearchResult> {
        info!(jql, "searching issues");
        let request = ApiRequest::get("search/jql")
            .query("jql", jql)
            .query("maxResults", max_results.min(1000).to_string())
            .query("startAt", "0")
            .query("fields", fields.unwrap_or(SEARCH_FIELDS));
        Ok(serde_json::from_value(self.executor.execute(&request).await?)?)
    }

    /// Move an issue to a new status by name. Matches the target status
    /// case-insensitively, falling back to a substring match; returns the
    /// name of the status actually reached.
    pub async fn transition_issue(&self, key: &str, status: &str) -> Result<String> {
        info!(key, status, "transitioning issue");
        let request = ApiRequest::get(format!("issue/{key}/transitions"));
        let value = self.executor.execute(&request).await?;
        let transitions: Vec<Transition> =
            serde_json::from_value(value.get("transitions").cloned().unwrap_or_else(|| json!([])))?;

        let wanted = status.to_lowercase();
        let matched = transitions
            .iter()
            .find(|t| t.to.name.to_lowercase() == wanted)
            .or_else(|| {
                transitions
                    .iter()
                    .find(|t| t.to.name.to_lowercase().contains(&wanted))
            });

        let Some(transition) = matched else {
            let available: Vec<&str> = transitions.iter().map(|t| t.to.name.as_str()).collect();
            return Err(Error::NotFound(format!(
                "status '{status}' not available (available: {})",
                available.join(", ")
            )));
        };
        if !transition.to.name.eq_ignore_ascii_case(status) {
            info!(matched = %transition.to.name, "using partial status match");
        }

        let request = ApiRequest::post(
            format!("issue/{key}/transitions"),
            json!({"transition": {"id": transition.id}}),
        );
        self.executor.execute(&request).await?;
        Ok(transition.to.name.clone())
    }

    /// Assign an issue to a user by email.
    pub async fn assign_issue(&self, key: &str, email: &str) -> Result<()> {
        info!(key, email, "assigning issue");
        let account_id = self
            .find_account_id(email)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {email}")))?;
        let request = ApiRequest::put(
            format!("issue/{key}/assignee"),
            json!({"accountId": account_id}),
        );
        self.executor.execute(&request).await?;
        Ok(())
    }

    /// Link two issues. Falls back to the legacy body shape when the
    /// server rejects the modern one.
    pub async fn link_issues(&self, inward: &str, outward: &str, link_type: &str) -> Result<()> {
        info!(inward, outward, link_type, "linking issues");
        let modern = ApiRequest::post(
            "issueLink",
            json!({
                "type": {"name": link_type},
                "inwardIssue": {"key": inward},
                "outwardIssue": {"key": outward},
            }),
        );
        match self.executor.execute(&modern).await {
            Ok(_) => Ok(()),
            Err(Error::Api(first)) => {
                warn!(error = %first, "issue link rejected, trying legacy body");
                let legacy = ApiRequest::post(
                    "issueLink",
                    json!({
                        "linkType": {"name": link_type},
                        "fromIssueKey": inward,
                        "toIssueKey": outward,
                    }),
                );
                match self.executor.execute(&legacy).await {
                    Ok(_) => Ok(()),
                    Err(_) => Err(Error::Api(first)),
                }
            }
            Err(other) => Err(other),
        }
    }

    /// Attach a story to an epic: the parent field when the project
    /// supports it, else the Epic Link custom field found via editmeta.
    pub async fn link_to_epic(&self, story: &str, epic: &str) -> Result<()> {
        info!(story, epic, "linking to epic");
        let parent = ApiRequest::put(
            format!("issue/{story}"),
            json!({"fields": {"parent": {"key": epic}}}),
        );
        if self.executor.execute(&parent).await.is_ok() {
            return Ok(());
        }

        let meta = self
            .executor
            .execute(&ApiRequest::get(format!("issue/{story}/editmeta")))
            .await?;
        let field_id = meta
            .get("fields")
            .and_then(Value::as_object)
            .and_then(|fields| {
                fields
                    .iter()
                    .find(|(_, info)| {
                        matches!(
                            info.get("name").and_then(Value::as_str),
                            Some(name) if name.eq_ignore_ascii_case("epic link")
                                || name.eq_ignore_ascii_case("epic name")
                        )
                    })
                    .map(|(id, _)| id.clone())
            })
            .ok_or_else(|| Error::NotFound(format!("no epic link field on {story}")))?;

        let mut fields = Map::new();
        fields.insert(field_id, Value::String(epic.to_string()));
        let request = ApiRequest::put(format!("issue/{story}"), json!({"fields": fields}));
        self.executor.execute(&request).await?;
        Ok(())
    }

    /// Add a Markdown comment to an issue.
    pub async fn add_comment(&self, key: &str, markdown: &str) -> Result<Value> {
        info!(key, "adding comment");
        let body = serde_json::to_value(markdown_to_adf(markdown)?)?;
        let request = ApiRequest::post(format!("issue/{key}/comment"), json!({"body": body}));
        self.executor.execute(&request).await
    }

    /// Upload a file attachment.
    pub async fn add_attachment(&self, key: &str, path: &Path) -> Result<Value> {
        info!(key, path = %path.display(), "adding attachment");
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        self.executor
            .upload(&format!("issue/{key}/attachments"), &file_name, bytes)
            .await
    }

    /// Resolve a user's account id from an email address. Lookup failures
    /// degrade to `None`; the caller decides whether that is fatal.
    pub async fn find_account_id(&self, email: &str) -> Result<Option<String>> {
        let request = ApiRequest::get("user/search")
            .query("query", email)
            .query("maxResults", "1");
        match self.executor.execute(&request).await {
            Ok(Value::Array(users)) if !users.is_empty() => {
                if let Some(id) = users[0].get("accountId").and_then(Value::as_str) {
                    return Ok(Some(id.to_string()));
                }
            }
            Ok(_) => {}
            Err(error) => warn!(%error, email, "user search failed"),
        }

        // fallback: the user picker endpoint
        let request = ApiRequest::get("user/picker")
            .query("query", email)
            .query("maxResults", "1");
        match self.executor.execute(&request).await {
            Ok(value) => Ok(value
                .get("users")
                .and_then(Value::as_array)
                .and_then(|users| users.first())
                .and_then(|user| user.get("accountId").and_then(Value::as_str))
                .map(String::from)),
            Err(error) => {
                warn!(%error, email, "user lookup failed");
                Ok(None)
            }
        }
    }

    /// Project metadata.
    pub async fn get_project(&self, key: Option<&str>) -> Result<Project> {
        let key = match key {
            Some(k) => k,
            None => self.config.require_project()?,
        };
        debug!(key, "fetching project");
        let value = self
            .executor
            .execute(&ApiRequest::get(format!("project/{key}")))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Issue types available in a project.
    pub async fn get_issue_types(&self, project: Option<&str>) -> Result<Vec<IssueType>> {
        Ok(self.get_project(project).await?.issue_types)
    }

    /// Globally configured priorities.
    pub async fn get_priorities(&self) -> Result<Vec<Priority>> {
        let value = self.executor.execute(&ApiRequest::get("priority")).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Statuses grouped by issue type, falling back to the global list
    /// when the project-scoped endpoint is unavailable.
    pub async fn get_statuses(&self, project: Option<&str>) -> Result<Vec<StatusGroup>> {
        let key = match project {
            Some(k) => k,
            None => self.config.require_project()?,
        };
        let request = ApiRequest::get(format!("project/{key}/statuses"));
        match self.executor.execute(&request).await {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(error) => {
                warn!(%error, "project statuses unavailable, falling back to global list");
                let value = self.executor.execute(&ApiRequest::get("status")).await?;
                let statuses: Vec<NamedField> = serde_json::from_value(value)?;
                Ok(vec![StatusGroup {
                    name: "All".to_string(),
                    statuses,
                }])
            }
        }
    }

    /// Change history for an issue.
    pub async fn get_changelog(&self, key: &str) -> Result<Vec<Value>> {
        let value = self.get_issue_raw(key, &["changelog"]).await?;
        Ok(value
            .pointer("/changelog/histories")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    /// Issues assigned to a user, most recently updated first. Defaults to
    /// the configured account.
    pub async fn my_issues(&self, email: Option<&str>) -> Result<SearchResult> {
        let email = email.unwrap_or(&self.config.email);
        let jql = format!("assignee = '{email}' ORDER BY updated DESC");
        self.search_issues(&jql, 50, None).await
    }

    /// Issues updated in the last `days` days in a project.
    pub async fn recent_issues(&self, days: u32, project: Option<&str>) -> Result<SearchResult> {
        let key = match project {
            Some(k) => k,
            None => self.config.require_project()?,
        };
        let jql = format!("project = {key} AND updated >= -{days}d ORDER BY updated DESC");
        self.search_issues(&jql, 50, None).await
    }

    /// Create several issues; one failure does not abort the batch.
    pub async fn bulk_create(&self, issues: &[NewIssue]) -> Vec<Result<CreatedIssue>> {
        let mut results = Vec::with_capacity(issues.len());
        for issue in issues {
            let result = self.create_issue(issue).await;
            if let Err(error) = &result {
                warn!(%error, summary = %issue.summary, "bulk create item failed");
            }
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> JiraClient {
        let config = JiraConfig::new(
            server.uri(),
            "me@example.com".to_string(),
            "token".to_string(),
            Some("PROJ".to_string()),
        )
        .unwrap();
        let policy = RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
        };
        JiraClient::with_policy(config, policy).unwrap()
    }

    fn created_body() -> serde_json::Value {
        json!({
            "id": "10001",
            "key": "PROJ-7",
            "self": "https://example.atlassian.net/rest/api/3/issue/10001"
        })
    }

    #[tokio::test]
    async fn test_create_issue_builds_fields_and_converts_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue"))
            .and(body_partial_json(json!({
                "fields": {
                    "project": {"key": "PROJ"},
                    "summary": "A summary",
                    "issuetype": {"name": "Story"},
                    "priority": {"name": "Medium"},
                    "labels": ["backend"],
                    "description": {
                        "type": "doc",
                        "version": 1,
                        "content": [{
                            "type": "paragraph",
                            "content": [
                                {"type": "text", "text": "Some "},
                                {"type": "text", "text": "bold",
                                 "marks": [{"type": "strong"}]}
                            ]
                        }]
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(created_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut issue = NewIssue::new("A summary");
        issue.description = Some("Some **bold**".to_string());
        issue.labels = vec!["backend".to_string()];
        let created = client.create_issue(&issue).await.unwrap();
        assert_eq!(created.key, "PROJ-7");
    }

    #[tokio::test]
    async fn test_create_issue_with_blockquote_fails_before_any_request() {
        let server = MockServer::start().await;
        // no mock mounted: a request would 404 and the test would still
        // distinguish it by the error variant
        let client = client_for(&server).await;
        let mut issue = NewIssue::new("A summary");
        issue.description = Some("> quoted".to_string());
        let error = client.create_issue(&issue).await.unwrap_err();
        assert!(matches!(error, Error::Markdown(_)));
    }

    #[tokio::test]
    async fn test_create_issue_without_project_is_config_error() {
        let server = MockServer::start().await;
        let config = JiraConfig::new(
            server.uri(),
            "me@example.com".to_string(),
            "token".to_string(),
            None,
        )
        .unwrap();
        let client = JiraClient::new(config).unwrap();
        let error = client.create_issue(&NewIssue::new("x")).await.unwrap_err();
        assert!(matches!(error, Error::Config(_)));
    }

    #[tokio::test]
    async fn test_update_issue_rejects_empty_update() {
        let server = MockServer::start().await;
        let client = client_for(&server).await;
        let error = client
            .update_issue("PROJ-1", &IssueUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_issue_puts_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/rest/api/3/issue/PROJ-1"))
            .and(body_partial_json(json!({
                "fields": {"summary": "New summary", "priority": {"name": "High"}}
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let update = IssueUpdate {
            summary: Some("New summary".to_string()),
            priority: Some("High".to_string()),
            ..Default::default()
        };
        client.update_issue("PROJ-1", &update).await.unwrap();
    }

    #[tokio::test]
    async fn test_search_issues_caps_max_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(query_param("jql", "project = PROJ"))
            .and(query_param("maxResults", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "issues": [
                    {"key": "PROJ-1", "fields": {"summary": "First"}}
                ],
                "total": 1
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client
            .search_issues("project = PROJ", 5000, None)
            .await
            .unwrap();
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].key, "PROJ-1");
        assert_eq!(result.total, Some(1));
    }

    #[tokio::test]
    async fn test_transition_issue_matches_case_insensitively() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-1/transitions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transitions": [
                    {"id": "11", "name": "Start", "to": {"name": "In Progress"}},
                    {"id": "21", "name": "Finish", "to": {"name": "Done"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PROJ-1/transitions"))
            .and(body_partial_json(json!({"transition": {"id": "21"}})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let reached = client.transition_issue("PROJ-1", "done").await.unwrap();
        assert_eq!(reached, "Done");
    }

    #[tokio::test]
    async fn test_transition_issue_unknown_status_lists_available() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-1/transitions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transitions": [
                    {"id": "11", "name": "Start", "to": {"name": "In Progress"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let error = client
            .transition_issue("PROJ-1", "Shipped")
            .await
            .unwrap_err();
        assert!(error.to_string().contains("In Progress"));
    }

    #[tokio::test]
    async fn test_assign_issue_resolves_account_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/user/search"))
            .and(query_param("query", "sam@example.com"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"accountId": "abc123", "displayName": "Sam"}])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/rest/api/3/issue/PROJ-1/assignee"))
            .and(body_partial_json(json!({"accountId": "abc123"})))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .assign_issue("PROJ-1", "sam@example.com")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_find_account_id_falls_back_to_picker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/user/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/user/picker"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": [{"accountId": "xyz789"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let id = client.find_account_id("sam@example.com").await.unwrap();
        assert_eq!(id.as_deref(), Some("xyz789"));
    }

    #[tokio::test]
    async fn test_link_issues_falls_back_to_legacy_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issueLink"))
            .and(body_partial_json(json!({"type": {"name": "Relates"}})))
            .respond_with(ResponseTemplate::new(400))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issueLink"))
            .and(body_partial_json(json!({"linkType": {"name": "Relates"}})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        client
            .link_issues("PROJ-1", "PROJ-2", "Relates")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_add_comment_wraps_adf_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/api/3/issue/PROJ-1/comment"))
            .and(body_partial_json(json!({
                "body": {"type": "doc", "version": 1}
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "5"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let value = client.add_comment("PROJ-1", "a *note*").await.unwrap();
        assert_eq!(value["id"], "5");
    }

    #[tokio::test]
    async fn test_get_changelog_extracts_histories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/PROJ-1"))
            .and(query_param("expand", "changelog"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key": "PROJ-1",
                "fields": {"summary": "x"},
                "changelog": {"histories": [{"id": "100"}, {"id": "101"}]}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let histories = client.get_changelog("PROJ-1").await.unwrap();
        assert_eq!(histories.len(), 2);
    }

    #[tokio::test]
    async fn test_my_issues_builds_jql() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .and(query_param(
                "jql",
                "assignee = 'me@example.com' ORDER BY updated DESC",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issues": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client.my_issues(None).await.unwrap();
        assert!(result.issues.is_empty());
    }

    #[tokio::test]
    async fn test_search_error_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/search/jql"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({"errorMessages": ["bad JQL"]})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let error = client.search_issues("nonsense ===", 50, None).await.unwrap_err();
        match error {
            Error::Api(api) => {
                assert_eq!(api.kind, ApiErrorKind::Validation);
                assert!(api.message.contains("bad JQL"));
            }
            other => panic!("expected Error::Api, got {other:?}"),
        }
    }
}

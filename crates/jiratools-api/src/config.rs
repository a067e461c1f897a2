//! JIRA connection configuration
//!
//! Loaded from the environment, with `.env`-style files consulted in order:
//! `./.env`, `~/.jira.env`, then `/etc/jira-tools.env`. Already-set
//! variables are never overridden, so the process environment always wins
//! and earlier files take precedence over later ones.

use crate::error::{Error, Result};
use std::env;
use std::path::Path;

const CONFIG_LOCATIONS: &[&str] = &[
    "Current directory: .env",
    "User home: ~/.jira.env",
    "System-wide: /etc/jira-tools.env",
];

#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// Base URL of the JIRA Cloud instance, without a trailing slash
    pub url: String,
    /// Atlassian account email
    pub email: String,
    /// API token paired with the email for Basic auth
    pub api_token: String,
    /// Default project key for operations that take none explicitly
    pub project_key: Option<String>,
}

impl JiraConfig {
    /// Load configuration from the environment and the `.env` file chain.
    pub fn from_env() -> Result<Self> {
        load_env_files();

        let url = non_empty(env::var("JIRA_URL").ok());
        let email = non_empty(env::var("JIRA_EMAIL").ok());
        let api_token = non_empty(env::var("JIRA_API_TOKEN").ok());
        let project_key = non_empty(env::var("JIRA_PROJECT_KEY").ok());

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push("JIRA_URL");
        }
        if email.is_none() {
            missing.push("JIRA_EMAIL");
        }
        if api_token.is_none() {
            missing.push("JIRA_API_TOKEN");
        }
        if !missing.is_empty() {
            let locations = CONFIG_LOCATIONS
                .iter()
                .map(|location| format!("  - {location}"))
                .collect::<Vec<_>>()
                .join("\n");
            return Err(Error::Config(format!(
                "Missing required environment variables: {}\nConfiguration can be set in:\n{locations}",
                missing.join(", ")
            )));
        }

        Self::new(url.unwrap(), email.unwrap(), api_token.unwrap(), project_key)
    }

    /// Build a configuration, normalizing and validating the URL.
    pub fn new(
        url: String,
        email: String,
        api_token: String,
        project_key: Option<String>,
    ) -> Result<Self> {
        let url = url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::Config(format!(
                "JIRA_URL must start with http:// or https://, got: {url}"
            )));
        }
        Ok(Self {
            url,
            email,
            api_token,
            project_key,
        })
    }

    /// The REST v3 base for this instance.
    pub fn api_base(&self) -> String {
        format!("{}/rest/api/3", self.url)
    }

    /// Browser URL for an issue key.
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.url)
    }

    /// The configured project key, or a config error naming the variable.
    pub fn require_project(&self) -> Result<&str> {
        self.project_key.as_deref().ok_or_else(|| {
            Error::Config(
                "no project given and JIRA_PROJECT_KEY is not set".to_string(),
            )
        })
    }
}

fn non_empty(var: Option<String>) -> Option<String> {
    var.filter(|value| !value.trim().is_empty())
}

fn load_env_files() {
    let _ = dotenvy::dotenv();
    if let Some(home) = dirs::home_dir() {
        let _ = dotenvy::from_path(home.join(".jira.env"));
    }
    let _ = dotenvy::from_path(Path::new("/etc/jira-tools.env"));
}

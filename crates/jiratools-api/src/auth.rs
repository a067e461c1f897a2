//! JIRA authentication
//!
//! JIRA Cloud authenticates API calls with HTTP Basic auth over the
//! account email and an API token.

use crate::config::JiraConfig;

pub struct JiraAuth {
    email: String,
    api_token: String,
}

impl JiraAuth {
    pub fn new(email: String, api_token: String) -> Self {
        Self { email, api_token }
    }

    /// `Authorization` header value: `Basic base64(email:token)`.
    pub fn to_basic_auth(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.email, self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

impl From<&JiraConfig> for JiraAuth {
    fn from(config: &JiraConfig) -> Self {
        Self::new(config.email.clone(), config.api_token.clone())
    }
}

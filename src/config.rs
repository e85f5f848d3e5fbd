//! Process configuration, read once at run start.

use crate::error::Error;

/// Default REST API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
/// Default GraphQL endpoint URL.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Configuration for one triage run.
///
/// Required values stay optional here so a missing one surfaces as a
/// reported skip instead of a construction failure; [`Config::require`]
/// resolves them before any remote call is made.
#[derive(Debug, Clone)]
pub struct Config {
    /// Automation token used for the label endpoints.
    pub github_token: Option<String>,
    /// Token with project scopes, used for the board GraphQL chain.
    pub project_token: Option<String>,
    /// URL of the project board whose Priority field mirrors triage output.
    pub board_url: Option<String>,
    /// REST API base URL.
    pub api_base: String,
    /// GraphQL endpoint URL.
    pub graphql_url: String,
}

impl Config {
    /// Build a configuration from raw inputs, with default endpoints.
    #[must_use]
    pub fn new(
        github_token: Option<String>,
        project_token: Option<String>,
        board_url: Option<String>,
    ) -> Self {
        Self {
            github_token,
            project_token,
            board_url,
            api_base: DEFAULT_API_BASE.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }

    /// Override the API endpoints (GitHub Enterprise, tests).
    #[must_use]
    pub fn with_endpoints(mut self, api_base: impl Into<String>, graphql_url: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self.graphql_url = graphql_url.into();
        self
    }

    /// The required inputs as `(automation token, project token, board URL)`,
    /// or the first one that is missing or blank.
    pub fn require(&self) -> Result<(&str, &str, &str), Error> {
        let github_token = Self::present(self.github_token.as_deref())
            .ok_or(Error::Configuration("automation token (GITHUB_TOKEN)"))?;
        let project_token = Self::present(self.project_token.as_deref())
            .ok_or(Error::Configuration("project automation token (TRIAGE_PROJECT_TOKEN)"))?;
        let board_url = Self::present(self.board_url.as_deref())
            .ok_or(Error::Configuration("project board URL (TRIAGE_PROJECT_URL)"))?;
        Ok((github_token, project_token, board_url))
    }

    fn present(value: Option<&str>) -> Option<&str> {
        value.map(str::trim).filter(|v| !v.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full() -> Config {
        Config::new(
            Some("ghp_token".into()),
            Some("ghp_project".into()),
            Some("https://github.com/orgs/acme/projects/11".into()),
        )
    }

    #[test]
    fn require_passes_with_all_inputs() {
        let config = full();
        let (token, project_token, url) = config.require().expect("all inputs present");
        assert_eq!(token, "ghp_token");
        assert_eq!(project_token, "ghp_project");
        assert_eq!(url, "https://github.com/orgs/acme/projects/11");
    }

    #[test]
    fn require_rejects_missing_or_blank_values() {
        let mut config = full();
        config.project_token = None;
        assert!(matches!(config.require(), Err(Error::Configuration(_))));

        let mut config = full();
        config.board_url = Some("   ".into());
        assert!(matches!(config.require(), Err(Error::Configuration(_))));
    }

    #[test]
    fn endpoints_default_to_github() {
        let config = full();
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.graphql_url, DEFAULT_GRAPHQL_URL);
    }
}

//! Tracker boundary: the [`TrackerClient`] seam, query builders, and the
//! production Jira REST implementation.

pub mod jira;
pub mod models;

use async_trait::async_trait;

pub use jira::JiraClient;
pub use models::{Board, Issue, IssueType, Project, Sprint};

use crate::errors::FetchError;

/// Abstraction over the issue-tracking server for testability.
/// Real implementation: [`JiraClient`]. Tests substitute deterministic fakes.
#[async_trait]
pub trait TrackerClient: Send + Sync {
    /// Run a JQL-equivalent query, returning at most `max_results` issues.
    async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<Issue>, FetchError>;

    /// All projects visible to the configured credentials.
    async fn list_projects(&self) -> Result<Vec<Project>, FetchError>;

    /// All boards visible to the configured credentials.
    async fn list_boards(&self) -> Result<Vec<Board>, FetchError>;

    /// Sprints attached to one board, in the order the tracker returns them.
    async fn list_sprints(&self, board_id: u64) -> Result<Vec<Sprint>, FetchError>;
}

// ── JQL builders ──────────────────────────────────────────────────────

/// Escape a value for interpolation inside single quotes in JQL.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

pub fn stories_in_project(project: &str) -> String {
    format!("issuetype = Story AND project = '{}'", escape(project))
}

pub fn epics_in_project(project: &str) -> String {
    format!("issuetype = Epic AND project = '{}'", escape(project))
}

pub fn stories_in_sprint(project: &str, sprint_id: u64) -> String {
    format!(
        "issuetype = Story AND project = '{}' AND sprint = {}",
        escape(project),
        sprint_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stories_query_names_project() {
        assert_eq!(
            stories_in_project("RDC: Wangshu SDK"),
            "issuetype = Story AND project = 'RDC: Wangshu SDK'"
        );
    }

    #[test]
    fn epics_query_names_project() {
        assert_eq!(
            epics_in_project("Demo"),
            "issuetype = Epic AND project = 'Demo'"
        );
    }

    #[test]
    fn sprint_query_carries_sprint_id() {
        assert_eq!(
            stories_in_sprint("Demo", 42),
            "issuetype = Story AND project = 'Demo' AND sprint = 42"
        );
    }

    #[test]
    fn single_quotes_are_escaped() {
        assert_eq!(
            stories_in_project("O'Brien"),
            "issuetype = Story AND project = 'O\\'Brien'"
        );
    }

    #[test]
    fn backslashes_are_escaped_before_quotes() {
        assert_eq!(escape(r"a\'b"), r"a\\\'b");
    }
}

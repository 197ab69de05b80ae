//! Production tracker client against the Jira REST v2 / Agile v1 APIs.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::models::{Board, Issue, PagedValues, Project, RawIssue, SearchResponse, Sprint};
use super::TrackerClient;
use crate::config::TrackerConfig;
use crate::errors::FetchError;

const SEARCH_PATH: &str = "/rest/api/2/search";
const PROJECTS_PATH: &str = "/rest/api/2/project";
const BOARDS_PATH: &str = "/rest/agile/1.0/board";

pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    user: String,
    token: String,
    epic_link_field: String,
    target_version_field: String,
}

impl JiraClient {
    pub fn new(cfg: &TrackerConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            user: cfg.user.clone(),
            token: cfg.token.clone(),
            epic_link_field: cfg.epic_link_field.clone(),
            target_version_field: cfg.target_version_field.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.token))
            .query(query)
            .send()
            .await?;

        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth { status: status.as_u16() });
        }
        if status.is_server_error() {
            return Err(FetchError::Unavailable { status: status.as_u16() });
        }
        let resp = resp.error_for_status()?;
        resp.json::<T>().await.map_err(|e| FetchError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }

    fn issue_fields(&self) -> String {
        format!(
            "summary,status,issuetype,labels,sprint,{},{}",
            self.epic_link_field, self.target_version_field
        )
    }
}

#[async_trait::async_trait]
impl TrackerClient for JiraClient {
    async fn search_issues(&self, jql: &str, max_results: u32) -> Result<Vec<Issue>, FetchError> {
        let resp: SearchResponse = self
            .get_json(
                SEARCH_PATH,
                &[
                    ("jql", jql.to_string()),
                    ("maxResults", max_results.to_string()),
                    ("fields", self.issue_fields()),
                ],
            )
            .await?;
        Ok(resp
            .issues
            .into_iter()
            .map(|raw: RawIssue| raw.into_issue(&self.epic_link_field, &self.target_version_field))
            .collect())
    }

    async fn list_projects(&self) -> Result<Vec<Project>, FetchError> {
        // The v2 project endpoint returns a bare array, not a paged envelope.
        self.get_json(PROJECTS_PATH, &[]).await
    }

    async fn list_boards(&self) -> Result<Vec<Board>, FetchError> {
        let page: PagedValues<Board> = self.get_json(BOARDS_PATH, &[]).await?;
        Ok(page.values)
    }

    async fn list_sprints(&self, board_id: u64) -> Result<Vec<Sprint>, FetchError> {
        let path = format!("{}/{}/sprint", BOARDS_PATH, board_id);
        let page: PagedValues<Sprint> = self.get_json(&path, &[]).await?;
        Ok(page.values)
    }
}

//! Domain and wire types for the tracker boundary.
//!
//! Raw types mirror the Jira REST payloads; the domain [`Issue`] is the
//! immutable snapshot the rest of the crate works with. Custom fields (epic
//! link, target version) have site-specific ids, so they are captured from a
//! flattened map and resolved against configured field names.

use std::collections::HashMap;

use serde::Deserialize;

// ── Domain types ──────────────────────────────────────────────────────

/// Work item kind, folded down from the tracker's free-form type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueType {
    Story,
    Epic,
    Other(String),
}

impl IssueType {
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "story" => IssueType::Story,
            "epic" => IssueType::Epic,
            _ => IssueType::Other(name.to_string()),
        }
    }
}

/// Immutable snapshot of a tracker work item.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub key: String,
    pub issue_type: IssueType,
    pub summary: String,
    pub status: String,
    pub labels: Vec<String>,
    pub parent_epic_key: Option<String>,
    pub sprint_id: Option<u64>,
    pub target_version: Option<String>,
}

/// A tracker project (subset of fields we care about).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

/// A board associating sprints with a project or team.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Board {
    pub id: u64,
    pub name: String,
}

/// A time-boxed iteration on a board.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
}

// ── Wire types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total: Option<u64>,
    pub issues: Vec<RawIssue>,
}

#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub key: String,
    pub fields: RawFields,
}

#[derive(Debug, Deserialize)]
pub struct RawFields {
    pub summary: Option<String>,
    pub status: Option<RawNamed>,
    pub issuetype: Option<RawNamed>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub sprint: Option<RawSprintRef>,
    /// Everything else, including site-specific custom fields.
    #[serde(flatten)]
    pub custom: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct RawNamed {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawSprintRef {
    pub id: u64,
}

/// Paged `values` envelope used by the Agile board and sprint endpoints.
#[derive(Debug, Deserialize)]
pub struct PagedValues<T> {
    pub values: Vec<T>,
}

impl RawIssue {
    /// Resolve the raw payload into a domain [`Issue`] using the configured
    /// custom-field ids for epic link and target version.
    pub fn into_issue(self, epic_link_field: &str, target_version_field: &str) -> Issue {
        let parent_epic_key = self
            .fields
            .custom
            .get(epic_link_field)
            .and_then(custom_field_text);
        let target_version = self
            .fields
            .custom
            .get(target_version_field)
            .and_then(custom_field_text);
        let issue_type = self
            .fields
            .issuetype
            .as_ref()
            .map(|t| IssueType::from_name(&t.name))
            .unwrap_or(IssueType::Other(String::new()));

        Issue {
            key: self.key,
            issue_type,
            summary: self.fields.summary.unwrap_or_default(),
            status: self.fields.status.map(|s| s.name).unwrap_or_default(),
            labels: self.fields.labels,
            parent_epic_key,
            sprint_id: self.fields.sprint.map(|s| s.id),
            target_version,
        }
    }
}

/// Custom fields come back as plain strings, version objects, or arrays of
/// version objects depending on the field type. Flatten all of those to text.
fn custom_field_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Object(obj) => obj
            .get("name")
            .and_then(|n| n.as_str())
            .map(|n| n.to_string()),
        serde_json::Value::Array(items) => {
            let names: Vec<&str> = items
                .iter()
                .filter_map(|v| match v {
                    serde_json::Value::String(s) => Some(s.as_str()),
                    serde_json::Value::Object(obj) => obj.get("name").and_then(|n| n.as_str()),
                    _ => None,
                })
                .collect();
            if names.is_empty() {
                None
            } else {
                Some(names.join(", "))
            }
        }
        _ => None,
    }
}
